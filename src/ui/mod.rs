pub mod courses;
pub mod panels;
pub mod plot;
