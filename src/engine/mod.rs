/// Selection engine: chosen courses, quota enforcement, and derived summaries.
///
/// All state lives in one [`SelectionEngine`]. Every operation runs to
/// completion synchronously; callers that share an engine across threads or
/// deferred UI callbacks must serialise calls to [`SelectionEngine::toggle`].

pub mod error;
pub mod selection;
pub mod summary;

pub use selection::{CourseId, SelectionEngine};
pub use summary::{Scope, Summary};
