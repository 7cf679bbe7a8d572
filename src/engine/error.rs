use thiserror::Error;

/// A rejected toggle. State is never changed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no course named '{name}' in {semester}")]
    UnknownCourse { semester: String, name: String },

    #[error("'{name}' is a required course and cannot be toggled")]
    RequiredCourse { semester: String, name: String },

    #[error("at most {limit} courses may be selected from group '{group}'")]
    QuotaExceeded { group: String, limit: u32 },
}

impl SelectionError {
    /// Unknown or required courses: the caller asked for something meaningless.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            SelectionError::UnknownCourse { .. } | SelectionError::RequiredCourse { .. }
        )
    }
}
