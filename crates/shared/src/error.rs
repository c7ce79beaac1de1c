use thiserror::Error;

/// User-facing failures. The `Display` text is what the error banner shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("Unable to load todos")]
    Load,
    #[error("Unable to add a todo")]
    Create,
    #[error("Unable to delete a todo")]
    Delete,
    #[error("Unable to delete a todo")]
    BulkDeletePartial,
    #[error("Title should not be empty")]
    EmptyTitle,
}

impl TodoError {
    pub fn message(self) -> String {
        self.to_string()
    }
}
