//! Error types for the project board.

use thiserror::Error;

/// Result type alias using the project board's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Project not found with id: {0}")]
    ProjectNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
