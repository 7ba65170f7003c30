use thiserror::Error;

/// Errors that can occur in the Conquest core types.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown territory id: {0}")]
    UnknownTerritory(usize),

    #[error("unknown continent id: {0}")]
    UnknownContinent(usize),

    #[error("invalid score: {0}")]
    InvalidScore(String),
}

/// Convenience Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
