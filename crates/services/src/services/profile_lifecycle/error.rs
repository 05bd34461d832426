use std::sync::Arc;

use thiserror::Error;

/// Separator used when combining validation problems into one message
pub const PROBLEM_SEPARATOR: &str = " | ";

/// Structured validation failure reported by a loader
#[derive(Debug, Clone, Error)]
#[error("invalid profile config: {}", .problems.join(PROBLEM_SEPARATOR))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

impl ValidationError {
    pub fn new(problems: Vec<String>) -> Self {
        Self { problems }
    }
}

/// Failure returned by a [`ProfileLoader`](super::ProfileLoader)
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure observed by callers of the lifecycle manager.
///
/// Cloned to every caller awaiting the same load.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("{}", .problems.join(PROBLEM_SEPARATOR))]
    Invalid { problems: Vec<String> },
    #[error("{0}")]
    Failed(Arc<anyhow::Error>),
    #[error("profile load task did not complete: {0}")]
    Interrupted(String),
}

impl LoadError {
    /// The underlying error for failures that are not validation problems
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoaderError> for LoadError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::Validation(ValidationError { problems }) => Self::Invalid { problems },
            LoaderError::Other(err) => Self::Failed(Arc::new(err)),
        }
    }
}

impl From<anyhow::Error> for LoadError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed(Arc::new(err))
    }
}
