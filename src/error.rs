use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeldError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<WeldError> for String {
    fn from(err: WeldError) -> Self {
        err.to_string()
    }
}
