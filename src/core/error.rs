use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KindredError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Command failed: {0}")]
    CommandError(String),
    #[error("Found errors in the project")]
    FoundErrors,
}
