//! Error types for cloudsift

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cloudsift operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Feature detection failed: {0}")]
    Detector(String),

    #[error("Visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for cloudsift operations
pub type Result<T> = std::result::Result<T, Error>;
