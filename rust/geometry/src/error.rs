use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometric construction
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid plane frame: {0}")]
    InvalidFrame(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),
}
