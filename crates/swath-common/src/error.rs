//! Error types shared across the swath-gridder crates.

use thiserror::Error;

/// Result type alias using CommonError.
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors for the shared type layer.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Unknown quality flag: {0}")]
    UnknownFlag(String),

    #[error("Invalid quality flag set: {0}")]
    InvalidFlagSet(String),
}
