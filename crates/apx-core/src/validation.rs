//! Pre-flight input validation errors.

use thiserror::Error;

/// Input rejected before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file {name} is empty")]
    EmptyFile { name: String },
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error("file name is missing")]
    MissingFileName,
    #[error("please describe the API you want to extract")]
    MissingDescription,
    #[error("{name}: please upload a valid .har file")]
    UnsupportedFileType { name: String },
    #[error("{name}: not a HAR capture ({reason})")]
    InvalidHar { name: String, reason: String },
}
