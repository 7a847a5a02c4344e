//! Upload error types.

use std::io;
use thiserror::Error;

use crate::transport::TransportError;
use crate::validation::ValidationError;

/// Why a single chunk was not acknowledged.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// 2xx response, but the backend reported `success: false`.
    #[error("rejected by backend: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected { message: Option<String> },
    #[error("read chunk: {0}")]
    Read(#[from] io::Error),
}

impl ChunkError {
    pub fn status(&self) -> Option<u32> {
        match self {
            ChunkError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Failure of a whole upload. No partial success value is ever returned.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A chunk failed; the upload was aborted and must restart from chunk zero.
    #[error("chunk {index} upload failed ({confirmed}/{total} chunks confirmed): {source}")]
    Chunk {
        index: usize,
        confirmed: usize,
        total: usize,
        #[source]
        source: ChunkError,
    },
    #[error("failed to complete upload: {0}")]
    Finalize(#[source] TransportError),
    #[error("upload cancelled ({confirmed}/{total} chunks confirmed)")]
    Cancelled { confirmed: usize, total: usize },
    /// Guard: finalize is never requested with missing acknowledgements.
    #[error("upload incomplete: chunks {missing:?} not acknowledged")]
    Incomplete { missing: Vec<usize> },
}

impl UploadError {
    /// HTTP status of the failing exchange, if any.
    pub fn status(&self) -> Option<u32> {
        match self {
            UploadError::Chunk { source, .. } => source.status(),
            UploadError::Finalize(e) => e.status(),
            _ => None,
        }
    }
}
