//! Chunked upload protocol.
//!
//! Splits a file into fixed-size chunks, sends each one to the chunk transfer
//! endpoint with its sequencing metadata, records acknowledgements in an owned
//! [`UploadSession`], and asks the backend to reassemble the file only once
//! every chunk index has been acknowledged. Any failed chunk aborts the whole
//! upload; a new attempt starts from chunk zero with a fresh session id.

mod acks;
mod error;
mod plan;
mod pool;
mod session;
mod source;
mod wire;

pub use acks::AckSet;
pub use error::{ChunkError, UploadError};
pub use plan::{chunk_count, plan_chunks, Chunk};
pub use session::{new_session_id, SessionInfo, UploadSession};
pub use source::UploadFile;
pub use wire::{chunk_form, finalize_body, ChunkAck, FinalizationResult};

use crate::config::{ApxConfig, DEFAULT_CHUNK_SIZE};
use crate::control::AbortToken;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::transport::{HttpResponse, Transport};

/// Snapshot reported after every acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub acknowledged: usize,
    pub total_chunks: usize,
    pub bytes_acknowledged: u64,
    pub total_bytes: u64,
}

impl UploadProgress {
    fn of(session: &UploadSession) -> Self {
        Self {
            acknowledged: session.acknowledged_count(),
            total_chunks: session.total_chunks(),
            bytes_acknowledged: session.acknowledged_bytes(),
            total_bytes: session.total_size(),
        }
    }

    /// Acknowledged chunks as a rounded percentage.
    pub fn percent(&self) -> u32 {
        if self.total_chunks == 0 {
            return 100;
        }
        ((self.acknowledged as f64 / self.total_chunks as f64) * 100.0).round() as u32
    }
}

/// Tunables for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    pub chunk_size: usize,
    /// Chunks in flight at once; 1 = strict sequential submission.
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: 1,
            retry: RetryPolicy::no_retry(),
        }
    }
}

impl UploadOptions {
    pub fn from_config(cfg: &ApxConfig) -> Self {
        Self {
            chunk_size: cfg.chunk_size,
            concurrency: cfg.upload_concurrency.max(1),
            retry: cfg.retry_policy(),
        }
    }
}

type ProgressFn<'a> = dyn Fn(&UploadProgress) + Send + Sync + 'a;

/// Sends a file to the chunk transfer endpoint and finalizes it.
pub struct ChunkUploader<'a> {
    transport: &'a dyn Transport,
    chunk_url: String,
    finalize_url: String,
    options: UploadOptions,
    abort: Option<AbortToken>,
    progress: Option<Box<ProgressFn<'a>>>,
}

impl<'a> ChunkUploader<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        chunk_url: impl Into<String>,
        finalize_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            chunk_url: chunk_url.into(),
            finalize_url: finalize_url.into(),
            options: UploadOptions::default(),
            abort: None,
            progress: None,
        }
    }

    /// Endpoints and options taken from configuration.
    pub fn from_config(transport: &'a dyn Transport, cfg: &ApxConfig) -> Self {
        let endpoints = cfg.endpoints();
        Self::new(
            transport,
            cfg.endpoint_url(&endpoints.upload_chunk),
            cfg.endpoint_url(&endpoints.finalize_upload),
        )
        .with_options(UploadOptions::from_config(cfg))
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_abort(mut self, token: AbortToken) -> Self {
        self.abort = Some(token);
        self
    }

    pub fn on_progress(mut self, f: impl Fn(&UploadProgress) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Uploads `file` chunk by chunk and returns the backend's finalize result.
    pub fn upload(&self, file: &UploadFile) -> Result<FinalizationResult, UploadError> {
        let mut session = UploadSession::start(file.name(), file.len(), self.options.chunk_size)?;
        tracing::info!(
            "starting upload {} of {} ({} bytes, {} chunks of {} bytes)",
            session.session_id(),
            session.file_name(),
            session.total_size(),
            session.total_chunks(),
            session.chunk_size()
        );

        if self.options.concurrency <= 1 {
            self.send_sequential(file, &mut session)?;
        } else {
            pool::send_pooled(self, file, &mut session)?;
        }

        self.check_abort(&session)?;
        self.finalize(&session)
    }

    /// Reference behavior: chunk `i + 1` is sent only after chunk `i` is acknowledged.
    fn send_sequential(&self, file: &UploadFile, session: &mut UploadSession) -> Result<(), UploadError> {
        let info = session.info().clone();
        for chunk in session.chunks().to_vec() {
            self.check_abort(session)?;
            if let Err(source) = self.send_chunk(&info, file, &chunk) {
                return Err(self.chunk_failed(session, chunk.index, source));
            }
            self.record_ack(session, chunk.index);
        }
        Ok(())
    }

    /// Sends one chunk and checks the backend's acknowledgement.
    fn send_chunk(&self, info: &SessionInfo, file: &UploadFile, chunk: &Chunk) -> Result<(), ChunkError> {
        let data = file.read_chunk(chunk)?;
        let form = chunk_form(info, chunk, data);
        tracing::debug!(
            "sending chunk {}/{} of {} ({} bytes)",
            chunk.index + 1,
            info.total_chunks,
            info.session_id,
            chunk.len()
        );

        let response = run_with_retry(&self.options.retry, |_attempt| {
            self.transport
                .post_form(&self.chunk_url, &form)
                .and_then(HttpResponse::error_for_status)
        })?;

        let ack: ChunkAck = response.json("chunk acknowledgement")?;
        if !ack.success {
            return Err(ChunkError::Rejected { message: ack.error });
        }
        if let Some(acked) = ack.chunk_index.filter(|&i| i != chunk.index) {
            tracing::warn!("backend acknowledged chunk {} for index {}", acked, chunk.index);
        }
        Ok(())
    }

    fn record_ack(&self, session: &mut UploadSession, index: usize) {
        session.acknowledge(index);
        let progress = UploadProgress::of(session);
        tracing::debug!(
            "upload progress: {}% ({}/{} chunks)",
            progress.percent(),
            progress.acknowledged,
            progress.total_chunks
        );
        if let Some(cb) = &self.progress {
            cb(&progress);
        }
    }

    fn chunk_failed(&self, session: &UploadSession, index: usize, source: ChunkError) -> UploadError {
        tracing::warn!(
            "upload {} aborted at chunk {}: {}",
            session.session_id(),
            index,
            source
        );
        UploadError::Chunk {
            index,
            confirmed: session.acknowledged_count(),
            total: session.total_chunks(),
            source,
        }
    }

    fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortToken::is_aborted)
    }

    fn check_abort(&self, session: &UploadSession) -> Result<(), UploadError> {
        if self.is_aborted() {
            tracing::info!("upload {} cancelled", session.session_id());
            return Err(UploadError::Cancelled {
                confirmed: session.acknowledged_count(),
                total: session.total_chunks(),
            });
        }
        Ok(())
    }

    /// Asks the backend to concatenate the chunks in index order.
    fn finalize(&self, session: &UploadSession) -> Result<FinalizationResult, UploadError> {
        if !session.is_complete() {
            return Err(UploadError::Incomplete {
                missing: session.missing_chunks(),
            });
        }

        let result: FinalizationResult = self
            .transport
            .post_json(&self.finalize_url, &finalize_body(session.info()))
            .and_then(HttpResponse::error_for_status)
            .and_then(|r| r.json("finalize response"))
            .map_err(UploadError::Finalize)?;

        if let Some(size) = result.size.filter(|&s| s != session.total_size()) {
            tracing::warn!(
                "backend assembled {} bytes for {}, expected {}",
                size,
                session.file_name(),
                session.total_size()
            );
        }
        tracing::info!(
            "upload {} finalized as file id {}",
            session.session_id(),
            result.file_id
        );
        Ok(result)
    }
}
