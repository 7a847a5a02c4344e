//! The two user-facing actions bundled over one configuration and transport:
//! upload a capture and derive a command from it, and replay a command.

use std::sync::Arc;

use thiserror::Error;

use crate::command::{CommandParser, CurlHeuristicParser, RequestDescriptor};
use crate::config::ApxConfig;
use crate::control::AbortToken;
use crate::extract::{ExtractionClient, ExtractionResult};
use crate::relay::{RequestRelay, ResultDescriptor};
use crate::transport::{Transport, TransportError};
use crate::upload::{ChunkUploader, UploadError, UploadFile, UploadOptions, UploadProgress};
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("failed to extract request: {0}")]
    Extract(#[source] TransportError),
}

impl ExplorerError {
    pub fn status(&self) -> Option<u32> {
        match self {
            ExplorerError::Upload(e) => e.status(),
            ExplorerError::Extract(e) => e.status(),
            ExplorerError::Validation(_) => None,
        }
    }
}

type ProgressFn = dyn Fn(&UploadProgress) + Send + Sync;

#[derive(Clone)]
pub struct Explorer {
    cfg: ApxConfig,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn CommandParser>,
    upload_options: UploadOptions,
    abort: Option<AbortToken>,
    progress: Option<Arc<ProgressFn>>,
}

impl Explorer {
    pub fn new(cfg: ApxConfig, transport: Arc<dyn Transport>) -> Self {
        let upload_options = UploadOptions::from_config(&cfg);
        Self {
            cfg,
            transport,
            parser: Arc::new(CurlHeuristicParser),
            upload_options,
            abort: None,
            progress: None,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn CommandParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_upload_options(mut self, options: UploadOptions) -> Self {
        self.upload_options = options;
        self
    }

    pub fn with_abort(mut self, token: AbortToken) -> Self {
        self.abort = Some(token);
        self
    }

    pub fn on_progress(mut self, f: impl Fn(&UploadProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn config(&self) -> &ApxConfig {
        &self.cfg
    }

    /// Uploads `file` in chunks, then asks for the command matching
    /// `description`. `model` falls back to the configured default.
    pub fn upload_and_extract(
        &self,
        file: &UploadFile,
        description: &str,
        model: Option<&str>,
    ) -> Result<ExtractionResult, ExplorerError> {
        if description.trim().is_empty() {
            return Err(ValidationError::MissingDescription.into());
        }
        let model = model.unwrap_or(&self.cfg.default_model);

        let endpoints = self.cfg.endpoints();
        let mut uploader = ChunkUploader::new(
            self.transport.as_ref(),
            self.cfg.endpoint_url(&endpoints.upload_chunk),
            self.cfg.endpoint_url(&endpoints.finalize_upload),
        )
        .with_options(self.upload_options);
        if let Some(token) = &self.abort {
            uploader = uploader.with_abort(token.clone());
        }
        if let Some(cb) = &self.progress {
            let cb = Arc::clone(cb);
            uploader = uploader.on_progress(move |p| cb(p));
        }

        let finalized = uploader.upload(file)?;
        ExtractionClient::from_config(self.transport.as_ref(), &self.cfg)
            .request_derived_command(&finalized.file_id, description, model)
            .map_err(ExplorerError::Extract)
    }

    pub fn parse(&self, command: &str) -> RequestDescriptor {
        self.parser.parse(command)
    }

    /// Parses `command` and replays it through the relay. Never fails.
    pub fn run_command(&self, command: &str) -> ResultDescriptor {
        let request = self.parse(command);
        RequestRelay::from_config(self.transport.as_ref(), &self.cfg).execute(&request)
    }
}
