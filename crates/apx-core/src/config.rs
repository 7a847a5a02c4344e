use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Environment variable that overrides `backend_url`.
pub const BACKEND_URL_ENV: &str = "APX_BACKEND_URL";

/// Default chunk size for uploads: 750 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 750 * 1024;

/// Model selector used when none is given.
pub const DEFAULT_MODEL: &str = "o3-mini-2025-01-31";

/// Model selectors the backend is known to accept.
pub const KNOWN_MODELS: &[&str] = &["o3-mini-2025-01-31", "gpt-4o-2024-08-06"];

/// Per-chunk retry parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per chunk (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Backend endpoint paths, joined onto `backend_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub upload_chunk: String,
    pub finalize_upload: String,
    pub extract: String,
    pub relay: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            upload_chunk: "/api/upload-chunked".to_string(),
            finalize_upload: "/api/finalize-upload".to_string(),
            extract: "/api/extract-api/".to_string(),
            relay: "/proxy".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/apx/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApxConfig {
    /// Base URL of the backend serving upload, extraction and relay endpoints.
    pub backend_url: String,
    /// Upload chunk size in bytes.
    pub chunk_size: usize,
    /// Chunks in flight at once. 1 keeps the strict sequential protocol.
    pub upload_concurrency: usize,
    /// Model selector sent to the extraction endpoint.
    pub default_model: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Optional per-chunk retry policy; if missing, chunks are not retried.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional endpoint path overrides.
    #[serde(default)]
    pub endpoints: Option<Endpoints>,
}

impl Default for ApxConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            upload_concurrency: 1,
            default_model: DEFAULT_MODEL.to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 120,
            retry: None,
            endpoints: None,
        }
    }
}

impl ApxConfig {
    pub fn endpoints(&self) -> Endpoints {
        self.endpoints.clone().unwrap_or_default()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// Joins an endpoint path onto the backend base URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.backend_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Applies `APX_BACKEND_URL` if set and non-empty.
    pub fn apply_env(&mut self) {
        self.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
    }

    fn apply_backend_override(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            tracing::debug!("backend url overridden by {}: {}", BACKEND_URL_ENV, url);
            self.backend_url = url;
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("apx")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// Environment overrides are applied on top.
pub fn load_or_init() -> Result<ApxConfig> {
    let path = config_path()?;
    let mut cfg = if !path.exists() {
        let default_cfg = ApxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    } else {
        let data = fs::read_to_string(&path)?;
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?
    };
    cfg.apply_env();
    Ok(cfg)
}
