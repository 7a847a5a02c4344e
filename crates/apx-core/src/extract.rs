//! Asks the backend to derive a replayable command from an uploaded capture.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::config::ApxConfig;
use crate::transport::{HttpResponse, Transport, TransportError};

/// Summary of the request the backend picked out of the capture.
///
/// Values are copied from the HAR file unchecked, so any field of the wrong
/// shape (negative sizes, string statuses) decodes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub response_status: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub response_size: Option<u64>,
}

/// Any JSON value; `None` unless it fits `T`.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(d)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// The derived command text (`curl ...`).
    pub curl_command: String,
    /// Identifier of the uploaded file; filled from the request when the
    /// backend leaves it out.
    #[serde(default)]
    pub file_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub request_details: Option<RequestDetails>,
}

pub struct ExtractionClient<'a> {
    transport: &'a dyn Transport,
    extract_url: String,
}

impl<'a> ExtractionClient<'a> {
    pub fn new(transport: &'a dyn Transport, extract_url: impl Into<String>) -> Self {
        Self {
            transport,
            extract_url: extract_url.into(),
        }
    }

    pub fn from_config(transport: &'a dyn Transport, cfg: &ApxConfig) -> Self {
        Self::new(transport, cfg.endpoint_url(&cfg.endpoints().extract))
    }

    /// Full request URL with `fileId`, `description` and `selectedModel`
    /// query-encoded.
    pub fn request_url(&self, file_id: &str, description: &str, model: &str) -> Result<String, TransportError> {
        Url::parse_with_params(
            &self.extract_url,
            &[
                ("fileId", file_id),
                ("description", description),
                ("selectedModel", model),
            ],
        )
        .map(String::from)
        .map_err(|e| TransportError::InvalidUrl {
            url: self.extract_url.clone(),
            reason: e.to_string(),
        })
    }

    /// One GET, no retries. A non-2xx status surfaces as [`TransportError::Http`].
    pub fn request_derived_command(
        &self,
        file_id: &str,
        description: &str,
        model: &str,
    ) -> Result<ExtractionResult, TransportError> {
        let url = self.request_url(file_id, description, model)?;
        tracing::debug!("requesting extraction for {} with model {}", file_id, model);

        let mut result: ExtractionResult = self
            .transport
            .get(&url)
            .and_then(HttpResponse::error_for_status)?
            .json("extraction response")?;
        if result.file_id.is_empty() {
            result.file_id = file_id.to_string();
        }

        tracing::info!(
            "extracted {} request from {}",
            result
                .request_details
                .as_ref()
                .and_then(|d| d.method.as_deref())
                .unwrap_or("a"),
            result.file_id
        );
        Ok(result)
    }
}
