//! Replays a parsed request through the backend's relay endpoint.
//!
//! The relay performs the outbound HTTP call on the client's behalf and wraps
//! the observed response in an envelope. [`RequestRelay::execute`] never
//! fails: every problem ends up in [`ResultDescriptor::error`].

mod envelope;
mod result;

pub use envelope::{RelayRequest, RelayResponse, ServerResponse};
pub use result::{render_body, ResultDescriptor};

use thiserror::Error;

use crate::command::RequestDescriptor;
use crate::config::ApxConfig;
use crate::transport::{Transport, TransportError};

/// Why a relay attempt produced no server response. Only ever surfaces as
/// [`ResultDescriptor::error`].
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Request with {method} method cannot have body.")]
    BodyNotAllowed { method: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

const FALLBACK_ERROR: &str = "Failed to execute command";

pub struct RequestRelay<'a> {
    transport: &'a dyn Transport,
    relay_url: String,
}

impl<'a> RequestRelay<'a> {
    pub fn new(transport: &'a dyn Transport, relay_url: impl Into<String>) -> Self {
        Self {
            transport,
            relay_url: relay_url.into(),
        }
    }

    pub fn from_config(transport: &'a dyn Transport, cfg: &ApxConfig) -> Self {
        Self::new(transport, cfg.endpoint_url(&cfg.endpoints().relay))
    }

    /// Sends `request` through the relay and describes what came back.
    pub fn execute(&self, request: &RequestDescriptor) -> ResultDescriptor {
        match self.try_execute(request) {
            Ok(result) => result,
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("relay of {} {} failed: {}", request.method, request.url, message);
                let message = if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                };
                ResultDescriptor::failed(Some(500), message)
            }
        }
    }

    fn try_execute(&self, request: &RequestDescriptor) -> Result<ResultDescriptor, RelayError> {
        let envelope = serde_json::to_value(RelayRequest::try_from(request)?)
            .map_err(|source| TransportError::Decode {
                what: "relay request",
                source,
            })?;
        tracing::debug!("relaying {} {}", request.method, request.url);

        let response = self.transport.post_json(&self.relay_url, &envelope)?;
        if !response.is_success() {
            let text = response.status_text();
            tracing::warn!("relay answered {}: {}", response.status, text);
            return Ok(ResultDescriptor::failed(None, text));
        }

        let relayed: RelayResponse = response.json("relay response")?;
        let server = relayed.server_response;
        let result = ResultDescriptor {
            status: server.status_code,
            body: server.body.as_ref().map(render_body),
            headers: result::render_headers(server.headers),
            error: None,
        };
        tracing::info!(
            "relayed {} {} -> {}",
            request.method,
            request.url,
            result.status.map_or_else(|| "no status".to_string(), |s| s.to_string())
        );
        Ok(result)
    }
}
