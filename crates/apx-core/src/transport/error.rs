//! Transport error type.

use thiserror::Error;

/// Failure of a single network exchange with the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// libcurl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Building a multipart body failed.
    #[error("multipart form: {0}")]
    Form(#[from] curl::FormError),
    /// The server answered with a non-2xx status.
    #[error("{}", http_message(*status, reason, detail.as_deref()))]
    Http {
        status: u32,
        reason: String,
        detail: Option<String>,
    },
    /// A 2xx body did not have the expected JSON shape.
    #[error("decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

fn http_message(status: u32, reason: &str, detail: Option<&str>) -> String {
    let mut msg = format!("HTTP {status}");
    if !reason.is_empty() {
        msg.push(' ');
        msg.push_str(reason);
    }
    if let Some(d) = detail {
        msg.push_str(": ");
        msg.push_str(d);
    }
    msg
}

impl TransportError {
    /// HTTP status if this error came from a completed exchange.
    pub fn status(&self) -> Option<u32> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
