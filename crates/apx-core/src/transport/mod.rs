//! HTTP transport seam.
//!
//! The core only speaks three wire shapes to the backend: a multipart form
//! POST (chunk transfer), a JSON POST (finalize and relay) and a plain GET
//! (extraction). [`Transport`] abstracts them so the upload and relay logic
//! can run against libcurl in production and an in-memory fake in tests.

mod error;
mod libcurl;
mod parse;

#[cfg(test)]
pub(crate) mod fake;

pub use libcurl::CurlTransport;
pub use error::TransportError;

use serde::de::DeserializeOwned;

/// A single response as seen by the core: status line, headers and raw body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    /// Reason phrase from the status line (may be empty, e.g. HTTP/2).
    pub reason: String,
    /// Header lines in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: String::new(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status text in the `fetch` sense: the reason phrase, or `HTTP <code>`
    /// when the server sent none.
    pub fn status_text(&self) -> String {
        let reason = self.reason.trim();
        if reason.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            reason.to_string()
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decodes the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self, what: &'static str) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|source| TransportError::Decode { what, source })
    }

    /// Turns a non-2xx response into [`TransportError::Http`], keeping the
    /// backend's `detail` message when it sent one.
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            return Ok(self);
        }
        let detail = serde_json::from_slice::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|v| match v.get("detail") {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(other) if !other.is_null() => Some(other.to_string()),
                _ => None,
            });
        Err(TransportError::Http {
            status: self.status,
            reason: self.reason.trim().to_string(),
            detail,
        })
    }
}

/// Value carried by one multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File { filename: String, data: Vec<u8> },
}

/// One named multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

/// Ordered multipart form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: &str, filename: &str, data: Vec<u8>) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: PartValue::File {
                filename: filename.to_string(),
                data,
            },
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find(|p| p.name == name).and_then(|p| match &p.value {
            PartValue::Text(s) => Some(s.as_str()),
            PartValue::File { .. } => None,
        })
    }

    pub fn get_file(&self, name: &str) -> Option<(&str, &[u8])> {
        self.parts.iter().find(|p| p.name == name).and_then(|p| match &p.value {
            PartValue::File { filename, data } => Some((filename.as_str(), data.as_slice())),
            PartValue::Text(_) => None,
        })
    }
}

/// Blocking HTTP operations used by the core.
///
/// Implementations return `Ok` for any completed exchange, whatever the
/// status; callers decide what a non-2xx status means.
pub trait Transport: Send + Sync {
    fn post_form(&self, url: &str, form: &MultipartForm) -> Result<HttpResponse, TransportError>;

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, TransportError>;

    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}
