//! Wire shapes of the relay endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::RelayError;
use crate::command::RequestDescriptor;

/// What the relay is asked to perform.
///
/// Header names are sent lower-cased, so `Accept` and `accept` collapse
/// into one entry (the later value wins). A missing body is sent as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayRequest {
    pub body: String,
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
}

impl TryFrom<&RequestDescriptor> for RelayRequest {
    type Error = RelayError;

    /// Rejects a body on `GET`/`HEAD`, which no fetch-style client will send.
    fn try_from(d: &RequestDescriptor) -> Result<Self, RelayError> {
        let bodiless = ["GET", "HEAD"]
            .iter()
            .any(|m| d.method.eq_ignore_ascii_case(m));
        if bodiless && d.body.is_some() {
            return Err(RelayError::BodyNotAllowed {
                method: d.method.clone(),
            });
        }
        Ok(Self {
            body: d.body.clone().unwrap_or_default(),
            url: d.url.clone(),
            method: d.method.clone(),
            headers: d.header_map(),
        })
    }
}

/// The relay's answer on a 2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: Option<bool>,
    pub server_response: ServerResponse,
    #[serde(default)]
    pub request_info: Option<Value>,
}

/// The outbound call's response as observed by the relay.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerResponse {
    #[serde(default)]
    pub status_code: Option<u32>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, Value>>,
    /// `None` when the field is absent; `Some(Null)` for an explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub body: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}
