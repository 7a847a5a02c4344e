use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Outcome of one relay attempt, ready for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultDescriptor {
    /// Status of the outbound call; absent when the relay itself refused.
    pub status: Option<u32>,
    pub body: Option<String>,
    pub headers: BTreeMap<String, String>,
    /// Set only when the relay call failed.
    pub error: Option<String>,
}

impl ResultDescriptor {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn failed(status: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Objects and arrays are pretty-printed with two-space indentation, strings
/// pass through, other scalars become their JSON text.
pub fn render_body(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
        }
        other => other.to_string(),
    }
}

/// Header values that are not strings keep their JSON text.
pub(crate) fn render_headers(headers: Option<BTreeMap<String, Value>>) -> BTreeMap<String, String> {
    headers
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect()
}
