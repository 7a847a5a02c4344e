use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::url_params::{extract_params, UrlParams};

/// Structured form of a request recovered from command text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub method: String,
    /// May be empty when nothing in the text looked like a URL.
    pub url: String,
    /// In textual order; case preserved, duplicates kept.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestDescriptor {
    /// Headers as a lower-cased name → value object; a later duplicate
    /// overwrites an earlier one regardless of case. This is the shape the
    /// relay expects.
    pub fn header_map(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect()
    }

    /// Query parameters of [`url`](Self::url); empty when it is not absolute.
    pub fn params(&self) -> UrlParams {
        extract_params(&self.url)
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        for (name, value) in &self.headers {
            write!(f, "\n{name}: {value}")?;
        }
        if let Some(body) = &self.body {
            write!(f, "\n\n{body}")?;
        }
        Ok(())
    }
}
