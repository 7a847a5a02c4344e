//! [`Transport`] backed by the curl crate (libcurl easy handles).

use std::str;
use std::time::Duration;

use ::curl::easy::{Easy, Form, List};

use super::parse::parse_head;
use super::{HttpResponse, MultipartForm, PartValue, Transport, TransportError};
use crate::config::ApxConfig;

/// Blocking libcurl transport. One fresh easy handle per request; call from
/// `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(120),
        }
    }
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &ApxConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }

    fn handle(&self, url: &str) -> Result<Easy, TransportError> {
        let mut easy = Easy::new();
        easy.url(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        Ok(easy)
    }

    fn perform(&self, easy: &mut Easy) -> Result<HttpResponse, TransportError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        let head = parse_head(&header_lines);
        Ok(HttpResponse {
            status,
            reason: head.reason,
            headers: head.headers,
            body,
        })
    }
}

impl Transport for CurlTransport {
    fn post_form(&self, url: &str, form: &MultipartForm) -> Result<HttpResponse, TransportError> {
        let mut easy = self.handle(url)?;

        let mut curl_form = Form::new();
        for part in form.parts() {
            match &part.value {
                PartValue::Text(text) => {
                    curl_form.part(&part.name).contents(text.as_bytes()).add()?;
                }
                PartValue::File { filename, data } => {
                    curl_form
                        .part(&part.name)
                        .buffer(filename, data.clone())
                        .content_type("application/octet-stream")
                        .add()?;
                }
            }
        }
        easy.httppost(curl_form)?;

        // Skip the `Expect: 100-continue` round trip on large chunk bodies.
        let mut list = List::new();
        list.append("Expect:")?;
        easy.http_headers(list)?;

        self.perform(&mut easy)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, TransportError> {
        let payload = serde_json::to_vec(body).map_err(|source| TransportError::Decode {
            what: "request body",
            source,
        })?;

        let mut easy = self.handle(url)?;
        easy.post(true)?;
        easy.post_fields_copy(&payload)?;

        let mut list = List::new();
        list.append("Content-Type: application/json")?;
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        self.perform(&mut easy)
    }

    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut easy = self.handle(url)?;
        easy.get(true)?;
        self.perform(&mut easy)
    }
}
