//! Minimal HTTP/1.1 stand-in for the APX backend used by integration tests.
//!
//! Implements the four endpoints the core talks to: multipart chunk transfer,
//! JSON finalize (reassembles chunks by index), extraction (GET with query)
//! and the relay (echoes the relayed request back as the server response).

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// Answer this chunk index with `500 Internal Server Error`.
    pub fail_chunk: Option<usize>,
    /// Answer this chunk index with `200` and `success: false`.
    pub reject_chunk: Option<usize>,
    /// Refuse every relay call with this status line (e.g. `502 Bad Gateway`).
    pub relay_status: Option<&'static str>,
}

#[derive(Debug, Default)]
struct Upload {
    filename: String,
    total_chunks: usize,
    chunks: BTreeMap<usize, Vec<u8>>,
}

#[derive(Debug, Default)]
struct State {
    uploads: HashMap<String, Upload>,
    assembled: HashMap<String, Vec<u8>>,
    log: Vec<String>,
}

/// Handle to a running fake backend.
#[derive(Clone)]
pub struct Backend {
    pub url: String,
    state: Arc<Mutex<State>>,
}

impl Backend {
    /// Bytes reassembled by finalize for `file_id`.
    pub fn assembled(&self, file_id: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().assembled.get(file_id).cloned()
    }

    /// `"<METHOD> <path>"` per request, in arrival order.
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }
}

pub fn start() -> Backend {
    start_with_options(BackendOptions::default())
}

/// Starts the server on an ephemeral port. Runs until the process exits.
pub fn start_with_options(opts: BackendOptions) -> Backend {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let url = format!("http://127.0.0.1:{}", port);
    let state = Arc::new(Mutex::new(State::default()));
    let backend = Backend {
        url: url.clone(),
        state: Arc::clone(&state),
    };
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            let opts = opts.clone();
            let url = url.clone();
            thread::spawn(move || handle(stream, &state, &opts, &url));
        }
    });
    backend
}

struct Request {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 8192];
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut tmp).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
    };

    let head = std::str::from_utf8(&buf[..head_end]).ok()?.to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut tmp).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&tmp[..n]);
    }
    Some(Request {
        method,
        target,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn respond(stream: &mut TcpStream, status: &str, body: &Value) {
    let payload = body.to_string();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
}

fn handle(mut stream: TcpStream, state: &Mutex<State>, opts: &BackendOptions, base_url: &str) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    state
        .lock()
        .unwrap()
        .log
        .push(format!("{} {}", req.method, req.path()));

    let (status, body) = match (req.method.as_str(), req.path()) {
        ("POST", "/api/upload-chunked") => upload_chunk(&req, state, opts),
        ("POST", "/api/finalize-upload") => finalize(&req, state),
        ("GET", "/api/extract-api/") => extract(&req, state, base_url),
        ("POST", "/proxy") => match opts.relay_status {
            Some(status) => (status, json!({ "detail": "relay refused" })),
            None => relay(&req),
        },
        _ => ("404 Not Found", json!({ "detail": "Not Found" })),
    };
    respond(&mut stream, status, &body);
}

/// Fields of a multipart body: name → (filename, bytes).
fn multipart_fields(req: &Request) -> HashMap<String, (Option<String>, Vec<u8>)> {
    let mut fields = HashMap::new();
    let Some(boundary) = req
        .header("content-type")
        .and_then(|ct| ct.split("boundary=").nth(1))
        .map(|b| format!("--{}", b.trim_matches('"')))
    else {
        return fields;
    };
    let mut rest = req.body.as_slice();
    while let Some(start) = find(rest, boundary.as_bytes()) {
        rest = &rest[start + boundary.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        let Some(head_end) = find(rest, b"\r\n\r\n") else {
            break;
        };
        let head = String::from_utf8_lossy(&rest[..head_end]).into_owned();
        let data_start = head_end + 4;
        let Some(next) = find(&rest[data_start..], boundary.as_bytes()) else {
            break;
        };
        // Part data is followed by CRLF before the next boundary.
        let data = rest[data_start..data_start + next.saturating_sub(2)].to_vec();
        let name = disposition_param(&head, "name");
        let filename = disposition_param(&head, "filename");
        if let Some(name) = name {
            fields.insert(name, (filename, data));
        }
        rest = &rest[data_start + next..];
    }
    fields
}

fn disposition_param(head: &str, param: &str) -> Option<String> {
    let needle = format!(" {}=\"", param);
    let start = head.find(&needle)? + needle.len();
    let end = head[start..].find('"')? + start;
    Some(head[start..end].to_string())
}

fn text_field(fields: &HashMap<String, (Option<String>, Vec<u8>)>, name: &str) -> Option<String> {
    fields
        .get(name)
        .map(|(_, v)| String::from_utf8_lossy(v).into_owned())
}

fn upload_chunk(req: &Request, state: &Mutex<State>, opts: &BackendOptions) -> (&'static str, Value) {
    let fields = multipart_fields(req);
    let index: Option<usize> = text_field(&fields, "index").and_then(|v| v.parse().ok());
    let total: Option<usize> = text_field(&fields, "totalChunks").and_then(|v| v.parse().ok());
    let file_id = text_field(&fields, "fileId");
    let filename = text_field(&fields, "filename");
    let chunk = fields.get("chunk").map(|(_, v)| v.clone());
    let (Some(index), Some(total), Some(file_id), Some(filename), Some(chunk)) =
        (index, total, file_id, filename, chunk)
    else {
        return ("422 Unprocessable Entity", json!({ "detail": "missing form field" }));
    };

    if opts.fail_chunk == Some(index) {
        return ("500 Internal Server Error", json!({ "detail": "disk error" }));
    }
    if opts.reject_chunk == Some(index) {
        return ("200 OK", json!({ "success": false, "error": "chunk rejected" }));
    }

    let mut st = state.lock().unwrap();
    let upload = st.uploads.entry(file_id).or_default();
    upload.filename = filename;
    upload.total_chunks = total;
    upload.chunks.insert(index, chunk);
    ("200 OK", json!({ "success": true, "chunkIndex": index }))
}

fn finalize(req: &Request, state: &Mutex<State>) -> (&'static str, Value) {
    let Ok(body) = serde_json::from_slice::<Value>(&req.body) else {
        return ("422 Unprocessable Entity", json!({ "detail": "invalid JSON" }));
    };
    let file_id = body["fileId"].as_str().unwrap_or_default().to_string();
    let filename = body["filename"].as_str().unwrap_or_default().to_string();

    let mut st = state.lock().unwrap();
    let Some(upload) = st.uploads.get(&file_id) else {
        return ("404 Not Found", json!({ "detail": "Upload not found" }));
    };
    if upload.chunks.len() != upload.total_chunks {
        let detail = format!(
            "Upload incomplete. Received {} of {} chunks",
            upload.chunks.len(),
            upload.total_chunks
        );
        return ("400 Bad Request", json!({ "detail": detail }));
    }
    let data: Vec<u8> = upload.chunks.values().flatten().copied().collect();
    let chunks = upload.total_chunks;
    let size = data.len();
    st.assembled.insert(file_id.clone(), data);
    (
        "200 OK",
        json!({
            "fileId": file_id,
            "filename": filename,
            "size": size,
            "chunks": chunks,
            "status": "complete"
        }),
    )
}

fn extract(req: &Request, state: &Mutex<State>, base_url: &str) -> (&'static str, Value) {
    let full = format!("{}{}", base_url, req.target);
    let Ok(url) = url::Url::parse(&full) else {
        return ("400 Bad Request", json!({ "detail": "bad request" }));
    };
    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
    let file_id = query.get("fileId").cloned().unwrap_or_default();
    if !state.lock().unwrap().assembled.contains_key(&file_id) {
        return ("404 Not Found", json!({ "detail": "File not found" }));
    }
    let description = query.get("description").cloned().unwrap_or_default();
    let model = query.get("selectedModel").cloned().unwrap_or_default();
    let target = format!("https://api.example.com/search?q={}&model={}", "items", model);
    let command = format!(
        "curl -X POST '{}' \\\n  -H 'Content-Type: application/json' \\\n  -H 'X-Description: {}' \\\n  -d '{{\"limit\":10}}'",
        target, description
    );
    (
        "200 OK",
        json!({
            "curlCommand": command,
            "requestDetails": {
                "method": "POST",
                "url": target,
                "contentType": "application/json",
                "responseStatus": 200,
                "responseSize": 128
            },
            "fileId": file_id
        }),
    )
}

fn relay(req: &Request) -> (&'static str, Value) {
    let Ok(envelope) = serde_json::from_slice::<Value>(&req.body) else {
        return ("422 Unprocessable Entity", json!({ "detail": "invalid JSON" }));
    };
    (
        "200 OK",
        json!({
            "success": true,
            "server_response": {
                "status_code": 200,
                "headers": { "content-type": "application/json", "x-relayed": "1" },
                "body": {
                    "echo": {
                        "method": envelope["method"],
                        "url": envelope["url"],
                        "headers": envelope["headers"],
                        "body": envelope["body"]
                    }
                }
            },
            "request_info": {
                "method": envelope["method"],
                "url": envelope["url"]
            }
        }),
    )
}
