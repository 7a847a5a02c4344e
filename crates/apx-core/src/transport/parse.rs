//! Parse collected HTTP response header lines into status, reason and headers.

/// Status line and header block of the final response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub reason: String,
    pub headers: Vec<(String, String)>,
}

/// Parse header lines as delivered by libcurl's header callback.
///
/// libcurl reports every response it sees (redirects, `100 Continue`), so a
/// new status line starts a fresh header block; only the last one is kept.
pub(crate) fn parse_head(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead {
                reason: reason_phrase(line),
                headers: Vec::new(),
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            head.headers.push((name.to_string(), value.trim().to_string()));
        }
    }

    head
}

/// `HTTP/1.1 404 Not Found` -> `Not Found`; `HTTP/2 200` -> ``.
fn reason_phrase(status_line: &str) -> String {
    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next();
    let _code = parts.next();
    parts.next().unwrap_or("").trim().to_string()
}
