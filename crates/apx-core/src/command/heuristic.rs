//! Pattern-based reading of curl command text.
//!
//! No shell tokenization happens here: each field is located by its own
//! regular expression, so the result is predictable for the commands the
//! extraction backend emits (one flag per line, `\` continuations) and merely
//! degraded for anything else.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CommandParser, RequestDescriptor};

static METHOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-X\s+([A-Z]+)").unwrap());

/// First quoted literal anywhere, else the trailing bare token.
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"|'([^']+)'|([^\s]+)$"#).unwrap());

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"-H\s+["']([^:]+):\s*([^"']+)["']"#).unwrap());

static BODY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"-d\s+'([^']+)'|-d\s+"([^"]+)"|-d\s+([^\s]+)"#).unwrap());

/// Default [`CommandParser`] for curl-style command text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlHeuristicParser;

impl CommandParser for CurlHeuristicParser {
    fn parse(&self, command: &str) -> RequestDescriptor {
        RequestDescriptor {
            method: parse_method(command),
            url: parse_url(command),
            headers: parse_headers(command),
            body: parse_body(command),
        }
    }
}

fn parse_method(text: &str) -> String {
    METHOD_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or_else(|| "GET".to_string(), |m| m.as_str().to_string())
}

fn parse_url(text: &str) -> String {
    URL_RE
        .find(text)
        .map(|m| m.as_str().replace(['"', '\''], ""))
        .unwrap_or_default()
}

fn parse_headers(text: &str) -> Vec<(String, String)> {
    HEADER_RE
        .captures_iter(text)
        .map(|c| (c[1].trim().to_string(), c[2].trim().to_string()))
        .collect()
}

fn parse_body(text: &str) -> Option<String> {
    let caps = BODY_RE.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> RequestDescriptor {
        CurlHeuristicParser.parse(text)
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn full_post_command() {
        let d = parse(
            r#"curl -X POST "https://api.example.com/v1/items" -H "Content-Type: application/json" -H "Authorization: Bearer abc" -d '{"a":1}'"#,
        );
        assert_eq!(d.method, "POST");
        assert_eq!(d.url, "https://api.example.com/v1/items");
        assert_eq!(
            d.headers,
            vec![
                pair("Content-Type", "application/json"),
                pair("Authorization", "Bearer abc"),
            ]
        );
        assert_eq!(d.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn method_defaults_to_get() {
        let d = parse("curl 'https://example.com/search?q=rust'");
        assert_eq!(d.method, "GET");
        assert_eq!(d.url, "https://example.com/search?q=rust");
        assert!(d.headers.is_empty());
        assert_eq!(d.body, None);
    }

    #[test]
    fn lowercase_method_is_ignored() {
        assert_eq!(parse("curl -X post https://example.com").method, "GET");
    }

    #[test]
    fn bare_trailing_url() {
        let d = parse("curl -X DELETE https://example.com/items/7");
        assert_eq!(d.method, "DELETE");
        assert_eq!(d.url, "https://example.com/items/7");
    }

    #[test]
    fn first_quoted_literal_is_the_url() {
        // A quoted header before the URL wins; the heuristic is positional.
        let d = parse(r#"curl -H "Accept: */*" "https://example.com""#);
        assert_eq!(d.url, "Accept: */*");
        assert_eq!(d.headers, vec![pair("Accept", "*/*")]);
    }

    #[test]
    fn line_continuations_from_backend() {
        let text = "curl -X PUT 'https://api.example.com/v2/users/42' \\\n  -H 'Content-Type: application/json' \\\n  -H 'X-Trace:  abc ' \\\n  -d '{\"name\":\"x\"}'";
        let d = parse(text);
        assert_eq!(d.method, "PUT");
        assert_eq!(d.url, "https://api.example.com/v2/users/42");
        assert_eq!(
            d.headers,
            vec![pair("Content-Type", "application/json"), pair("X-Trace", "abc")]
        );
        assert_eq!(d.body.as_deref(), Some("{\"name\":\"x\"}"));
    }

    #[test]
    fn pseudo_headers_are_omitted() {
        let d = parse(
            "curl 'https://example.com/' -H ':authority: example.com' -H 'accept: text/html'",
        );
        assert_eq!(d.headers, vec![pair("accept", "text/html")]);
    }

    #[test]
    fn duplicate_headers_kept_in_order() {
        let d = parse("curl 'https://x.test' -H 'Cookie: a=1' -H 'Cookie: b=2'");
        assert_eq!(d.headers, vec![pair("Cookie", "a=1"), pair("Cookie", "b=2")]);
    }

    #[test]
    fn body_quote_styles() {
        assert_eq!(parse(r#"curl -d "x=1&y=2" https://a.test"#).body.as_deref(), Some("x=1&y=2"));
        assert_eq!(parse("curl -d raw=1 https://a.test").body.as_deref(), Some("raw=1"));
        assert_eq!(parse("curl -d 'one' -d 'two' https://a.test").body.as_deref(), Some("one"));
    }

    #[test]
    fn long_data_flag_is_not_a_body() {
        assert_eq!(parse("curl --data-raw 'x' https://a.test").body, None);
    }

    #[test]
    fn garbage_degrades_to_defaults() {
        let d = parse("");
        assert_eq!(d, RequestDescriptor::default());

        let d = parse("not a command at all");
        assert_eq!(d.method, "GET");
        assert_eq!(d.url, "all");
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = r#"curl -X PATCH "https://a.test/x?y=1" -H "A: 1" -d '{}'"#;
        assert_eq!(parse(text), parse(text));
        assert_eq!(parse_command_via_trait(text), parse(text));
    }

    fn parse_command_via_trait(text: &str) -> RequestDescriptor {
        let parser: &dyn CommandParser = &CurlHeuristicParser;
        parser.parse(text)
    }
}
