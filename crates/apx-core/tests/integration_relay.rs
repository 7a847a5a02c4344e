//! Integration test: command parsing and relay replay against a local fake
//! backend, including the full upload → extract → run flow.

mod common;

use std::sync::Arc;

use apx_core::command::parse_command;
use apx_core::config::ApxConfig;
use apx_core::explorer::Explorer;
use apx_core::relay::RequestRelay;
use apx_core::transport::CurlTransport;
use apx_core::upload::UploadFile;
use common::backend_server::{self, BackendOptions};

fn config_for(url: &str) -> ApxConfig {
    ApxConfig {
        backend_url: url.to_string(),
        chunk_size: 256,
        connect_timeout_secs: 5,
        request_timeout_secs: 20,
        ..ApxConfig::default()
    }
}

#[test]
fn relay_echo_is_pretty_printed() {
    let backend = backend_server::start();
    let cfg = config_for(&backend.url);
    let transport = CurlTransport::from_config(&cfg);
    let request = parse_command(
        "curl -X PUT 'https://api.example.com/items/1' -H 'Accept: application/json' -H 'Accept: text/plain' -d 'name=x'",
    );

    let result = RequestRelay::from_config(&transport, &cfg).execute(&request);

    assert_eq!(result.error, None);
    assert_eq!(result.status, Some(200));
    assert_eq!(result.headers.get("x-relayed").map(String::as_str), Some("1"));
    let body = result.body.expect("body");
    assert!(body.starts_with("{\n  \"echo\": {\n"));
    let echoed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(echoed["echo"]["method"], "PUT");
    assert_eq!(echoed["echo"]["body"], "name=x");
    assert_eq!(echoed["echo"]["headers"]["accept"], "text/plain");
}

#[test]
fn get_with_data_never_reaches_the_relay() {
    let backend = backend_server::start();
    let cfg = config_for(&backend.url);
    let transport = CurlTransport::from_config(&cfg);

    let result = RequestRelay::from_config(&transport, &cfg)
        .execute(&parse_command("curl 'https://api.example.com/search' -d 'q=1'"));
    assert_eq!(result.status, Some(500));
    assert_eq!(
        result.error.as_deref(),
        Some("Request with GET method cannot have body.")
    );
    assert!(backend.log().is_empty());
}

#[test]
fn relay_refusal_reports_status_text() {
    let backend = backend_server::start_with_options(BackendOptions {
        relay_status: Some("502 Bad Gateway"),
        ..BackendOptions::default()
    });
    let cfg = config_for(&backend.url);
    let transport = CurlTransport::from_config(&cfg);

    let result = RequestRelay::from_config(&transport, &cfg).execute(&parse_command("curl https://a.test"));
    assert_eq!(result.error.as_deref(), Some("Bad Gateway"));
    assert_eq!(result.status, None);
    assert_eq!(result.body, None);
}

#[test]
fn relay_unreachable_is_caught() {
    let cfg = config_for("http://127.0.0.1:1");
    let transport = CurlTransport::from_config(&cfg);
    let result = RequestRelay::from_config(&transport, &cfg).execute(&parse_command("curl https://a.test"));
    assert_eq!(result.status, Some(500));
    assert!(result.error.is_some());
}

#[test]
fn extracted_command_runs_through_relay() {
    let backend = backend_server::start();
    let cfg = config_for(&backend.url);
    let explorer = Explorer::new(cfg.clone(), Arc::new(CurlTransport::from_config(&cfg)));

    let file = UploadFile::from_bytes("capture.har", vec![b' '; 1000]);
    let extracted = explorer.upload_and_extract(&file, "search", None).unwrap();

    let parsed = explorer.parse(&extracted.curl_command);
    assert_eq!(parsed.method, "POST");
    assert_eq!(parsed.params().get("model"), Some("o3-mini-2025-01-31"));
    assert_eq!(parsed.headers[1], ("X-Description".to_string(), "search".to_string()));

    let result = explorer.run_command(&extracted.curl_command);
    assert_eq!(result.status, Some(200));
    let echoed: serde_json::Value = serde_json::from_str(result.body.as_deref().unwrap()).unwrap();
    assert_eq!(echoed["echo"]["body"], "{\"limit\":10}");
    assert_eq!(echoed["echo"]["url"], "https://api.example.com/search?q=items&model=o3-mini-2025-01-31");
}
