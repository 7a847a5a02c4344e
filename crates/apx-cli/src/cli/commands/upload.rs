//! `apx upload <path> --description <text>` – chunked upload, then extraction.

use super::interrupt::{watch_interrupts, FORCED_EXIT_CODE};
use anyhow::{Context, Result};
use apx_core::config::ApxConfig;
use apx_core::control::AbortToken;
use apx_core::explorer::Explorer;
use apx_core::har;
use apx_core::transport::CurlTransport;
use apx_core::upload::{UploadFile, UploadOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct UploadArgs {
    pub path: PathBuf,
    pub description: String,
    pub model: Option<String>,
    pub chunk_size: Option<usize>,
    pub concurrency: Option<usize>,
}

pub async fn run_upload(cfg: &ApxConfig, args: UploadArgs) -> Result<()> {
    let summary = har::preflight(&args.path, &args.description)?;
    println!(
        "{}: {} entries across {} host(s)",
        summary.file_name,
        summary.entry_count,
        summary.hosts.len()
    );

    let file = UploadFile::from_path(&args.path)
        .with_context(|| format!("open {}", args.path.display()))?;

    let mut options = UploadOptions::from_config(cfg);
    if let Some(size) = args.chunk_size {
        options.chunk_size = size;
    }
    if let Some(n) = args.concurrency {
        options.concurrency = n.max(1);
    }

    let abort = AbortToken::new();
    tokio::spawn({
        let abort = abort.clone();
        async move {
            if watch_interrupts(abort, tokio::signal::ctrl_c).await {
                std::process::exit(FORCED_EXIT_CODE);
            }
        }
    });

    let explorer = Explorer::new(cfg.clone(), Arc::new(CurlTransport::from_config(cfg)))
        .with_upload_options(options)
        .with_abort(abort)
        .on_progress(|p| {
            eprint!(
                "\rUploading: {}% ({}/{} chunks)",
                p.percent(),
                p.acknowledged,
                p.total_chunks
            );
            let _ = std::io::stderr().flush();
        });

    let result = tokio::task::spawn_blocking(move || {
        explorer.upload_and_extract(&file, &args.description, args.model.as_deref())
    })
    .await
    .context("upload task join")?;
    eprintln!();
    let result = result?;

    println!("File id: {}", result.file_id);
    if let Some(details) = &result.request_details {
        if let (Some(method), Some(url)) = (&details.method, &details.url) {
            println!("Matched: {} {}", method, url);
        }
        if let Some(status) = details.response_status {
            println!("Captured response status: {}", status);
        }
    }
    println!();
    println!("{}", result.curl_command);
    Ok(())
}
