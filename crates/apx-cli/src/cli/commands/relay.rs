//! `apx run [command]` – parse and replay through the relay.

use anyhow::{Context, Result};
use apx_core::config::ApxConfig;
use apx_core::explorer::Explorer;
use apx_core::relay::ResultDescriptor;
use apx_core::transport::CurlTransport;
use std::path::PathBuf;
use std::sync::Arc;

use super::input::read_command_text;

fn print_result(result: &ResultDescriptor) {
    if let Some(status) = result.status {
        println!("Status: {}", status);
    }
    if !result.headers.is_empty() {
        println!("Headers:");
        for (name, value) in &result.headers {
            println!("  {}: {}", name, value);
        }
    }
    if let Some(body) = &result.body {
        println!();
        println!("{}", body);
    }
}

pub async fn run_relay(cfg: &ApxConfig, command: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let text = read_command_text(command, file)?;
    let explorer = Explorer::new(cfg.clone(), Arc::new(CurlTransport::from_config(cfg)));
    let result = tokio::task::spawn_blocking(move || explorer.run_command(&text))
        .await
        .context("relay task join")?;

    print_result(&result);
    if let Some(err) = &result.error {
        anyhow::bail!("{}", err);
    }
    Ok(())
}
