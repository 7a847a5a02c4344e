//! `apx extract --file-id <id> --description <text>` – extraction only.

use anyhow::{Context, Result};
use apx_core::config::ApxConfig;
use apx_core::extract::ExtractionClient;
use apx_core::transport::CurlTransport;
use apx_core::validation::ValidationError;

pub async fn run_extract(
    cfg: &ApxConfig,
    file_id: &str,
    description: &str,
    model: Option<&str>,
) -> Result<()> {
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription.into());
    }
    let result = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        let file_id = file_id.to_string();
        let description = description.to_string();
        let model = model.unwrap_or(&cfg.default_model).to_string();
        move || {
            let transport = CurlTransport::from_config(&cfg);
            ExtractionClient::from_config(&transport, &cfg)
                .request_derived_command(&file_id, &description, &model)
        }
    })
    .await
    .context("extract task join")?
    .context("failed to extract request")?;

    println!("{}", result.curl_command);
    Ok(())
}
