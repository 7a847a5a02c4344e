//! CLI for the APX request explorer.

mod commands;

use anyhow::Result;
use apx_core::config::{self, ApxConfig};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{
    run_completions, run_extract, run_params, run_parse, run_relay, run_upload, UploadArgs,
};

/// Top-level CLI for the APX request explorer.
#[derive(Debug, Parser)]
#[command(name = "apx")]
#[command(about = "APX: find an API call in a HAR capture and replay it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload a HAR capture in chunks and extract the described request as a curl command.
    Upload {
        /// Path to the .har file.
        path: PathBuf,
        /// What the request you are looking for does (e.g. "the login call").
        #[arg(long, short)]
        description: String,
        /// Model used by the extraction backend (defaults to the configured model).
        #[arg(long, short)]
        model: Option<String>,
        /// Chunk size in bytes (defaults to the configured size, 750 KiB).
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<usize>,
        /// Chunks in flight at once (1 = strictly sequential).
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
    },

    /// Extract a request from an already uploaded file.
    Extract {
        /// File id returned by the finalize step.
        #[arg(long)]
        file_id: String,
        #[arg(long, short)]
        description: String,
        #[arg(long, short)]
        model: Option<String>,
    },

    /// Parse a curl command and replay it through the backend relay.
    Run {
        /// Command text; read from --file or stdin when omitted.
        command: Option<String>,
        /// Read the command text from a file.
        #[arg(long, short, conflicts_with = "command")]
        file: Option<PathBuf>,
    },

    /// Show how a curl command is understood, without sending anything.
    Parse {
        command: Option<String>,
        #[arg(long, short, conflicts_with = "command")]
        file: Option<PathBuf>,
    },

    /// List the query parameters of a URL.
    Params {
        url: String,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load_config() -> Result<ApxConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Upload {
                path,
                description,
                model,
                chunk_size,
                concurrency,
            } => {
                let cfg = load_config()?;
                let args = UploadArgs {
                    path,
                    description,
                    model,
                    chunk_size,
                    concurrency,
                };
                run_upload(&cfg, args).await?;
            }
            CliCommand::Extract {
                file_id,
                description,
                model,
            } => {
                let cfg = load_config()?;
                run_extract(&cfg, &file_id, &description, model.as_deref()).await?;
            }
            CliCommand::Run { command, file } => {
                let cfg = load_config()?;
                run_relay(&cfg, command, file).await?;
            }
            CliCommand::Parse { command, file } => run_parse(command, file)?,
            CliCommand::Params { url } => run_params(&url),
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
