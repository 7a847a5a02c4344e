//! Command text from an argument, a file or stdin.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::PathBuf;

pub fn read_command_text(command: Option<String>, file: Option<PathBuf>) -> Result<String> {
    let text = match (command, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("read command file: {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read command from stdin")?;
            buf
        }
    };
    if text.trim().is_empty() {
        anyhow::bail!("no command given");
    }
    Ok(text)
}
