//! `apx parse [command]` – show the parsed request and its query parameters.

use anyhow::Result;
use apx_core::command::parse_command;
use std::path::PathBuf;

use super::input::read_command_text;
use super::params::print_params;

pub fn run_parse(command: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let text = read_command_text(command, file)?;
    let request = parse_command(&text);

    println!("{}", request);
    let params = request.params();
    if !params.is_empty() {
        println!();
        println!("Query parameters:");
        print_params(&params);
    }
    Ok(())
}
