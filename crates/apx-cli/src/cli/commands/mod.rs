//! CLI command handlers, one per file.

mod completions;
mod extract;
mod input;
mod interrupt;
mod params;
mod parse;
mod relay;
mod upload;

pub use completions::run_completions;
pub use extract::run_extract;
pub use params::run_params;
pub use parse::run_parse;
pub use relay::run_relay;
pub use upload::{run_upload, UploadArgs};
