pub mod config;
pub mod logging;

pub mod command;
pub mod control;
pub mod explorer;
pub mod extract;
pub mod har;
pub mod relay;
pub mod retry;
pub mod transport;
pub mod upload;
pub mod url_params;
pub mod validation;
