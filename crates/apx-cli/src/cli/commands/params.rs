//! `apx params <url>`

use apx_core::url_params::{extract_params, UrlParams};

pub(super) fn print_params(params: &UrlParams) {
    let width = params.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in params {
        println!("  {:<width$}  {}", key, value, width = width);
    }
}

pub fn run_params(url: &str) {
    let params = extract_params(url);
    if params.is_empty() {
        println!("No query parameters.");
        return;
    }
    print_params(&params);
}
