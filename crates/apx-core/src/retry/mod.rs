//! Optional resending of failed chunk transfers.
//!
//! Error classification (timeouts, throttling, connection failures) and
//! exponential backoff decisions live here so the uploader only asks
//! "should this chunk be sent again, and when".

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
