//! Retry and backoff.
//!
//! Error classification (client fault, transient, timeout) and exponential
//! backoff decisions shared by the request client and any caller that wraps
//! its own async operations.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status};
pub use error::{ClassifiedError, ErrorKind};
pub use policy::{RetryDecision, RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
pub use run::{run_with_retry, RetryExecutor};
