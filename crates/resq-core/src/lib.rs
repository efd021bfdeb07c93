pub mod config;
pub mod logging;

pub mod batch;
pub mod client;
pub mod rate_limit;
pub mod retry;
pub mod transport;

pub use batch::{run_batch, BatchItemError, BatchResult, BatchScheduler};
pub use client::{RequestClient, RequestSpec};
pub use config::ClientConfig;
pub use rate_limit::RateLimiter;
pub use retry::{ClassifiedError, ErrorKind, RetryExecutor, RetryPolicy};
pub use transport::{CurlTransport, Method, Request, Response, Transport};
