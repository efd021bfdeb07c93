//! Retry loop: run an async operation until success or the policy says stop.

use std::future::Future;

use super::error::ClassifiedError;
use super::policy::{RetryDecision, RetryPolicy};

/// Wraps single operations with classification-aware exponential backoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `op` until it succeeds, hits a non-retryable error, or the attempt
    /// budget runs out. `op` is called once per attempt to build a fresh future.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T, ClassifiedError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClassifiedError>>,
    {
        run_with_retry(&self.policy, op).await
    }
}

/// Free-function form of [`RetryExecutor::run`].
///
/// Backoff is only slept between attempts, never after the last one.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ClassifiedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClassifiedError>>,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => match policy.decide(attempt, e.kind()) {
                RetryDecision::Propagate => {
                    tracing::debug!(attempt, kind = %e.kind(), error = %e, "not retrying");
                    return Err(e);
                }
                RetryDecision::Exhausted => {
                    tracing::warn!(attempts = attempt, error = %e, "retry budget exhausted");
                    return Err(ClassifiedError::exhausted(attempt, e));
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        kind = %e.kind(),
                        error = %e,
                        "attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            },
        }
    }
}
