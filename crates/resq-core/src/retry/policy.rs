use std::time::Duration;

use super::error::ErrorKind;

/// Default attempt budget (first attempt included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default base delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Decision returned by the retry policy for one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then try again.
    RetryAfter(Duration),
    /// Attempt budget consumed; fail with an exhausted error wrapping the cause.
    Exhausted,
    /// Not retryable; surface the error as-is.
    Propagate,
}

/// Exponential backoff policy: `base_delay * 2^(attempt-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Always >= 1.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Optional upper bound on any single backoff delay.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: None,
        }
    }

    /// Single attempt; the first failure of any kind is terminal.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Backoff before retrying after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        let raw = self.base_delay.saturating_mul(1u32 << shift);
        match self.max_delay {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }

    /// Decide what to do after attempt `attempt` (1-based) failed with `kind`.
    ///
    /// The attempt budget is checked first, so with `max_attempts = 1` every
    /// failure is reported as exhausted.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::Exhausted;
        }
        if kind.is_retryable() {
            RetryDecision::RetryAfter(self.backoff(attempt))
        } else {
            RetryDecision::Propagate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_fault_propagates() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::ClientFault), RetryDecision::Propagate);
    }

    #[test]
    fn backoff_doubles_from_base() {
        let p = RetryPolicy::new(10, Duration::from_millis(100));
        assert_eq!(p.backoff(1), Duration::from_millis(100));
        assert_eq!(p.backoff(2), Duration::from_millis(200));
        assert_eq!(p.backoff(3), Duration::from_millis(400));
        assert_eq!(p.backoff(4), Duration::from_millis(800));
    }

    #[test]
    fn backoff_is_capped_when_configured() {
        let p = RetryPolicy::new(20, Duration::from_millis(250))
            .with_max_delay(Duration::from_secs(2));
        assert_eq!(p.backoff(3), Duration::from_secs(1));
        assert_eq!(p.backoff(10), Duration::from_secs(2));
        // Huge attempt counts saturate instead of overflowing.
        let uncapped = RetryPolicy::new(u32::MAX, Duration::from_secs(1));
        assert!(uncapped.backoff(u32::MAX) >= Duration::from_secs(1));
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy::new(3, Duration::from_millis(10));
        assert_eq!(
            p.decide(1, ErrorKind::Timeout),
            RetryDecision::RetryAfter(Duration::from_millis(10))
        );
        assert_eq!(
            p.decide(2, ErrorKind::Transient),
            RetryDecision::RetryAfter(Duration::from_millis(20))
        );
        assert_eq!(p.decide(3, ErrorKind::Transient), RetryDecision::Exhausted);
    }

    #[test]
    fn single_attempt_is_terminal_for_any_kind() {
        let p = RetryPolicy::no_retry();
        assert_eq!(p.decide(1, ErrorKind::Transient), RetryDecision::Exhausted);
        assert_eq!(p.decide(1, ErrorKind::ClientFault), RetryDecision::Exhausted);
    }

    #[test]
    fn zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::from_millis(1)).max_attempts, 1);
    }
}
