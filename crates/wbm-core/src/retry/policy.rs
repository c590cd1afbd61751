use std::time::Duration;

/// High-level classification of a request failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server refused the TCP connection (archive shedding load).
    ConnectionRefused,
    /// Operation timed out (connect/read).
    Timeout,
    /// Other network-level failure (DNS, reset, ...).
    Connection,
    /// Anything else.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded retry with a fixed delay, for refused connections only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Fixed pause before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match kind {
            ErrorKind::ConnectionRefused => RetryDecision::RetryAfter(self.delay),
            ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Other => RetryDecision::NoRetry,
        }
    }
}
