//! Transport error type for retry classification.

use std::fmt;

/// Error returned by a single request attempt, kept concrete so the retry
/// policy can classify it before it is converted to `anyhow`.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (connect, timeout, resolve, ...).
    Curl(curl::Error),
    /// Socket-level failure outside curl.
    Io(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Io(e) => write!(f, "io: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Io(e) => Some(e),
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}
