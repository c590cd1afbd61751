//! Retry policy for archive requests.
//!
//! The archive is rate-sensitive, so the only failure retried is a refused
//! connection, a bounded number of times with a fixed delay. Everything else
//! surfaces immediately.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_io_error};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
