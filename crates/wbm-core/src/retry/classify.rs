//! Classify transport errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::ErrorKind;

/// Classify a curl error for retry decisions. `CURLE_COULDNT_CONNECT` is
/// what a refused connection surfaces as.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_couldnt_connect() {
        return ErrorKind::ConnectionRefused;
    }
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a socket error for retry decisions.
pub fn classify_io_error(e: &std::io::Error) -> ErrorKind {
    match e.kind() {
        std::io::ErrorKind::ConnectionRefused => ErrorKind::ConnectionRefused,
        std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::BrokenPipe => ErrorKind::Connection,
        _ => ErrorKind::Other,
    }
}

/// Classify a fetch error into an ErrorKind.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Io(ie) => classify_io_error(ie),
    }
}
