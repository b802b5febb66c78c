//! Per-fetch error type and its classification.
//!
//! Every failure a single fetch can hit ends up here and is carried as data in
//! a `FetchOutcome::Failure`; nothing in this module is ever propagated out of
//! the fetcher.

use std::time::Duration;

/// Error produced by one fetch attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The input string is not a parseable absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Parsed, but not something we can GET.
    #[error("unsupported URL scheme `{0}`")]
    UnsupportedScheme(String),

    /// The transfer did not finish within the per-request bound.
    #[error("timed out after {}s", .after.as_secs_f64())]
    Timeout {
        after: Duration,
        #[source]
        source: curl::Error,
    },

    /// libcurl reported a transfer failure (DNS, connect, TLS, reset, ...).
    #[error("{0}")]
    Transfer(#[source] curl::Error),

    /// Configuring the easy handle failed before the request was sent.
    #[error("request setup: {0}")]
    Setup(#[source] curl::Error),

    /// The multi handle driving the batch failed; the transfer never resolved.
    #[error("transfer driver: {0}")]
    Driver(String),
}

/// Coarse classification of a `FetchError`, used for tests and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// URL could not be parsed or uses a scheme we do not fetch.
    InvalidUrl,
    /// Operation timed out (connect or body).
    Timeout,
    /// Network-level failure (DNS, refused, reset, TLS).
    Connection,
    /// Anything else.
    Other,
}

impl FetchError {
    /// Map a finished transfer's curl error, turning libcurl timeouts into `Timeout`.
    pub fn from_transfer(e: curl::Error, timeout: Duration) -> Self {
        if e.is_operation_timedout() {
            FetchError::Timeout {
                after: timeout,
                source: e,
            }
        } else {
            FetchError::Transfer(e)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidUrl(_) | FetchError::UnsupportedScheme(_) => ErrorKind::InvalidUrl,
            FetchError::Timeout { .. } => ErrorKind::Timeout,
            FetchError::Transfer(e) => classify_curl_error(e),
            FetchError::Setup(_) | FetchError::Driver(_) => ErrorKind::Other,
        }
    }
}

/// Classify a curl error reported at the end of a transfer.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}
