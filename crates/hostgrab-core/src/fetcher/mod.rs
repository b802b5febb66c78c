//! Concurrent HTTP GET over one shared libcurl multi handle.
//!
//! A `FetchClient` owns a single `curl::multi::Multi`. Every URL in a batch
//! becomes one Easy2 transfer on that handle, so connections are pooled and
//! reused for the whole batch, and the transfers progress together on one
//! thread (perform / wait / messages). Each transfer carries its own timeout;
//! libcurl aborts only that transfer when it expires. Dropping the client
//! closes every pooled connection.

mod handler;
mod request;
mod run;

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::FetchError;
use crate::outcome::FetchOutcome;
use crate::storage::host_file_name;

/// Per-request bound applied when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Knobs applied to every transfer of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Hard bound on one transfer, connection setup included.
    pub timeout: Duration,
    /// Separate bound on connection setup (None = libcurl default, capped by `timeout`).
    pub connect_timeout: Option<Duration>,
    pub follow_redirects: bool,
    /// Only used when `follow_redirects` is set.
    pub max_redirections: u32,
    /// Max transfers in flight at once (None = all URLs at once).
    pub max_concurrent: Option<usize>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            follow_redirects: false,
            max_redirections: 10,
            max_concurrent: None,
        }
    }
}

/// Shared HTTP client for one batch.
pub struct FetchClient {
    multi: curl::multi::Multi,
    options: FetchOptions,
}

impl FetchClient {
    pub fn new(options: FetchOptions) -> Self {
        Self {
            multi: curl::multi::Multi::new(),
            options,
        }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// GET one URL. Never fails: errors come back as `FetchOutcome::Failure`.
    pub fn fetch(&self, url: &str) -> FetchOutcome {
        let mut outcomes = self.fetch_all(std::slice::from_ref(&url));
        match outcomes.pop() {
            Some(outcome) => outcome,
            None => failure(url, FetchError::Driver("no outcome produced".into())),
        }
    }

    /// GET every URL concurrently and wait for all of them.
    ///
    /// Returns exactly one outcome per input URL, in completion order (not
    /// input order). Unparseable URLs fail immediately without touching the
    /// network; one failing or slow transfer never holds back the others.
    pub fn fetch_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());
        let mut pending = VecDeque::with_capacity(urls.len());
        for raw in urls {
            let raw = raw.as_ref();
            match Target::parse(raw) {
                Ok(target) => pending.push_back(target),
                Err(e) => outcomes.push(failure(raw, e)),
            }
        }
        run::run_multi(&self.multi, pending, &self.options, &mut outcomes);
        debug_assert_eq!(outcomes.len(), urls.len());
        outcomes
    }
}

/// A validated URL ready to be put on the wire.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    /// As submitted; reported back in the outcome.
    pub url: String,
    pub host: String,
    pub wire: url::Url,
}

impl Target {
    pub(crate) fn parse(raw: &str) -> Result<Self, FetchError> {
        let wire = url::Url::parse(raw)?;
        match wire.scheme() {
            "http" | "https" => {}
            other => return Err(FetchError::UnsupportedScheme(other.to_string())),
        }
        let host = host_file_name(&wire).ok_or(FetchError::InvalidUrl(url::ParseError::EmptyHost))?;
        Ok(Self {
            url: raw.to_string(),
            host,
            wire,
        })
    }
}

/// Build a failure outcome and emit its single error log line.
pub(crate) fn failure(url: &str, error: FetchError) -> FetchOutcome {
    tracing::error!("{}: {}", url, error);
    FetchOutcome::Failure {
        url: url.to_string(),
        error,
    }
}
