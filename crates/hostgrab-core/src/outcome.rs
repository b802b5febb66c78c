//! Result of one fetch attempt and the per-batch tally.

use crate::error::FetchError;

/// Outcome of fetching one URL. Exactly one is produced per submitted URL.
#[derive(Debug)]
pub enum FetchOutcome {
    /// A response was fully received. Any HTTP status counts, including 4xx/5xx.
    Success {
        /// The URL exactly as submitted.
        url: String,
        /// Hostname of the URL; names the output file.
        host: String,
        /// HTTP status of the final response (informational).
        status: u32,
        body: Vec<u8>,
    },
    /// The fetch did not produce a response.
    Failure { url: String, error: FetchError },
}

impl FetchOutcome {
    /// The URL this outcome belongs to, as submitted.
    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Success { url, .. } | FetchOutcome::Failure { url, .. } => url,
        }
    }

    /// Body length in bytes for a success, `None` for a failure.
    pub fn size(&self) -> Option<usize> {
        match self {
            FetchOutcome::Success { body, .. } => Some(body.len()),
            FetchOutcome::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// Counts gathered by one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// URLs submitted (blank lines included).
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successes whose body landed on disk.
    pub written: usize,
    /// Successes whose output file could not be written.
    pub write_errors: usize,
}
