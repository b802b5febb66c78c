//! Batch orchestration: fan out every URL over one shared client, wait for
//! all of them, then persist successes one by one.

use anyhow::Result;
use std::path::Path;

use crate::fetcher::{FetchClient, FetchOptions};
use crate::outcome::{BatchSummary, FetchOutcome};
use crate::storage;

/// Fetch all `urls` and write each successful body to `output_dir/<host>`.
///
/// The output directory is created first (fatal if that fails). The client is
/// dropped, closing its connections, before any file is written. A failed
/// file write is logged and counted; the remaining successes are still written.
pub fn run_batch<S: AsRef<str>>(
    urls: &[S],
    options: FetchOptions,
    output_dir: &Path,
) -> Result<BatchSummary> {
    storage::prepare_output_dir(output_dir)?;

    let outcomes = {
        let client = FetchClient::new(options);
        client.fetch_all(urls)
    };

    Ok(persist_outcomes(outcomes, output_dir))
}

/// Sequential post-processing of a resolved batch.
pub fn persist_outcomes(outcomes: Vec<FetchOutcome>, output_dir: &Path) -> BatchSummary {
    let mut summary = BatchSummary {
        submitted: outcomes.len(),
        ..BatchSummary::default()
    };
    for outcome in outcomes {
        match outcome {
            FetchOutcome::Success {
                url,
                host,
                status,
                body,
            } => {
                summary.succeeded += 1;
                tracing::info!("{}: size={}", url, body.len());
                if status >= 400 {
                    tracing::debug!(%url, status, "HTTP error status, body kept");
                }
                match storage::write_body(output_dir, &host, &body) {
                    Ok(path) => {
                        summary.written += 1;
                        tracing::debug!("{}: wrote {}", url, path.display());
                    }
                    Err(e) => {
                        summary.write_errors += 1;
                        tracing::error!(
                            "{}: failed to write {}: {:#}",
                            url,
                            storage::output_path(output_dir, &host).display(),
                            e
                        );
                    }
                }
            }
            // Already logged by the fetcher.
            FetchOutcome::Failure { .. } => summary.failed += 1,
        }
    }
    tracing::debug!(?summary, "batch finished");
    summary
}
