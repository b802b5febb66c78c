//! Multi event loop: perform, collect finished transfers, refill, wait.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::FetchError;
use crate::outcome::FetchOutcome;

use super::request::{add_transfer, TransferHandle};
use super::{failure, FetchOptions, Target};

/// Upper bound on one `wait` so newly freed slots are refilled promptly.
const WAIT_SLICE: Duration = Duration::from_millis(100);

struct Active {
    handle: TransferHandle,
    target: Target,
}

/// Drive every pending target to completion, pushing one outcome per target.
///
/// Returns only when nothing is active or pending. A multi-level failure
/// resolves everything still unresolved as a `Driver` failure.
pub(super) fn run_multi(
    multi: &curl::multi::Multi,
    mut pending: VecDeque<Target>,
    options: &FetchOptions,
    outcomes: &mut Vec<FetchOutcome>,
) {
    if pending.is_empty() {
        return;
    }
    let max_active = options.max_concurrent.unwrap_or(pending.len()).max(1);
    let mut active: Vec<Active> = Vec::with_capacity(max_active.min(pending.len()));
    refill(multi, options, max_active, &mut active, &mut pending, outcomes);

    while !active.is_empty() {
        let running = match multi.perform() {
            Ok(n) => n,
            Err(e) => {
                abandon(multi, active, pending, &format!("curl multi perform: {}", e), outcomes);
                return;
            }
        };

        let mut finished: Vec<(usize, Result<(), curl::Error>)> = Vec::new();
        multi.messages(|msg| {
            for (i, item) in active.iter().enumerate() {
                if let Some(res) = msg.result_for2(&item.handle) {
                    finished.push((i, res));
                    break;
                }
            }
        });
        // Highest index first so `remove` keeps the remaining indices valid.
        finished.sort_by(|a, b| b.0.cmp(&a.0));
        for (i, res) in finished {
            let item = active.remove(i);
            outcomes.push(finish(multi, item, res, options));
        }

        refill(multi, options, max_active, &mut active, &mut pending, outcomes);

        if running > 0 {
            if let Err(e) = multi.wait(&mut [], WAIT_SLICE) {
                abandon(multi, active, pending, &format!("curl multi wait: {}", e), outcomes);
                return;
            }
        }
    }
}

/// Add pending targets until `max_active` transfers are in flight.
fn refill(
    multi: &curl::multi::Multi,
    options: &FetchOptions,
    max_active: usize,
    active: &mut Vec<Active>,
    pending: &mut VecDeque<Target>,
    outcomes: &mut Vec<FetchOutcome>,
) {
    while active.len() < max_active {
        let Some(target) = pending.pop_front() else {
            break;
        };
        match add_transfer(multi, &target, options) {
            Ok(handle) => active.push(Active { handle, target }),
            Err(e) => outcomes.push(failure(&target.url, e)),
        }
    }
}

/// Detach a finished transfer and turn it into an outcome.
fn finish(
    multi: &curl::multi::Multi,
    item: Active,
    res: Result<(), curl::Error>,
    options: &FetchOptions,
) -> FetchOutcome {
    let Active { handle, target } = item;
    let mut easy = match multi.remove2(handle) {
        Ok(easy) => easy,
        Err(e) => {
            return failure(
                &target.url,
                FetchError::Driver(format!("curl multi remove: {}", e)),
            )
        }
    };
    if let Err(e) = res {
        return failure(&target.url, FetchError::from_transfer(e, options.timeout));
    }
    let status = easy.response_code().unwrap_or(0);
    let body = std::mem::take(&mut easy.get_mut().body);
    tracing::debug!(url = %target.url, status, "transfer complete");
    FetchOutcome::Success {
        url: target.url,
        host: target.host,
        status,
        body,
    }
}

/// Resolve everything still in flight or queued as a driver failure.
fn abandon(
    multi: &curl::multi::Multi,
    active: Vec<Active>,
    pending: VecDeque<Target>,
    reason: &str,
    outcomes: &mut Vec<FetchOutcome>,
) {
    for item in active {
        let _ = multi.remove2(item.handle);
        outcomes.push(failure(&item.target.url, FetchError::Driver(reason.to_string())));
    }
    for target in pending {
        outcomes.push(failure(&target.url, FetchError::Driver(reason.to_string())));
    }
}
