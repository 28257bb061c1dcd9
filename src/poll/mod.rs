//! Bounded status-polling primitive shared by every submit-then-poll
//! workflow (enrichment results, data-curation status, discovery answers).
//!
//! The loop never sleeps before the first attempt, warns once attempts pass
//! half of the budget, treats a job-id mismatch as a recoverable anomaly,
//! and on exhaustion returns the last observed result unchanged — the caller
//! distinguishes "not yet terminal" from a genuine service error by
//! inspecting the body shape.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::http::CallResult;

pub const PULL_RESULTS_MAX_TRIES_DEFAULT: u32 = 10;

pub const PULL_RESULTS_SLEEP_INTERVAL_DEFAULT: Duration = Duration::from_millis(3000);

/// Attempt budget for one poll loop. The effective wall-clock budget is
/// `max_attempts × sleep_interval`.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub sleep_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: PULL_RESULTS_MAX_TRIES_DEFAULT,
            sleep_interval: PULL_RESULTS_SLEEP_INTERVAL_DEFAULT,
        }
    }
}

/// Verdict on one status response, supplied per call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollCheck {
    /// The job finished (successfully or not); stop polling.
    Terminal,
    /// Keep polling.
    Pending,
    /// The status payload referenced a different job than the one
    /// submitted. Recoverable: the next poll may return the correct job.
    JobIdMismatch { expected: String, received: String },
}

/// Runs `fetch` until `check` reports a terminal state or the attempt
/// budget is exhausted. `fetch` errors (configuration, authentication)
/// propagate immediately; everything else is data in the returned
/// [`CallResult`].
pub async fn poll_until_terminal<F, Fut, C>(
    settings: &PollSettings,
    cancel: &CancellationToken,
    label: &str,
    mut fetch: F,
    check: C,
) -> Result<CallResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<CallResult>>,
    C: Fn(&CallResult) -> PollCheck,
{
    let mut last = CallResult::precondition_failure(format!("No {label} poll attempt was made"));
    let mut attempt: u32 = 0;

    while attempt < settings.max_attempts {
        attempt += 1;

        // No sleep before the first attempt.
        if attempt > 1 && !sleep_unless_cancelled(settings.sleep_interval, cancel).await {
            info!("Polling {label} cancelled at call #{attempt}");
            return Ok(last);
        }

        if attempt > settings.max_attempts / 2 {
            warn!(
                "Pulling {label} results is taking time. This is the call #{attempt} (max calls: {})",
                settings.max_attempts
            );
        }

        let result = fetch().await?;
        match check(&result) {
            PollCheck::Terminal => return Ok(result),
            PollCheck::Pending => {
                debug!(
                    status = result.status_code(),
                    "Pulling {label}, call #{attempt}: not terminal yet"
                );
                last = result;
            }
            PollCheck::JobIdMismatch { expected, received } => {
                let message = format!(
                    "Received a result for a different jobId. Expected: {expected}, received: {received}"
                );
                warn!("{message}");
                last = CallResult::job_id_mismatch(message);
            }
        }
    }

    Ok(last)
}

/// Returns false when the token was cancelled before the interval elapsed.
async fn sleep_unless_cancelled(interval: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = sleep(interval) => true,
    }
}
