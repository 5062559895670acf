//! Retrying review submitter.
//!
//! Large review bodies occasionally make the destination host stall under
//! load. Timed-out attempts are retried with a progressively higher timeout
//! so slow-but-alive responses get a chance to complete, while the attempt
//! cap and the "no retry on any received status" rule prevent runaway
//! retries against a host that is responding, and duplicate submissions
//! against one that already accepted the record.

use std::time::{Duration, Instant};

use super::error::SubmitError;
use super::payload::ReviewPayload;
use super::transport::ReviewTransport;

/// Per-attempt timeout escalation step.
const TIMEOUT_STEP: Duration = Duration::from_secs(30);

/// Upper bound on the inter-attempt backoff sleep.
const MAX_BACKOFF_SECS: u64 = 15;

/// Retry parameters for review submission.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    pub max_attempts: u32,
    pub initial_timeout: Duration,
    pub max_timeout: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_timeout: Duration::from_secs(45),
            max_timeout: Duration::from_secs(120),
        }
    }
}

/// Classification of a received HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 200 or 201: the destination accepted the review.
    Accepted { status: u16 },
    /// 409: the destination already has this review. Benign.
    Duplicate,
    /// Any other status. Not retried; the host answered and said no.
    Rejected { status: u16 },
}

/// Post one mapped review, retrying timed-out attempts with escalating
/// timeouts.
///
/// The payload is encoded exactly once; an encoding failure is fatal for the
/// record. Any received HTTP status ends the loop immediately, even 5xx.
/// Transport failures are retried only while attempts remain and the failure
/// is timeout-classified, with the timeout raised by 30s (capped) and a
/// short backoff sleep between attempts.
pub async fn post_review_with_retry(
    transport: &dyn ReviewTransport,
    url: &str,
    payload: &ReviewPayload,
    token: &str,
    config: &SubmitConfig,
) -> Result<SubmissionOutcome, SubmitError> {
    let encoded = serde_json::to_string(payload)?;
    let payload_bytes = encoded.len();

    let max_attempts = config.max_attempts.max(1);
    let mut timeout = config.initial_timeout.max(Duration::from_secs(1));
    let max_timeout = config.max_timeout.max(timeout);

    let mut attempt = 1u32;
    loop {
        tracing::info!(
            attempt,
            max_attempts,
            timeout_secs = timeout.as_secs(),
            payload_bytes,
            "Posting review"
        );
        let started = Instant::now();

        match transport.post_json(url, &encoded, token, timeout).await {
            Ok(response) => {
                tracing::debug!(
                    attempt,
                    status = response.status,
                    elapsed_secs = started.elapsed().as_secs_f64(),
                    response_bytes = response.body.len(),
                    "Review POST completed"
                );
                return Ok(classify_status(response.status));
            }
            Err(failure) => {
                tracing::warn!(
                    attempt,
                    elapsed_secs = started.elapsed().as_secs_f64(),
                    timed_out = failure.timed_out,
                    "Review POST failed: {}",
                    failure
                );

                if attempt >= max_attempts || !failure.timed_out {
                    return Err(SubmitError::Transport {
                        message: failure.message,
                        timed_out: failure.timed_out,
                        attempts: attempt,
                    });
                }

                timeout = (timeout + TIMEOUT_STEP).min(max_timeout);
                let backoff =
                    Duration::from_secs((5 * u64::from(attempt)).min(MAX_BACKOFF_SECS));
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}

fn classify_status(status: u16) -> SubmissionOutcome {
    match status {
        200 | 201 => SubmissionOutcome::Accepted { status },
        409 => SubmissionOutcome::Duplicate,
        other => SubmissionOutcome::Rejected { status: other },
    }
}
