use thiserror::Error;

/// Failures while exchanging credentials for a JWT bearer token.
///
/// Any of these abort the submission phase: no reviews are posted without a
/// token. The fetch results are still reported to the caller.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON from token endpoint: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token missing from auth response")]
    MissingToken,
}

/// Failures while posting one review.
///
/// `Encode` is fatal for the record with no retry. `Transport` is returned
/// once the retry budget is spent or the failure is not timeout-classified;
/// a received HTTP status is never an error here (it becomes a
/// `SubmissionOutcome`).
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to encode review payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("review POST failed after {attempts} attempt(s): {message}")]
    Transport {
        message: String,
        timed_out: bool,
        attempts: u32,
    },
}
