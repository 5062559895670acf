use thiserror::Error;

/// Failures while fetching reviews from the source API.
///
/// All of these are fatal: the import aborts before any submission begins.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("reviews API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reviews API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON from reviews API: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reviews API error: {0}")]
    Api(String),

    #[error("no valid reviews in API response ({0})")]
    UnexpectedShape(String),
}
