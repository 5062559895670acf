//! Transport seam for review submission.
//!
//! The submitter only needs "POST this JSON with this token and timeout, tell
//! me the status or why nothing came back", so that's the whole trait. The
//! blanket `reqwest::Client` impl is the production path; tests script the
//! trait directly.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, EXPECT};

/// A response with a received HTTP status. Any status here ends the retry
/// loop; classification happens in the submitter.
#[derive(Debug, Clone)]
pub struct PostedResponse {
    pub status: u16,
    pub body: String,
}

/// A transport-level failure: no HTTP status was received at all.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
    /// Whether the failure was classified as a read/connect timeout.
    pub timed_out: bool,
}

#[async_trait::async_trait]
pub trait ReviewTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<PostedResponse, TransportFailure>;
}

#[async_trait::async_trait]
impl ReviewTransport for reqwest::Client {
    async fn post_json(
        &self,
        url: &str,
        body: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<PostedResponse, TransportFailure> {
        let result = self
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            // An empty Expect header defeats HTTP 100-continue stalls that
            // the destination host exhibits on large bodies.
            .header(EXPECT, "")
            .timeout(timeout)
            .body(body.to_owned())
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // The body is only used for logging; a failed read after the
                // status arrived must not turn into a retryable error.
                let body = response.text().await.unwrap_or_default();
                Ok(PostedResponse { status, body })
            }
            Err(e) => Err(TransportFailure {
                timed_out: is_timeout(&e),
                message: e.to_string(),
            }),
        }
    }
}

/// Timeout classification: the reqwest timeout flag, or an error chain whose
/// text mentions a timed-out operation.
fn is_timeout(err: &reqwest::Error) -> bool {
    use std::error::Error as _;

    if err.is_timeout() {
        return true;
    }
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.to_string().to_ascii_lowercase().contains("timed out") {
            return true;
        }
        source = e.source();
    }
    false
}
