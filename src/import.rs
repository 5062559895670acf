//! Import orchestration.
//!
//! One run: fetch a page of reviews, build the display table, authenticate
//! once, then map and submit each record in order. Fetch failures abort the
//! run; an authentication failure ends the submission phase but the fetch
//! results are still reported; record-level failures never abort anything
//! and are captured in the per-record outcome list.

use crate::source::{FetchError, ReviewSource, SourceReview};
use crate::text;
use crate::wprentals::auth::TokenProvider;
use crate::wprentals::payload::map_review;
use crate::wprentals::submit::{post_review_with_retry, SubmissionOutcome, SubmitConfig};
use crate::wprentals::transport::ReviewTransport;
use crate::wprentals::{review_url, DestConfig};

/// Word budget for the table excerpt column.
const EXCERPT_WORDS: usize = 20;

/// One display row per fetched review. Presentation only; never blocks the
/// submission path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub date: String,
    pub score: String,
    pub reviewer: String,
    pub excerpt: String,
    pub language: String,
}

/// What happened to one record during the submission phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// No usable text in any source field; never sent.
    SkippedEmpty,
    /// Destination accepted the review (200/201).
    Accepted { status: u16 },
    /// Destination already has this review (409).
    Duplicate,
    /// Destination answered with any other status.
    Rejected { status: u16 },
    /// No HTTP status received, or the payload could not be encoded.
    Failed { message: String },
}

/// Result of one import run.
///
/// `fetched` counts records received from the source; the outcome list
/// carries the per-record submission results so callers can compute the
/// succeeded count instead of conflating it with the fetched count.
#[derive(Debug)]
pub struct ImportReport {
    pub rows: Vec<ReviewRow>,
    pub fetched: usize,
    pub outcomes: Vec<RecordOutcome>,
    /// Set when authentication failed and the submission phase was skipped.
    pub auth_error: Option<String>,
}

impl ImportReport {
    pub fn submitted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Accepted { .. }))
            .count()
    }

    pub fn duplicates(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Duplicate))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Rejected { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Failed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::SkippedEmpty))
            .count()
    }
}

/// Run one import pass.
///
/// Only fetch-phase failures surface as errors; everything after the fetch
/// is reported through the returned `ImportReport`.
pub async fn run_import(
    source: &dyn ReviewSource,
    tokens: &dyn TokenProvider,
    transport: &dyn ReviewTransport,
    dest: &DestConfig,
    submit: &SubmitConfig,
) -> Result<ImportReport, FetchError> {
    let reviews = source.fetch().await?;
    let fetched = reviews.len();
    let rows: Vec<ReviewRow> = reviews.iter().map(table_row).collect();
    tracing::info!(fetched, "Fetched reviews from source API");

    let token = match tokens.fetch_token().await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Destination authentication failed, skipping submission: {}", e);
            return Ok(ImportReport {
                rows,
                fetched,
                outcomes: Vec::new(),
                auth_error: Some(e.to_string()),
            });
        }
    };

    let url = review_url(&dest.base_url);
    let mut outcomes = Vec::with_capacity(fetched);

    for (index, review) in reviews.iter().enumerate() {
        let payload = map_review(review, dest);

        if payload.content.is_empty() {
            tracing::debug!(index, "Skipping review with no usable text");
            outcomes.push(RecordOutcome::SkippedEmpty);
            continue;
        }

        let outcome = match post_review_with_retry(transport, &url, &payload, &token, submit).await
        {
            Ok(SubmissionOutcome::Accepted { status }) => {
                tracing::info!(index, status, "Review imported");
                RecordOutcome::Accepted { status }
            }
            Ok(SubmissionOutcome::Duplicate) => {
                tracing::info!(index, "Review already exists at destination (409)");
                RecordOutcome::Duplicate
            }
            Ok(SubmissionOutcome::Rejected { status }) => {
                tracing::error!(index, status, "Review rejected by destination");
                RecordOutcome::Rejected { status }
            }
            Err(e) => {
                tracing::error!(index, "Review submission failed: {}", e);
                RecordOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
    }

    let report = ImportReport {
        rows,
        fetched,
        outcomes,
        auth_error: None,
    };
    tracing::info!(
        fetched = report.fetched,
        submitted = report.submitted(),
        duplicates = report.duplicates(),
        rejected = report.rejected(),
        failed = report.failed(),
        skipped = report.skipped(),
        "Finished importing reviews"
    );
    Ok(report)
}

fn table_row(review: &SourceReview) -> ReviewRow {
    let excerpt_source = review
        .pros
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(review.headline.as_deref())
        .unwrap_or("");
    ReviewRow {
        date: review.date.clone().unwrap_or_else(|| "N/A".to_string()),
        score: review
            .average_score
            .map(|s| format!("{}/10", s))
            .unwrap_or_else(|| "N/A".to_string()),
        reviewer: review
            .name
            .clone()
            .unwrap_or_else(|| "Anonymous".to_string()),
        excerpt: text::trim_words(excerpt_source, EXCERPT_WORDS),
        language: review.language.clone().unwrap_or_else(|| "N/A".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wprentals::error::AuthError;
    use crate::wprentals::transport::{PostedResponse, TransportFailure};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubSource {
        result: fn() -> Result<Vec<SourceReview>, FetchError>,
    }

    #[async_trait::async_trait]
    impl ReviewSource for StubSource {
        async fn fetch(&self) -> Result<Vec<SourceReview>, FetchError> {
            (self.result)()
        }
    }

    struct StubTokens {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TokenProvider for StubTokens {
        async fn fetch_token(&self) -> Result<String, AuthError> {
            if self.fail {
                Err(AuthError::MissingToken)
            } else {
                Ok("jwt-token".to_string())
            }
        }
    }

    /// Transport fake answering every call with one fixed status.
    struct CountingTransport {
        calls: AtomicUsize,
        status: u16,
    }

    impl CountingTransport {
        fn new(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                status,
            }
        }
    }

    #[async_trait::async_trait]
    impl ReviewTransport for CountingTransport {
        async fn post_json(
            &self,
            _url: &str,
            _body: &str,
            _token: &str,
            _timeout: Duration,
        ) -> Result<PostedResponse, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PostedResponse {
                status: self.status,
                body: String::new(),
            })
        }
    }

    fn dest_config() -> DestConfig {
        DestConfig {
            base_url: "https://rentals.example".into(),
            username: "importer".into(),
            password: "secret".into(),
            property_id: 124,
            user_id: 1,
            content_limit: 4000,
        }
    }

    fn review_with_text(headline: &str) -> SourceReview {
        SourceReview {
            headline: Some(headline.to_string()),
            name: Some("Ana".to_string()),
            language: Some("en".to_string()),
            ..SourceReview::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_any_submission() {
        let source = StubSource {
            result: || {
                Err(FetchError::Status {
                    status: 500,
                    body: "server error".into(),
                })
            },
        };
        let transport = CountingTransport::new(201);
        let result = run_import(
            &source,
            &StubTokens { fail: false },
            &transport,
            &dest_config(),
            &SubmitConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auth_failure_still_reports_table_and_count() {
        let source = StubSource {
            result: || Ok((0..50).map(|i| review_with_text(&format!("r{}", i))).collect()),
        };
        let transport = CountingTransport::new(201);
        let report = run_import(
            &source,
            &StubTokens { fail: true },
            &transport,
            &dest_config(),
            &SubmitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.fetched, 50);
        assert_eq!(report.rows.len(), 50);
        assert!(report.outcomes.is_empty());
        assert!(report.auth_error.is_some());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_happy_path_submits_each_record() {
        let source = StubSource {
            result: || Ok(vec![review_with_text("Great stay"), review_with_text("Nice")]),
        };
        let transport = CountingTransport::new(201);
        let report = run_import(
            &source,
            &StubTokens { fail: false },
            &transport,
            &dest_config(),
            &SubmitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.fetched, 2);
        assert_eq!(report.submitted(), 2);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert!(report.auth_error.is_none());
    }

    #[tokio::test]
    async fn test_empty_content_skipped_before_submission() {
        let source = StubSource {
            result: || Ok(vec![SourceReview::default(), review_with_text("Great stay")]),
        };
        let transport = CountingTransport::new(200);
        let report = run_import(
            &source,
            &StubTokens { fail: false },
            &transport,
            &dest_config(),
            &SubmitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.outcomes[0], RecordOutcome::SkippedEmpty);
        assert_eq!(report.outcomes[1], RecordOutcome::Accepted { status: 200 });
        assert_eq!(report.skipped(), 1);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_conflicts_recorded_as_duplicates() {
        let source = StubSource {
            result: || Ok(vec![review_with_text("Great stay")]),
        };
        let transport = CountingTransport::new(409);
        let report = run_import(
            &source,
            &StubTokens { fail: false },
            &transport,
            &dest_config(),
            &SubmitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.outcomes, vec![RecordOutcome::Duplicate]);
        assert_eq!(report.duplicates(), 1);
        assert_eq!(report.submitted(), 0);
    }

    #[tokio::test]
    async fn test_rejection_does_not_abort_remaining_records() {
        let source = StubSource {
            result: || Ok(vec![review_with_text("One"), review_with_text("Two")]),
        };
        let transport = CountingTransport::new(422);
        let report = run_import(
            &source,
            &StubTokens { fail: false },
            &transport,
            &dest_config(),
            &SubmitConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.rejected(), 2);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_table_row_defaults() {
        let row = table_row(&SourceReview::default());
        assert_eq!(row.date, "N/A");
        assert_eq!(row.score, "N/A");
        assert_eq!(row.reviewer, "Anonymous");
        assert_eq!(row.excerpt, "");
        assert_eq!(row.language, "N/A");
    }

    #[test]
    fn test_table_row_prefers_pros_for_excerpt() {
        let review = SourceReview {
            pros: Some("Clean and quiet".into()),
            headline: Some("Great".into()),
            average_score: Some(8.5),
            ..SourceReview::default()
        };
        let row = table_row(&review);
        assert_eq!(row.excerpt, "Clean and quiet");
        assert_eq!(row.score, "8.5/10");
    }
}
