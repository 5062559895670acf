//! LiteAPI reviews source.
//!
//! Fetches one page of guest reviews for a single hotel. The API returns
//! loosely-typed records, either as `{"data": [...]}` or as a bare top-level
//! array; both shapes are accepted. Missing fields are the common case and
//! must never fail the run.

pub mod error;

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

pub use self::error::FetchError;

/// Longest response-body excerpt carried in error messages.
const ERROR_BODY_SNIPPET: usize = 200;

/// One raw review record as returned by the source API.
///
/// Every field is optional; absence degrades gracefully downstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceReview {
    pub date: Option<String>,
    pub average_score: Option<f64>,
    pub name: Option<String>,
    pub headline: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub review: Option<String>,
    pub language: Option<String>,
}

/// Source API parameters, built once from the CLI.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub api_key: String,
    pub hotel_id: String,
    pub limit: u32,
    pub timeout: Duration,
}

/// Seam between the orchestrator and the source API, so the import loop can
/// be tested against scripted review lists.
#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SourceReview>, FetchError>;
}

/// HTTP-backed source hitting the LiteAPI reviews endpoint.
pub struct LiteApiSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl LiteApiSource {
    pub fn new(client: reqwest::Client, config: SourceConfig) -> Self {
        Self { client, config }
    }

    fn reviews_url(&self) -> String {
        format!(
            "{}/reviews?hotelId={}&limit={}&timeout=4&getSentiment=false",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.hotel_id),
            self.config.limit,
        )
    }
}

#[async_trait::async_trait]
impl ReviewSource for LiteApiSource {
    async fn fetch(&self) -> Result<Vec<SourceReview>, FetchError> {
        let url = self.reviews_url();
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.config.api_key)
            .header("Accept", "application/json")
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if status != 200 {
            return Err(FetchError::Status {
                status,
                body: snippet(&body),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        parse_review_list(&value)
    }
}

/// Normalize the API's two response shapes into one record list.
///
/// Items that are not objects, or that fail to deserialize, are skipped with
/// a warning. An explicit `error` field or an empty record list aborts.
fn parse_review_list(value: &Value) -> Result<Vec<SourceReview>, FetchError> {
    if let Some(err) = value.get("error") {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(FetchError::Api(message));
    }

    let items = if let Some(data) = value.get("data").and_then(Value::as_array) {
        data
    } else if let Some(top) = value.as_array() {
        top
    } else {
        return Err(FetchError::UnexpectedShape(shape_of(value)));
    };

    let mut reviews = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            tracing::warn!("Skipping non-object review entry");
            continue;
        }
        match serde_json::from_value::<SourceReview>(item.clone()) {
            Ok(review) => reviews.push(review),
            Err(e) => tracing::warn!("Skipping malformed review entry: {}", e),
        }
    }

    if reviews.is_empty() {
        return Err(FetchError::UnexpectedShape(shape_of(value)));
    }

    Ok(reviews)
}

fn shape_of(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Array(items) => format!("array of {} item(s)", items.len()),
        other => format!("unexpected {:?}", other),
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(ERROR_BODY_SNIPPET).collect()
}
