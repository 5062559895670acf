//! WPRentals destination client: JWT authentication, payload mapping and the
//! retrying review submitter.

pub mod auth;
pub mod error;
pub mod payload;
pub mod submit;
pub mod transport;

pub use self::error::{AuthError, SubmitError};

/// Destination site parameters, built once from the CLI.
#[derive(Clone)]
pub struct DestConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub property_id: u64,
    pub user_id: u64,
    pub content_limit: usize,
}

impl std::fmt::Debug for DestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("property_id", &self.property_id)
            .field("user_id", &self.user_id)
            .field("content_limit", &self.content_limit)
            .finish()
    }
}

/// JWT token endpoint for a destination site.
pub fn token_url(base_url: &str) -> String {
    format!("{}/wp-json/jwt-auth/v1/token", base_url.trim_end_matches('/'))
}

/// Review submission endpoint for a destination site.
pub fn review_url(base_url: &str) -> String {
    format!(
        "{}/wp-json/wprentals/v1/post-review",
        base_url.trim_end_matches('/')
    )
}
