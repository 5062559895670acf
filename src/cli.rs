use clap::Parser;

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "liteapi-wprentals-rs",
    about = "Import LiteAPI hotel reviews into a WPRentals site"
)]
pub struct Cli {
    /// LiteAPI base URL
    #[arg(long, default_value = "https://api.liteapi.travel/v3.0/data")]
    pub source_url: String,

    /// LiteAPI API key.
    /// WARNING: passing via --api-key is visible in process listings.
    /// Prefer the LITEAPI_API_KEY environment variable instead.
    #[arg(long, env = "LITEAPI_API_KEY")]
    pub api_key: String,

    /// Hotel to fetch reviews for
    #[arg(long)]
    pub hotel_id: String,

    /// Number of reviews to fetch (single page, no pagination)
    #[arg(long, default_value_t = 15)]
    pub limit: u32,

    /// Timeout for the reviews fetch, in seconds
    #[arg(long, default_value_t = 10)]
    pub fetch_timeout: u64,

    /// WPRentals site base URL
    #[arg(long)]
    pub dest_url: String,

    /// WPRentals username
    #[arg(long)]
    pub dest_username: String,

    /// WPRentals password (prefer the WPRENTALS_PASSWORD environment variable)
    #[arg(long, env = "WPRENTALS_PASSWORD")]
    pub dest_password: String,

    /// Property the imported reviews attach to
    #[arg(long)]
    pub property_id: u64,

    /// WPRentals user authoring the imported reviews
    #[arg(long, default_value_t = 1)]
    pub user_id: u64,

    /// Maximum review content length sent to WPRentals
    #[arg(long, default_value_t = 4000)]
    pub content_limit: usize,

    /// Initial timeout for review POST requests, in seconds
    #[arg(long, default_value_t = 45)]
    pub initial_timeout: u64,

    /// Maximum timeout when retrying timed-out POSTs, in seconds
    #[arg(long, default_value_t = 120)]
    pub max_timeout: u64,

    /// Maximum attempts per review POST
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Skip TLS certificate verification on all outbound requests.
    /// Only for destinations with self-signed certificates.
    #[arg(long)]
    pub insecure_tls: bool,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
