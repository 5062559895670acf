use std::time::Duration;

use crate::cli::Cli;
use crate::source::SourceConfig;
use crate::types::LogLevel;
use crate::wprentals::submit::SubmitConfig;
use crate::wprentals::DestConfig;

/// Application configuration, built once from the CLI and passed by
/// reference into the import run. No ambient/global state.
pub struct Config {
    pub source_url: String,
    pub api_key: String,
    pub hotel_id: String,
    pub dest_url: String,
    pub dest_username: String,
    pub dest_password: String,

    pub property_id: u64,
    pub user_id: u64,
    pub content_limit: usize,

    pub fetch_timeout_secs: u64,
    pub initial_timeout_secs: u64,
    pub max_timeout_secs: u64,

    pub limit: u32,
    pub max_attempts: u32,

    #[allow(dead_code)] // Copied from CLI but read from cli.log_level directly in main.rs
    pub log_level: LogLevel,
    pub insecure_tls: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("source_url", &self.source_url)
            .field("api_key", &"<redacted>")
            .field("hotel_id", &self.hotel_id)
            .field("dest_url", &self.dest_url)
            .field("dest_username", &self.dest_username)
            .field("dest_password", &"<redacted>")
            .field("property_id", &self.property_id)
            .field("limit", &self.limit)
            .field("insecure_tls", &self.insecure_tls)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        if cli.max_attempts == 0 {
            anyhow::bail!("--max-attempts must be at least 1");
        }
        if cli.initial_timeout == 0 {
            anyhow::bail!("--initial-timeout must be at least 1 second");
        }
        if cli.max_timeout < cli.initial_timeout {
            anyhow::bail!(
                "--max-timeout ({}) must not be lower than --initial-timeout ({})",
                cli.max_timeout,
                cli.initial_timeout
            );
        }

        Ok(Self {
            source_url: cli.source_url,
            api_key: cli.api_key,
            hotel_id: cli.hotel_id,
            dest_url: cli.dest_url,
            dest_username: cli.dest_username,
            dest_password: cli.dest_password,
            property_id: cli.property_id,
            user_id: cli.user_id,
            content_limit: cli.content_limit,
            fetch_timeout_secs: cli.fetch_timeout,
            initial_timeout_secs: cli.initial_timeout,
            max_timeout_secs: cli.max_timeout,
            limit: cli.limit,
            max_attempts: cli.max_attempts,
            log_level: cli.log_level,
            insecure_tls: cli.insecure_tls,
        })
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.source_url.clone(),
            api_key: self.api_key.clone(),
            hotel_id: self.hotel_id.clone(),
            limit: self.limit,
            timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    pub fn dest_config(&self) -> DestConfig {
        DestConfig {
            base_url: self.dest_url.clone(),
            username: self.dest_username.clone(),
            password: self.dest_password.clone(),
            property_id: self.property_id,
            user_id: self.user_id,
            content_limit: self.content_limit,
        }
    }

    pub fn submit_config(&self) -> SubmitConfig {
        SubmitConfig {
            max_attempts: self.max_attempts,
            initial_timeout: Duration::from_secs(self.initial_timeout_secs),
            max_timeout: Duration::from_secs(self.max_timeout_secs),
        }
    }

    /// Connect timeout for the shared HTTP client: 10 seconds, or the
    /// initial request timeout when that is lower.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.initial_timeout_secs.min(10))
    }
}
