//! liteapi-wprentals-rs — one-way review sync job.
//!
//! Fetches guest reviews for a single hotel from the LiteAPI reviews
//! endpoint, reshapes each one into the WPRentals review schema, and submits
//! them one at a time over HTTPS with JWT bearer authentication. Timed-out
//! submissions are retried with escalating timeouts.

#![warn(clippy::all)]

mod cli;
mod config;
mod import;
mod source;
mod text;
mod types;
mod wprentals;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use import::ImportReport;
use source::LiteApiSource;
use wprentals::auth::JwtAuthenticator;

const USER_AGENT: &str = concat!("liteapi-wprentals-rs/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    let config = config::Config::from_cli(cli)?;
    tracing::info!(hotel_id = %config.hotel_id, limit = config.limit, "Starting review import");

    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(config.connect_timeout());
    if config.insecure_tls {
        tracing::warn!("TLS certificate verification is disabled for all outbound requests");
        builder = builder.danger_accept_invalid_certs(true);
    }
    let client = builder.build()?;

    let source = LiteApiSource::new(client.clone(), config.source_config());
    let dest = config.dest_config();
    let tokens = JwtAuthenticator::new(client.clone(), &dest);

    let report = import::run_import(
        &source,
        &tokens,
        &client,
        &dest,
        &config.submit_config(),
    )
    .await?;

    render_report(&report);
    Ok(())
}

/// Print the review table and the run summary.
fn render_report(report: &ImportReport) {
    println!(
        "{:<12} {:>8} {:<20} {:<50} {:<8}",
        "Date", "Rating", "Reviewer", "Comment", "Language"
    );
    for row in &report.rows {
        println!(
            "{:<12} {:>8} {:<20} {:<50} {:<8}",
            row.date, row.score, row.reviewer, row.excerpt, row.language
        );
    }

    println!();
    println!("Reviews fetched:   {}", report.fetched);
    if let Some(error) = &report.auth_error {
        println!("Submission phase skipped: authentication failed ({})", error);
        return;
    }
    println!("  Imported:        {}", report.submitted());
    println!("  Already present: {}", report.duplicates());
    println!("  Rejected:        {}", report.rejected());
    println!("  Failed:          {}", report.failed());
    println!("  Skipped (empty): {}", report.skipped());
}
