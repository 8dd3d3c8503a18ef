use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::{fmt, EnvFilter};

use journal_analytics::config::AnalyticsConfig;
use journal_analytics::models::Trade;
use journal_analytics::report::JournalReport;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = AnalyticsConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .map(String::as_str)
        .context("usage: report <trades.json>")?;

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path))?;
    let trades: Vec<Trade> =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path))?;

    tracing::info!(trades = trades.len(), path, "building journal report");

    let report = JournalReport::build(&trades, &cfg, Utc::now())?;
    report.print_summary();

    Ok(())
}
