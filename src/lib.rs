pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod report;
pub mod scoring;
#[cfg(test)]
pub mod test_helpers;

pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use models::{Direction, Ratio, Session, Trade};
pub use report::JournalReport;
