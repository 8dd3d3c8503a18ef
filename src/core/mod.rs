pub mod aggregate;
pub mod distribution;
pub mod grouping;
pub mod insights;
pub mod metrics;
pub mod streaks;
