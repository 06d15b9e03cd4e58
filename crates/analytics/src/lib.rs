// In crates/analytics/src/lib.rs

pub mod classifier;
pub mod engine;
pub mod metrics;
pub mod types;

pub use engine::AnalyticsEngine;
pub use types::{
    AccountAnalysis, AnalysisSettings, MetricsSnapshot, MonthlyRecord, PlatformSummary, Portfolio,
    SegmentRoi,
};
