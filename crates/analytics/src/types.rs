// In crates/analytics/src/types.rs

use core_types::Month;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One row of the monthly table, in calendar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    pub month: Month,
    pub pnl: Decimal,
    pub quarter: String,
    pub style: String,
    /// Sum of `pnl` over this month and every month before it.
    pub cumulative_pnl: Decimal,
}

impl MonthlyRecord {
    /// A month with exactly zero P&L is a "no trade" month.
    pub fn is_traded(&self) -> bool {
        !self.pnl.is_zero()
    }
}

/// Knobs for the metrics engine that are not part of the category tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// The account the report is about.
    #[serde(default = "default_primary_account")]
    pub primary_account: String,
    /// Base quarter for the improvement percentage.
    #[serde(default = "default_improvement_from")]
    pub improvement_from: String,
    /// Target quarter for the improvement percentage.
    #[serde(default = "default_improvement_to")]
    pub improvement_to: String,
    /// Style bucket whose win rate is reported as the consistency score.
    #[serde(default = "default_consistency_style")]
    pub consistency_style: String,
    /// Capital used for the rough ROI estimate.
    #[serde(default = "default_estimated_capital")]
    pub estimated_capital: Decimal,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            primary_account: default_primary_account(),
            improvement_from: default_improvement_from(),
            improvement_to: default_improvement_to(),
            consistency_style: default_consistency_style(),
            estimated_capital: default_estimated_capital(),
        }
    }
}

fn default_primary_account() -> String { "Kotak Derivative".into() }
fn default_improvement_from() -> String { "Q1".into() }
fn default_improvement_to() -> String { "Q2".into() }
fn default_consistency_style() -> String { "Systematic".into() }
fn default_estimated_capital() -> Decimal { dec!(100000) }

/// A month label paired with its P&L. Empty label and zero when nothing was traded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthPnl {
    pub month: Month,
    pub pnl: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawdownSummary {
    /// Most negative distance below the running peak. Always <= 0.
    pub max_drawdown: Decimal,
    pub peak_month: Month,
    pub trough_month: Month,
    /// Final cumulative P&L minus the trough value; zero if the trough is the last month.
    pub recovery: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterSummary {
    pub name: String,
    pub total_pnl: Decimal,
    pub months: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuarterImprovement {
    pub from: String,
    pub to: String,
    pub from_pnl: Decimal,
    pub to_pnl: Decimal,
    pub percent: f64,
}

/// Rollup of one trading-style bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleSummary {
    pub name: String,
    pub total_pnl: Decimal,
    pub months: u32,
    pub profitable_months: u32,
    pub avg_pnl: Decimal,
    /// Profitable months over all months in the bucket, as a percentage.
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoiEstimate {
    pub estimated_capital: Decimal,
    pub total_pnl: Decimal,
    pub roi_percentage: f64,
}

/// Per-account totals used to compare segments against each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub name: String,
    pub platform: String,
    pub segment: String,
    pub total: Decimal,
    pub months_traded: u32,
    pub profitable_months: u32,
    pub loss_months: u32,
    pub avg_profit: Decimal,
    pub avg_loss: Decimal,
    pub capital_share: Option<Decimal>,
}

/// Accounts on the same platform, added month by month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSummary {
    pub platform: String,
    pub accounts: Vec<String>,
    pub total_pnl: Decimal,
    /// Months where the combined P&L is non-zero.
    pub months_traded: u32,
    pub profitable_months: u32,
    /// Total over traded months; zero when nothing was traded.
    pub avg_per_month: Decimal,
}

/// Return of one account against its slice of the estimated capital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRoi {
    pub account: String,
    pub allocated_capital: Decimal,
    pub total_pnl: Decimal,
    pub roi_percentage: f64,
}

/// Cross-account view: platform totals, per-account ROI and the combined ROI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Portfolio {
    pub platforms: Vec<PlatformSummary>,
    pub segment_roi: Vec<SegmentRoi>,
    pub overall: RoiEstimate,
}

/// Every statistic the report needs, computed once per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub account: String,

    // P&L and counts
    pub total_pnl: Decimal,
    pub months_traded: u32,
    pub profitable_months: u32,
    pub loss_months: u32,
    pub win_rate: f64,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub avg_profit: Decimal,
    pub avg_loss: Decimal,
    pub profit_factor: f64,

    // Risk
    pub avg_monthly_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub risk_adjusted_return: f64,
    pub drawdown: DrawdownSummary,
    pub max_consecutive_profits: u32,

    pub best_month: MonthPnl,
    pub worst_month: MonthPnl,

    // Partitions
    pub quarters: Vec<QuarterSummary>,
    pub improvement: QuarterImprovement,
    pub styles: Vec<StyleSummary>,
    pub consistency_score: f64,

    pub roi: RoiEstimate,
}

impl MetricsSnapshot {
    /// Total P&L of a quarter; zero when the quarter has no months.
    pub fn quarter_pnl(&self, name: &str) -> Decimal {
        self.quarters
            .iter()
            .find(|q| q.name == name)
            .map(|q| q.total_pnl)
            .unwrap_or_default()
    }

    pub fn style(&self, name: &str) -> Option<&StyleSummary> {
        self.styles.iter().find(|s| s.name == name)
    }
}

/// Everything derived for one account: the table, its metrics and its summary row.
#[derive(Debug, Clone, Serialize)]
pub struct AccountAnalysis {
    pub records: Vec<MonthlyRecord>,
    pub metrics: MetricsSnapshot,
    pub summary: AccountSummary,
}
