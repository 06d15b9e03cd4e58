// In crates/analytics/src/engine.rs

use crate::classifier::CategoryClassifier;
use crate::metrics;
use crate::types::{
    AccountAnalysis, AccountSummary, AnalysisSettings, DrawdownSummary, MetricsSnapshot, MonthPnl,
    MonthlyRecord, PlatformSummary, Portfolio, QuarterImprovement, QuarterSummary, RoiEstimate,
    SegmentRoi, StyleSummary,
};
use core_types::{AccountPnl, CategoryConfig};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// The engine responsible for turning monthly P&L into a `MetricsSnapshot`.
///
/// All category tables and analysis knobs are handed in at construction.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    categories: CategoryConfig,
    settings: AnalysisSettings,
    classifier: CategoryClassifier,
}

impl AnalyticsEngine {
    pub fn new(categories: CategoryConfig, settings: AnalysisSettings) -> Self {
        let classifier = CategoryClassifier::new(&categories);
        Self {
            categories,
            settings,
            classifier,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Builds the calendar-ordered monthly table for one account.
    pub fn build_records(&self, account: &AccountPnl) -> Vec<MonthlyRecord> {
        let mut cumulative_pnl = Decimal::ZERO;
        self.categories
            .months
            .iter()
            .map(|month| {
                let pnl = account.pnl_for(month);
                cumulative_pnl += pnl;
                let quarter = match self.classifier.quarter_of(month) {
                    Some(q) => q.to_string(),
                    None => {
                        tracing::warn!(%month, "Month does not belong to any quarter.");
                        String::new()
                    }
                };
                MonthlyRecord {
                    month: month.clone(),
                    pnl,
                    quarter,
                    style: self.classifier.style_of(month).to_string(),
                    cumulative_pnl,
                }
            })
            .collect()
    }

    /// Builds the records, metrics and summary row for an account in one go.
    pub fn analyze(&self, account: &AccountPnl) -> AccountAnalysis {
        let records = self.build_records(account);
        let metrics = self.calculate(&account.name, &records);
        let summary = summarize(account, &records);
        tracing::debug!(
            account = %account.name,
            total_pnl = %metrics.total_pnl,
            win_rate = metrics.win_rate,
            "Account analyzed."
        );
        AccountAnalysis {
            records,
            metrics,
            summary,
        }
    }

    /// Calculates the full snapshot from a calendar-ordered table.
    pub fn calculate(&self, account: &str, records: &[MonthlyRecord]) -> MetricsSnapshot {
        let pnls: Vec<Decimal> = records.iter().map(|r| r.pnl).collect();
        let cumulative: Vec<Decimal> = records.iter().map(|r| r.cumulative_pnl).collect();

        let mut snapshot = MetricsSnapshot {
            account: account.to_string(),
            ..MetricsSnapshot::default()
        };

        // --- P&L and win/loss counts ---
        snapshot.total_pnl = pnls.iter().copied().sum();
        snapshot.months_traded = records.iter().filter(|r| r.is_traded()).count() as u32;
        snapshot.profitable_months = pnls.iter().filter(|p| **p > dec!(0)).count() as u32;
        snapshot.loss_months = pnls.iter().filter(|p| **p < dec!(0)).count() as u32;
        snapshot.win_rate = metrics::win_rate(&pnls);
        snapshot.gross_profit = metrics::gross_profit(&pnls);
        snapshot.gross_loss = metrics::gross_loss(&pnls);
        snapshot.avg_profit = metrics::average_where(&pnls, |p| *p > dec!(0));
        snapshot.avg_loss = metrics::average_where(&pnls, |p| *p < dec!(0));
        snapshot.profit_factor = metrics::profit_factor(&pnls);

        // --- Risk ---
        snapshot.avg_monthly_return = metrics::mean_traded(&pnls);
        snapshot.volatility = metrics::volatility(&pnls);
        snapshot.sharpe_ratio = metrics::sharpe_ratio(&pnls);
        snapshot.risk_adjusted_return = if snapshot.volatility > 0.0 {
            snapshot.total_pnl.to_f64().unwrap_or(0.0) / snapshot.volatility
        } else {
            0.0
        };
        snapshot.max_consecutive_profits = metrics::longest_profitable_streak(&pnls);

        let point = metrics::max_drawdown(&cumulative);
        if !records.is_empty() {
            snapshot.drawdown = DrawdownSummary {
                max_drawdown: point.max_drawdown,
                peak_month: records[point.peak_index].month.clone(),
                trough_month: records[point.trough_index].month.clone(),
                recovery: point.recovery,
            };
        }

        // --- Best and worst traded months ---
        let traded: Vec<&MonthlyRecord> = records.iter().filter(|r| r.is_traded()).collect();
        let traded_pnls: Vec<Decimal> = traded.iter().map(|r| r.pnl).collect();
        let pick = |idx: Option<usize>| {
            idx.map(|i| MonthPnl {
                month: traded[i].month.clone(),
                pnl: traded[i].pnl,
            })
            .unwrap_or_default()
        };
        snapshot.best_month = pick(metrics::first_extreme(&traded_pnls, |a, b| a > b));
        snapshot.worst_month = pick(metrics::first_extreme(&traded_pnls, |a, b| a < b));

        // --- Partitions ---
        snapshot.quarters = self.quarter_rollups(records);
        let from_pnl = snapshot.quarter_pnl(&self.settings.improvement_from);
        let to_pnl = snapshot.quarter_pnl(&self.settings.improvement_to);
        snapshot.improvement = QuarterImprovement {
            from: self.settings.improvement_from.clone(),
            to: self.settings.improvement_to.clone(),
            from_pnl,
            to_pnl,
            percent: metrics::improvement_pct(from_pnl, to_pnl),
        };
        snapshot.styles = self.style_rollups(records);
        snapshot.consistency_score = snapshot
            .style(&self.settings.consistency_style)
            .map(|s| s.win_rate)
            .unwrap_or(0.0);

        snapshot.roi = roi_estimate(snapshot.total_pnl, self.settings.estimated_capital);

        snapshot
    }

    /// Total P&L and month count per configured quarter, in configured order.
    pub fn quarter_rollups(&self, records: &[MonthlyRecord]) -> Vec<QuarterSummary> {
        self.categories
            .quarters
            .iter()
            .map(|bucket| {
                let members: Vec<&MonthlyRecord> =
                    records.iter().filter(|r| r.quarter == bucket.name).collect();
                QuarterSummary {
                    name: bucket.name.clone(),
                    total_pnl: members.iter().map(|r| r.pnl).sum(),
                    months: members.len() as u32,
                }
            })
            .collect()
    }

    /// Rollup of every configured style bucket, in configured order.
    pub fn style_rollups(&self, records: &[MonthlyRecord]) -> Vec<StyleSummary> {
        self.categories
            .styles
            .iter()
            .map(|bucket| {
                let pnls: Vec<Decimal> = records
                    .iter()
                    .filter(|r| r.style == bucket.name)
                    .map(|r| r.pnl)
                    .collect();
                let months = pnls.len() as u32;
                let profitable_months = pnls.iter().filter(|p| **p > dec!(0)).count() as u32;
                let total_pnl: Decimal = pnls.iter().copied().sum();
                let (avg_pnl, win_rate) = if months > 0 {
                    (
                        total_pnl / Decimal::from(months),
                        profitable_months as f64 / months as f64 * 100.0,
                    )
                } else {
                    (Decimal::ZERO, 0.0)
                };
                StyleSummary {
                    name: bucket.name.clone(),
                    total_pnl,
                    months,
                    profitable_months,
                    avg_pnl,
                    win_rate,
                }
            })
            .collect()
    }

    /// Platform totals and capital returns across every analyzed account.
    pub fn portfolio(&self, accounts: &[AccountAnalysis]) -> Portfolio {
        let combined: Decimal = accounts.iter().map(|a| a.summary.total).sum();
        let portfolio = Portfolio {
            platforms: platform_rollups(accounts),
            segment_roi: segment_roi(accounts, self.settings.estimated_capital),
            overall: roi_estimate(combined, self.settings.estimated_capital),
        };
        tracing::debug!(
            platforms = portfolio.platforms.len(),
            combined_pnl = %combined,
            "Portfolio rolled up."
        );
        portfolio
    }
}

/// Adds up accounts that share a platform, month by month, in first-seen order.
///
/// Months traded and profitable months are counted on the combined series, so
/// two accounts trading the same month count once.
pub fn platform_rollups(accounts: &[AccountAnalysis]) -> Vec<PlatformSummary> {
    let mut groups: Vec<(&str, Vec<String>, Vec<Decimal>)> = Vec::new();
    for account in accounts {
        let platform = account.summary.platform.as_str();
        let idx = match groups.iter().position(|(name, _, _)| *name == platform) {
            Some(idx) => idx,
            None => {
                groups.push((platform, Vec::new(), vec![Decimal::ZERO; account.records.len()]));
                groups.len() - 1
            }
        };
        let (_, names, monthly) = &mut groups[idx];
        names.push(account.summary.name.clone());
        if monthly.len() < account.records.len() {
            monthly.resize(account.records.len(), Decimal::ZERO);
        }
        for (slot, record) in monthly.iter_mut().zip(&account.records) {
            *slot += record.pnl;
        }
    }

    groups
        .into_iter()
        .map(|(platform, accounts, monthly)| {
            let total_pnl: Decimal = monthly.iter().copied().sum();
            let months_traded = monthly.iter().filter(|p| !p.is_zero()).count() as u32;
            let profitable_months = monthly.iter().filter(|p| **p > dec!(0)).count() as u32;
            let avg_per_month = if months_traded > 0 {
                total_pnl / Decimal::from(months_traded)
            } else {
                Decimal::ZERO
            };
            PlatformSummary {
                platform: platform.to_string(),
                accounts,
                total_pnl,
                months_traded,
                profitable_months,
                avg_per_month,
            }
        })
        .collect()
}

/// Each account's return on its share of the capital. Accounts without a
/// configured share get an equal split.
pub fn segment_roi(accounts: &[AccountAnalysis], estimated_capital: Decimal) -> Vec<SegmentRoi> {
    if accounts.is_empty() {
        return Vec::new();
    }
    let equal_share = Decimal::ONE / Decimal::from(accounts.len());
    accounts
        .iter()
        .map(|a| {
            let share = a.summary.capital_share.unwrap_or(equal_share);
            let estimate = roi_estimate(a.summary.total, estimated_capital * share);
            SegmentRoi {
                account: a.summary.name.clone(),
                allocated_capital: estimate.estimated_capital,
                total_pnl: estimate.total_pnl,
                roi_percentage: estimate.roi_percentage,
            }
        })
        .collect()
}

/// Per-account totals for comparing segments.
pub fn summarize(account: &AccountPnl, records: &[MonthlyRecord]) -> AccountSummary {
    let pnls: Vec<Decimal> = records.iter().map(|r| r.pnl).collect();
    AccountSummary {
        name: account.name.clone(),
        platform: account.platform.clone(),
        segment: account.segment.clone(),
        total: pnls.iter().copied().sum(),
        months_traded: pnls.iter().filter(|p| !p.is_zero()).count() as u32,
        profitable_months: pnls.iter().filter(|p| **p > dec!(0)).count() as u32,
        loss_months: pnls.iter().filter(|p| **p < dec!(0)).count() as u32,
        avg_profit: metrics::average_where(&pnls, |p| *p > dec!(0)),
        avg_loss: metrics::average_where(&pnls, |p| *p < dec!(0)),
        capital_share: account.capital_share,
    }
}

/// Total P&L as a percentage of an assumed starting capital.
pub fn roi_estimate(total_pnl: Decimal, estimated_capital: Decimal) -> RoiEstimate {
    let roi_percentage = if estimated_capital > dec!(0) {
        (total_pnl / estimated_capital).to_f64().unwrap_or(0.0) * 100.0
    } else {
        0.0
    };
    RoiEstimate {
        estimated_capital,
        total_pnl,
        roi_percentage,
    }
}
