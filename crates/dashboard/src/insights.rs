// In crates/dashboard/src/insights.rs

use analytics::types::{MetricsSnapshot, StyleSummary};
use rust_decimal::Decimal;

use crate::format::{currency, percent, signed_currency};

/// Narrative lines and headline figures derived from a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub what_worked: Vec<String>,
    pub what_didnt_work: Vec<String>,
    pub risk_management: Vec<String>,
    /// `(label, formatted value)` pairs, in display order.
    pub key_metrics: Vec<(String, String)>,
}

/// Turns a `MetricsSnapshot` into display strings. Holds no metric logic of its own.
#[derive(Debug, Clone)]
pub struct InsightFormatter {
    currency_symbol: String,
    consistency_style: String,
}

impl InsightFormatter {
    pub fn new(currency_symbol: impl Into<String>, consistency_style: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            consistency_style: consistency_style.into(),
        }
    }

    pub fn money(&self, value: Decimal) -> String {
        currency(value, &self.currency_symbol)
    }

    pub fn signed_money(&self, value: Decimal) -> String {
        signed_currency(value, &self.currency_symbol)
    }

    /// The style bucket the narrative is built around, if it was configured.
    pub fn focus_style<'a>(&self, m: &'a MetricsSnapshot) -> Option<&'a StyleSummary> {
        m.style(&self.consistency_style)
    }

    pub fn insights(&self, m: &MetricsSnapshot) -> Insights {
        let imp = &m.improvement;
        let focus = self.focus_style(m);

        let mut what_worked = Vec::new();
        if let Some(style) = focus {
            what_worked.push(format!(
                "{} trading generated {} with a {:.0}% win rate",
                style.name,
                self.signed_money(style.total_pnl),
                style.win_rate
            ));
            what_worked.push(format!(
                "{} of {} {} months closed in profit through disciplined execution",
                style.profitable_months,
                style.months,
                style.name.to_lowercase()
            ));
        }
        what_worked.push(format!(
            "Performance improved by {:.0}% from {} to {}",
            imp.percent, imp.from, imp.to
        ));
        what_worked.push(format!(
            "Longest profitable streak: {} traded months",
            m.max_consecutive_profits
        ));
        if m.best_month.pnl > Decimal::ZERO {
            what_worked.push(format!(
                "Best month was {} at {}",
                m.best_month.month,
                self.money(m.best_month.pnl)
            ));
        }

        let mut what_didnt_work = Vec::new();
        if imp.from_pnl < Decimal::ZERO {
            what_didnt_work.push(format!(
                "{} resulted in {} in losses",
                imp.from,
                self.money(imp.from_pnl)
            ));
        }
        if m.worst_month.pnl < Decimal::ZERO {
            what_didnt_work.push(format!(
                "{} was the weakest month at {}",
                m.worst_month.month,
                self.signed_money(m.worst_month.pnl)
            ));
        }
        let losing_styles: Vec<&StyleSummary> =
            m.styles.iter().filter(|s| s.total_pnl < Decimal::ZERO).collect();
        for style in losing_styles {
            what_didnt_work.push(format!(
                "{} months lost {} at a {:.0}% win rate",
                style.name,
                self.money(style.total_pnl),
                style.win_rate
            ));
        }
        what_didnt_work.push(format!(
            "{} of {} traded months closed at a loss",
            m.loss_months, m.months_traded
        ));

        let mut risk_management = vec![
            format!(
                "Maximum drawdown of {} from {} to {}",
                self.money(m.drawdown.max_drawdown),
                m.drawdown.peak_month,
                m.drawdown.trough_month
            ),
            format!(
                "Recovered {} from the trough by the final month",
                self.signed_money(m.drawdown.recovery)
            ),
            format!(
                "Monthly volatility of {} against an average of {}",
                crate::format::currency_f64(m.volatility, &self.currency_symbol),
                crate::format::currency_f64(m.avg_monthly_return, &self.currency_symbol)
            ),
        ];
        if m.profit_factor > 0.0 {
            risk_management.push(format!(
                "Every {} lost was matched by {} won (profit factor {:.2})",
                self.money(Decimal::ONE),
                crate::format::currency_f64(m.profit_factor, &self.currency_symbol),
                m.profit_factor
            ));
        }

        let mut key_metrics = vec![
            ("Net P&L".to_string(), self.signed_money(m.total_pnl)),
            ("Overall Win Rate".to_string(), format!("{:.0}%", m.win_rate)),
        ];
        if let Some(style) = focus {
            key_metrics.push((format!("{} Win Rate", style.name), format!("{:.0}%", style.win_rate)));
        }
        key_metrics.extend([
            ("Profit Factor".to_string(), format!("{:.2}", m.profit_factor)),
            (
                format!("{} to {} Improvement", imp.from, imp.to),
                format!("{:+.0}%", imp.percent),
            ),
            (
                "Max Consecutive Profits".to_string(),
                format!("{} months", m.max_consecutive_profits),
            ),
            ("Estimated ROI".to_string(), percent(m.roi.roi_percentage)),
        ]);

        Insights {
            what_worked,
            what_didnt_work,
            risk_management,
            key_metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::reference_analysis;

    #[test]
    fn insights_quote_snapshot_figures() {
        let analysis = reference_analysis();
        let insights = InsightFormatter::new("₹", "Systematic").insights(&analysis.metrics);

        assert_eq!(
            insights.what_worked[0],
            "Systematic trading generated ₹29,152.00 with a 100% win rate"
        );
        assert!(insights.what_worked.iter().any(|l| l == "Performance improved by 369% from Q1 to Q2"));
        assert!(insights.what_didnt_work.iter().any(|l| l == "Q1 resulted in ₹10,839.00 in losses"));
        assert!(
            insights
                .what_didnt_work
                .iter()
                .any(|l| l == "Emotional months lost ₹3,492.00 at a 0% win rate")
        );
        assert_eq!(
            insights.risk_management[0],
            "Maximum drawdown of ₹5,303.00 from Apr to Jun"
        );
    }

    #[test]
    fn key_metrics_are_ordered_and_formatted() {
        let analysis = reference_analysis();
        let insights = InsightFormatter::new("₹", "Systematic").insights(&analysis.metrics);
        let labels: Vec<&str> = insights.key_metrics.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Net P&L",
                "Overall Win Rate",
                "Systematic Win Rate",
                "Profit Factor",
                "Q1 to Q2 Improvement",
                "Max Consecutive Profits",
                "Estimated ROI",
            ]
        );
        assert_eq!(insights.key_metrics[0].1, "₹14,821.00");
        assert_eq!(insights.key_metrics[3].1, "2.03");
        assert_eq!(insights.key_metrics[4].1, "+369%");
    }

    #[test]
    fn missing_focus_style_is_skipped() {
        let analysis = reference_analysis();
        let insights = InsightFormatter::new("$", "Scalping").insights(&analysis.metrics);
        assert!(insights.what_worked[0].starts_with("Performance improved"));
        assert_eq!(insights.key_metrics.len(), 6);
    }
}
