// In crates/dashboard/src/html.rs

use analytics::types::{AccountAnalysis, MetricsSnapshot, Portfolio};
use rust_decimal::Decimal;

use crate::charts;
use crate::format::{currency_f64, escape, percent};
use crate::insights::{InsightFormatter, Insights};
use crate::types::{ChartArtifact, ReportMetadata, ReportSettings};

const REPORT_TEMPLATE: &str = include_str!("report_template.html");

/// Replaces `{{name}}` markers in a single left-to-right pass.
///
/// Inserted values are never rescanned. Unknown markers are kept as written.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Everything the HTML page is assembled from.
pub struct ReportBuilder<'a> {
    pub metadata: &'a ReportMetadata,
    pub settings: &'a ReportSettings,
    pub analysis: &'a AccountAnalysis,
    /// Cross-account totals for the platform section.
    pub portfolio: &'a Portfolio,
    pub charts: &'a [ChartArtifact],
    /// Chart directory as seen from the report file.
    pub charts_dir: &'a str,
    /// Style bucket the narrative focuses on.
    pub focus_style: &'a str,
    pub generated_at: String,
}

impl ReportBuilder<'_> {
    fn metrics(&self) -> &MetricsSnapshot {
        &self.analysis.metrics
    }

    fn formatter(&self) -> InsightFormatter {
        InsightFormatter::new(&self.settings.currency_symbol, self.focus_style)
    }

    fn money(&self, value: Decimal) -> String {
        self.formatter().money(value)
    }

    /// Fills the template. Values are escaped where they enter the markup.
    pub fn render(&self) -> String {
        let md = self.metadata;
        let palette = &self.settings.palette;
        let insights = self.formatter().insights(self.metrics());

        let mut prepared = Vec::new();
        if !md.company.is_empty() {
            let role = if md.role.is_empty() { String::new() } else { format!(" {}", escape(&md.role)) };
            prepared.push(format!("Prepared for: <strong>{}</strong>{role}", escape(&md.company)));
        }
        if !md.prepared_for.is_empty() {
            prepared.push(format!("Date: {}", escape(&md.prepared_for)));
        }

        let values = [
            ("title", escape(&md.title)),
            ("financial_year", escape(&md.financial_year)),
            ("platform", escape(&md.platform)),
            ("prepared_for", prepared.join(" | ")),
            ("background", palette.background.clone()),
            ("text", palette.text.clone()),
            ("profit", palette.profit.clone()),
            ("loss", palette.loss.clone()),
            ("accent", palette.accent.clone()),
            ("learning", palette.learning.clone()),
            ("neutral", palette.neutral.clone()),
            ("grid", palette.grid.clone()),
            ("summary_cards", self.summary_cards()),
            ("executive_summary", self.executive_summary()),
            ("performance_charts", self.performance_charts()),
            ("screenshots", self.screenshots()),
            ("quarterly_analysis", self.quarterly_analysis()),
            ("style_analysis", self.style_analysis()),
            ("platform_comparison", self.platform_comparison()),
            ("risk_management", self.risk_management()),
            ("metrics_table", self.metrics_table()),
            ("key_learnings", self.key_learnings(&insights)),
            ("talking_points", self.talking_points(&insights)),
            ("additional_charts", self.additional_charts()),
            ("footer", self.footer()),
        ];
        fill_template(REPORT_TEMPLATE, &values)
    }

    fn chart(&self, name: &str, caption: &str) -> String {
        match self.charts.iter().find(|c| c.name == name) {
            Some(chart) => {
                let caption = if caption.is_empty() {
                    String::new()
                } else {
                    format!("<p>{}</p>", escape(caption))
                };
                format!(
                    r#"<div class="chart-container"><img src="{dir}/{file}" alt="{alt}">{caption}</div>"#,
                    dir = escape(self.charts_dir),
                    file = chart.file_name(),
                    alt = escape(&chart.title)
                )
            }
            None => String::new(),
        }
    }

    fn section(title: &str, body: &str) -> String {
        format!(
            r#"<div class="section"><h2>{}</h2>{body}</div>"#,
            escape(title)
        )
    }

    fn list(items: &[String]) -> String {
        let items: String = items.iter().map(|i| format!("<li>{}</li>", escape(i))).collect();
        format!("<ul>{items}</ul>")
    }

    fn summary_cards(&self) -> String {
        let m = self.metrics();
        let fmt = self.formatter();
        let imp = &m.improvement;

        let mut cards = vec![(
            "Net P&L".to_string(),
            fmt.signed_money(m.total_pnl),
            format!("{} | {} active months", self.metadata.platform, m.months_traded),
            if m.total_pnl > Decimal::ZERO { "profit" } else { "loss" },
        )];
        if let Some(style) = fmt.focus_style(m) {
            cards.push((
                format!("{} trading", style.name),
                fmt.signed_money(style.total_pnl),
                format!(
                    "{} profitable months | {} win rate",
                    style.profitable_months,
                    percent(style.win_rate)
                ),
                if style.total_pnl >= Decimal::ZERO { "profit" } else { "loss" },
            ));
        }
        cards.extend([
            (
                format!("{} to {} improvement", imp.from, imp.to),
                format!("{:+.1}%", imp.percent),
                format!("From {} to {}", fmt.signed_money(imp.from_pnl), fmt.signed_money(imp.to_pnl)),
                "info",
            ),
            (
                "Overall win rate".to_string(),
                percent(m.win_rate),
                format!("Profit Factor: {:.2}", m.profit_factor),
                "info",
            ),
            (
                "Best month".to_string(),
                if m.best_month.month.as_str().is_empty() {
                    "-".to_string()
                } else {
                    m.best_month.month.to_string()
                },
                self.money(m.best_month.pnl),
                "profit",
            ),
            (
                "Max drawdown".to_string(),
                self.money(m.drawdown.max_drawdown),
                format!("{} to {}", m.drawdown.peak_month, m.drawdown.trough_month),
                "warning",
            ),
        ]);

        let body: String = cards
            .iter()
            .map(|(title, value, subtitle, kind)| {
                format!(
                    r#"<div class="card {kind}"><h3>{}</h3><div class="value">{}</div><div class="subtitle">{}</div></div>"#,
                    escape(title),
                    escape(value),
                    escape(subtitle)
                )
            })
            .collect();
        format!(r#"<div class="summary-cards">{body}</div>"#)
    }

    fn executive_summary(&self) -> String {
        let m = self.metrics();
        let fmt = self.formatter();
        let imp = &m.improvement;
        let md = self.metadata;

        let mut paragraphs = vec![format!(
            "This dashboard covers {} active months of FY {} on {}. {} closed at {}, \
             and the next period was measured against it.",
            m.months_traded,
            escape(&md.financial_year),
            escape(&md.platform),
            escape(&imp.from),
            escape(&fmt.signed_money(imp.from_pnl))
        )];
        let mut result = format!(
            "<strong>Result in {}:</strong> {} for a <strong>{:+.1}% change</strong>",
            escape(&imp.to),
            escape(&fmt.signed_money(imp.to_pnl)),
            imp.percent
        );
        if let Some(style) = fmt.focus_style(m) {
            result.push_str(&format!(
                ", with {} months at a <strong>{} win rate</strong>",
                escape(&style.name.to_lowercase()),
                percent(style.win_rate)
            ));
        }
        result.push('.');
        paragraphs.push(result);

        let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        Self::section(
            "Executive Summary",
            &format!(
                r#"<div class="highlight-box"><h3>{} - {}</h3>{body}</div>"#,
                escape(&md.title),
                escape(&md.platform)
            ),
        )
    }

    fn performance_charts(&self) -> String {
        let body = [
            self.chart(charts::MONTHLY_PNL, "Monthly P&L for every account on record"),
            self.chart(charts::CUMULATIVE_PNL, "Running total of the primary account"),
            self.chart(charts::SEGMENT_DISTRIBUTION, "Share of absolute P&L by account"),
        ]
        .concat();
        Self::section("Performance Evolution", &body)
    }

    fn screenshots(&self) -> String {
        if self.settings.screenshots.is_empty() {
            return String::new();
        }
        let body: String = self
            .settings
            .screenshots
            .iter()
            .map(|shot| {
                format!(
                    r#"<div class="chart-container"><h3>{title}</h3><img src="{src}" alt="{title}"><p>{caption}</p></div>"#,
                    title = escape(&shot.title),
                    src = escape(&shot.path),
                    caption = escape(&shot.caption)
                )
            })
            .collect();
        Self::section("Platform Statements", &body)
    }

    fn quarterly_analysis(&self) -> String {
        let m = self.metrics();
        let boxes: String = m
            .quarters
            .iter()
            .map(|q| {
                let outcome = if q.total_pnl >= Decimal::ZERO { "profit" } else { "loss" };
                let items = [
                    format!("Result: {} {outcome}", self.money(q.total_pnl)),
                    format!("Months: {}", q.months),
                ];
                format!(
                    r#"<div class="insight-box"><h3>{}</h3>{}</div>"#,
                    escape(&q.name),
                    Self::list(&items)
                )
            })
            .collect();

        let imp = &m.improvement;
        let turning_point = format!(
            r#"<div class="highlight-box"><h3>The Turning Point</h3><p>From {} to {} the result moved from {} to {}, a <strong>{:+.1}%</strong> change.</p></div>"#,
            escape(&imp.from),
            escape(&imp.to),
            escape(&self.formatter().signed_money(imp.from_pnl)),
            escape(&self.formatter().signed_money(imp.to_pnl)),
            imp.percent
        );

        let body = format!(
            r#"{}<div class="insights-grid">{boxes}</div>{turning_point}"#,
            self.chart(charts::QUARTERLY_COMPARISON, "")
        );
        Self::section("Quarterly Analysis", &body)
    }

    fn style_analysis(&self) -> String {
        let m = self.metrics();
        if m.styles.is_empty() {
            return String::new();
        }
        let palette = &self.settings.palette;
        let boxes: String = m
            .styles
            .iter()
            .map(|s| {
                let items = [
                    format!("Total P&L: {}", self.formatter().signed_money(s.total_pnl)),
                    format!("Win Rate: {}", percent(s.win_rate)),
                    format!("Profitable months: {} of {}", s.profitable_months, s.months),
                    format!("Average per month: {}", self.formatter().signed_money(s.avg_pnl)),
                ];
                format!(
                    r#"<div class="insight-box" style="border: 2px solid {color};"><h3>{}</h3>{}</div>"#,
                    escape(&s.name),
                    Self::list(&items),
                    color = palette.style_color(&s.name)
                )
            })
            .collect();
        let body = format!(
            r#"{}<div class="insights-grid">{boxes}</div>"#,
            self.chart(charts::STYLE_COMPARISON, "")
        );
        Self::section("Trading Style Analysis", &body)
    }

    fn platform_comparison(&self) -> String {
        let portfolio = self.portfolio;
        if portfolio.platforms.is_empty() {
            return String::new();
        }
        let fmt = self.formatter();

        let platforms: String = portfolio
            .platforms
            .iter()
            .map(|p| {
                format!(
                    r#"<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td><td>{} of {}</td></tr>"#,
                    escape(&p.platform),
                    escape(&p.accounts.join(", ")),
                    escape(&fmt.signed_money(p.total_pnl)),
                    escape(&fmt.signed_money(p.avg_per_month)),
                    p.profitable_months,
                    p.months_traded
                )
            })
            .collect();

        let overall = &portfolio.overall;
        let returns: String = portfolio
            .segment_roi
            .iter()
            .map(|r| (r.account.as_str(), r.allocated_capital, r.total_pnl, r.roi_percentage))
            .chain([("Combined", overall.estimated_capital, overall.total_pnl, overall.roi_percentage)])
            .map(|(name, capital, pnl, roi)| {
                format!(
                    r#"<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    escape(name),
                    escape(&fmt.money(capital)),
                    escape(&fmt.signed_money(pnl)),
                    percent(roi)
                )
            })
            .collect();

        let body = format!(
            r#"<table class="metric-table"><thead><tr><th>Platform</th><th>Accounts</th><th>Net P&amp;L</th><th>Per traded month</th><th>Profitable months</th></tr></thead><tbody>{platforms}</tbody></table><table class="metric-table"><thead><tr><th>Account</th><th>Capital</th><th>Net P&amp;L</th><th>Return</th></tr></thead><tbody>{returns}</tbody></table>"#
        );
        Self::section("Platform Comparison", &body)
    }

    fn risk_management(&self) -> String {
        let m = self.metrics();
        let symbol = &self.settings.currency_symbol;
        let drawdown = [
            format!("Maximum Drawdown: {}", self.money(m.drawdown.max_drawdown)),
            format!(
                "Drawdown Period: {} to {}",
                m.drawdown.peak_month, m.drawdown.trough_month
            ),
            format!("Recovery since trough: {}", self.formatter().signed_money(m.drawdown.recovery)),
        ];
        let dispersion = [
            format!("Monthly Volatility: {}", currency_f64(m.volatility, symbol)),
            format!("Sharpe Ratio: {:.3}", m.sharpe_ratio),
            format!("Risk-Adjusted Return: {:.2}", m.risk_adjusted_return),
            format!("Consistency Score: {}", percent(m.consistency_score)),
        ];
        let body = format!(
            r#"{}<div class="insights-grid"><div class="insight-box"><h3>Drawdown Management</h3>{}</div><div class="insight-box"><h3>Volatility</h3>{}</div></div>"#,
            self.chart(charts::DRAWDOWN_RECOVERY, ""),
            Self::list(&drawdown),
            Self::list(&dispersion)
        );
        Self::section("Risk Management", &body)
    }

    fn metrics_table(&self) -> String {
        let m = self.metrics();
        let symbol = &self.settings.currency_symbol;
        let fmt = self.formatter();
        let imp = &m.improvement;

        let mut rows = vec![
            ("Net P&L".to_string(), fmt.signed_money(m.total_pnl), "Overall result".to_string()),
            (
                "Win Rate".to_string(),
                percent(m.win_rate),
                format!("{} profitable out of {} traded months", m.profitable_months, m.months_traded),
            ),
            (
                "Profit Factor".to_string(),
                format!("{:.2}", m.profit_factor),
                "Gross profit / gross loss".to_string(),
            ),
            (
                "Average Profit / Loss".to_string(),
                format!("{} / {}", self.money(m.avg_profit), self.money(m.avg_loss)),
                "Mean of winning and losing months".to_string(),
            ),
            (
                format!("{} to {} Improvement", imp.from, imp.to),
                format!("{:+.1}%", imp.percent),
                "Change measured against the base quarter".to_string(),
            ),
            (
                "Best Month".to_string(),
                format!("{}: {}", m.best_month.month, self.money(m.best_month.pnl)),
                "Highest single month profit".to_string(),
            ),
            (
                "Worst Month".to_string(),
                format!("{}: {}", m.worst_month.month, self.money(m.worst_month.pnl)),
                "Largest single month loss".to_string(),
            ),
            (
                "Monthly Volatility".to_string(),
                currency_f64(m.volatility, symbol),
                "Standard deviation of traded months".to_string(),
            ),
            (
                "Max Consecutive Profits".to_string(),
                format!("{} months", m.max_consecutive_profits),
                "Longest winning streak".to_string(),
            ),
            (
                "Sharpe Ratio".to_string(),
                format!("{:.3}", m.sharpe_ratio),
                "Mean monthly return over volatility".to_string(),
            ),
            (
                "Estimated ROI".to_string(),
                percent(m.roi.roi_percentage),
                format!("Against {} of capital", self.money(m.roi.estimated_capital)),
            ),
        ];
        if let Some(style) = fmt.focus_style(m) {
            rows.insert(
                3,
                (
                    format!("{} Win Rate", style.name),
                    percent(style.win_rate),
                    format!("{} of {} months profitable", style.profitable_months, style.months),
                ),
            );
        }

        let body: String = rows
            .iter()
            .map(|(metric, value, note)| {
                format!(
                    r#"<tr><td><strong>{}</strong></td><td>{}</td><td class="note">{}</td></tr>"#,
                    escape(metric),
                    escape(value),
                    escape(note)
                )
            })
            .collect();
        Self::section(
            "Detailed Performance Metrics",
            &format!(
                r#"<table class="metric-table"><thead><tr><th>Metric</th><th>Value</th><th>Interpretation</th></tr></thead><tbody>{body}</tbody></table>"#
            ),
        )
    }

    fn key_learnings(&self, insights: &Insights) -> String {
        let palette = &self.settings.palette;
        let body = format!(
            r#"<div class="insights-grid"><div class="insight-box" style="border: 2px solid {profit};"><h3>What Worked</h3>{}</div><div class="insight-box" style="border: 2px solid {loss};"><h3>What Didn't Work</h3>{}</div></div><div class="highlight-box"><h3>Risk Management &amp; Discipline</h3>{}</div>"#,
            Self::list(&insights.what_worked),
            Self::list(&insights.what_didnt_work),
            Self::list(&insights.risk_management),
            profit = palette.profit,
            loss = palette.loss
        );
        Self::section("Key Learnings & Takeaways", &body)
    }

    /// Headline figures from the key-metrics table as short cards.
    fn talking_points(&self, insights: &Insights) -> String {
        let palette = &self.settings.palette;
        let points: String = insights
            .key_metrics
            .iter()
            .enumerate()
            .map(|(idx, (label, value))| {
                let color = palette.series_color(idx);
                format!(
                    r#"<div class="point" style="border-color: {color};"><h4 style="color: {color};">{}</h4><p>{}</p></div>"#,
                    escape(label),
                    escape(value)
                )
            })
            .collect();

        let heading = if self.metadata.company.is_empty() {
            "Talking Points".to_string()
        } else {
            format!("Talking Points for {}", self.metadata.company)
        };
        Self::section(&heading, &format!(r#"<div class="points">{points}</div>"#))
    }

    fn additional_charts(&self) -> String {
        let body = [
            self.chart(charts::CONSISTENCY_HEATMAP, "Monthly results with their trading style"),
            self.chart(charts::WIN_LOSS_DISTRIBUTION, "Profitable, losing and idle months"),
        ]
        .concat();
        Self::section("Additional Analysis", &body)
    }

    fn footer(&self) -> String {
        let m = self.metrics();
        let fmt = self.formatter();
        format!(
            r#"<div class="footer"><p>Generated on: {}</p><p>{} | FY {} | {}</p><p>Net P&amp;L: {} | Win Rate: {} | Improvement: {:+.1}%</p></div>"#,
            escape(&self.generated_at),
            escape(&self.metadata.title),
            escape(&self.metadata.financial_year),
            escape(&self.metadata.platform),
            escape(&fmt.signed_money(m.total_pnl)),
            percent(m.win_rate),
            m.improvement.percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartRenderer;
    use crate::test_support::{
        reference_accounts, reference_analysis, reference_metadata, reference_portfolio,
    };
    use crate::types::Screenshot;

    fn render_with(settings: &ReportSettings) -> String {
        render_for(settings, &reference_metadata())
    }

    fn render_for(settings: &ReportSettings, metadata: &ReportMetadata) -> String {
        let accounts = reference_accounts();
        let portfolio = reference_portfolio(&accounts);
        let analysis = &accounts[0];
        let charts = ChartRenderer::new(&settings.palette, &settings.currency_symbol)
            .render_all(analysis, &accounts);
        ReportBuilder {
            metadata,
            settings,
            analysis,
            portfolio: &portfolio,
            charts: &charts,
            charts_dir: "charts",
            focus_style: "Systematic",
            generated_at: "16 October 2026 09:30".into(),
        }
        .render()
    }

    #[test]
    fn every_placeholder_is_filled() {
        let html = render_with(&ReportSettings::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("{{"), "unfilled placeholder left in report");
    }

    #[test]
    fn report_links_every_chart() {
        let html = render_with(&ReportSettings::default());
        for name in [
            charts::MONTHLY_PNL,
            charts::CUMULATIVE_PNL,
            charts::QUARTERLY_COMPARISON,
            charts::SEGMENT_DISTRIBUTION,
            charts::STYLE_COMPARISON,
            charts::CONSISTENCY_HEATMAP,
            charts::WIN_LOSS_DISTRIBUTION,
            charts::DRAWDOWN_RECOVERY,
        ] {
            assert!(html.contains(&format!("src=\"charts/{name}.svg\"")), "missing {name}");
        }
    }

    #[test]
    fn report_quotes_metrics() {
        let html = render_with(&ReportSettings::default());
        assert!(html.contains("₹14,821.00"));
        assert!(html.contains("+369.0%"));
        assert!(html.contains("Apr to Jun"));
        assert!(html.contains("Generated on: 16 October 2026 09:30"));
        assert!(html.contains("Talking Points for Axxela"));
    }

    #[test]
    fn screenshots_section_is_optional() {
        let html = render_with(&ReportSettings::default());
        assert!(!html.contains("Platform Statements"));

        let settings = ReportSettings {
            screenshots: vec![Screenshot {
                path: "../statement.png".into(),
                title: "Monthly view".into(),
                caption: "Broker statement".into(),
            }],
            ..ReportSettings::default()
        };
        let html = render_with(&settings);
        assert!(html.contains("Platform Statements"));
        assert!(html.contains(r#"src="../statement.png""#));
    }

    #[test]
    fn missing_chart_is_left_out() {
        let settings = ReportSettings::default();
        let analysis = reference_analysis();
        let metadata = reference_metadata();
        let portfolio = Portfolio::default();
        let html = ReportBuilder {
            metadata: &metadata,
            settings: &settings,
            analysis: &analysis,
            portfolio: &portfolio,
            charts: &[],
            charts_dir: "charts",
            focus_style: "Systematic",
            generated_at: String::new(),
        }
        .render();
        assert!(!html.contains("<img"));
    }

    #[test]
    fn platform_section_lists_platforms_and_returns() {
        let html = render_with(&ReportSettings::default());
        assert!(html.contains("Platform Comparison"));
        assert!(html.contains("Kotak Derivative, Kotak Commodity"));
        assert!(html.contains("-₹1,806.00"));
        assert!(html.contains("-₹31,903.79"));
        assert!(html.contains("<td><strong>Combined</strong></td><td>₹100,000.00</td>"));
    }

    #[test]
    fn values_containing_markers_are_not_expanded() {
        let metadata = ReportMetadata {
            title: "{{summary_cards}}".into(),
            ..reference_metadata()
        };
        let html = render_for(&ReportSettings::default(), &metadata);
        assert!(html.contains("<h1>{{summary_cards}}</h1>"));
        assert_eq!(html.matches(r#"<div class="summary-cards">"#).count(), 1);
    }

    #[test]
    fn fill_template_is_single_pass() {
        let values = [("a", "{{b}}".to_string()), ("b", "B".to_string())];
        assert_eq!(fill_template("{{a}}-{{b}}-{{c}}", &values), "{{b}}-B-{{c}}");
        assert_eq!(fill_template("open {{a", &values), "open {{a");
    }
}
