// In crates/dashboard/src/lib.rs

use std::path::{Path, PathBuf};

use analytics::types::{AccountAnalysis, AccountSummary, MetricsSnapshot, MonthlyRecord, Portfolio};
use serde::Serialize;

pub mod charts;
pub mod error;
pub mod format;
pub mod html;
pub mod insights;
pub mod types;
pub mod writer;

pub use error::{Error, Result};
pub use types::{ChartArtifact, OutputSettings, ReportMetadata, ReportSettings};
pub use writer::{ArtifactSink, FsSink};

/// Inputs for one report run. The primary account drives the narrative;
/// every account appears in the comparison charts.
pub struct Dashboard<'a> {
    pub metadata: &'a ReportMetadata,
    pub report: &'a ReportSettings,
    pub output: &'a OutputSettings,
    pub focus_style: &'a str,
    pub primary: &'a AccountAnalysis,
    pub accounts: &'a [AccountAnalysis],
    pub portfolio: &'a Portfolio,
}

/// Rendered artifacts, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct RenderedDashboard {
    pub charts: Vec<ChartArtifact>,
    pub report_html: String,
    pub metrics_json: String,
}

#[derive(Serialize)]
struct MetricsExport<'a> {
    metrics: &'a MetricsSnapshot,
    records: &'a [MonthlyRecord],
    accounts: Vec<&'a AccountSummary>,
    portfolio: &'a Portfolio,
}

impl Dashboard<'_> {
    pub fn render(&self) -> Result<RenderedDashboard> {
        let charts = charts::ChartRenderer::new(&self.report.palette, &self.report.currency_symbol)
            .render_all(self.primary, self.accounts);

        let report_html = html::ReportBuilder {
            metadata: self.metadata,
            settings: self.report,
            analysis: self.primary,
            portfolio: self.portfolio,
            charts: &charts,
            charts_dir: &self.output.charts_dir,
            focus_style: self.focus_style,
            generated_at: chrono::Local::now().format("%d %B %Y %H:%M").to_string(),
        }
        .render();

        let metrics_json = serde_json::to_string_pretty(&MetricsExport {
            metrics: &self.primary.metrics,
            records: &self.primary.records,
            accounts: self.accounts.iter().map(|a| &a.summary).collect(),
            portfolio: self.portfolio,
        })?;

        Ok(RenderedDashboard {
            charts,
            report_html,
            metrics_json,
        })
    }

    /// Renders and writes every artifact: charts first, then the metrics file, then the report.
    ///
    /// Stops at the first failed write. Returns the paths written, relative to the sink.
    pub fn publish(&self, sink: &mut impl ArtifactSink) -> Result<Vec<PathBuf>> {
        let rendered = self.render()?;
        let mut written = Vec::with_capacity(rendered.charts.len() + 2);

        let charts_dir = Path::new(&self.output.charts_dir);
        for chart in &rendered.charts {
            let path = charts_dir.join(chart.file_name());
            sink.write(&path, chart.svg.as_bytes())?;
            written.push(path);
        }

        let metrics_path = PathBuf::from(&self.output.metrics_file);
        sink.write(&metrics_path, rendered.metrics_json.as_bytes())?;
        written.push(metrics_path);

        let report_path = PathBuf::from(&self.output.report_file);
        sink.write(&report_path, rendered.report_html.as_bytes())?;
        written.push(report_path);

        tracing::info!(artifacts = written.len(), "Dashboard published.");
        Ok(written)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use analytics::{AccountAnalysis, AnalysisSettings, AnalyticsEngine, Portfolio};
    use core_types::{AccountPnl, Bucket, CategoryConfig, Month};
    use rust_decimal_macros::dec;

    use crate::types::ReportMetadata;

    fn engine() -> AnalyticsEngine {
        let categories = CategoryConfig {
            months: ["Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct"]
                .into_iter()
                .map(Month::from)
                .collect(),
            quarters: vec![
                Bucket::new("Q1", &["Apr", "May", "Jun"]),
                Bucket::new("Q2", &["Jul", "Aug", "Sep"]),
                Bucket::new("Q3", &["Oct"]),
            ],
            styles: vec![
                Bucket::new("Systematic", &["Jul", "Aug", "Sep"]),
                Bucket::new("Emotional", &["Jul", "Oct"]),
                Bucket::new("Learning", &["Apr", "Jun"]),
            ],
        };
        AnalyticsEngine::new(categories, AnalysisSettings::default())
    }

    fn on_platform(mut account: AccountPnl, platform: &str) -> AccountPnl {
        account.platform = platform.into();
        account
    }

    /// Kotak derivative history, the account the report is about.
    pub fn reference_analysis() -> AccountAnalysis {
        engine().analyze(&on_platform(
            AccountPnl::new(
                "Kotak Derivative",
                &[
                    ("Apr", dec!(-5536)),
                    ("May", dec!(0)),
                    ("Jun", dec!(-5303)),
                    ("Jul", dec!(9834)),
                    ("Aug", dec!(13258)),
                    ("Sep", dec!(6060)),
                    ("Oct", dec!(-3492)),
                ],
            ),
            "Kotak Neo",
        ))
    }

    pub fn reference_accounts() -> Vec<AccountAnalysis> {
        let engine = engine();
        vec![
            reference_analysis(),
            engine.analyze(&on_platform(
                AccountPnl::new(
                    "Kotak Commodity",
                    &[("Apr", dec!(-2386)), ("Jun", dec!(-2308)), ("Aug", dec!(-11933))],
                ),
                "Kotak Neo",
            )),
            engine.analyze(&on_platform(
                AccountPnl::new(
                    "Groww Derivative",
                    &[("Jun", dec!(-133.67)), ("Jul", dec!(-6912.59)), ("Oct", dec!(-24857.53))],
                ),
                "Groww",
            )),
        ]
    }

    pub fn reference_portfolio(accounts: &[AccountAnalysis]) -> Portfolio {
        engine().portfolio(accounts)
    }

    pub fn reference_metadata() -> ReportMetadata {
        ReportMetadata {
            title: "Derivatives Trading Performance Dashboard".into(),
            financial_year: "2024-25".into(),
            platform: "Kotak Neo Derivatives".into(),
            company: "Axxela".into(),
            role: "Trainee Analyst".into(),
            prepared_for: "20th November 2025".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{reference_accounts, reference_metadata, reference_portfolio};
    use crate::writer::memory::MemorySink;

    fn publish_into(sink: &mut MemorySink) -> Result<Vec<PathBuf>> {
        let accounts = reference_accounts();
        let portfolio = reference_portfolio(&accounts);
        let metadata = reference_metadata();
        let report = ReportSettings::default();
        let output = OutputSettings::default();
        Dashboard {
            metadata: &metadata,
            report: &report,
            output: &output,
            focus_style: "Systematic",
            primary: &accounts[0],
            accounts: &accounts,
            portfolio: &portfolio,
        }
        .publish(sink)
    }

    #[test]
    fn publish_writes_charts_then_metrics_then_report() {
        let mut sink = MemorySink::default();
        let written = publish_into(&mut sink).unwrap();

        assert_eq!(written.len(), 10);
        assert!(written[..8].iter().all(|p| p.starts_with("charts")));
        assert_eq!(written[8], PathBuf::from("metrics.json"));
        assert_eq!(written[9], PathBuf::from("Derivatives_Trading_Report.html"));
        assert_eq!(sink.written.len(), 10);
    }

    #[test]
    fn metrics_file_is_valid_json() {
        let mut sink = MemorySink::default();
        publish_into(&mut sink).unwrap();
        let (_, bytes) = &sink.written[8];
        let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(value["metrics"]["account"], "Kotak Derivative");
        assert_eq!(value["records"].as_array().map(Vec::len), Some(7));
        assert_eq!(value["accounts"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["portfolio"]["platforms"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["portfolio"]["platforms"][0]["platform"], "Kotak Neo");
        assert_eq!(value["portfolio"]["segment_roi"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn failed_write_stops_before_the_report() {
        let mut sink = MemorySink {
            fail_on: Some(PathBuf::from("metrics.json")),
            ..MemorySink::default()
        };
        let err = publish_into(&mut sink).unwrap_err();
        assert!(matches!(err, Error::WriteError { .. }));
        assert_eq!(sink.written.len(), 8);
    }
}
