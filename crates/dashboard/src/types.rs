// In crates/dashboard/src/types.rs

use serde::Deserialize;
use std::path::PathBuf;

/// Where the rendered artifacts land.
#[derive(Deserialize, Debug, Clone)]
pub struct OutputSettings {
    /// Root directory for every artifact.
    pub dir: PathBuf,
    /// Chart directory, relative to `dir`. The report links charts through this path.
    #[serde(default = "default_charts_dir")]
    pub charts_dir: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    /// Machine-readable copy of the metrics, relative to `dir`.
    #[serde(default = "default_metrics_file")]
    pub metrics_file: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            charts_dir: default_charts_dir(),
            report_file: default_report_file(),
            metrics_file: default_metrics_file(),
        }
    }
}

fn default_charts_dir() -> String { "charts".into() }
fn default_report_file() -> String { "Derivatives_Trading_Report.html".into() }
fn default_metrics_file() -> String { "metrics.json".into() }

/// Descriptive fields shown in the report header and narrative.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ReportMetadata {
    pub title: String,
    pub financial_year: String,
    pub platform: String,
    pub company: String,
    pub role: String,
    /// Free-text date the report is prepared for (e.g. an interview date).
    pub prepared_for: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReportSettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub palette: Palette,
    /// Extra images (e.g. broker statements) embedded as-is.
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            palette: Palette::default(),
            screenshots: Vec::new(),
        }
    }
}

fn default_currency_symbol() -> String { "₹".into() }

/// Chart and report colors, as CSS color strings.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Palette {
    pub profit: String,
    pub loss: String,
    pub systematic: String,
    pub learning: String,
    pub neutral: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub grid: String,
    /// Colors cycled through when several accounts share a chart.
    pub series: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            profit: "#10b981".into(),
            loss: "#ef4444".into(),
            systematic: "#10b981".into(),
            learning: "#f59e0b".into(),
            neutral: "#6b7280".into(),
            accent: "#3b82f6".into(),
            background: "#1f2937".into(),
            text: "#f9fafb".into(),
            grid: "#374151".into(),
            series: vec![
                "#3b82f6".into(),
                "#8b5cf6".into(),
                "#ec4899".into(),
                "#f59e0b".into(),
            ],
        }
    }
}

impl Palette {
    pub fn series_color(&self, idx: usize) -> &str {
        if self.series.is_empty() {
            return &self.accent;
        }
        &self.series[idx % self.series.len()]
    }

    /// Color for a style bucket; unknown styles fall back to the neutral color.
    pub fn style_color(&self, style: &str) -> &str {
        match style.to_ascii_lowercase().as_str() {
            "systematic" => &self.systematic,
            "learning" => &self.learning,
            "emotional" => &self.loss,
            _ => &self.neutral,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Screenshot {
    /// Image path as it should appear in the report's `src` attribute.
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub caption: String,
}

/// One rendered chart, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    /// File stem, also the chart's identifier in the report.
    pub name: &'static str,
    pub title: String,
    pub svg: String,
}

impl ChartArtifact {
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.name)
    }
}
