// In crates/app-config/src/types.rs

use serde::Deserialize;

use analytics::types::AnalysisSettings;
use core_types::{AccountPnl, Bucket, CategoryConfig, Month};
use dashboard::types::{OutputSettings, ReportMetadata, ReportSettings};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where charts and the report are written.
    pub output: OutputSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development").
    pub environment: String,
    /// The trading data file, relative to the config directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_data_file() -> String {
    "trading_data.toml".into()
}

// --- Structs for trading_data.toml ---

/// The static P&L table and its calendar, as written in `trading_data.toml`.
#[derive(Deserialize, Debug, Clone)]
pub struct TradingData {
    /// Canonical month order.
    pub months: Vec<Month>,
    pub metadata: ReportMetadata,
    pub quarters: Vec<Bucket>,
    #[serde(default)]
    pub styles: Vec<Bucket>,
    pub accounts: Vec<AccountPnl>,
}

impl TradingData {
    /// The calendar and partitions handed to the metrics engine.
    pub fn categories(&self) -> CategoryConfig {
        CategoryConfig {
            months: self.months.clone(),
            quarters: self.quarters.clone(),
            styles: self.styles.clone(),
        }
    }

    pub fn account(&self, name: &str) -> Option<&AccountPnl> {
        self.accounts.iter().find(|a| a.name == name)
    }
}
