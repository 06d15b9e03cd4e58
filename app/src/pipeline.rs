// In app/src/pipeline.rs

use std::path::{Path, PathBuf};

use analytics::{AccountAnalysis, AnalyticsEngine, Portfolio};
use anyhow::{Context, Result};
use app_config::{Settings, TradingData};
use dashboard::{Dashboard, FsSink};

/// Configuration and data for one report run, loaded up front.
pub struct Pipeline {
    settings: Settings,
    data: TradingData,
    engine: AnalyticsEngine,
}

/// Every account analyzed, with the primary account singled out.
pub struct Analysis {
    pub accounts: Vec<AccountAnalysis>,
    pub portfolio: Portfolio,
    primary_index: usize,
}

impl Analysis {
    pub fn primary(&self) -> &AccountAnalysis {
        &self.accounts[self.primary_index]
    }
}

impl Pipeline {
    pub fn load(config_dir: &Path) -> Result<Self> {
        let settings = app_config::load_settings_from(config_dir)
            .with_context(|| format!("Failed to load settings from {}", config_dir.display()))?;
        tracing::info!(environment = %settings.app.environment, "Application settings loaded successfully.");

        let data = app_config::load_trading_data(config_dir, &settings)
            .context("Failed to load trading data")?;
        let engine = AnalyticsEngine::new(data.categories(), settings.analysis.clone());

        Ok(Self {
            settings,
            data,
            engine,
        })
    }

    pub fn currency_symbol(&self) -> &str {
        &self.settings.report.currency_symbol
    }

    /// Runs the metrics engine over every account.
    pub fn analyze(&self) -> Result<Analysis> {
        let primary_name = &self.engine.settings().primary_account;
        let primary_index = self
            .data
            .accounts
            .iter()
            .position(|a| &a.name == primary_name)
            .ok_or_else(|| anyhow::anyhow!("Primary account '{}' not found.", primary_name))?;

        let accounts: Vec<AccountAnalysis> = self
            .data
            .accounts
            .iter()
            .map(|account| self.engine.analyze(account))
            .collect();

        let primary = &accounts[primary_index].metrics;
        tracing::info!(
            account = %primary.account,
            total_pnl = %primary.total_pnl,
            months_traded = primary.months_traded,
            "Metrics calculated."
        );

        let portfolio = self.engine.portfolio(&accounts);

        Ok(Analysis {
            accounts,
            portfolio,
            primary_index,
        })
    }

    /// Writes charts, metrics and report under the output directory. Returns the report path.
    pub fn publish(&self, analysis: &Analysis) -> Result<PathBuf> {
        let output = &self.settings.output;
        let dashboard = Dashboard {
            metadata: &self.data.metadata,
            report: &self.settings.report,
            output,
            focus_style: &self.settings.analysis.consistency_style,
            primary: analysis.primary(),
            accounts: &analysis.accounts,
            portfolio: &analysis.portfolio,
        };

        let mut sink = FsSink::new(&output.dir);
        let written = dashboard
            .publish(&mut sink)
            .with_context(|| format!("Failed to publish dashboard to {}", output.dir.display()))?;
        tracing::info!(dir = %sink.root().display(), files = written.len(), "Artifacts saved.");

        Ok(output.dir.join(&output.report_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn shipped_config() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../config")
    }

    #[test]
    fn shipped_config_analyzes_primary_account() {
        let pipeline = Pipeline::load(&shipped_config()).unwrap();
        let analysis = pipeline.analyze().unwrap();

        assert_eq!(analysis.accounts.len(), 3);
        let primary = &analysis.primary().metrics;
        assert_eq!(primary.account, "Kotak Derivative");
        assert_eq!(primary.total_pnl, dec!(14821));
        assert_eq!(primary.drawdown.max_drawdown, dec!(-5303));
        assert_eq!(pipeline.currency_symbol(), "₹");
    }

    #[test]
    fn shipped_styles_resolve_first_match() {
        let pipeline = Pipeline::load(&shipped_config()).unwrap();
        let analysis = pipeline.analyze().unwrap();
        let records = &analysis.primary().records;

        let style_of = |month: &str| {
            records
                .iter()
                .find(|r| r.month.as_str() == month)
                .map(|r| r.style.as_str())
        };
        assert_eq!(style_of("Jul"), Some("Systematic"));
        assert_eq!(style_of("Oct"), Some("Emotional"));
        assert_eq!(style_of("May"), Some("Normal"));
    }

    #[test]
    fn shipped_accounts_roll_up_by_platform() {
        let pipeline = Pipeline::load(&shipped_config()).unwrap();
        let portfolio = pipeline.analyze().unwrap().portfolio;

        let platforms: Vec<&str> = portfolio.platforms.iter().map(|p| p.platform.as_str()).collect();
        assert_eq!(platforms, ["Kotak Neo", "Groww"]);
        assert_eq!(portfolio.platforms[0].total_pnl, dec!(-1806));
        assert_eq!(portfolio.segment_roi[0].allocated_capital, dec!(40000));
        assert_eq!(portfolio.overall.total_pnl, dec!(-33709.79));
    }

    #[test]
    fn publish_writes_report_under_output_dir() {
        let mut pipeline = Pipeline::load(&shipped_config()).unwrap();
        let out = std::env::temp_dir().join(format!("pnl-dashboard-run-{}", std::process::id()));
        pipeline.settings.output.dir = out.clone();

        let analysis = pipeline.analyze().unwrap();
        let report = pipeline.publish(&analysis).unwrap();

        assert_eq!(report, out.join("Derivatives_Trading_Report.html"));
        assert!(report.exists());
        assert!(out.join("charts/monthly_pnl.svg").exists());
        assert!(out.join("metrics.json").exists());
        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn unwritable_output_dir_is_an_error() {
        let mut pipeline = Pipeline::load(&shipped_config()).unwrap();
        let blocker = std::env::temp_dir().join(format!("pnl-dashboard-file-{}", std::process::id()));
        std::fs::write(&blocker, b"occupied").unwrap();
        pipeline.settings.output.dir = blocker.clone();

        let analysis = pipeline.analyze().unwrap();
        assert!(pipeline.publish(&analysis).is_err());
        std::fs::remove_file(&blocker).unwrap();
    }
}
