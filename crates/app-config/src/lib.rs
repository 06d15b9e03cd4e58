// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{Settings, TradingData};

/// Directory searched when no `--config-dir` is given.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings_from(config_dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let base = config_dir.join("base");
    let overlay = config_dir.join(&environment);

    let settings = Config::builder()
        .add_source(File::with_name(&base.to_string_lossy()))
        .add_source(File::with_name(&overlay.to_string_lossy()).required(false))
        // Settings from environment variables (e.g., `APP_OUTPUT__DIR=...`).
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    tracing::debug!(%environment, ?config_dir, "Settings loaded.");

    Ok(settings)
}

/// Loads and validates the trading data file named in the settings.
pub fn load_trading_data(config_dir: &Path, settings: &Settings) -> Result<TradingData> {
    let path = config_dir.join(&settings.app.data_file);
    let content = std::fs::read_to_string(&path)?;
    let data = parse_trading_data(&content, &settings.analysis.primary_account)?;
    tracing::info!(
        path = %path.display(),
        months = data.months.len(),
        accounts = data.accounts.len(),
        "Trading data loaded."
    );
    Ok(data)
}

/// Parses trading data from TOML and checks it against the rules the engine relies on.
pub fn parse_trading_data(content: &str, primary_account: &str) -> Result<TradingData> {
    let data: TradingData = toml::from_str(content)?;
    validate(&data, primary_account)?;
    Ok(data)
}

fn validate(data: &TradingData, primary_account: &str) -> Result<()> {
    if data.months.is_empty() {
        return Err(invalid("the month list is empty".into()));
    }

    let mut seen = HashSet::new();
    for month in &data.months {
        if !seen.insert(month) {
            return Err(invalid(format!("month '{month}' is listed twice")));
        }
        let owners = data.quarters.iter().filter(|q| q.contains(month)).count();
        if owners != 1 {
            return Err(invalid(format!(
                "month '{month}' belongs to {owners} quarters, expected exactly one"
            )));
        }
    }

    for bucket in data.quarters.iter().chain(&data.styles) {
        if let Some(month) = bucket.months.iter().find(|m| !seen.contains(m)) {
            return Err(invalid(format!(
                "bucket '{}' names unknown month '{month}'",
                bucket.name
            )));
        }
    }

    for account in &data.accounts {
        if let Some(month) = account.pnl.keys().find(|m| !seen.contains(m)) {
            return Err(invalid(format!(
                "account '{}' has P&L for unknown month '{month}'",
                account.name
            )));
        }
    }

    for account in &data.accounts {
        if let Some(share) = account.capital_share {
            if share <= Decimal::ZERO || share > Decimal::ONE {
                return Err(invalid(format!(
                    "account '{}' has capital share {share}, expected a fraction in (0, 1]",
                    account.name
                )));
            }
        }
    }

    if data.account(primary_account).is_none() {
        return Err(invalid(format!(
            "primary account '{primary_account}' is not in the accounts list"
        )));
    }

    Ok(())
}

fn invalid(reason: String) -> Error {
    Error::InvalidDataset(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Month;
    use rust_decimal_macros::dec;

    const SHIPPED: &str = include_str!("../../../config/trading_data.toml");

    const MINIMAL: &str = r#"
        months = ["Apr", "May"]

        [metadata]
        title = "Test"

        [[quarters]]
        name = "Q1"
        months = ["Apr", "May"]

        [[accounts]]
        name = "Main"
        [accounts.pnl]
        Apr = 100
    "#;

    #[test]
    fn shipped_data_is_valid() {
        let data = parse_trading_data(SHIPPED, "Kotak Derivative").unwrap();
        assert_eq!(data.months.len(), 7);
        assert_eq!(data.months[0], Month::from("Apr"));
        assert_eq!(data.accounts.len(), 3);
        let categories = data.categories();
        assert_eq!(categories.quarters.len(), 3);
        let styles: Vec<&str> = categories.styles.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(styles, ["Systematic", "Emotional", "Learning"]);
        let shares: Vec<_> = data.accounts.iter().map(|a| a.capital_share).collect();
        assert_eq!(shares, [Some(dec!(0.4)), Some(dec!(0.3)), Some(dec!(0.3))]);
    }

    #[test]
    fn shipped_settings_load_from_config_dir() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");
        let settings = load_settings_from(&dir).unwrap();
        assert_eq!(settings.app.data_file, "trading_data.toml");
        assert_eq!(settings.analysis.primary_account, "Kotak Derivative");
        assert_eq!(settings.report.currency_symbol, "₹");
    }

    #[test]
    fn capital_share_outside_unit_range_is_rejected() {
        let raw = MINIMAL.replace("name = \"Main\"", "name = \"Main\"\n        capital_share = 1.5");
        let err = parse_trading_data(&raw, "Main").unwrap_err();
        assert!(err.to_string().contains("capital share 1.5"));
    }

    #[test]
    fn minimal_data_parses() {
        let data = parse_trading_data(MINIMAL, "Main").unwrap();
        assert!(data.styles.is_empty());
        assert_eq!(data.metadata.title, "Test");
    }

    #[test]
    fn unknown_primary_account_is_rejected() {
        let err = parse_trading_data(MINIMAL, "Missing").unwrap_err();
        assert!(matches!(err, Error::InvalidDataset(_)));
    }

    #[test]
    fn month_without_quarter_is_rejected() {
        let raw = r#"
            months = ["Apr", "May"]

            [metadata]
            title = "Test"

            [[quarters]]
            name = "Q1"
            months = ["Apr"]

            [[accounts]]
            name = "Main"
            [accounts.pnl]
            Apr = 100
        "#;
        let err = parse_trading_data(raw, "Main").unwrap_err();
        assert!(err.to_string().contains("'May' belongs to 0 quarters"));
    }

    #[test]
    fn pnl_for_unknown_month_is_rejected() {
        let raw = MINIMAL.replace("Apr = 100", "Apr = 100\n        Dec = 5");
        let err = parse_trading_data(&raw, "Main").unwrap_err();
        assert!(err.to_string().contains("unknown month 'Dec'"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_trading_data("months = [", "Main").unwrap_err();
        assert!(matches!(err, Error::TomlError(_)));
    }
}
