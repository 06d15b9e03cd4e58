// In crates/core-types/src/types.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A month label from the reporting calendar (e.g. "Apr").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Month(pub String);

impl Month {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Month {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A named group of months. Used for both the quarter and the trading-style partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub months: Vec<Month>,
    /// Free-text description shown in the report, if any.
    #[serde(default)]
    pub description: Option<String>,
}

impl Bucket {
    pub fn new(name: impl Into<String>, months: &[&str]) -> Self {
        Self {
            name: name.into(),
            months: months.iter().map(|m| Month::from(*m)).collect(),
            description: None,
        }
    }

    pub fn contains(&self, month: &Month) -> bool {
        self.months.contains(month)
    }
}

/// The calendar and partitions every metric is computed against.
///
/// Buckets are kept in configured order; classification is first-match-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// The canonical month order. Cumulative P&L follows this order.
    pub months: Vec<Month>,
    pub quarters: Vec<Bucket>,
    #[serde(default)]
    pub styles: Vec<Bucket>,
}

/// Raw monthly P&L for one account/segment (e.g. "Kotak Derivative").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPnl {
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub segment: String,
    /// Fraction of the estimated capital deployed in this account, e.g. `0.4`.
    #[serde(default)]
    pub capital_share: Option<Decimal>,
    pub pnl: HashMap<Month, Decimal>,
}

impl AccountPnl {
    pub fn new(name: impl Into<String>, pnl: &[(&str, Decimal)]) -> Self {
        Self {
            name: name.into(),
            platform: String::new(),
            segment: String::new(),
            capital_share: None,
            pnl: pnl.iter().map(|(m, v)| (Month::from(*m), *v)).collect(),
        }
    }

    /// P&L for a month; a month with no entry was not traded and counts as zero.
    pub fn pnl_for(&self, month: &Month) -> Decimal {
        self.pnl.get(month).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_month_counts_as_zero() {
        let account = AccountPnl::new("Test", &[("Apr", dec!(-5536))]);
        assert_eq!(account.pnl_for(&Month::from("Apr")), dec!(-5536));
        assert_eq!(account.pnl_for(&Month::from("May")), Decimal::ZERO);
    }

    #[test]
    fn bucket_membership() {
        let q1 = Bucket::new("Q1", &["Apr", "May", "Jun"]);
        assert!(q1.contains(&Month::from("May")));
        assert!(!q1.contains(&Month::from("Jul")));
    }

    #[test]
    fn account_deserializes_from_toml_table() {
        let raw = r#"
            name = "Groww Derivative"
            platform = "Groww"
            capital_share = 0.3
            [pnl]
            Jun = -133.67
            Oct = -24857.53
        "#;
        let account: AccountPnl = toml::from_str(raw).unwrap();
        assert_eq!(account.platform, "Groww");
        assert_eq!(account.segment, "");
        assert_eq!(account.capital_share, Some(dec!(0.3)));
        assert_eq!(account.pnl_for(&Month::from("Jun")), dec!(-133.67));
        assert_eq!(account.pnl_for(&Month::from("Apr")), Decimal::ZERO);
    }
}
