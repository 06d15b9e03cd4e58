// In crates/analytics/src/classifier.rs

use core_types::{Bucket, CategoryConfig, Month};

/// Label given to a month that matches no style bucket.
pub const DEFAULT_STYLE: &str = "Normal";

/// Maps months to their quarter and trading-style labels using static lookup tables.
///
/// Lookup is first-match-wins in configured order. Disjointness of the buckets is
/// not enforced here; overlapping configurations silently resolve to the earlier bucket.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    quarters: Vec<Bucket>,
    styles: Vec<Bucket>,
}

impl CategoryClassifier {
    pub fn new(categories: &CategoryConfig) -> Self {
        Self {
            quarters: categories.quarters.clone(),
            styles: categories.styles.clone(),
        }
    }

    pub fn quarter_of(&self, month: &Month) -> Option<&str> {
        first_match(&self.quarters, month)
    }

    pub fn style_of(&self, month: &Month) -> &str {
        first_match(&self.styles, month).unwrap_or(DEFAULT_STYLE)
    }
}

fn first_match<'a>(buckets: &'a [Bucket], month: &Month) -> Option<&'a str> {
    buckets
        .iter()
        .find(|b| b.contains(month))
        .map(|b| b.name.as_str())
}
