// In crates/dashboard/src/format.rs

use itertools::Itertools;
use rust_decimal::Decimal;

/// Absolute amount with a currency symbol and thousands separators, e.g. `₹10,839.00`.
///
/// The sign is dropped; callers say "loss" or "profit" around it.
pub fn currency(value: Decimal, symbol: &str) -> String {
    format!("{symbol}{}", group_thousands(&format!("{:.2}", value.abs().round_dp(2))))
}

/// Like [`currency`], keeping a leading minus for negative amounts.
pub fn signed_currency(value: Decimal, symbol: &str) -> String {
    let sign = if value < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{}", currency(value, symbol))
}

/// Currency formatting for derived `f64` figures such as volatility.
pub fn currency_f64(value: f64, symbol: &str) -> String {
    format!("{symbol}{}", group_thousands(&format!("{:.2}", value.abs())))
}

/// Whole-unit amount for chart labels, e.g. `₹-10,839`.
pub fn compact_currency(value: f64, symbol: &str) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{symbol}{sign}{}", group_thousands(&format!("{:.0}", value.abs())))
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Escapes text for HTML and SVG bodies and attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn group_thousands(raw: &str) -> String {
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw, None),
    };
    let digits: Vec<char> = int_part.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(",");
    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}
