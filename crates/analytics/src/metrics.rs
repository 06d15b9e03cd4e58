// In crates/analytics/src/metrics.rs
//
// Pure folds over a calendar-ordered P&L series. Every ratio guards its
// denominator and resolves to zero instead of failing.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Non-zero ("traded") values, in calendar order.
pub fn traded(pnls: &[Decimal]) -> Vec<Decimal> {
    pnls.iter().copied().filter(|p| !p.is_zero()).collect()
}

pub fn gross_profit(pnls: &[Decimal]) -> Decimal {
    pnls.iter().copied().filter(|p| p.is_sign_positive() && !p.is_zero()).sum()
}

/// Absolute sum of the losing months.
pub fn gross_loss(pnls: &[Decimal]) -> Decimal {
    pnls.iter()
        .copied()
        .filter(|p| p.is_sign_negative() && !p.is_zero())
        .sum::<Decimal>()
        .abs()
}

/// Profitable months over traded months, as a percentage. Zero months are excluded.
pub fn win_rate(pnls: &[Decimal]) -> f64 {
    let traded = traded(pnls);
    if traded.is_empty() {
        return 0.0;
    }
    let wins = traded.iter().filter(|p| p.is_sign_positive()).count();
    (wins as f64 / traded.len() as f64) * 100.0
}

/// Gross profit over gross loss; zero when there is no losing month.
pub fn profit_factor(pnls: &[Decimal]) -> f64 {
    let gross_loss = gross_loss(pnls);
    if gross_loss.is_zero() {
        return 0.0;
    }
    (gross_profit(pnls) / gross_loss).to_f64().unwrap_or(0.0)
}

/// Mean of the traded months.
pub fn mean_traded(pnls: &[Decimal]) -> f64 {
    let values = as_f64(&traded(pnls));
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of the traded months.
pub fn volatility(pnls: &[Decimal]) -> f64 {
    let values = as_f64(&traded(pnls));
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean traded P&L over volatility, with a zero risk-free rate.
pub fn sharpe_ratio(pnls: &[Decimal]) -> f64 {
    let std_dev = volatility(pnls);
    if std_dev > 0.0 {
        mean_traded(pnls) / std_dev
    } else {
        0.0
    }
}

/// Average of the values matching `keep`, or zero when none match.
pub fn average_where(pnls: &[Decimal], keep: impl Fn(&Decimal) -> bool) -> Decimal {
    let selected: Vec<Decimal> = pnls.iter().copied().filter(|p| keep(p)).collect();
    if selected.is_empty() {
        return Decimal::ZERO;
    }
    selected.iter().copied().sum::<Decimal>() / Decimal::from(selected.len())
}

pub fn cumulative(pnls: &[Decimal]) -> Vec<Decimal> {
    pnls.iter()
        .scan(Decimal::ZERO, |running, p| {
            *running += *p;
            Some(*running)
        })
        .collect()
}

/// Distance below the running peak at every point. The peak starts at the
/// first cumulative value, so a series that never falls has no drawdown.
pub fn drawdown_series(cumulative: &[Decimal]) -> Vec<Decimal> {
    let Some(&first) = cumulative.first() else {
        return Vec::new();
    };
    let mut peak = first;
    cumulative
        .iter()
        .map(|value| {
            peak = peak.max(*value);
            *value - peak
        })
        .collect()
}

/// Location and size of the worst drawdown, by index into the series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawdownPoint {
    pub max_drawdown: Decimal,
    pub peak_index: usize,
    pub trough_index: usize,
    pub recovery: Decimal,
}

pub fn max_drawdown(cumulative: &[Decimal]) -> DrawdownPoint {
    let series = drawdown_series(cumulative);
    let Some(trough_index) = first_extreme(&series, |candidate, best| candidate < best) else {
        return DrawdownPoint::default();
    };

    // The peak is the highest cumulative value reached at or before the trough.
    let peak_index = first_extreme(&cumulative[..=trough_index], |candidate, best| candidate > best)
        .unwrap_or(0);

    let last = cumulative.len() - 1;
    let recovery = if trough_index < last {
        cumulative[last] - cumulative[trough_index]
    } else {
        Decimal::ZERO
    };

    DrawdownPoint {
        max_drawdown: series[trough_index],
        peak_index,
        trough_index,
        recovery,
    }
}

/// Longest run of profitable months, scanning traded months only.
///
/// No-trade months are dropped before the scan, so two profitable months on
/// either side of one are counted as consecutive.
pub fn longest_profitable_streak(pnls: &[Decimal]) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    for pnl in traded(pnls) {
        if pnl.is_sign_positive() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Percentage change from `base` to `target`, relative to `|base|`. Zero when `base` is zero.
pub fn improvement_pct(base: Decimal, target: Decimal) -> f64 {
    if base.is_zero() {
        return 0.0;
    }
    ((target - base) / base.abs()).to_f64().unwrap_or(0.0) * 100.0
}

/// Index of the first element that beats every earlier one under `better`.
pub fn first_extreme(values: &[Decimal], better: impl Fn(Decimal, Decimal) -> bool) -> Option<usize> {
    let mut best: Option<(usize, Decimal)> = None;
    for (idx, value) in values.iter().copied().enumerate() {
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

fn as_f64(values: &[Decimal]) -> Vec<f64> {
    values.iter().map(|v| v.to_f64().unwrap_or(0.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn derivative_fy25() -> Vec<Decimal> {
        vec![
            dec!(-5536),
            dec!(0),
            dec!(-5303),
            dec!(9834),
            dec!(13258),
            dec!(6060),
            dec!(-3492),
        ]
    }

    #[test]
    fn win_rate_ignores_no_trade_months() {
        assert_eq!(win_rate(&derivative_fy25()), 50.0);
        assert_eq!(win_rate(&[dec!(0), dec!(0)]), 0.0);
        assert_eq!(win_rate(&[]), 0.0);
    }

    #[test]
    fn profit_factor_and_gross_totals() {
        let pnls = derivative_fy25();
        assert_eq!(gross_profit(&pnls), dec!(29152));
        assert_eq!(gross_loss(&pnls), dec!(14331));
        assert!((profit_factor(&pnls) - 2.0342).abs() < 1e-3);
    }

    #[test]
    fn profit_factor_without_losses_is_zero() {
        assert_eq!(profit_factor(&[dec!(100), dec!(0), dec!(50)]), 0.0);
    }

    #[test]
    fn volatility_is_population_std_of_traded_months() {
        let pnls = derivative_fy25();
        assert!((volatility(&pnls) - 7567.0178).abs() < 1e-3);
        assert!((mean_traded(&pnls) - 2470.1667).abs() < 1e-3);
        assert!((sharpe_ratio(&pnls) - 0.32644).abs() < 1e-4);
    }

    #[test]
    fn sharpe_is_zero_for_flat_series() {
        assert_eq!(sharpe_ratio(&[dec!(500), dec!(500)]), 0.0);
        assert_eq!(sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn cumulative_matches_hand_computed_sequence() {
        assert_eq!(
            cumulative(&derivative_fy25()),
            vec![
                dec!(-5536),
                dec!(-5536),
                dec!(-10839),
                dec!(-1005),
                dec!(12253),
                dec!(18313),
                dec!(14821),
            ]
        );
    }

    #[test]
    fn max_drawdown_measures_from_first_peak() {
        let point = max_drawdown(&cumulative(&derivative_fy25()));
        assert_eq!(point.max_drawdown, dec!(-5303));
        assert_eq!(point.trough_index, 2);
        assert_eq!(point.peak_index, 0);
        assert_eq!(point.recovery, dec!(25660));
    }

    #[test]
    fn drawdown_at_last_point_has_no_recovery() {
        let point = max_drawdown(&cumulative(&[dec!(100), dec!(-300)]));
        assert_eq!(point.max_drawdown, dec!(-300));
        assert_eq!(point.trough_index, 1);
        assert_eq!(point.peak_index, 0);
        assert_eq!(point.recovery, Decimal::ZERO);
    }

    #[test]
    fn negative_start_that_never_falls_has_no_drawdown() {
        let series = cumulative(&[dec!(-100), dec!(50), dec!(0), dec!(70)]);
        assert_eq!(drawdown_series(&series), vec![Decimal::ZERO; 4]);
        let point = max_drawdown(&series);
        assert_eq!(point.max_drawdown, Decimal::ZERO);
        assert_eq!(point.peak_index, 0);
        assert_eq!(point.trough_index, 0);
    }

    #[test]
    fn drawdown_series_trails_running_peak() {
        assert_eq!(
            drawdown_series(&cumulative(&derivative_fy25())),
            vec![
                dec!(0),
                dec!(0),
                dec!(-5303),
                dec!(0),
                dec!(0),
                dec!(0),
                dec!(-3492),
            ]
        );
    }

    #[test]
    fn drawdown_of_empty_series_is_zero() {
        assert_eq!(max_drawdown(&[]), DrawdownPoint::default());
    }

    #[test]
    fn streak_skips_no_trade_months() {
        assert_eq!(longest_profitable_streak(&derivative_fy25()), 3);
        assert_eq!(longest_profitable_streak(&[dec!(10), dec!(0), dec!(20)]), 2);
        assert_eq!(longest_profitable_streak(&[dec!(-1), dec!(0)]), 0);
    }

    #[test]
    fn improvement_uses_absolute_base() {
        let pct = improvement_pct(dec!(-10839), dec!(29152));
        assert!((pct - 368.9547).abs() < 1e-3);
        assert_eq!(improvement_pct(Decimal::ZERO, dec!(500)), 0.0);
        assert_eq!(improvement_pct(dec!(200), dec!(100)), -50.0);
    }

    #[test]
    fn averages_default_to_zero() {
        let pnls = derivative_fy25();
        assert_eq!(average_where(&pnls, |p| p.is_sign_negative() && !p.is_zero()), dec!(-4777));
        assert_eq!(average_where(&[dec!(5)], |p| p.is_sign_negative()), Decimal::ZERO);
    }

    #[test]
    fn first_extreme_keeps_earliest_tie() {
        let values = [dec!(3), dec!(7), dec!(7), dec!(1)];
        assert_eq!(first_extreme(&values, |a, b| a > b), Some(1));
        assert_eq!(first_extreme(&values, |a, b| a < b), Some(3));
        assert_eq!(first_extreme(&[], |a, b| a < b), None);
    }
}
