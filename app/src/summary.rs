// In app/src/summary.rs

use analytics::{AccountAnalysis, MetricsSnapshot, Portfolio};
use dashboard::format::{currency_f64, percent, signed_currency};

pub fn print_metrics_summary(m: &MetricsSnapshot, symbol: &str) {
    println!("\n--- {} ---", m.account);
    println!("---------------------------------");
    println!("  - Net P&L: {}", signed_currency(m.total_pnl, symbol));
    println!(
        "  - Months traded: {} ({} profitable, {} loss)",
        m.months_traded, m.profitable_months, m.loss_months
    );
    println!(
        "  - Win rate: {} | Profit factor: {:.2}",
        percent(m.win_rate),
        m.profit_factor
    );
    println!(
        "  - Volatility: {} | Sharpe: {:.3}",
        currency_f64(m.volatility, symbol),
        m.sharpe_ratio
    );
    println!(
        "  - Max drawdown: {} ({} to {}) | Recovery: {}",
        signed_currency(m.drawdown.max_drawdown, symbol),
        m.drawdown.peak_month,
        m.drawdown.trough_month,
        signed_currency(m.drawdown.recovery, symbol)
    );
    println!("  - Longest profitable streak: {} months", m.max_consecutive_profits);

    println!("\nQuarters:");
    for q in &m.quarters {
        println!("  - {}: {} over {} months", q.name, signed_currency(q.total_pnl, symbol), q.months);
    }
    println!(
        "  - {} to {} improvement: {:+.1}%",
        m.improvement.from, m.improvement.to, m.improvement.percent
    );

    if !m.styles.is_empty() {
        println!("\nStyles:");
        for s in &m.styles {
            println!(
                "  - {}: {} | win rate {} ({} of {} months)",
                s.name,
                signed_currency(s.total_pnl, symbol),
                percent(s.win_rate),
                s.profitable_months,
                s.months
            );
        }
    }
    println!("---------------------------------");
}

pub fn print_account_table(accounts: &[AccountAnalysis], symbol: &str) {
    println!("\nAccounts:");
    for a in accounts {
        let s = &a.summary;
        println!(
            "  - {:<20} {:<12} {:>14} | {} traded, {} up, {} down",
            s.name,
            s.segment,
            signed_currency(s.total, symbol),
            s.months_traded,
            s.profitable_months,
            s.loss_months
        );
    }
}

pub fn print_platform_table(portfolio: &Portfolio, symbol: &str) {
    println!("\nPlatforms:");
    for p in &portfolio.platforms {
        println!(
            "  - {:<20} {:>14} | {} traded, {} up | {} per traded month",
            p.platform,
            signed_currency(p.total_pnl, symbol),
            p.months_traded,
            p.profitable_months,
            signed_currency(p.avg_per_month, symbol)
        );
    }

    println!("\nReturn on capital:");
    for r in &portfolio.segment_roi {
        println!(
            "  - {:<20} {} on {}",
            r.account,
            percent(r.roi_percentage),
            signed_currency(r.allocated_capital, symbol)
        );
    }
    println!(
        "  - {:<20} {} on {}",
        "Combined",
        percent(portfolio.overall.roi_percentage),
        signed_currency(portfolio.overall.estimated_capital, symbol)
    );
}
