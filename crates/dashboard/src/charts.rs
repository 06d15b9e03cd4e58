// In crates/dashboard/src/charts.rs

//! Standalone SVG charts built from the analysis results.
//!
//! Every chart is a plain string so the report can link it as a file and
//! tests can inspect it without a rendering backend.

use std::f64::consts::PI;

use analytics::metrics;
use analytics::types::{AccountAnalysis, MetricsSnapshot, MonthlyRecord};
use itertools::{Itertools, MinMaxResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::format::{compact_currency, escape};
use crate::types::{ChartArtifact, Palette};

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 360.0;
const PADDING: f64 = 48.0;
const TITLE_HEIGHT: f64 = 28.0;
const GRID_LINES: usize = 5;

pub const MONTHLY_PNL: &str = "monthly_pnl";
pub const CUMULATIVE_PNL: &str = "cumulative_pnl";
pub const QUARTERLY_COMPARISON: &str = "quarterly_comparison";
pub const SEGMENT_DISTRIBUTION: &str = "segment_distribution";
pub const STYLE_COMPARISON: &str = "style_comparison";
pub const CONSISTENCY_HEATMAP: &str = "consistency_heatmap";
pub const WIN_LOSS_DISTRIBUTION: &str = "win_loss_distribution";
pub const DRAWDOWN_RECOVERY: &str = "drawdown_recovery";

/// Plotting region inside the canvas.
#[derive(Debug, Clone, Copy)]
struct Area {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Area {
    fn full() -> Self {
        Self {
            left: PADDING + 24.0,
            right: WIDTH - PADDING / 2.0,
            top: PADDING + TITLE_HEIGHT / 2.0,
            bottom: HEIGHT - PADDING,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Maps a value onto the vertical axis of this area.
    fn scale(&self, value: f64, (min_v, max_v): (f64, f64)) -> f64 {
        if (max_v - min_v).abs() < f64::EPSILON {
            return (self.top + self.bottom) / 2.0;
        }
        let norm = (value - min_v) / (max_v - min_v);
        self.top + (1.0 - norm) * (self.bottom - self.top)
    }

    /// Centers of `len` equal-width categorical bands, plus the band width.
    fn bands(&self, len: usize) -> (Vec<f64>, f64) {
        if len == 0 {
            return (Vec::new(), 0.0);
        }
        let band = self.width() / len as f64;
        let centers = (0..len).map(|i| self.left + band * (i as f64 + 0.5)).collect();
        (centers, band)
    }
}

struct Bar<'a> {
    label: String,
    value: f64,
    color: &'a str,
    text: String,
}

struct Slice<'a> {
    label: String,
    value: f64,
    color: &'a str,
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Value range of a series, widened so flat or empty data still gets an axis.
fn extent(values: impl IntoIterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let finite = values.into_iter().filter(|v| v.is_finite());
    let (mut min_v, mut max_v) = match finite.minmax() {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    if include_zero {
        min_v = min_v.min(0.0);
        max_v = max_v.max(0.0);
    }
    if min_v == max_v {
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        min_v -= adjust;
        max_v += adjust;
    }
    (min_v, max_v)
}

fn svg_footer() -> &'static str {
    "</svg>"
}

fn polyline(points: &[(f64, f64)], stroke: &str, dash: bool) -> String {
    if points.is_empty() {
        return String::new();
    }
    let coords = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).join(" ");
    format!(
        r#"<polyline fill="none" stroke="{stroke}" stroke-width="2" stroke-dasharray="{dash}" points="{coords}" />"#,
        dash = if dash { "5 4" } else { "0" }
    )
}

/// Renders the dashboard charts with a fixed palette and currency symbol.
#[derive(Debug, Clone)]
pub struct ChartRenderer<'a> {
    palette: &'a Palette,
    symbol: &'a str,
}

impl<'a> ChartRenderer<'a> {
    pub fn new(palette: &'a Palette, symbol: &'a str) -> Self {
        Self { palette, symbol }
    }

    /// Every chart, in the order the report shows them.
    pub fn render_all(&self, primary: &AccountAnalysis, accounts: &[AccountAnalysis]) -> Vec<ChartArtifact> {
        let charts = vec![
            self.monthly_pnl(accounts),
            self.cumulative_pnl(primary),
            self.quarterly_comparison(&primary.metrics),
            self.segment_distribution(accounts),
            self.style_comparison(&primary.metrics),
            self.consistency_heatmap(&primary.records),
            self.win_loss_distribution(primary),
            self.drawdown_recovery(primary),
        ];
        tracing::debug!(count = charts.len(), "Charts rendered.");
        charts
    }

    /// Grouped bars: one group per month, one bar per account.
    pub fn monthly_pnl(&self, accounts: &[AccountAnalysis]) -> ChartArtifact {
        let title = "Monthly P&L by Account";
        let mut svg = self.svg_header(title);
        let area = Area::full();

        let months: Vec<&MonthlyRecord> = accounts.first().map(|a| a.records.iter().collect()).unwrap_or_default();
        if months.is_empty() {
            self.no_data(&mut svg);
            return self.finish(MONTHLY_PNL, title, svg);
        }

        let range = extent(
            accounts.iter().flat_map(|a| a.records.iter().map(|r| to_f64(r.pnl))),
            true,
        );
        self.y_axis(&mut svg, &area, range);

        let (centers, band) = area.bands(months.len());
        let bar_width = band * 0.8 / accounts.len() as f64;
        let zero = area.scale(0.0, range);
        for (series_idx, account) in accounts.iter().enumerate() {
            let color = self.palette.series_color(series_idx);
            for (record, center) in account.records.iter().zip(&centers) {
                let x = center - band * 0.4 + bar_width * series_idx as f64;
                let y = area.scale(to_f64(record.pnl), range);
                self.rect(&mut svg, x, y.min(zero), bar_width, (y - zero).abs(), color);
            }
        }

        self.x_labels(&mut svg, &area, &centers, months.iter().map(|r| r.month.as_str()));
        self.zero_line(&mut svg, &area, zero);
        let legend: Vec<(&str, &str)> = accounts
            .iter()
            .enumerate()
            .map(|(idx, a)| (a.metrics.account.as_str(), self.palette.series_color(idx)))
            .collect();
        self.legend(&mut svg, area.left + 8.0, area.top + 4.0, &legend);
        self.finish(MONTHLY_PNL, title, svg)
    }

    /// Running total line with a marker per month.
    pub fn cumulative_pnl(&self, analysis: &AccountAnalysis) -> ChartArtifact {
        let title = "Cumulative P&L Progression";
        let mut svg = self.svg_header(title);
        let area = Area::full();
        let records = &analysis.records;
        if records.is_empty() {
            self.no_data(&mut svg);
            return self.finish(CUMULATIVE_PNL, title, svg);
        }

        let range = extent(records.iter().map(|r| to_f64(r.cumulative_pnl)), true);
        self.y_axis(&mut svg, &area, range);
        let zero = area.scale(0.0, range);
        self.zero_line(&mut svg, &area, zero);

        let (centers, _) = area.bands(records.len());
        let points: Vec<(f64, f64)> = records
            .iter()
            .zip(&centers)
            .map(|(r, x)| (*x, area.scale(to_f64(r.cumulative_pnl), range)))
            .collect();
        svg.push_str(&polyline(&points, &self.palette.accent, false));
        for (record, (x, y)) in records.iter().zip(&points) {
            let color = self.sign_color(record.cumulative_pnl);
            svg.push_str(&format!(
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="{color}" />"#
            ));
            self.value_label(&mut svg, *x, *y - 8.0, &compact_currency(to_f64(record.cumulative_pnl), self.symbol));
        }
        self.x_labels(&mut svg, &area, &centers, records.iter().map(|r| r.month.as_str()));
        self.finish(CUMULATIVE_PNL, title, svg)
    }

    pub fn quarterly_comparison(&self, m: &MetricsSnapshot) -> ChartArtifact {
        let title = "Quarterly Performance Comparison";
        let mut svg = self.svg_header(title);
        let bars: Vec<Bar> = m
            .quarters
            .iter()
            .map(|q| Bar {
                label: q.name.clone(),
                value: to_f64(q.total_pnl),
                color: self.sign_color(q.total_pnl),
                text: compact_currency(to_f64(q.total_pnl), self.symbol),
            })
            .collect();
        self.bar_panel(&mut svg, Area::full(), &bars, None);
        self.finish(QUARTERLY_COMPARISON, title, svg)
    }

    /// Share of absolute P&L per account.
    pub fn segment_distribution(&self, accounts: &[AccountAnalysis]) -> ChartArtifact {
        let title = "P&L Distribution by Segment";
        let mut svg = self.svg_header(title);
        let slices: Vec<Slice> = accounts
            .iter()
            .enumerate()
            .map(|(idx, a)| Slice {
                label: format!(
                    "{} ({})",
                    a.summary.name,
                    compact_currency(to_f64(a.summary.total), self.symbol)
                ),
                value: to_f64(a.summary.total.abs()),
                color: self.palette.series_color(idx),
            })
            .collect();
        self.pie(&mut svg, &slices);
        self.finish(SEGMENT_DISTRIBUTION, title, svg)
    }

    /// Total P&L and win rate per style, side by side.
    pub fn style_comparison(&self, m: &MetricsSnapshot) -> ChartArtifact {
        let title = "Trading Style Comparison";
        let mut svg = self.svg_header(title);
        let full = Area::full();
        let mid = (full.left + full.right) / 2.0;
        let left = Area { right: mid - 24.0, ..full };
        let right = Area { left: mid + 48.0, ..full };

        let pnl_bars: Vec<Bar> = m
            .styles
            .iter()
            .map(|s| Bar {
                label: s.name.clone(),
                value: to_f64(s.total_pnl),
                color: self.palette.style_color(&s.name),
                text: compact_currency(to_f64(s.total_pnl), self.symbol),
            })
            .collect();
        let rate_bars: Vec<Bar> = m
            .styles
            .iter()
            .map(|s| Bar {
                label: s.name.clone(),
                value: s.win_rate,
                color: self.palette.style_color(&s.name),
                text: format!("{:.0}%", s.win_rate),
            })
            .collect();

        self.bar_panel(&mut svg, left, &pnl_bars, None);
        self.bar_panel(&mut svg, right, &rate_bars, Some((0.0, 100.0)));
        self.caption(&mut svg, (left.left + left.right) / 2.0, "Total P&L");
        self.caption(&mut svg, (right.left + right.right) / 2.0, "Win Rate (%)");
        self.finish(STYLE_COMPARISON, title, svg)
    }

    /// One cell per month, shaded by the size of its P&L.
    pub fn consistency_heatmap(&self, records: &[MonthlyRecord]) -> ChartArtifact {
        let title = "Monthly Consistency Heatmap";
        let mut svg = self.svg_header(title);
        if records.is_empty() {
            self.no_data(&mut svg);
            return self.finish(CONSISTENCY_HEATMAP, title, svg);
        }

        let area = Area::full();
        let (centers, band) = area.bands(records.len());
        let max_abs = records
            .iter()
            .map(|r| to_f64(r.pnl.abs()))
            .fold(0.0_f64, f64::max);
        let max_abs = if max_abs == 0.0 { 1.0 } else { max_abs };
        let cell_h = (area.bottom - area.top) / 2.0;
        let y_top = area.top + cell_h / 4.0;

        for (record, center) in records.iter().zip(&centers) {
            let x_left = center - band / 2.0 + 2.0;
            let width = band - 4.0;
            if record.is_traded() {
                let t = 0.25 + 0.75 * (to_f64(record.pnl.abs()) / max_abs).min(1.0);
                svg.push_str(&format!(
                    r#"<rect class="cell" x="{x_left:.2}" y="{y_top:.2}" width="{width:.2}" height="{cell_h:.2}" fill="{color}" fill-opacity="{t:.2}" />"#,
                    color = self.sign_color(record.pnl),
                ));
            } else {
                svg.push_str(&format!(
                    r#"<rect class="cell" x="{x_left:.2}" y="{y_top:.2}" width="{width:.2}" height="{cell_h:.2}" fill="{color}" />"#,
                    color = self.palette.grid,
                ));
            }
            let label = if record.is_traded() {
                compact_currency(to_f64(record.pnl), self.symbol)
            } else {
                "No trade".to_string()
            };
            self.value_label(&mut svg, *center, y_top + cell_h / 2.0 + 4.0, &label);
            svg.push_str(&format!(
                r#"<text x="{center:.2}" y="{y:.2}" text-anchor="middle">{style}</text>"#,
                y = y_top + cell_h + 16.0,
                style = escape(&record.style)
            ));
        }
        self.x_labels(&mut svg, &area, &centers, records.iter().map(|r| r.month.as_str()));
        self.finish(CONSISTENCY_HEATMAP, title, svg)
    }

    /// Profitable, losing and idle months as shares of the calendar.
    pub fn win_loss_distribution(&self, analysis: &AccountAnalysis) -> ChartArtifact {
        let title = "Win/Loss Distribution";
        let mut svg = self.svg_header(title);
        let m = &analysis.metrics;
        let idle = analysis.records.len() as u32 - m.months_traded;
        let slices = [
            Slice {
                label: format!("Profitable ({})", m.profitable_months),
                value: m.profitable_months as f64,
                color: &self.palette.profit,
            },
            Slice {
                label: format!("Loss ({})", m.loss_months),
                value: m.loss_months as f64,
                color: &self.palette.loss,
            },
            Slice {
                label: format!("No trade ({idle})"),
                value: idle as f64,
                color: &self.palette.neutral,
            },
        ];
        self.pie(&mut svg, &slices);
        self.finish(WIN_LOSS_DISTRIBUTION, title, svg)
    }

    /// Cumulative P&L against its running peak, with the underwater gap as bars.
    pub fn drawdown_recovery(&self, analysis: &AccountAnalysis) -> ChartArtifact {
        let title = "Drawdown and Recovery";
        let mut svg = self.svg_header(title);
        let records = &analysis.records;
        if records.is_empty() {
            self.no_data(&mut svg);
            return self.finish(DRAWDOWN_RECOVERY, title, svg);
        }

        let cumulative: Vec<Decimal> = records.iter().map(|r| r.cumulative_pnl).collect();
        let underwater = metrics::drawdown_series(&cumulative);
        let peaks: Vec<Decimal> = cumulative.iter().zip(&underwater).map(|(c, d)| *c - *d).collect();

        let area = Area::full();
        let range = extent(
            cumulative.iter().chain(&underwater).chain(&peaks).map(|v| to_f64(*v)),
            true,
        );
        self.y_axis(&mut svg, &area, range);
        let zero = area.scale(0.0, range);
        let (centers, band) = area.bands(records.len());

        for (value, center) in underwater.iter().zip(&centers) {
            let y = area.scale(to_f64(*value), range);
            self.rect(&mut svg, center - band * 0.3, zero, band * 0.6, (y - zero).abs(), &self.palette.loss);
        }
        self.zero_line(&mut svg, &area, zero);

        let to_points = |series: &[Decimal]| -> Vec<(f64, f64)> {
            series
                .iter()
                .zip(&centers)
                .map(|(v, x)| (*x, area.scale(to_f64(*v), range)))
                .collect()
        };
        svg.push_str(&polyline(&to_points(&peaks), &self.palette.neutral, true));
        let line = to_points(&cumulative);
        svg.push_str(&polyline(&line, &self.palette.accent, false));

        let dd = &analysis.metrics.drawdown;
        if dd.max_drawdown < Decimal::ZERO {
            for (month, label, color) in [
                (&dd.peak_month, "Peak", &self.palette.profit),
                (&dd.trough_month, "Trough", &self.palette.loss),
            ] {
                if let Some((x, y)) = records.iter().position(|r| &r.month == month).map(|i| line[i]) {
                    svg.push_str(&format!(
                        r#"<circle cx="{x:.2}" cy="{y:.2}" r="5" fill="{color}" />"#
                    ));
                    self.value_label(&mut svg, x, y - 10.0, label);
                }
            }
        }

        self.x_labels(&mut svg, &area, &centers, records.iter().map(|r| r.month.as_str()));
        self.legend(
            &mut svg,
            area.left + 8.0,
            area.top + 4.0,
            &[
                ("Cumulative P&L", self.palette.accent.as_str()),
                ("Running peak", self.palette.neutral.as_str()),
                ("Drawdown", self.palette.loss.as_str()),
            ],
        );
        self.finish(DRAWDOWN_RECOVERY, title, svg)
    }

    // --- Building blocks ---

    fn svg_header(&self, title: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:{text}}}</style><rect width="100%" height="100%" fill="{bg}" /><text x="{cx:.2}" y="{ty:.2}" text-anchor="middle" font-size="15" font-weight="bold">{title}</text>"#,
            w = WIDTH,
            h = HEIGHT,
            text = self.palette.text,
            bg = self.palette.background,
            cx = WIDTH / 2.0,
            ty = TITLE_HEIGHT,
            title = escape(title)
        )
    }

    fn finish(&self, name: &'static str, title: &str, mut svg: String) -> ChartArtifact {
        svg.push_str(svg_footer());
        ChartArtifact {
            name,
            title: title.to_string(),
            svg,
        }
    }

    fn sign_color(&self, value: Decimal) -> &str {
        if value >= Decimal::ZERO {
            &self.palette.profit
        } else {
            &self.palette.loss
        }
    }

    fn no_data(&self, svg: &mut String) {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">No data</text>"#,
            x = WIDTH / 2.0,
            y = HEIGHT / 2.0
        ));
    }

    fn rect(&self, svg: &mut String, x: f64, y: f64, w: f64, h: f64, color: &str) {
        svg.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" />"#
        ));
    }

    fn value_label(&self, svg: &mut String, x: f64, y: f64, text: &str) {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="10" font-weight="bold">{text}</text>"#,
            text = escape(text)
        ));
    }

    fn caption(&self, svg: &mut String, x: f64, text: &str) {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="12">{text}</text>"#,
            y = HEIGHT - PADDING / 4.0,
            text = escape(text)
        ));
    }

    fn zero_line(&self, svg: &mut String, area: &Area, y: f64) {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="1" />"#,
            x1 = area.left,
            x2 = area.right,
            color = self.palette.text
        ));
    }

    /// Horizontal grid lines with currency labels on the left.
    fn y_axis(&self, svg: &mut String, area: &Area, range: (f64, f64)) {
        let (min_v, max_v) = range;
        for i in 0..=GRID_LINES {
            let value = min_v + (max_v - min_v) * i as f64 / GRID_LINES as f64;
            let y = area.scale(value, range);
            svg.push_str(&format!(
                r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{grid}" stroke-width="0.5" stroke-dasharray="3 3" />"#,
                x1 = area.left,
                x2 = area.right,
                grid = self.palette.grid
            ));
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end" font-size="9">{label}</text>"#,
                x = area.left - 4.0,
                y = y + 3.0,
                label = escape(&compact_currency(value, self.symbol))
            ));
        }
    }

    fn x_labels<'l>(&self, svg: &mut String, area: &Area, centers: &[f64], labels: impl Iterator<Item = &'l str>) {
        for (label, x) in labels.zip(centers) {
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
                y = area.bottom + 16.0,
                label = escape(label)
            ));
        }
    }

    fn legend(&self, svg: &mut String, x: f64, y: f64, entries: &[(&str, &str)]) {
        for (idx, (label, color)) in entries.iter().enumerate() {
            let row = y + idx as f64 * 16.0;
            self.rect(svg, x, row, 10.0, 10.0, color);
            svg.push_str(&format!(
                r#"<text x="{tx:.2}" y="{ty:.2}" text-anchor="start">{label}</text>"#,
                tx = x + 16.0,
                ty = row + 9.0,
                label = escape(label)
            ));
        }
    }

    /// Simple bar chart inside `area`. A fixed `range` overrides the data extent.
    fn bar_panel(&self, svg: &mut String, area: Area, bars: &[Bar], range: Option<(f64, f64)>) {
        if bars.is_empty() {
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">No data</text>"#,
                x = (area.left + area.right) / 2.0,
                y = (area.top + area.bottom) / 2.0
            ));
            return;
        }

        let range = range.unwrap_or_else(|| extent(bars.iter().map(|b| b.value), true));
        self.y_axis(svg, &area, range);
        let zero = area.scale(0.0, range);
        let (centers, band) = area.bands(bars.len());
        for (bar, center) in bars.iter().zip(&centers) {
            let y = area.scale(bar.value, range);
            self.rect(svg, center - band * 0.3, y.min(zero), band * 0.6, (y - zero).abs(), bar.color);
            let label_y = if bar.value >= 0.0 { y - 6.0 } else { y + 14.0 };
            self.value_label(svg, *center, label_y, &bar.text);
        }
        self.zero_line(svg, &area, zero);
        self.x_labels(svg, &area, &centers, bars.iter().map(|b| b.label.as_str()));
    }

    /// Pie on the left half with a legend to its right. Zero slices are skipped.
    fn pie(&self, svg: &mut String, slices: &[Slice]) {
        let visible: Vec<&Slice> = slices.iter().filter(|s| s.value > 0.0).collect();
        let total: f64 = visible.iter().map(|s| s.value).sum();
        if visible.is_empty() || total <= 0.0 {
            self.no_data(svg);
            return;
        }

        let (cx, cy) = (WIDTH * 0.35, HEIGHT / 2.0 + TITLE_HEIGHT / 2.0);
        let r = (HEIGHT - 2.0 * PADDING) / 2.0;
        let mut angle = -PI / 2.0;
        for slice in &visible {
            let share = slice.value / total;
            let sweep = share * 2.0 * PI;
            if share >= 1.0 - f64::EPSILON {
                svg.push_str(&format!(
                    r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{color}" />"#,
                    color = slice.color
                ));
            } else {
                let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
                let end = angle + sweep;
                let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
                let large = if sweep > PI { 1 } else { 0 };
                svg.push_str(&format!(
                    r#"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large} 1 {x2:.2} {y2:.2} Z" fill="{color}" stroke="{bg}" stroke-width="2" />"#,
                    color = slice.color,
                    bg = self.palette.background
                ));
            }

            let mid = angle + sweep / 2.0;
            self.value_label(
                svg,
                cx + r * 0.6 * mid.cos(),
                cy + r * 0.6 * mid.sin() + 4.0,
                &format!("{:.1}%", share * 100.0),
            );
            angle += sweep;
        }

        let entries: Vec<(&str, &str)> = visible.iter().map(|s| (s.label.as_str(), s.color)).collect();
        self.legend(svg, WIDTH * 0.65, cy - r / 2.0, &entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{reference_accounts, reference_analysis};

    fn well_formed(chart: &ChartArtifact) {
        assert!(chart.svg.starts_with("<svg"), "{} has no svg root", chart.name);
        assert!(chart.svg.ends_with("</svg>"), "{} is not closed", chart.name);
        assert!(!chart.svg.contains("NaN"), "{} has NaN coordinates", chart.name);
    }

    #[test]
    fn render_all_produces_every_chart_once() {
        let palette = Palette::default();
        let accounts = reference_accounts();
        let charts = ChartRenderer::new(&palette, "₹").render_all(&accounts[0], &accounts);

        let names: Vec<&str> = charts.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                MONTHLY_PNL,
                CUMULATIVE_PNL,
                QUARTERLY_COMPARISON,
                SEGMENT_DISTRIBUTION,
                STYLE_COMPARISON,
                CONSISTENCY_HEATMAP,
                WIN_LOSS_DISTRIBUTION,
                DRAWDOWN_RECOVERY,
            ]
        );
        charts.iter().for_each(well_formed);
    }

    #[test]
    fn titles_are_escaped() {
        let palette = Palette::default();
        let chart = ChartRenderer::new(&palette, "₹").cumulative_pnl(&reference_analysis());
        assert!(chart.svg.contains("Cumulative P&amp;L Progression"));
        assert_eq!(chart.title, "Cumulative P&L Progression");
        assert!(chart.svg.contains("<polyline"));
    }

    #[test]
    fn heatmap_has_a_cell_per_month() {
        let palette = Palette::default();
        let analysis = reference_analysis();
        let chart = ChartRenderer::new(&palette, "₹").consistency_heatmap(&analysis.records);
        assert_eq!(chart.svg.matches(r#"class="cell""#).count(), 7);
        assert!(chart.svg.contains("No trade"));
    }

    #[test]
    fn drawdown_marks_peak_and_trough() {
        let palette = Palette::default();
        let chart = ChartRenderer::new(&palette, "₹").drawdown_recovery(&reference_analysis());
        assert!(chart.svg.contains(">Peak<"));
        assert!(chart.svg.contains(">Trough<"));
    }

    #[test]
    fn style_comparison_shows_every_bucket() {
        let palette = Palette::default();
        let chart = ChartRenderer::new(&palette, "₹").style_comparison(&reference_analysis().metrics);
        well_formed(&chart);
        for style in ["Systematic", "Emotional", "Learning"] {
            assert_eq!(chart.svg.matches(&format!(">{style}<")).count(), 2, "{style}");
        }
        assert!(chart.svg.contains("₹-3,492"));
    }

    #[test]
    fn single_slice_pie_is_a_full_circle() {
        let palette = Palette::default();
        let accounts = vec![reference_analysis()];
        let chart = ChartRenderer::new(&palette, "₹").segment_distribution(&accounts);
        well_formed(&chart);
        assert!(chart.svg.contains("<circle"));
        assert!(chart.svg.contains("100.0%"));
    }

    #[test]
    fn empty_inputs_render_placeholders() {
        let palette = Palette::default();
        let renderer = ChartRenderer::new(&palette, "₹");
        let monthly = renderer.monthly_pnl(&[]);
        well_formed(&monthly);
        assert!(monthly.svg.contains("No data"));
        let heatmap = renderer.consistency_heatmap(&[]);
        assert!(heatmap.svg.contains("No data"));
    }

    #[test]
    fn extent_widens_flat_ranges() {
        assert_eq!(extent(Vec::<f64>::new(), true), (-1.0, 1.0));
        assert_eq!(extent([5.0, 5.0], false), (4.5, 5.5));
        assert_eq!(extent([-3.0, 7.0], true), (-3.0, 7.0));
        assert_eq!(extent([2.0, 7.0], true), (0.0, 7.0));
    }
}
