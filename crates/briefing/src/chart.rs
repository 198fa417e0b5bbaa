//! Candlestick and volume chart rendering

use crate::error::{BriefingError, Result};
use crate::series::OhlcvSeries;
use plotters::prelude::*;
use std::path::Path;

pub const CHART_WIDTH: u32 = 1024;
pub const CHART_HEIGHT: u32 = 768;

/// Render a two-panel daily chart (candlesticks over volume bars) to
/// a PNG file at `path`.
///
/// The panels share the date axis at a ~7:3 height ratio. The price
/// panel spans `[min(low), max(high)]`, the volume panel
/// `[0, max(volume) * 1.1]`; degenerate scales (flat price, zero
/// volume) fall back to a unit range instead of producing NaN/inf
/// coordinates. An empty series is rejected before any file is
/// created.
pub fn render_candlestick_chart(symbol: &str, series: &OhlcvSeries, path: &Path) -> Result<()> {
    if series.is_empty() {
        return Err(BriefingError::Chart(
            "cannot render chart for an empty series".to_string(),
        ));
    }

    let (price_lo, price_hi) = price_domain(series);
    let vol_hi = volume_domain(series);
    let n = series.len();

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let (upper, lower) = root.split_vertically(CHART_HEIGHT * 7 / 10);

    let mut price_chart = ChartBuilder::on(&upper)
        .caption(format!("{symbol} Daily"), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(0..n, price_lo..price_hi)
        .map_err(chart_err)?;

    price_chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|idx| date_label(series, *idx))
        .y_desc("Price")
        .draw()
        .map_err(chart_err)?;

    let candle_width = candle_width(n);
    price_chart
        .draw_series(series.bars().iter().enumerate().map(|(i, bar)| {
            CandleStick::new(
                i,
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                GREEN.filled(),
                RED.filled(),
                candle_width,
            )
        }))
        .map_err(chart_err)?;

    let mut volume_chart = ChartBuilder::on(&lower)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(0..n, 0f64..vol_hi)
        .map_err(chart_err)?;

    volume_chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|idx| date_label(series, *idx))
        .y_desc("Volume")
        .draw()
        .map_err(chart_err)?;

    volume_chart
        .draw_series(series.bars().iter().enumerate().map(|(i, bar)| {
            Rectangle::new([(i, 0.0), (i + 1, bar.volume as f64)], BLUE.filled())
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    tracing::info!(symbol, path = %path.display(), "chart saved");

    Ok(())
}

/// Price axis domain with a unit-range fallback when the series is
/// flat or carries non-finite values
fn price_domain(series: &OhlcvSeries) -> (f64, f64) {
    let (lo, hi) = series.price_range().unwrap_or((0.0, 1.0));
    if lo.is_finite() && hi.is_finite() && hi > lo {
        (lo, hi)
    } else {
        let mid = if lo.is_finite() { lo } else { 0.0 };
        (mid - 0.5, mid + 0.5)
    }
}

/// Volume axis upper bound: `max(volume) * 1.1`, unit range when all
/// volumes are zero
fn volume_domain(series: &OhlcvSeries) -> f64 {
    let hi = series.max_volume().unwrap_or(0) as f64 * 1.1;
    if hi > 0.0 { hi } else { 1.0 }
}

fn candle_width(n: usize) -> u32 {
    let plot_width = CHART_WIDTH.saturating_sub(110); // label area + margins
    (plot_width / n.max(1) as u32).saturating_sub(2).clamp(1, 20)
}

fn date_label(series: &OhlcvSeries, idx: usize) -> String {
    series
        .bars()
        .get(idx)
        .map(|b| b.date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn chart_err(err: impl std::fmt::Display) -> BriefingError {
    BriefingError::Chart(err.to_string())
}
