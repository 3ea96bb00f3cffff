//! Hover readout for expanded time-series elements.

use chrono::DateTime;
use fc_core::{Sample, SeriesPlot, TooltipView};
use kurbo::{Line, Point};

/// Resolve the tooltip for a cursor at scene point `cursor` over `plot`.
///
/// `None` when the plot is collapsed, has no samples, or the cursor is
/// outside the plot region.
pub fn resolve(plot: &SeriesPlot, cursor: Point) -> Option<TooltipView> {
    if !plot.expanded || !plot.region.contains(cursor) {
        return None;
    }
    let index = nearest_index(&plot.points, cursor.x)?;
    let marker = plot.points[index];
    let sample = plot.samples.get(index)?;
    Some(TooltipView {
        crosshair: Line::new(
            Point::new(marker.x, plot.region.y),
            Point::new(marker.x, plot.region.y + plot.region.h),
        ),
        marker,
        value: format_value(sample.value),
        time: format_time(sample),
    })
}

/// Index of the sample nearest to `x`, by its fraction across the plotted
/// x-extent, rounded and clamped into range.
pub fn nearest_index(points: &[Point], x: f64) -> Option<usize> {
    let (first, last) = (points.first()?, points.last()?);
    let last_index = points.len() - 1;
    let span = last.x - first.x;
    if span <= 0.0 {
        return Some(0);
    }
    let frac = ((x - first.x) / span).clamp(0.0, 1.0);
    let index = (frac * last_index as f64).round() as usize;
    Some(index.min(last_index))
}

/// Magnitude-scaled value: one decimal with `K`/`M`/`G` at or above each
/// thousand step, two decimals below.
pub fn format_value(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.1}G", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{v:.2}")
    }
}

/// Time of day in UTC, `HH:MM:SS`. Out-of-range timestamps render empty.
pub fn format_time(sample: &Sample) -> String {
    DateTime::from_timestamp_millis(sample.time_ms)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}
