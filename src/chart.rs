//! Text line charts.
//!
//! Drawing targets an optional surface; with no surface mounted the call is
//! a no-op.

use std::fmt::{self, Write};

use crate::forecast::{RiskSeries, NOW_INDEX};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const GAP: char = ' ';

/// One glyph per value, scaled into `[lo, hi]`. `None` renders as a gap.
/// Bounds given in either order are accepted.
pub fn sparkline(values: &[Option<u8>], lo: u8, hi: u8) -> String {
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    let span = hi.saturating_sub(lo).max(1) as f64;
    values
        .iter()
        .map(|v| match v {
            Some(v) => {
                let t = ((*v).clamp(lo, hi) - lo) as f64 / span;
                BARS[((t * (BARS.len() - 1) as f64).round() as usize).min(BARS.len() - 1)]
            }
            None => GAP,
        })
        .collect()
}

/// Past and forecast as two aligned rows meeting at "Now".
pub fn draw_risk_series(surface: Option<&mut dyn Write>, series: &RiskSeries) -> fmt::Result {
    let Some(out) = surface else {
        return Ok(());
    };
    if series.is_empty() {
        return Ok(());
    }

    let past = sparkline(&series.past, 0, 100);
    let future = sparkline(&series.future, 0, 100);
    writeln!(out, "  Past 24h Risk Index  |{}|", past)?;
    writeln!(out, "  Next 24h Forecast    |{}|", future)?;

    let first = series.labels.first().map(String::as_str).unwrap_or("");
    let last = series.labels.last().map(String::as_str).unwrap_or("");
    let pad = NOW_INDEX.saturating_sub(first.chars().count());
    writeln!(
        out,
        "                        {}{:pad$}^Now{:rest$}{}",
        first,
        "",
        "",
        last,
        pad = pad,
        rest = series.len().saturating_sub(NOW_INDEX + 4 + last.chars().count()),
    )?;
    if let Some(now) = series.now_value() {
        writeln!(out, "  Now: {}", now)?;
    }
    Ok(())
}

/// Single labelled series with its min/max scale.
pub fn draw_series(
    surface: Option<&mut dyn Write>,
    title: &str,
    labels: &[&str],
    values: &[u8],
    lo: u8,
    hi: u8,
) -> fmt::Result {
    let Some(out) = surface else {
        return Ok(());
    };
    let wrapped: Vec<Option<u8>> = values.iter().copied().map(Some).collect();
    writeln!(out, "  {} [{}-{}]", title, lo, hi)?;
    writeln!(out, "  |{}|", sparkline(&wrapped, lo, hi))?;
    let pairs: Vec<String> = labels
        .iter()
        .zip(values)
        .map(|(l, v)| format!("{} {}", l, v))
        .collect();
    writeln!(out, "  {}", pairs.join(", "))
}
