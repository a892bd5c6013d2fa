//! Risk index series: 24 observed hours, "Now", and a 24 hour forecast.
//!
//! The observed part is a diurnal cycle plus a slow daily drift plus seeded
//! jitter. The forecast is an AR(1) blend pulled toward the same seasonal
//! curve, chained forward from the "Now" value.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::sectors::HOUR_MS;
use crate::seeded::seeded;

pub const PAST_HOURS: i64 = 24;
pub const FORECAST_HOURS: i64 = 24;
pub const SERIES_LEN: usize = (PAST_HOURS + 1 + FORECAST_HOURS) as usize;
pub const NOW_INDEX: usize = PAST_HOURS as usize;
pub const NOW_LABEL: &str = "Now";

const BASE_LEVEL: f64 = 0.45;
const DIURNAL_AMPLITUDE: f64 = 0.15;
const DRIFT_AMPLITUDE: f64 = 0.05;
const NOISE_WIDTH: f64 = 0.08;
const INDEX_FLOOR: f64 = 0.05;
const INDEX_CEIL: f64 = 0.95;

const AR_PERSISTENCE: f64 = 0.7;
const AR_SEASONAL: f64 = 0.3;
const FORECAST_NOISE_WIDTH: f64 = 10.0;
const FORECAST_FLOOR: f64 = 5.0;
const FORECAST_CEIL: f64 = 95.0;

const DAY_MS: f64 = 24.0 * HOUR_MS as f64;
// room for a display offset of up to a day on either side
const EDGE_SLACK_HOURS: i64 = 24;

fn shift(base: DateTime<Utc>, hours: i64) -> Option<DateTime<Utc>> {
    Duration::try_hours(hours).and_then(|d| base.checked_add_signed(d))
}

/// `base` pulled inside the range where the whole 49 hour window exists.
fn window_base(base: DateTime<Utc>) -> DateTime<Utc> {
    let lo = shift(DateTime::<Utc>::MIN_UTC, PAST_HOURS + EDGE_SLACK_HOURS);
    let hi = shift(DateTime::<Utc>::MAX_UTC, -(FORECAST_HOURS + EDGE_SLACK_HOURS));
    match (lo, hi) {
        (Some(lo), Some(hi)) => base.clamp(lo, hi),
        _ => base,
    }
}

/// Seasonal index (0..=100) at `hour_offset` hours from `base`.
///
/// `offset` is the display timezone; it only moves the diurnal peak.
/// An offset past the representable range evaluates at `base`.
pub fn index_at(base: DateTime<Utc>, offset: &FixedOffset, hour_offset: i64) -> f64 {
    let t = shift(base, hour_offset).unwrap_or(base);
    let t_ms = t.timestamp_millis();
    let hod = t.with_timezone(offset).hour() as f64;

    let season = DIURNAL_AMPLITUDE * ((hod + 3.0) / 24.0 * PI * 2.0).sin();
    let epoch_hours = t_ms.div_euclid(HOUR_MS) as f64;
    let noise = (seeded(epoch_hours * 7.0) - 0.5) * NOISE_WIDTH;
    let trend = DRIFT_AMPLITUDE * (t_ms as f64 / DAY_MS * PI * 2.0).sin();

    (BASE_LEVEL + season + trend + noise).clamp(INDEX_FLOOR, INDEX_CEIL) * 100.0
}

/// Two aligned series over the same 49 labels.
///
/// At every index exactly one of `past` and `future` is `Some`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSeries {
    pub generated_at: DateTime<Utc>,
    pub labels: Vec<String>,
    pub past: Vec<Option<u8>>,
    pub future: Vec<Option<u8>>,
}

impl RiskSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn now_value(&self) -> Option<u8> {
        self.past.get(NOW_INDEX).copied().flatten()
    }

    pub fn value_at(&self, idx: usize) -> Option<u8> {
        match (self.past.get(idx), self.future.get(idx)) {
            (Some(Some(v)), _) | (_, Some(Some(v))) => Some(*v),
            _ => None,
        }
    }

    /// (label, value) for every index.
    pub fn points(&self) -> impl Iterator<Item = (&str, u8)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| self.value_at(i).map(|v| (l.as_str(), v)))
    }
}

fn clock_label(t: DateTime<Utc>, offset: &FixedOffset) -> String {
    let local = t.with_timezone(offset);
    format!("{:02}:{:02}", local.hour(), local.minute())
}

fn round_index(v: f64) -> u8 {
    v.round().clamp(0.0, 100.0) as u8
}

/// Build the series around `base`. Each call produces a fresh series.
///
/// A `base` within a day of the calendar limits is moved inward so every
/// point of the window exists; `generated_at` reports the moved value.
pub fn build_series(base: DateTime<Utc>, offset: &FixedOffset) -> RiskSeries {
    let base = window_base(base);
    let mut labels = Vec::with_capacity(SERIES_LEN);
    let mut past = Vec::with_capacity(SERIES_LEN);
    let mut future = Vec::with_capacity(SERIES_LEN);

    for k in (1..=PAST_HOURS).rev() {
        labels.push(clock_label(shift(base, -k).unwrap_or(base), offset));
        past.push(Some(round_index(index_at(base, offset, -k))));
        future.push(None);
    }

    let now = round_index(index_at(base, offset, 0));
    labels.push(NOW_LABEL.to_string());
    past.push(Some(now));
    future.push(None);

    let mut prev = now as f64;
    for h in 1..=FORECAST_HOURS {
        let t = shift(base, h).unwrap_or(base);
        let seasonal = index_at(base, offset, h);
        let hour = t.timestamp_millis().div_euclid(HOUR_MS) as f64;
        let eps = (seeded(hour * 13.0) - 0.5) * FORECAST_NOISE_WIDTH;
        prev = (AR_PERSISTENCE * prev + AR_SEASONAL * seasonal + eps)
            .clamp(FORECAST_FLOOR, FORECAST_CEIL);

        labels.push(clock_label(t, offset));
        past.push(None);
        future.push(Some(round_index(prev)));
    }

    RiskSeries {
        generated_at: base,
        labels,
        past,
        future,
    }
}
