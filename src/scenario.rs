//! What-if scenario simulator for the risk map.
//!
//! Five bounded inputs drive two outputs: a field of hazard zones that is
//! rebuilt on every input change, and a simulation result that is produced
//! only when a run is requested. All formulas are fixed affine combinations
//! of the inputs with hard clamps.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::factors::dominant;
use crate::seeded::seeded;

/// Scenario parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Param {
    Duration,
    Intensity,
    Magnitude,
    Soil,
    Wind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Param {
    pub const ALL: [Param; 5] = [
        Param::Duration,
        Param::Intensity,
        Param::Magnitude,
        Param::Soil,
        Param::Wind,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Param::Duration => "duration",
            Param::Intensity => "intensity",
            Param::Magnitude => "magnitude",
            Param::Soil => "soil",
            Param::Wind => "wind",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Param::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Param::Duration => "Duration (hours)",
            Param::Intensity => "Intensity (mm/hr)",
            Param::Magnitude => "Magnitude (Richter scale)",
            Param::Soil => "Soil Saturation (%)",
            Param::Wind => "Wind Gusts (km/h)",
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Param::Duration => Bounds { min: 1.0, max: 72.0, step: 1.0 },
            Param::Intensity => Bounds { min: 1.0, max: 200.0, step: 1.0 },
            Param::Magnitude => Bounds { min: 1.0, max: 9.0, step: 0.1 },
            Param::Soil => Bounds { min: 0.0, max: 100.0, step: 1.0 },
            Param::Wind => Bounds { min: 0.0, max: 120.0, step: 1.0 },
        }
    }

    /// Clamp `value` into bounds; non-finite values fall to the minimum.
    pub fn clamp(&self, value: f64) -> f64 {
        let b = self.bounds();
        if value.is_finite() {
            value.clamp(b.min, b.max)
        } else {
            b.min
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    /// hours
    pub duration: f64,
    /// rainfall, mm/hr
    pub intensity: f64,
    /// Richter
    pub magnitude: f64,
    /// soil saturation, %
    pub soil: f64,
    /// gusts, km/h
    pub wind: f64,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            duration: 24.0,
            intensity: 50.0,
            magnitude: 6.5,
            soil: 60.0,
            wind: 40.0,
        }
    }
}

impl ScenarioInputs {
    pub fn new(duration: f64, intensity: f64, magnitude: f64, soil: f64, wind: f64) -> Self {
        Self {
            duration,
            intensity,
            magnitude,
            soil,
            wind,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            duration: Param::Duration.clamp(self.duration),
            intensity: Param::Intensity.clamp(self.intensity),
            magnitude: Param::Magnitude.clamp(self.magnitude),
            soil: Param::Soil.clamp(self.soil),
            wind: Param::Wind.clamp(self.wind),
        }
    }

    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::Duration => self.duration,
            Param::Intensity => self.intensity,
            Param::Magnitude => self.magnitude,
            Param::Soil => self.soil,
            Param::Wind => self.wind,
        }
    }

    /// Set one parameter, clamped into its bounds.
    pub fn set(&mut self, param: Param, value: f64) {
        let v = param.clamp(value);
        match param {
            Param::Duration => self.duration = v,
            Param::Intensity => self.intensity = v,
            Param::Magnitude => self.magnitude = v,
            Param::Soil => self.soil = v,
            Param::Wind => self.wind = v,
        }
    }

    /// Defaults overridden by `key=value` pairs. Unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut inputs = Self::default();
        for (key, raw) in pairs {
            let Some(param) = Param::parse(key) else {
                continue;
            };
            let value: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid value for {}: {:?}", key, raw))?;
            if !value.is_finite() {
                bail!("{} must be finite, got {}", key, raw);
            }
            inputs.set(param, value);
        }
        Ok(inputs)
    }

    /// Stable text form, used to fingerprint a run.
    pub fn canonical(&self) -> String {
        format!(
            "duration={};intensity={};magnitude={};soil={};wind={}",
            self.duration, self.intensity, self.magnitude, self.soil, self.wind
        )
    }
}

/// Driver labels used by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    #[serde(rename = "Rainfall")]
    Rainfall,
    #[serde(rename = "Seismic")]
    Seismic,
    #[serde(rename = "Soil Saturation")]
    SoilSaturation,
    #[serde(rename = "Wind Gusts")]
    WindGusts,
}

impl Driver {
    pub fn label(&self) -> &'static str {
        match self {
            Driver::Rainfall => "Rainfall",
            Driver::Seismic => "Seismic",
            Driver::SoilSaturation => "Soil Saturation",
            Driver::WindGusts => "Wind Gusts",
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted simulator terms, in tie-break order.
pub fn driver_terms(rain: f64, magnitude: f64, soil: f64, wind: f64) -> [(Driver, f64); 4] {
    [
        (Driver::Rainfall, 0.38 * (rain / 200.0)),
        (Driver::Seismic, 0.28 * (magnitude / 9.0)),
        (Driver::SoilSaturation, 0.22 * (soil / 100.0)),
        (Driver::WindGusts, 0.12 * (wind / 120.0)),
    ]
}

pub fn dominant_driver(rain: f64, magnitude: f64, soil: f64, wind: f64) -> Driver {
    dominant(&driver_terms(rain, magnitude, soil, wind)).unwrap_or(Driver::Rainfall)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    High,
    Medium,
    Low,
    Safe,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 4] = [ZoneKind::High, ZoneKind::Medium, ZoneKind::Low, ZoneKind::Safe];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneKind::High => "high",
            ZoneKind::Medium => "medium",
            ZoneKind::Low => "low",
            ZoneKind::Safe => "safe",
        }
    }

    /// (base, spread) of the marker size in px.
    fn size_range(&self) -> (f64, f64) {
        match self {
            ZoneKind::High => (80.0, 40.0),
            ZoneKind::Medium => (60.0, 30.0),
            ZoneKind::Low => (40.0, 20.0),
            ZoneKind::Safe => (70.0, 30.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub kind: ZoneKind,
    /// percent of map width
    pub left: f64,
    /// percent of map height
    pub top: f64,
    /// px
    pub size: f64,
    pub reason: String,
}

impl Zone {
    /// Hover text shown on the map.
    pub fn tooltip(&self) -> String {
        match self.kind {
            ZoneKind::Safe => "Safe zone".to_string(),
            _ => format!("Reason: {}", self.reason),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub safe: usize,
}

impl ZoneCounts {
    pub fn get(&self, kind: ZoneKind) -> usize {
        match kind {
            ZoneKind::High => self.high,
            ZoneKind::Medium => self.medium,
            ZoneKind::Low => self.low,
            ZoneKind::Safe => self.safe,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.safe
    }
}

fn floor_count(v: f64) -> usize {
    v.floor().max(0.0) as usize
}

pub fn zone_counts(inputs: &ScenarioInputs) -> ZoneCounts {
    let ScenarioInputs {
        duration: d,
        intensity: i,
        magnitude: m,
        soil: s,
        wind: w,
    } = *inputs;

    let safe_pressure = (d / 24.0 + i / 60.0 + m / 3.0).floor();
    ZoneCounts {
        high: floor_count(i / 15.0 + m * 1.6 + s / 22.0 + w / 45.0 + d / 12.0),
        medium: floor_count(i / 10.0 + m * 1.1 + s / 18.0 + w / 35.0 + d / 10.0),
        low: floor_count(i / 8.0 + m * 0.8 + s / 15.0 + w / 30.0 + d / 8.0),
        safe: (8.0 - safe_pressure).max(2.0) as usize,
    }
}

/// Reason for a zone from its jittered inputs.
pub fn zone_reason(kind: ZoneKind, rain: f64, magnitude: f64, soil: f64, wind: f64) -> String {
    let driver = dominant_driver(rain, magnitude, soil, wind);
    let mut parts = Vec::new();
    if driver == Driver::Rainfall || rain > 80.0 {
        parts.push(format!("heavy rainfall {:.0} mm/hr", rain));
    }
    if driver == Driver::Seismic || magnitude > 5.0 {
        parts.push(format!("recent tremors M{:.1}", magnitude));
    }
    if driver == Driver::SoilSaturation || soil > 65.0 {
        parts.push(format!("soil saturation {:.0}%", soil));
    }
    if driver == Driver::WindGusts || wind > 70.0 {
        parts.push(format!("gusts {:.0} km/h", wind));
    }
    if kind == ZoneKind::High && parts.len() < 2 {
        parts.push("combined stressors".to_string());
    }
    parts.truncate(3);
    parts.join("; ")
}

fn make_zone(inputs: &ScenarioInputs, kind: ZoneKind, n: usize) -> Zone {
    let seed = inputs.duration * 13.0
        + inputs.intensity * 7.0
        + inputs.magnitude * 11.0
        + inputs.soil * 5.0
        + inputs.wind * 3.0
        + n as f64 * 17.0;

    let (base, spread) = kind.size_range();
    let rain = (inputs.intensity + (seeded(seed + 3.0) - 0.5) * 20.0).max(0.0);
    let magnitude = (inputs.magnitude + (seeded(seed + 4.0) - 0.5) * 0.6).max(0.0);
    let soil = (inputs.soil + (seeded(seed + 5.0) - 0.5) * 20.0).clamp(0.0, 100.0);
    let wind = (inputs.wind + (seeded(seed + 6.0) - 0.5) * 20.0).max(0.0);

    Zone {
        id: format!("{}-{}", kind.as_str(), n),
        kind,
        left: 10.0 + seeded(seed) * 80.0,
        top: 10.0 + seeded(seed + 1.0) * 80.0,
        size: base + seeded(seed + 2.0) * spread,
        reason: zone_reason(kind, rain, magnitude, soil, wind),
    }
}

/// Zones for `inputs`, grouped high, medium, low, safe.
pub fn zone_field(inputs: &ScenarioInputs) -> Vec<Zone> {
    let counts = zone_counts(inputs);
    let mut zones = Vec::with_capacity(counts.total());
    for kind in ZoneKind::ALL {
        zones.extend((0..counts.get(kind)).map(|n| make_zone(inputs, kind, n)));
    }
    zones
}

pub const MAX_HIGH_RISK_AREAS: u32 = 50;
pub const MIN_EVACUATION_MINUTES: u32 = 3;
pub const MAX_INCIDENT_PROBABILITY: u32 = 98;
pub const MAX_CONFIDENCE: u32 = 95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub inputs: ScenarioInputs,
    pub high_risk_areas: u32,
    pub evacuation_minutes: u32,
    /// percent
    pub incident_probability: u32,
    /// percent
    pub confidence: u32,
    pub driver: Driver,
    pub completed_at: DateTime<Utc>,
}

/// Score a scenario. Only called on an explicit run.
pub fn run_simulation(inputs: &ScenarioInputs, at: DateTime<Utc>) -> SimulationResult {
    let inputs = inputs.clamped();
    let ScenarioInputs {
        duration: d,
        intensity: i,
        magnitude: m,
        soil: s,
        wind: w,
    } = inputs;

    let high = (i / 10.0 + m * 2.2 + s / 25.0 + w / 50.0 + d / 8.0)
        .floor()
        .clamp(0.0, MAX_HIGH_RISK_AREAS as f64);
    let evac = (35.0 - i / 5.0 - m * 2.8 - s / 40.0)
        .floor()
        .max(MIN_EVACUATION_MINUTES as f64);
    let probability = (d / 1.6 + i / 3.5 + m * 9.0 + s / 4.0 + w / 6.0)
        .floor()
        .clamp(0.0, MAX_INCIDENT_PROBABILITY as f64);
    let confidence = (55.0 + ((i / 2.0 + m * 6.0 + s / 2.0 + w / 3.0) / 4.0).round())
        .min(MAX_CONFIDENCE as f64);

    SimulationResult {
        inputs,
        high_risk_areas: high as u32,
        evacuation_minutes: evac as u32,
        incident_probability: probability as u32,
        confidence: confidence as u32,
        driver: dominant_driver(i, m, s, w),
        completed_at: at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 20, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_default_driver_is_seismic() {
        let inp = ScenarioInputs::default();
        let terms = driver_terms(inp.intensity, inp.magnitude, inp.soil, inp.wind);
        assert!((terms[0].1 - 0.095).abs() < 1e-9);
        assert!((terms[2].1 - 0.132).abs() < 1e-9);
        assert!((terms[3].1 - 0.04).abs() < 1e-9);
        assert_eq!(
            dominant_driver(inp.intensity, inp.magnitude, inp.soil, inp.wind),
            Driver::Seismic
        );
    }

    #[test]
    fn test_rainfall_can_dominate() {
        assert_eq!(dominant_driver(200.0, 1.0, 0.0, 0.0), Driver::Rainfall);
        assert_eq!(dominant_driver(0.0, 1.0, 100.0, 0.0), Driver::SoilSaturation);
        assert_eq!(dominant_driver(0.0, 0.0, 0.0, 120.0), Driver::WindGusts);
    }

    #[test]
    fn test_default_simulation_result() {
        let r = run_simulation(&ScenarioInputs::default(), at());
        assert_eq!(r.high_risk_areas, 25);
        assert_eq!(r.evacuation_minutes, 5);
        assert_eq!(r.incident_probability, 98);
        assert_eq!(r.confidence, 82);
        assert_eq!(r.driver, Driver::Seismic);
        assert_eq!(r.completed_at, at());
    }

    #[test]
    fn test_result_clamps_hold_at_extremes() {
        let calm = ScenarioInputs::new(1.0, 1.0, 1.0, 0.0, 0.0);
        let r = run_simulation(&calm, at());
        assert!(r.evacuation_minutes > 30);
        assert_eq!(r.high_risk_areas, 2);

        let storm = ScenarioInputs::new(72.0, 200.0, 9.0, 100.0, 120.0);
        let r = run_simulation(&storm, at());
        assert_eq!(r.evacuation_minutes, MIN_EVACUATION_MINUTES);
        assert_eq!(r.incident_probability, MAX_INCIDENT_PROBABILITY);
        assert_eq!(r.confidence, MAX_CONFIDENCE);
        assert!(r.high_risk_areas <= MAX_HIGH_RISK_AREAS);
    }

    #[test]
    fn test_inputs_clamped() {
        let inp = ScenarioInputs::new(0.0, 500.0, f64::NAN, -3.0, 1_000.0);
        assert_eq!(inp.duration, 1.0);
        assert_eq!(inp.intensity, 200.0);
        assert_eq!(inp.magnitude, 1.0);
        assert_eq!(inp.soil, 0.0);
        assert_eq!(inp.wind, 120.0);
    }

    #[test]
    fn test_from_pairs() {
        let inp = ScenarioInputs::from_pairs([("intensity", "120"), ("other", "x"), ("wind", "500")]).unwrap();
        assert_eq!(inp.intensity, 120.0);
        assert_eq!(inp.wind, 120.0);
        assert_eq!(inp.duration, 24.0);

        assert!(ScenarioInputs::from_pairs([("soil", "wet")]).is_err());
        assert!(ScenarioInputs::from_pairs([("soil", "inf")]).is_err());
    }

    #[test]
    fn test_default_zone_counts() {
        let c = zone_counts(&ScenarioInputs::default());
        assert_eq!(c.high, 19);
        assert_eq!(c.medium, 19);
        assert_eq!(c.low, 19);
        assert!(c.safe >= 2);
    }

    #[test]
    fn test_safe_zone_floor() {
        let c = zone_counts(&ScenarioInputs::new(72.0, 200.0, 9.0, 100.0, 120.0));
        assert_eq!(c.safe, 2);
        let c = zone_counts(&ScenarioInputs::new(1.0, 1.0, 1.0, 0.0, 0.0));
        assert_eq!(c.safe, 8);
    }

    #[test]
    fn test_zone_field_layout() {
        let inp = ScenarioInputs::default();
        let zones = zone_field(&inp);
        let counts = zone_counts(&inp);
        assert_eq!(zones.len(), counts.total());
        assert_eq!(zones[0].id, "high-0");
        assert_eq!(zones.last().unwrap().kind, ZoneKind::Safe);

        for z in &zones {
            assert!(z.left >= 10.0 && z.left < 90.0);
            assert!(z.top >= 10.0 && z.top < 90.0);
            let (base, spread) = z.kind.size_range();
            assert!(z.size >= base && z.size < base + spread);
            if z.kind == ZoneKind::High {
                assert!(z.reason.split("; ").count() >= 2, "{}", z.reason);
            }
            assert!(z.reason.split("; ").count() <= 3);
        }
    }

    #[test]
    fn test_zone_field_reproducible() {
        let inp = ScenarioInputs::new(10.0, 80.0, 3.2, 45.0, 90.0);
        assert_eq!(zone_field(&inp), zone_field(&inp));
    }

    #[test]
    fn test_zone_reason_rules() {
        assert_eq!(
            zone_reason(ZoneKind::High, 10.0, 7.0, 10.0, 10.0),
            "recent tremors M7.0; combined stressors"
        );
        assert_eq!(
            zone_reason(ZoneKind::Low, 150.0, 6.0, 70.0, 90.0),
            "heavy rainfall 150 mm/hr; recent tremors M6.0; soil saturation 70%"
        );
    }

    #[test]
    fn test_tooltip() {
        let zones = zone_field(&ScenarioInputs::default());
        let safe = zones.iter().find(|z| z.kind == ZoneKind::Safe).unwrap();
        assert_eq!(safe.tooltip(), "Safe zone");
        assert!(zones[0].tooltip().starts_with("Reason: "));
    }
}
