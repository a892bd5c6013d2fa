//! Sector risk classifier.
//!
//! Maps a reference timestamp to the 36 site sectors, each with a score,
//! a risk level and a short explanation. Draws are keyed by the hour bucket,
//! so a pass anywhere inside the same clock hour yields the same list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::factors::{Factor, FactorVector};

pub const SECTOR_COUNT: u32 = 36;
pub const SECTORS_PER_ROW: u32 = 6;
pub const HOUR_MS: i64 = 3_600_000;

pub const HIGH_THRESHOLD: u8 = 70;
pub const MODERATE_THRESHOLD: u8 = 40;

const MAX_REASON_PARTS: usize = 2;
const FALLBACK_REASON: &str = "combined environmental factors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Moderate, RiskLevel::Low];

    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MODERATE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(RiskLevel::High),
            "moderate" => Some(RiskLevel::Moderate),
            "low" => Some(RiskLevel::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    pub name: String,
    pub risk: RiskLevel,
    pub score: u8,
    pub reason: String,
    pub factors: FactorVector,
}

/// Hour bucket of `ts`: whole hours since the epoch.
pub fn hour_bucket(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis().div_euclid(HOUR_MS)
}

/// Display name for sector `index` (1-based): "Sector 1A" .. "Sector 6F".
/// Index 0 is named like index 1.
pub fn sector_name(index: u32) -> String {
    let zero_based = index.saturating_sub(1);
    let row = zero_based / SECTORS_PER_ROW + 1;
    let col = (b'A' + (zero_based % SECTORS_PER_ROW) as u8) as char;
    format!("Sector {}{}", row, col)
}

/// Score in [0, 100] from a factor vector.
pub fn score(factors: &FactorVector) -> u8 {
    (factors.weighted_score() * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Explanation naming the dominant driver and any factor over its threshold.
pub fn reason(factors: &FactorVector) -> String {
    let top = factors.dominant();
    let parts: Vec<String> = Factor::ALL
        .iter()
        .filter(|&&f| f == top || factors.normalized(f) > f.reason_threshold())
        .map(|&f| describe(factors, f))
        .take(MAX_REASON_PARTS)
        .collect();

    if parts.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        parts.join("; ")
    }
}

fn describe(factors: &FactorVector, factor: Factor) -> String {
    match factor {
        Factor::Rainfall => format!("heavy rainfall {:.0} mm/hr", factors.rainfall_mm_hr),
        Factor::Seismic => format!("recent tremors M{:.1}", factors.seismic_magnitude),
        Factor::Slope => format!("steep slope {:.0}°", factors.slope_deg),
        Factor::SoilSaturation => {
            format!("high soil saturation {:.0}%", factors.soil_saturation * 100.0)
        }
        Factor::Wind => format!("strong winds {:.0} km/h", factors.wind),
    }
}

/// Classify one sector in the given hour bucket.
pub fn classify_sector(hour: i64, index: u32) -> Sector {
    let factors = FactorVector::draw(hour, index);
    let score = score(&factors);
    Sector {
        id: format!("area-{}", index),
        name: sector_name(index),
        risk: RiskLevel::from_score(score),
        score,
        reason: reason(&factors),
        factors,
    }
}

/// Full sector list for `ts`. Callers replace their previous list wholesale.
pub fn generate_sectors(ts: DateTime<Utc>) -> Vec<Sector> {
    let hour = hour_bucket(ts);
    (1..=SECTOR_COUNT).map(|i| classify_sector(hour, i)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

impl RiskCounts {
    pub fn from_sectors(sectors: &[Sector]) -> Self {
        let mut counts = RiskCounts::default();
        for s in sectors {
            match s.risk {
                RiskLevel::High => counts.high += 1,
                RiskLevel::Moderate => counts.moderate += 1,
                RiskLevel::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.moderate + self.low
    }
}

/// Sectors at `level`, highest score first.
pub fn sectors_at_level(sectors: &[Sector], level: RiskLevel) -> Vec<&Sector> {
    let mut out: Vec<&Sector> = sectors.iter().filter(|s| s.risk == level).collect();
    out.sort_by(|a, b| b.score.cmp(&a.score));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    #[test]
    fn test_threshold_edges() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
    }

    #[test]
    fn test_sector_names() {
        assert_eq!(sector_name(1), "Sector 1A");
        assert_eq!(sector_name(6), "Sector 1F");
        assert_eq!(sector_name(7), "Sector 2A");
        assert_eq!(sector_name(36), "Sector 6F");
    }

    #[test]
    fn test_sector_name_edges() {
        assert_eq!(sector_name(0), "Sector 1A");
        assert_eq!(classify_sector(0, 0).name, "Sector 1A");
        assert_eq!(sector_name(37), "Sector 7A");
        assert_eq!(sector_name(u32::MAX), "Sector 715827883C");
    }

    #[test]
    fn test_generates_36_unique_sectors() {
        let sectors = generate_sectors(at(1_753_000_000_000));
        assert_eq!(sectors.len(), 36);
        let mut names: Vec<_> = sectors.iter().map(|s| s.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 36);
        assert_eq!(sectors[0].id, "area-1");
        assert_eq!(sectors[35].id, "area-36");
    }

    #[test]
    fn test_stable_within_hour() {
        let hour_start = 487_000 * HOUR_MS;
        let a = generate_sectors(at(hour_start));
        let b = generate_sectors(at(hour_start + 59 * 60_000 + 59_999));
        assert_eq!(a, b);
    }

    #[test]
    fn test_changes_across_hours() {
        let hour_start = 487_000 * HOUR_MS;
        let a = generate_sectors(at(hour_start));
        let b = generate_sectors(at(hour_start + HOUR_MS));
        assert_ne!(a, b);
    }

    #[test]
    fn test_score_and_level_consistent() {
        for hour in 480_000..480_024 {
            for i in 1..=SECTOR_COUNT {
                let s = classify_sector(hour, i);
                assert!(s.score <= 100);
                assert_eq!(s.risk, RiskLevel::from_score(s.score));
                assert_eq!(s.score, score(&s.factors));
            }
        }
    }

    #[test]
    fn test_reason_has_at_most_two_parts() {
        for hour in 480_000..480_024 {
            for i in 1..=SECTOR_COUNT {
                let s = classify_sector(hour, i);
                assert!(!s.reason.is_empty());
                assert!(s.reason.split("; ").count() <= 2, "{}", s.reason);
            }
        }
    }

    #[test]
    fn test_reason_leads_with_dominant_or_earlier_factor() {
        // the dominant driver always qualifies, so the reason is never the fallback
        for i in 1..=SECTOR_COUNT {
            let s = classify_sector(481_234, i);
            assert_ne!(s.reason, FALLBACK_REASON);
        }
    }

    #[test]
    fn test_reason_for_known_vector() {
        let f = FactorVector {
            slope_deg: 45.0,
            soil_saturation: 0.2,
            rainfall_mm_hr: 150.0,
            wind: 10.0,
            seismic_magnitude: 1.0,
        };
        // rain dominates, slope 0.9 > 0.6
        assert_eq!(reason(&f), "heavy rainfall 150 mm/hr; steep slope 45°");
    }

    #[test]
    fn test_counts_and_filter() {
        let sectors = generate_sectors(at(1_753_000_000_000));
        let counts = RiskCounts::from_sectors(&sectors);
        assert_eq!(counts.total(), 36);
        for level in RiskLevel::ALL {
            let list = sectors_at_level(&sectors, level);
            assert_eq!(list.len(), counts.get(level));
            assert!(list.iter().all(|s| s.risk == level));
            assert!(list.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(RiskLevel::parse("HIGH"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("medium"), None);
    }
}
