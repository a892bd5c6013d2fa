//! Environmental factor vectors for the sector classifier.
//!
//! Each sector pass draws five factors from the seeded generator, keyed by the
//! hour bucket and the sector index. The multipliers differ per factor so the
//! draws decorrelate.

use serde::{Deserialize, Serialize};

use crate::seeded::seeded;

pub const SLOPE_MIN_DEG: f64 = 15.0;
pub const SLOPE_MAX_DEG: f64 = 50.0;
pub const RAINFALL_MAX_MM_HR: f64 = 160.0;
pub const WIND_MAX: f64 = 100.0;
pub const SEISMIC_MAX: f64 = 8.0;

pub const WEIGHT_RAINFALL: f64 = 0.35;
pub const WEIGHT_SEISMIC: f64 = 0.25;
pub const WEIGHT_SLOPE: f64 = 0.20;
pub const WEIGHT_SOIL: f64 = 0.15;
pub const WEIGHT_WIND: f64 = 0.05;

/// Environmental factor, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Rainfall,
    Seismic,
    Slope,
    SoilSaturation,
    Wind,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Rainfall,
        Factor::Seismic,
        Factor::Slope,
        Factor::SoilSaturation,
        Factor::Wind,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            Factor::Rainfall => WEIGHT_RAINFALL,
            Factor::Seismic => WEIGHT_SEISMIC,
            Factor::Slope => WEIGHT_SLOPE,
            Factor::SoilSaturation => WEIGHT_SOIL,
            Factor::Wind => WEIGHT_WIND,
        }
    }

    /// Normalized level above which the factor is named in a reason.
    pub fn reason_threshold(&self) -> f64 {
        match self {
            Factor::Rainfall => 0.6,
            Factor::Seismic => 0.5,
            Factor::Slope => 0.6,
            Factor::SoilSaturation => 0.65,
            Factor::Wind => 0.7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Rainfall => "rainfall",
            Factor::Seismic => "seismic",
            Factor::Slope => "slope",
            Factor::SoilSaturation => "soil saturation",
            Factor::Wind => "wind",
        }
    }
}

/// Raw factor values in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorVector {
    pub slope_deg: f64,
    /// 0..=1
    pub soil_saturation: f64,
    pub rainfall_mm_hr: f64,
    pub wind: f64,
    pub seismic_magnitude: f64,
}

impl FactorVector {
    /// Draw the factors for sector `index` in hour bucket `hour`.
    pub fn draw(hour: i64, index: u32) -> Self {
        let h = hour as f64;
        let i = index as f64;
        let s_slope = seeded(h * 31.0 + i * 7.0);
        let s_soil = seeded(h * 17.0 + i * 13.0);
        let s_rain = seeded(h * 11.0 + i * 19.0);
        let s_wind = seeded(h * 23.0 + i * 29.0);
        let s_seis = seeded(h * 3.0 + i * 37.0);

        Self {
            slope_deg: SLOPE_MIN_DEG + s_slope * (SLOPE_MAX_DEG - SLOPE_MIN_DEG),
            soil_saturation: s_soil,
            rainfall_mm_hr: s_rain * RAINFALL_MAX_MM_HR,
            wind: s_wind * WIND_MAX,
            seismic_magnitude: s_seis * SEISMIC_MAX,
        }
    }

    /// Factor scaled to [0, 1] by its range maximum.
    pub fn normalized(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Rainfall => self.rainfall_mm_hr / RAINFALL_MAX_MM_HR,
            Factor::Seismic => self.seismic_magnitude / SEISMIC_MAX,
            Factor::Slope => self.slope_deg / SLOPE_MAX_DEG,
            Factor::SoilSaturation => self.soil_saturation,
            Factor::Wind => self.wind / WIND_MAX,
        }
    }

    pub fn contribution(&self, factor: Factor) -> f64 {
        factor.weight() * self.normalized(factor)
    }

    pub fn contributions(&self) -> [(Factor, f64); 5] {
        Factor::ALL.map(|f| (f, self.contribution(f)))
    }

    /// Weighted sum in [0, 1].
    pub fn weighted_score(&self) -> f64 {
        self.contributions().iter().map(|(_, c)| c).sum()
    }

    pub fn dominant(&self) -> Factor {
        dominant(&self.contributions()).unwrap_or(Factor::Rainfall)
    }
}

/// Key with the largest weight. Ties go to the earliest entry.
pub fn dominant<K: Copy>(terms: &[(K, f64)]) -> Option<K> {
    let mut best: Option<(K, f64)> = None;
    for &(key, value) in terms {
        match best {
            Some((_, v)) if value <= v => {}
            _ => best = Some((key, value)),
        }
    }
    best.map(|(k, _)| k)
}
