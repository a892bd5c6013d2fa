use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file holding display preferences
    pub db_path: String,
    pub refresh_secs: u64,
    /// Display timezone for hour-of-day and chart labels
    pub utc_offset_hours: i32,
    /// Dashboard redraws before exiting; 0 runs until interrupted
    pub render_ticks: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "rockguard.db".to_string(),
            refresh_secs: 60,
            utc_offset_hours: 0,
            render_ticks: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            db_path: std::env::var("ROCKGUARD_DB").unwrap_or(d.db_path),
            refresh_secs: env_or("REFRESH_SECS", d.refresh_secs).max(1),
            utc_offset_hours: env_or("UTC_OFFSET_HOURS", d.utc_offset_hours),
            render_ticks: env_or("RENDER_TICKS", d.render_ticks),
        }
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    /// Out-of-range offsets fall back to UTC.
    pub fn display_offset(&self) -> FixedOffset {
        offset_from_hours(self.utc_offset_hours)
    }
}

pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(utc_offset)
}

pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.refresh_period(), Duration::from_secs(60));
        assert_eq!(cfg.display_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_offset_range() {
        assert_eq!(offset_from_hours(5).local_minus_utc(), 5 * 3600);
        assert_eq!(offset_from_hours(-8).local_minus_utc(), -8 * 3600);
        assert_eq!(offset_from_hours(30).local_minus_utc(), 0);
        assert_eq!(offset_from_hours(i32::MAX).local_minus_utc(), 0);
    }
}
