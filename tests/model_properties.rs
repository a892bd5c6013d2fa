//! Model properties that must hold for any clock time or slider position.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use rockguard::forecast::{build_series, NOW_INDEX, NOW_LABEL, SERIES_LEN};
use rockguard::routes::Route;
use rockguard::scenario::{
    run_simulation, zone_counts, zone_field, Driver, Param, ScenarioInputs, MAX_CONFIDENCE,
    MAX_INCIDENT_PROBABILITY, MIN_EVACUATION_MINUTES,
};
use rockguard::sectors::{generate_sectors, RiskCounts, RiskLevel, SECTOR_COUNT};
use rockguard::seeded::seeded;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// A spread of clock times across several days.
fn sample_times() -> Vec<DateTime<Utc>> {
    (0..96).map(|h| base() + Duration::minutes(h * 47)).collect()
}

#[test]
fn generator_is_deterministic_and_in_range() {
    for i in -500..500 {
        let seed = i as f64 * 3.7;
        let v = seeded(seed);
        assert!((0.0..1.0).contains(&v), "seed {} gave {}", seed, v);
        assert_eq!(v, seeded(seed));
    }
}

#[test]
fn sectors_are_stable_within_an_hour() {
    let start = base();
    let first = generate_sectors(start);
    for minute in [1, 17, 30, 59] {
        assert_eq!(generate_sectors(start + Duration::minutes(minute)), first);
    }
}

#[test]
fn sector_levels_agree_with_scores() {
    for ts in sample_times() {
        let sectors = generate_sectors(ts);
        assert_eq!(sectors.len(), SECTOR_COUNT as usize);
        for s in &sectors {
            assert!(s.score <= 100);
            assert_eq!(s.risk, RiskLevel::from_score(s.score));
            assert!(!s.reason.is_empty());
        }
        let counts = RiskCounts::from_sectors(&sectors);
        assert_eq!(counts.total(), SECTOR_COUNT as usize);
    }
}

#[test]
fn threshold_boundaries() {
    assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(69), RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_score(40), RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
}

#[test]
fn series_has_complementary_rows_and_chains_from_now() {
    for ts in sample_times() {
        let series = build_series(ts, &utc());
        assert_eq!(series.len(), SERIES_LEN);
        assert_eq!(series.labels[NOW_INDEX], NOW_LABEL);
        for i in 0..SERIES_LEN {
            assert!(series.past[i].is_some() ^ series.future[i].is_some(), "index {}", i);
        }
        assert!(series.past[..=NOW_INDEX].iter().all(Option::is_some));
        assert!(series.future[NOW_INDEX + 1..].iter().all(Option::is_some));
        for v in series.future.iter().flatten() {
            assert!((5..=95).contains(v));
        }
        assert_eq!(series.points().count(), SERIES_LEN);
    }
}

#[test]
fn simulation_clamps_hold_across_slider_bounds() {
    let corners = |p: Param| {
        let b = p.bounds();
        [b.min, (b.min + b.max) / 2.0, b.max]
    };
    for d in corners(Param::Duration) {
        for i in corners(Param::Intensity) {
            for m in corners(Param::Magnitude) {
                for s in corners(Param::Soil) {
                    for w in corners(Param::Wind) {
                        let inputs = ScenarioInputs::new(d, i, m, s, w);
                        let r = run_simulation(&inputs, base());
                        assert!(r.evacuation_minutes >= MIN_EVACUATION_MINUTES);
                        assert!(r.incident_probability <= MAX_INCIDENT_PROBABILITY);
                        assert!(r.confidence <= MAX_CONFIDENCE);
                        assert!(r.high_risk_areas <= 50);
                        assert_eq!(zone_field(&inputs).len(), zone_counts(&inputs).total());
                    }
                }
            }
        }
    }
}

#[test]
fn default_scenario_is_driven_by_seismic() {
    let r = run_simulation(&ScenarioInputs::default(), base());
    assert_eq!(r.driver, Driver::Seismic);
    assert_eq!(r.driver.to_string(), "Seismic");
}

#[test]
fn out_of_range_inputs_are_clamped() {
    let inputs = ScenarioInputs::new(500.0, -3.0, f64::NAN, 101.0, 1e9);
    for p in Param::ALL {
        let b = p.bounds();
        let v = inputs.get(p);
        assert!(v >= b.min && v <= b.max, "{:?} = {}", p, v);
    }
}

#[test]
fn unknown_routes_are_not_found() {
    assert_eq!(Route::resolve("/"), Route::Dashboard);
    assert_eq!(Route::resolve("/risk-map/"), Route::RiskMap);
    assert_eq!(Route::resolve("/incidents?id=3"), Route::Incidents);
    assert_eq!(Route::resolve("/does-not-exist"), Route::NotFound);
    assert_eq!(Route::resolve("/risk-map/extra"), Route::NotFound);
}

#[test]
fn series_exists_at_calendar_limits() {
    for ts in [DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC] {
        let series = build_series(ts, &utc());
        assert_eq!(series.len(), SERIES_LEN);
        assert_eq!(series.now_value(), series.past[NOW_INDEX]);
        assert!(series.future[NOW_INDEX + 1..].iter().all(Option::is_some));
    }
}
