//! Stateless seeded generator used by every synthetic series in the model.
//!
//! `seeded(seed)` is the fractional part of `sin(seed) * 10000`. It carries no
//! state between calls, so the same seed always reproduces the same draw.
//! Keys built from an hour bucket make values stable within a clock hour.

/// Draw a value in `[0, 1)` for `seed`.
pub fn seeded(seed: f64) -> f64 {
    if !seed.is_finite() {
        return 0.0;
    }
    let x = seed.sin() * 10_000.0;
    let frac = x - x.floor();
    // x just below zero can round up to exactly 1.0
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

/// Zero-mean perturbation of total width `amplitude * 2` keyed by `seed`.
pub fn jitter(seed: f64, amplitude: f64) -> f64 {
    (seeded(seed) - 0.5) * amplitude * 2.0
}
