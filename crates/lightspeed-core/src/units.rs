//! Scalar units.
//!
//! Every physical quantity in the simulation is a plain `f64` expressed in
//! engine units: time in milliseconds, length in meters, energy in joules.
//! Formulas multiply by these constants instead of writing raw numbers so
//! that a tuning value reads as `30.0 * S` rather than `30_000.0`.
//!
//! The universe is deliberately small: light covers one meter per
//! millisecond, which keeps the light delay visible at screen scale.

/// One millisecond, the base time unit.
pub const MS: f64 = 1.0;

/// One second.
pub const S: f64 = 1000.0 * MS;

/// One meter, the base length unit.
pub const M: f64 = 1.0;

/// The speed of light (meters per millisecond).
pub const C: f64 = 1.0 * M / MS;

/// One joule, the base energy unit.
pub const J: f64 = 1.0;

/// One kilojoule.
pub const KJ: f64 = 1.0e3 * J;

/// One megajoule.
pub const MJ: f64 = 1.0e6 * J;
