//! Level and time conversions shared by the parameter and gain modules.
//!
//! [`db_to_gain`] is what the audio path uses: a dB setting becomes a linear
//! factor, and anything at or below the floor becomes exact silence.
//! [`db_to_linear`] and [`linear_to_db`] are the plain conversions without
//! a floor. [`ms_to_samples`] sizes ramps; [`flush_denormal`] keeps decaying
//! products out of the subnormal range.

use libm::{expf, logf};

/// Default silence floor in dB.
///
/// Any level at or below this value converts to a linear gain of exactly
/// `0.0` in [`db_to_gain`].
pub const DEFAULT_FLOOR_DB: f32 = -60.0;

/// `10^(db/20)`.
///
/// ```rust
/// use gainstage_core::db_to_linear;
///
/// assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-5);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const LN10_OVER_20: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * LN10_OVER_20)
}

/// `20 * log10(linear)`. Non-positive input reads as -200 dB.
///
/// ```rust
/// use gainstage_core::linear_to_db;
///
/// assert!((linear_to_db(2.0) - 6.0206).abs() < 1e-3);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const TWENTY_OVER_LN10: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * TWENTY_OVER_LN10
}

/// Convert decibels to linear gain, mapping anything at or below `floor_db`
/// to exact silence.
///
/// This is the conversion applied where a control value leaves the
/// parameter store and enters the audio path. Without the floor, a -60 dB
/// setting would still leak `0.001` of the signal, and deeper settings
/// would produce gains that drift toward the subnormal range.
///
/// # Example
/// ```rust
/// use gainstage_core::{db_to_gain, DEFAULT_FLOOR_DB};
///
/// assert_eq!(db_to_gain(-60.0, DEFAULT_FLOOR_DB), 0.0);
/// assert_eq!(db_to_gain(-90.0, DEFAULT_FLOOR_DB), 0.0);
/// assert!((db_to_gain(0.0, DEFAULT_FLOOR_DB) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn db_to_gain(db: f32, floor_db: f32) -> f32 {
    if db <= floor_db || db.is_nan() {
        0.0
    } else {
        db_to_linear(db)
    }
}

/// Duration in (fractional) samples at `sample_rate`.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Zero anything smaller in magnitude than `1e-20`.
///
/// Keeps products of very small gains from reaching subnormal floats,
/// which are slow on most CPUs.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
