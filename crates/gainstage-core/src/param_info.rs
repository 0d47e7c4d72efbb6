//! Parameter metadata: identity, range, unit, and normalization.
//!
//! A [`ParamDescriptor`] is everything a control surface needs to bind to a
//! parameter without touching its value: the stable string identifier used
//! for persistence, a display name, the valid range and step, the default,
//! and how the plain value maps to the host's normalized `0.0..=1.0` space.
//!
//! Descriptors are immutable once declared in a
//! [`ParameterStore`](crate::ParameterStore); the store keeps the values.
//!
//! # Example
//!
//! ```rust
//! use gainstage_core::{ParamDescriptor, ParamUnit};
//!
//! let gain = ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0);
//! assert_eq!(gain.unit, ParamUnit::Decibels);
//! assert_eq!(gain.clamp(20.0), 12.0);
//! assert_eq!(gain.format_value(-3.0), "-3.0 dB");
//! ```

/// Curve between a plain value and the host's `0.0..=1.0` control space.
///
/// With `t = (value - min) / (max - min)`:
///
/// - `Linear`: `normalized = t`
/// - `Power(skew)`: `normalized = t^(1/skew)`
///
/// `Power(1.0)` behaves like `Linear`. A skew above one spreads the top of
/// the range over more of the control's travel; below one, the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Straight line across the range.
    #[default]
    Linear,
    /// Skewed curve with the given exponent (must be positive).
    Power(f32),
}

/// What a parameter's value measures. Drives text formatting and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamUnit {
    /// Level in dB.
    Decibels,
    /// Frequency in Hz.
    Hertz,
    /// Time in ms.
    Milliseconds,
    /// Percent.
    Percent,
    /// Ratio, shown as `n:1`.
    Ratio,
    /// Dimensionless.
    #[default]
    None,
}

impl ParamUnit {
    /// Text appended to a formatted value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gainstage_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Ratio.suffix(), ":1");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Decibels => " dB",
            Self::Hertz => " Hz",
            Self::Milliseconds => " ms",
            Self::Percent => "%",
            Self::Ratio => ":1",
            Self::None => "",
        }
    }

    /// Number of decimal places used when formatting a value of this unit.
    const fn precision(&self) -> usize {
        match self {
            Self::Decibels | Self::Ratio => 1,
            Self::Hertz | Self::Milliseconds | Self::Percent => 0,
            Self::None => 2,
        }
    }
}

/// Static metadata for one parameter.
///
/// # Identifier
///
/// `id` is the stable key used by [`ParameterStore`](crate::ParameterStore)
/// lookups and by persisted state. Once shipped it must never change for a
/// given parameter, or saved sessions silently lose that value.
///
/// # Step Size
///
/// `step` is the control-surface increment. `0.0` means continuous. Direct
/// writes through the store are only clamped; normalized writes from a host
/// or slider are additionally snapped to the step grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Stable identifier (e.g. `"gain"`). Unique within a store.
    pub id: String,

    /// Human-readable name for display (e.g. `"Gain"`).
    pub name: String,

    /// What the value measures.
    pub unit: ParamUnit,

    /// Lower bound, inclusive.
    pub min: f32,

    /// Upper bound, inclusive.
    pub max: f32,

    /// Default value when the store is created or reset.
    pub default: f32,

    /// Control-surface step increment (`0.0` = continuous).
    pub step: f32,

    /// Curve used by [`normalize`](Self::normalize) and
    /// [`denormalize`](Self::denormalize).
    pub scale: ParamScale,
}

impl ParamDescriptor {
    /// Unitless, continuous, linear parameter.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.0,
            scale: ParamScale::Linear,
        }
    }

    /// Level parameter in dB with a 0.1 dB step.
    pub fn gain_db(
        id: impl Into<String>,
        name: impl Into<String>,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            unit: ParamUnit::Decibels,
            step: 0.1,
            ..Self::new(id, name, min, max, default)
        }
    }

    /// Replace the unit.
    pub fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Replace the step (`0.0` = continuous).
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Replace the normalization curve.
    pub fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Returns `true` if the range is finite and not inverted.
    pub fn has_valid_range(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Pull a value into `[min, max]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gainstage_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0);
    /// assert_eq!(desc.clamp(-3.0), -3.0);
    /// assert_eq!(desc.clamp(-75.0), -60.0);
    /// assert_eq!(desc.clamp(24.0), 12.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Snaps a value to the step grid anchored at `min`, then clamps.
    ///
    /// Continuous parameters (`step <= 0.0`) are only clamped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gainstage_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::new("n", "N", 0.0, 10.0, 0.0).with_step(0.5);
    /// assert_eq!(desc.quantize(3.3), 3.5);
    /// assert_eq!(desc.quantize(11.0), 10.0);
    /// ```
    pub fn quantize(&self, value: f32) -> f32 {
        if self.step <= 0.0 {
            return self.clamp(value);
        }
        let steps = libm::roundf((value - self.min) / self.step);
        self.clamp(self.min + steps * self.step)
    }

    /// Map a plain value into `0.0..=1.0` along [`scale`](Self::scale).
    ///
    /// A zero-width range maps everything to `0.0`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let value = self.clamp(value);
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Power(skew) => libm::powf((value - self.min) / range, 1.0 / skew),
        }
    }

    /// Map a `0.0..=1.0` control value back into `[min, max]`.
    ///
    /// Out-of-range input is clamped first.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let t = match self.scale {
            ParamScale::Linear => normalized,
            ParamScale::Power(skew) => libm::powf(normalized, skew),
        };
        self.min + t * (self.max - self.min)
    }

    /// Display text for `value`, e.g. `"6.0 dB"`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gainstage_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0);
    /// assert_eq!(desc.format_value(6.0), "6.0 dB");
    /// ```
    pub fn format_value(&self, value: f32) -> String {
        format!(
            "{value:.prec$}{suffix}",
            prec = self.unit.precision(),
            suffix = self.unit.suffix()
        )
    }

    /// Parses user-entered text into a clamped plain value.
    ///
    /// Accepts the bare number or the number followed by this parameter's
    /// unit suffix (`"-3"`, `"-3 dB"`, `"-3dB"`). Returns `None` if the text
    /// is not a finite number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gainstage_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0);
    /// assert_eq!(desc.parse_value("-3 dB"), Some(-3.0));
    /// assert_eq!(desc.parse_value("40"), Some(12.0));
    /// assert_eq!(desc.parse_value("loud"), None);
    /// ```
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let text = text.trim();
        let suffix = self.unit.suffix().trim();
        let number = if suffix.is_empty() {
            text
        } else {
            text.strip_suffix(suffix).unwrap_or(text).trim_end()
        };
        let value: f32 = number.parse().ok()?;
        value.is_finite().then(|| self.clamp(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gain() -> ParamDescriptor {
        ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0)
    }

    #[test]
    fn gain_db_fields() {
        let desc = gain();
        assert_eq!((desc.id.as_str(), desc.name.as_str()), ("gain", "Gain"));
        assert_eq!(desc.unit, ParamUnit::Decibels);
        assert_eq!((desc.min, desc.max, desc.default), (-60.0, 12.0, 0.0));
        assert_eq!(desc.step, 0.1);
        assert_eq!(desc.scale, ParamScale::Linear);
    }

    #[test]
    fn clamp_pins_to_bounds() {
        let desc = ParamDescriptor::new("trim", "Trim", -24.0, 24.0, 0.0);
        assert_eq!(desc.clamp(-24.0), -24.0);
        assert_eq!(desc.clamp(24.0), 24.0);
        assert_eq!(desc.clamp(-30.5), -24.0);
        assert_eq!(desc.clamp(1e9), 24.0);
        assert_eq!(desc.clamp(3.25), 3.25);
    }

    #[test]
    fn range_validity() {
        assert!(gain().has_valid_range());
        assert!(ParamDescriptor::new("x", "X", 1.0, 1.0, 1.0).has_valid_range());
        assert!(!ParamDescriptor::new("x", "X", 2.0, 1.0, 1.0).has_valid_range());
        assert!(!ParamDescriptor::new("x", "X", f32::NAN, 1.0, 1.0).has_valid_range());
        assert!(!ParamDescriptor::new("x", "X", 0.0, f32::INFINITY, 1.0).has_valid_range());
    }

    #[test]
    fn quantize_to_step_grid() {
        let desc = gain();
        assert!((desc.quantize(1.04) - 1.0).abs() < 1e-4);
        assert!((desc.quantize(1.06) - 1.1).abs() < 1e-4);
        assert_eq!(desc.quantize(50.0), 12.0);

        let continuous = ParamDescriptor::new("c", "C", 0.0, 1.0, 0.5);
        assert_eq!(continuous.quantize(0.123), 0.123);
    }

    #[test]
    fn linear_mapping() {
        let desc = ParamDescriptor::new("trim", "Trim", -24.0, 24.0, 0.0);
        assert_eq!(desc.normalize(-24.0), 0.0);
        assert_eq!(desc.normalize(0.0), 0.5);
        assert_eq!(desc.normalize(24.0), 1.0);
        assert_eq!(desc.denormalize(0.25), -12.0);
        assert!((desc.denormalize(desc.normalize(7.5)) - 7.5).abs() < 1e-4);
    }

    #[test]
    fn unity_sits_five_sixths_up_the_gain_range() {
        let desc = gain();
        assert_eq!(desc.normalize(-60.0), 0.0);
        assert_eq!(desc.normalize(12.0), 1.0);
        assert!((desc.normalize(0.0) - 60.0 / 72.0).abs() < 1e-6);
    }

    #[test]
    fn skewed_mapping() {
        let desc =
            ParamDescriptor::new("amt", "Amount", 0.0, 8.0, 2.0).with_scale(ParamScale::Power(3.0));
        assert_eq!(desc.normalize(0.0), 0.0);
        assert_eq!(desc.normalize(8.0), 1.0);
        // (1/8)^(1/3) = 1/2
        assert!((desc.normalize(1.0) - 0.5).abs() < 1e-5);
        assert!((desc.denormalize(0.5) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_control_values_clamp() {
        let desc = gain();
        assert_eq!(desc.normalize(40.0), 1.0);
        assert_eq!(desc.denormalize(1.5), 12.0);
        assert_eq!(desc.denormalize(-0.5), -60.0);
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        let desc = ParamDescriptor::new("pinned", "Pinned", -3.0, -3.0, -3.0);
        assert_eq!(desc.normalize(-3.0), 0.0);
        assert_eq!(desc.denormalize(0.7), -3.0);
    }

    #[test]
    fn suffixes() {
        let cases = [
            (ParamUnit::Decibels, " dB"),
            (ParamUnit::Hertz, " Hz"),
            (ParamUnit::Milliseconds, " ms"),
            (ParamUnit::Percent, "%"),
            (ParamUnit::Ratio, ":1"),
            (ParamUnit::None, ""),
        ];
        for (unit, suffix) in cases {
            assert_eq!(unit.suffix(), suffix, "{unit:?}");
        }
    }

    #[test]
    fn formatting_uses_unit_precision() {
        assert_eq!(gain().format_value(-12.34), "-12.3 dB");
        let ramp = ParamDescriptor::new("ramp", "Ramp", 0.0, 500.0, 50.0)
            .with_unit(ParamUnit::Milliseconds);
        assert_eq!(ramp.format_value(50.0), "50 ms");
        assert_eq!(ParamDescriptor::new("x", "X", 0.0, 1.0, 0.0).format_value(0.5), "0.50");
    }

    #[test]
    fn parsing_accepts_optional_suffix() {
        let desc = gain();
        assert_eq!(desc.parse_value("6"), Some(6.0));
        assert_eq!(desc.parse_value(" 6 dB "), Some(6.0));
        assert_eq!(desc.parse_value("-3.5dB"), Some(-3.5));
        assert_eq!(desc.parse_value("-100"), Some(-60.0));
        assert_eq!(desc.parse_value("inf"), None);
        assert_eq!(desc.parse_value(""), None);
    }

    #[test]
    fn formatted_text_parses_back() {
        let desc = gain();
        let text = desc.format_value(-7.5);
        assert_eq!(desc.parse_value(&text), Some(-7.5));
    }

    #[test]
    fn builders_replace_fields() {
        let desc = ParamDescriptor::new("x", "X", 0.0, 1.0, 0.5)
            .with_unit(ParamUnit::Percent)
            .with_step(0.25)
            .with_scale(ParamScale::Power(3.0));
        assert_eq!(desc.unit, ParamUnit::Percent);
        assert_eq!(desc.step, 0.25);
        assert_eq!(desc.scale, ParamScale::Power(3.0));
        assert_eq!(desc.name, "X");
    }
}
