//! Engine configuration validation.
//!
//! [`validate_config`] checks a parsed [`EngineConfig`] for every mistake that
//! would otherwise surface later as a declaration failure or as a silently
//! broken control: empty or duplicate ids, non-finite numbers, inverted
//! ranges, defaults outside their range, and unusable smoothing settings.
//! All problems are collected, not just the first.
//!
//! # Example
//!
//! ```rust
//! use gainstage_config::{EngineConfig, ValidationError, validate_config};
//!
//! let mut config = EngineConfig::default();
//! validate_config(&config).expect("default config is valid");
//!
//! config.smoothing.ramp_ms = -1.0;
//! assert_eq!(
//!     validate_config(&config),
//!     Err(ValidationError::NegativeRampTime(-1.0))
//! );
//! ```

use std::collections::BTreeSet;

use thiserror::Error;

use crate::config::{EngineConfig, ParamConfig};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A parameter entry has an empty identifier.
    #[error("parameter #{index} has an empty id")]
    EmptyId {
        /// Position of the entry in the `parameters` list.
        index: usize,
    },

    /// Two parameter entries share an identifier.
    #[error("duplicate parameter id '{0}'")]
    DuplicateId(String),

    /// A numeric field is NaN or infinite.
    #[error("parameter '{id}' field '{field}' is not a finite number")]
    NonFinite {
        /// Identifier of the offending parameter.
        id: String,
        /// Name of the field.
        field: &'static str,
    },

    /// `min` is not below `max`.
    #[error("parameter '{id}' range is empty or inverted: [{min}, {max}]")]
    InvalidRange {
        /// Identifier of the offending parameter.
        id: String,
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },

    /// Default value outside the declared range.
    #[error("parameter '{id}' default {default} out of range [{min}, {max}]")]
    DefaultOutOfRange {
        /// Identifier of the offending parameter.
        id: String,
        /// Configured default.
        default: f32,
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },

    /// Negative step size.
    #[error("parameter '{id}' step {step} is negative")]
    NegativeStep {
        /// Identifier of the offending parameter.
        id: String,
        /// Configured step.
        step: f32,
    },

    /// Skew factor that is zero or negative.
    #[error("parameter '{id}' skew {skew} must be positive")]
    InvalidSkew {
        /// Identifier of the offending parameter.
        id: String,
        /// Configured skew.
        skew: f32,
    },

    /// Ramp time below zero or not finite.
    #[error("smoothing ramp time {0} ms must be a non-negative number")]
    NegativeRampTime(f32),

    /// Silence floor that is NaN or infinite.
    #[error("smoothing floor {0} dB is not a finite number")]
    NonFiniteFloor(f32),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate one parameter entry, appending every problem found to `errors`.
fn check_param(index: usize, param: &ParamConfig, errors: &mut Vec<ValidationError>) {
    if param.id.trim().is_empty() {
        errors.push(ValidationError::EmptyId { index });
        return;
    }

    let mut finite = true;
    for (field, value) in [
        ("min", param.min),
        ("max", param.max),
        ("default", param.default),
        ("step", param.step),
        ("skew", param.skew),
    ] {
        if !value.is_finite() {
            errors.push(ValidationError::NonFinite {
                id: param.id.clone(),
                field,
            });
            finite = false;
        }
    }
    if !finite {
        return;
    }

    if param.min >= param.max {
        errors.push(ValidationError::InvalidRange {
            id: param.id.clone(),
            min: param.min,
            max: param.max,
        });
    } else if param.default < param.min || param.default > param.max {
        errors.push(ValidationError::DefaultOutOfRange {
            id: param.id.clone(),
            default: param.default,
            min: param.min,
            max: param.max,
        });
    }

    if param.step < 0.0 {
        errors.push(ValidationError::NegativeStep {
            id: param.id.clone(),
            step: param.step,
        });
    }

    if param.skew <= 0.0 {
        errors.push(ValidationError::InvalidSkew {
            id: param.id.clone(),
            skew: param.skew,
        });
    }
}

/// Validate an entire engine configuration.
///
/// Returns the single error when exactly one problem is found, and
/// [`ValidationError::Multiple`] when there are several.
pub fn validate_config(config: &EngineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    let ramp_ms = config.smoothing.ramp_ms;
    if !(ramp_ms.is_finite() && ramp_ms >= 0.0) {
        errors.push(ValidationError::NegativeRampTime(ramp_ms));
    }
    if !config.smoothing.floor_db.is_finite() {
        errors.push(ValidationError::NonFiniteFloor(config.smoothing.floor_db));
    }

    let mut seen = BTreeSet::new();
    for (index, param) in config.parameters.iter().enumerate() {
        check_param(index, param, &mut errors);
        if !param.id.trim().is_empty() && !seen.insert(param.id.as_str()) {
            errors.push(ValidationError::DuplicateId(param.id.clone()));
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SmoothingConfig, UnitConfig};

    fn param(id: &str, min: f32, max: f32, default: f32) -> ParamConfig {
        ParamConfig {
            id: id.to_string(),
            name: String::new(),
            unit: UnitConfig::None,
            min,
            max,
            step: 0.0,
            skew: 1.0,
            default,
        }
    }

    fn config_with(parameters: Vec<ParamConfig>) -> EngineConfig {
        EngineConfig {
            smoothing: SmoothingConfig::default(),
            parameters,
        }
    }

    #[test]
    fn default_is_valid() {
        assert_eq!(validate_config(&EngineConfig::default()), Ok(()));
    }

    #[test]
    fn empty_parameter_list_is_valid() {
        assert_eq!(validate_config(&config_with(Vec::new())), Ok(()));
    }

    #[test]
    fn empty_id() {
        let config = config_with(vec![param("  ", 0.0, 1.0, 0.5)]);
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::EmptyId { index: 0 })
        );
    }

    #[test]
    fn duplicate_id() {
        let config = config_with(vec![param("mix", 0.0, 1.0, 0.5), param("mix", 0.0, 2.0, 1.0)]);
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::DuplicateId("mix".to_string()))
        );
    }

    #[test]
    fn non_finite_fields_reported_by_name() {
        let config = config_with(vec![param("x", f32::NAN, 1.0, 0.5)]);
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::NonFinite {
                id: "x".to_string(),
                field: "min"
            })
        );
    }

    #[test]
    fn inverted_and_empty_ranges() {
        for (min, max) in [(1.0, 0.0), (1.0, 1.0)] {
            let config = config_with(vec![param("x", min, max, 1.0)]);
            assert!(matches!(
                validate_config(&config),
                Err(ValidationError::InvalidRange { .. })
            ));
        }
    }

    #[test]
    fn default_out_of_range() {
        let config = config_with(vec![param("gain", -60.0, 12.0, 20.0)]);
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::DefaultOutOfRange {
                id: "gain".to_string(),
                default: 20.0,
                min: -60.0,
                max: 12.0
            })
        );
    }

    #[test]
    fn negative_step_and_bad_skew() {
        let mut p = param("x", 0.0, 1.0, 0.5);
        p.step = -0.1;
        p.skew = 0.0;
        let err = validate_config(&config_with(vec![p])).unwrap_err();
        let ValidationError::Multiple(errors) = err else {
            panic!("expected multiple errors, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::NegativeStep { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidSkew { .. }));
    }

    #[test]
    fn smoothing_checks() {
        let mut config = EngineConfig::default();
        config.smoothing.ramp_ms = f32::INFINITY;
        config.smoothing.floor_db = f32::NAN;
        let err = validate_config(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("multiple validation errors"), "got: {msg}");
        assert!(msg.contains("ramp time"), "got: {msg}");
        assert!(msg.contains("floor"), "got: {msg}");
    }

    #[test]
    fn zero_ramp_is_allowed() {
        let mut config = EngineConfig::default();
        config.smoothing.ramp_ms = 0.0;
        assert_eq!(validate_config(&config), Ok(()));
    }
}
