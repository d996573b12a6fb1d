//! Validation of analysis profiles.
//!
//! Checks every field of an [`AnalysisConfig`] and reports all problems at
//! once, so a hand-edited profile can be fixed in a single pass.

use espectro_analysis::{ScaleType, WindowFunction};
use thiserror::Error;

use crate::profile::{AnalysisConfig, NormalRangeConfig};

/// Errors that can occur during validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A single field holds an unusable value
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field name as it appears in the TOML file.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Multiple validation errors
    #[error("{}", format_multiple(.0))]
    Multiple(Vec<ValidationError>),
}

fn format_multiple(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Create an invalid field error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Number of individual problems carried by this error.
    pub fn count(&self) -> usize {
        match self {
            ValidationError::InvalidField { .. } => 1,
            ValidationError::Multiple(errors) => errors.iter().map(Self::count).sum(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Tail handling names accepted in profiles.
pub const TAIL_POLICIES: &[&str] = &["drop", "pad"];

/// Padding policy names accepted in profiles.
pub const PADDING_POLICIES: &[&str] = &["least-significant", "most-significant"];

/// Validate an analysis profile, collecting every problem found.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.frame_size < 2 || !config.frame_size.is_power_of_two() {
        errors.push(ValidationError::invalid(
            "frame_size",
            format!("{} is not a power of two of at least 2", config.frame_size),
        ));
    }
    if config.overlap >= config.frame_size {
        errors.push(ValidationError::invalid(
            "overlap",
            format!("must be less than frame_size ({})", config.frame_size),
        ));
    }
    if config.num_filters == Some(0) {
        errors.push(ValidationError::invalid("num_filters", "must be at least 1"));
    }
    if config.scale.parse::<ScaleType>().is_err() {
        errors.push(ValidationError::invalid(
            "scale",
            format!("unknown scale '{}'", config.scale),
        ));
    }
    if let Some(alpha) = config.window_alpha
        && !alpha.is_finite()
    {
        errors.push(ValidationError::invalid("window_alpha", "must be finite"));
    } else if let Err(e) = WindowFunction::from_name(&config.window, config.window_alpha) {
        errors.push(ValidationError::invalid("window", e.to_string()));
    }
    if !config.gain_db.is_finite() {
        errors.push(ValidationError::invalid("gain_db", "must be finite"));
    }
    if !config.range_db.is_finite() || config.range_db < 0.0 {
        errors.push(ValidationError::invalid(
            "range_db",
            "must be a non-negative number of decibels",
        ));
    }
    if !is_one_of(&config.tail, TAIL_POLICIES) {
        errors.push(ValidationError::invalid(
            "tail",
            format!("expected one of {TAIL_POLICIES:?}, got '{}'", config.tail),
        ));
    }
    if !is_one_of(&config.padding, PADDING_POLICIES) {
        errors.push(ValidationError::invalid(
            "padding",
            format!("expected one of {PADDING_POLICIES:?}, got '{}'", config.padding),
        ));
    }
    if let Some(range) = &config.normal_range {
        validate_normal_range(range, &mut errors);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn validate_normal_range(range: &NormalRangeConfig, errors: &mut Vec<ValidationError>) {
    let values = [range.min_hz, range.max_hz, range.min_db, range.max_db];
    if values.iter().any(|v| !v.is_finite()) {
        errors.push(ValidationError::invalid(
            "normal_range",
            "bounds must be finite",
        ));
        return;
    }
    if range.min_hz < 0.0 || range.min_hz > range.max_hz {
        errors.push(ValidationError::invalid(
            "normal_range.min_hz",
            "must be non-negative and not above max_hz",
        ));
    }
    if range.min_db > range.max_db {
        errors.push(ValidationError::invalid(
            "normal_range.min_db",
            "must not be above max_db",
        ));
    }
}

pub(crate) fn is_one_of(value: &str, allowed: &[&str]) -> bool {
    let value = value.trim();
    allowed.iter().any(|a| a.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn non_power_of_two_frame_size() {
        let config = AnalysisConfig {
            frame_size: 1000,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "frame_size"));
    }

    #[test]
    fn overlap_must_be_below_frame_size() {
        let config = AnalysisConfig {
            frame_size: 256,
            overlap: 256,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for 'overlap': must be less than frame_size (256)"
        );
    }

    #[test]
    fn collects_every_problem() {
        let config = AnalysisConfig {
            scale: "semitone".to_string(),
            window: "kaiser".to_string(),
            tail: "wrap".to_string(),
            range_db: -1.0,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::Multiple(_)));
        assert_eq!(err.count(), 4);
        let message = err.to_string();
        assert!(message.contains("'scale'"));
        assert!(message.contains("'window'"));
        assert!(message.contains("'tail'"));
        assert!(message.contains("'range_db'"));
        assert_eq!(message.matches("; ").count(), 3);
    }

    #[test]
    fn gauss_alpha_must_be_positive() {
        let config = AnalysisConfig {
            window: "gauss".to_string(),
            window_alpha: Some(-1.0),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "window"));
    }

    #[test]
    fn nan_alpha_rejected() {
        let config = AnalysisConfig {
            window: "blackman".to_string(),
            window_alpha: Some(f64::NAN),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidField { ref field, .. } if field == "window_alpha")
        );
    }

    #[test]
    fn policy_names_case_insensitive() {
        let config = AnalysisConfig {
            tail: "PAD".to_string(),
            padding: " Most-Significant ".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn inverted_normal_range() {
        let config = AnalysisConfig {
            normal_range: Some(NormalRangeConfig {
                min_hz: 4000.0,
                max_hz: 1000.0,
                min_db: -20.0,
                max_db: -60.0,
            }),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.count(), 2);
    }

    #[test]
    fn zero_filters_rejected() {
        let config = AnalysisConfig {
            num_filters: Some(0),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
