//! Configuration validation.
//!
//! Sections implement [`Validate`]; a section that finds several problems
//! reports them together as [`ValidationError::Multiple`].

use thiserror::Error;

use crate::config::ObservabilityConfig;

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Field names mentioned by this error, flattened.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::MissingField { field } | Self::InvalidValue { field, .. } => vec![field.as_str()],
            Self::Conflict { .. } => Vec::new(),
            Self::Multiple(errors) => errors.iter().flat_map(|e| e.fields()).collect(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

/// Fold collected errors into a single result.
pub fn collect_errors(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else if errors.len() == 1 {
        Err(errors.remove(0))
    } else {
        Err(ValidationError::Multiple(errors))
    }
}

/// Require `value` to be finite and inside `[min, max]`.
pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: "must be a finite number".into(),
        });
    }
    if value < min || value > max {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: format!("must be between {} and {}, got {}", min, max, value),
        });
    }
    Ok(())
}

/// Require `value` to be finite and strictly positive.
pub fn check_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: format!("must be greater than 0, got {}", value),
        });
    }
    Ok(())
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_valid_default_observability() {
        assert!(ObservabilityConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = ObservabilityConfig {
            log_level: "verbose".into(),
            ..Default::default()
        };
        let result = config.validate();
        if let Err(ValidationError::InvalidValue { field, .. }) = result {
            assert_eq!(field, "observability.log_level");
        } else {
            panic!("expected InvalidValue, got {:?}", result);
        }
    }

    #[test]
    fn test_collect_errors() {
        assert!(collect_errors(Vec::new()).is_ok());

        let single = collect_errors(vec![ValidationError::MissingField { field: "a".into() }]);
        assert!(matches!(single, Err(ValidationError::MissingField { .. })));

        let many = collect_errors(vec![
            ValidationError::MissingField { field: "a".into() },
            ValidationError::InvalidValue {
                field: "b".into(),
                reason: "bad".into(),
            },
        ]);
        let err = many.unwrap_err();
        assert!(matches!(err, ValidationError::Multiple(ref v) if v.len() == 2));
        assert_eq!(err.fields(), vec!["a", "b"]);
    }

    #[test_case(0.5, true ; "inside")]
    #[test_case(0.0, true ; "lower bound")]
    #[test_case(1.0, true ; "upper bound")]
    #[test_case(-0.1, false ; "below")]
    #[test_case(f64::NAN, false ; "nan")]
    fn test_check_range(value: f64, ok: bool) {
        assert_eq!(check_range("x", value, 0.0, 1.0).is_ok(), ok);
    }

    #[test]
    fn test_check_positive() {
        assert!(check_positive("x", 0.1).is_ok());
        assert!(check_positive("x", 0.0).is_err());
        assert!(check_positive("x", f64::INFINITY).is_err());
    }
}
