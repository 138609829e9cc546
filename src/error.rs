//! Error types for the Disposable Income Projection Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading a tax-year
//! configuration or running a projection.

use thiserror::Error;

/// The main error type for the Disposable Income Projection Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use nl_income_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/brackets.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/brackets.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates a structural rule
    /// (unsorted brackets, gaps between credit phases, rising tier rates, ...).
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the violated rule.
        message: String,
    },

    /// The requested eligibility profile is not defined in the configuration.
    #[error("Eligibility profile not found: {name}")]
    EligibilityProfileNotFound {
        /// The profile name that was requested.
        name: String,
    },

    /// An input value was outside its valid domain.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for building an [`EngineError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_message() {
        let error = EngineError::invalid_config("brackets must be sorted ascending");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: brackets must be sorted ascending"
        );
    }

    #[test]
    fn test_eligibility_profile_not_found_displays_name() {
        let error = EngineError::EligibilityProfileNotFound {
            name: "unknown".to_string(),
        };
        assert_eq!(error.to_string(), "Eligibility profile not found: unknown");
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("horizon_years", "must be at least 1");
        assert_eq!(
            error.to_string(),
            "Invalid input 'horizon_years': must be at least 1"
        );
    }

    #[test]
    fn test_calculation_error_displays_message() {
        let error = EngineError::CalculationError {
            message: "year overflow".to_string(),
        };
        assert_eq!(error.to_string(), "Calculation error: year overflow");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_input() -> EngineResult<()> {
            Err(EngineError::invalid_input("age", "negative"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_input()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(EngineError::InvalidInput { .. })
        ));
    }
}
