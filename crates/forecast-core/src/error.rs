//! Error types for forecast statistics
//!
//! Provides a unified error type for all forecast crates.

use thiserror::Error;

/// Core error type for forecast statistical operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Empty, non-finite or otherwise malformed sample data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unrecognized policy or mode, or an out-of-domain parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Paired sequences of unequal length
    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A reorder request that is not a permutation of the current values
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    /// Zero-variance (or negative-variance) data where a spread is required
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A bounded search ran out of iterations before reaching its target
    #[error("Search did not converge after {iterations} iterations: {context}")]
    NonConvergent { iterations: usize, context: String },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for empty input
    pub fn empty_input(operation: &str) -> Self {
        Self::InvalidInput(format!("{operation} requires at least one value"))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for an unrecognized option name
    pub fn unknown_option(value: &str, valid: &[&str]) -> Self {
        Self::InvalidArgument(format!(
            "\"{value}\" is not valid, use one of {}",
            valid.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("no samples".to_string());
        assert_eq!(err.to_string(), "Invalid input: no samples");

        let err = Error::LengthMismatch { expected: 10, actual: 5 };
        assert_eq!(err.to_string(), "Length mismatch: expected 10 values, got 5");

        let err = Error::NonConvergent {
            iterations: 100,
            context: "lower limit".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Search did not converge after 100 iterations: lower limit"
        );
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::empty_input("spread");
        assert_eq!(err.to_string(), "Invalid input: spread requires at least one value");

        let err = Error::non_finite("forecast members");
        assert_eq!(
            err.to_string(),
            "Invalid input: forecast members contains NaN or infinite values"
        );

        let err = Error::unknown_option("middle", &["inner", "outer"]);
        assert_eq!(
            err.to_string(),
            "Invalid argument: \"middle\" is not valid, use one of inner, outer"
        );
    }

    #[test]
    fn test_error_chaining() {
        fn inner_function() -> Result<()> {
            Err(Error::DegenerateInput("zero variance".to_string()))
        }

        fn outer_function() -> Result<()> {
            inner_function().map_err(|e| Error::InvalidInput(format!("blend failed: {e}")))
        }

        let err = outer_function().unwrap_err();
        assert!(err.to_string().contains("blend failed"));
        assert!(err.to_string().contains("zero variance"));
    }
}
