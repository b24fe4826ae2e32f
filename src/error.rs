//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.
//!
//! Absent keys are deliberately *not* an error: lookups return `Option`
//! and removals return `bool`, since a miss is an expected outcome.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache library.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid configuration supplied at construction
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = CacheError::Config("capacity must be greater than zero".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: capacity must be greater than zero"
        );
    }
}
