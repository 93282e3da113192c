//! RML evaluation error types

use thiserror::Error;

/// RML evaluation errors
///
/// An expression that yields zero candidate values for a record is not an
/// error; evaluation returns `Ok(vec![])` in that case.
#[derive(Debug, Error)]
pub enum RmlError {
    /// Malformed or unsupported expression shape
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Expression nesting exceeded the configured recursion limit
    #[error("Configuration error: expression nesting exceeds depth limit of {limit}")]
    DepthExceeded { limit: usize },

    /// A non-null raw value cannot be rendered as a string
    #[error("Cannot coerce value of '{name}' to a string: {message}")]
    Coercion { name: String, message: String },

    /// Failure reported by the function-invocation collaborator
    #[error(transparent)]
    Function(#[from] FunctionError),

    /// Invalid evaluator configuration document
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RmlError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        RmlError::Configuration(message.into())
    }

    /// Create a coercion error for a field
    pub fn coercion(name: impl Into<String>, message: impl Into<String>) -> Self {
        RmlError::Coercion {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a fatal mapping-authoring defect
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RmlError::Configuration(_) | RmlError::DepthExceeded { .. }
        )
    }

    /// Check if this error is a per-value coercion failure
    pub fn is_coercion(&self) -> bool {
        matches!(self, RmlError::Coercion { .. })
    }
}

/// Error raised by a function invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Function <{function}> failed: {message}")]
pub struct FunctionError {
    /// Identifier (IRI) of the function that failed
    pub function: String,
    /// Failure description
    pub message: String,
}

impl FunctionError {
    pub fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// Result type for RML operations
pub type RmlResult<T> = Result<T, RmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(RmlError::configuration("bad").is_configuration());
        assert!(RmlError::DepthExceeded { limit: 4 }.is_configuration());
        assert!(!RmlError::coercion("a", "object").is_configuration());
        assert!(RmlError::coercion("a", "object").is_coercion());
    }

    #[test]
    fn test_function_error_propagates_unchanged() {
        let err: RmlError = FunctionError::new("http://example.org/fn", "boom").into();
        match err {
            RmlError::Function(inner) => {
                assert_eq!(inner, FunctionError::new("http://example.org/fn", "boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
