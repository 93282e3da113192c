//! Evaluator configuration
//!
//! Configuration is plain data: build it in code with the `with_*` methods or
//! load it from a JSON document with [`EvaluatorConfig::from_json`]. Missing
//! fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{RmlError, RmlResult};

/// Default bound on expression nesting (composite references, function arguments)
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// What to do with a non-null value that has no string form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoercionPolicy {
    /// Fail the whole evaluation with a coercion error
    #[default]
    Abort,
    /// Drop the offending value and log a warning
    Skip,
}

/// Configuration for expression evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluatorConfig {
    /// Maximum expression nesting depth.
    /// Default: 32
    pub max_depth: usize,

    /// Policy for values that cannot be coerced to strings.
    /// Default: abort
    pub coercion: CoercionPolicy,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            coercion: CoercionPolicy::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Load configuration from a JSON document
    pub fn from_json(json: &str) -> RmlResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RmlError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the coercion policy
    pub fn with_coercion(mut self, coercion: CoercionPolicy) -> Self {
        self.coercion = coercion;
        self
    }

    /// Check that the configuration can evaluate anything at all
    pub fn validate(&self) -> RmlResult<()> {
        if self.max_depth == 0 {
            return Err(RmlError::InvalidConfig(
                "maxDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
