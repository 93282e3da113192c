//! Function invocation
//!
//! Function calls are opaque to the evaluator: arguments are evaluated to
//! strings and handed to a [`FunctionInvoker`], whose result is used as is.
//! [`FunctionRegistry`] is a simple in-memory invoker keyed by function IRI.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::FunctionError;

/// Evaluated input binding of a function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedArgument<'a> {
    /// Parameter identifier (IRI)
    pub parameter: &'a str,
    /// Values produced by the argument expression, in order
    pub values: Vec<String>,
}

impl EvaluatedArgument<'_> {
    /// First value, for single-valued parameters
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Find the argument bound to a parameter
pub fn find_argument<'s, 'a>(
    arguments: &'s [EvaluatedArgument<'a>],
    parameter: &str,
) -> Option<&'s EvaluatedArgument<'a>> {
    arguments.iter().find(|arg| arg.parameter == parameter)
}

/// Function-invocation collaborator
pub trait FunctionInvoker: Send + Sync {
    /// Invoke `function` with evaluated arguments
    fn invoke(
        &self,
        function: &str,
        arguments: &[EvaluatedArgument<'_>],
    ) -> Result<Vec<String>, FunctionError>;
}

type FunctionImpl =
    dyn Fn(&[EvaluatedArgument<'_>]) -> Result<Vec<String>, String> + Send + Sync;

/// In-memory function registry
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<FunctionImpl>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its IRI, replacing any previous binding
    pub fn register<F>(&mut self, function: impl Into<String>, f: F)
    where
        F: Fn(&[EvaluatedArgument<'_>]) -> Result<Vec<String>, String> + Send + Sync + 'static,
    {
        self.functions.insert(function.into(), Arc::new(f));
    }

    /// Register a function, builder style
    pub fn with<F>(mut self, function: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[EvaluatedArgument<'_>]) -> Result<Vec<String>, String> + Send + Sync + 'static,
    {
        self.register(function, f);
        self
    }

    /// Check if a function is registered
    pub fn contains(&self, function: &str) -> bool {
        self.functions.contains_key(function)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FunctionInvoker for FunctionRegistry {
    fn invoke(
        &self,
        function: &str,
        arguments: &[EvaluatedArgument<'_>],
    ) -> Result<Vec<String>, FunctionError> {
        let f = self
            .functions
            .get(function)
            .ok_or_else(|| FunctionError::new(function, "function is not registered"))?;
        f(arguments).map_err(|message| FunctionError::new(function, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPPER: &str = "http://example.org/fn#upper";
    const INPUT: &str = "http://example.org/fn#input";

    fn registry() -> FunctionRegistry {
        FunctionRegistry::new().with(UPPER, |args| {
            let input = find_argument(args, INPUT).ok_or("missing input")?;
            Ok(input.values.iter().map(|v| v.to_uppercase()).collect())
        })
    }

    #[test]
    fn test_invoke_registered() {
        let args = [EvaluatedArgument {
            parameter: INPUT,
            values: vec!["a".to_string(), "b".to_string()],
        }];
        assert_eq!(registry().invoke(UPPER, &args).unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_invoke_failure() {
        let err = registry().invoke(UPPER, &[]).unwrap_err();
        assert_eq!(err, FunctionError::new(UPPER, "missing input"));
    }

    #[test]
    fn test_invoke_unknown() {
        let err = registry()
            .invoke("http://example.org/fn#nope", &[])
            .unwrap_err();
        assert_eq!(err.function, "http://example.org/fn#nope");
    }

    #[test]
    fn test_first_value() {
        let arg = EvaluatedArgument {
            parameter: INPUT,
            values: vec![],
        };
        assert_eq!(arg.first(), None);
    }
}
