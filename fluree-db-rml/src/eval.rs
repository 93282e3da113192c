//! Expression evaluation
//!
//! [`Evaluator`] turns an [`Expression`] and one record into the ordered list
//! of candidate term values. Each variant implements [`Evaluate`]; the
//! [`Expression`] impl dispatches over the closed variant set.
//!
//! Evaluation is synchronous and pure: no I/O, no interior state. The same
//! evaluator and the same expression tree can be shared across threads.

use std::sync::Arc;

use crate::config::{CoercionPolicy, EvaluatorConfig};
use crate::context::IterationContext;
use crate::error::{RmlError, RmlResult};
use crate::expression::{CompositeReference, Constant, Expression, FunctionCall, Reference};
use crate::function::{EvaluatedArgument, FunctionInvoker};
use crate::template::Template;

/// Evaluation state threaded through a tree walk
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    config: &'a EvaluatorConfig,
    functions: Option<&'a dyn FunctionInvoker>,
    safe: bool,
    depth: usize,
}

impl<'a> Scope<'a> {
    fn root(
        config: &'a EvaluatorConfig,
        functions: Option<&'a dyn FunctionInvoker>,
        safe: bool,
    ) -> RmlResult<Self> {
        if config.max_depth == 0 {
            return Err(RmlError::DepthExceeded { limit: 0 });
        }
        Ok(Self {
            config,
            functions,
            safe,
            depth: 1,
        })
    }

    /// Scope for a nested expression
    fn nested(&self, safe: bool) -> RmlResult<Self> {
        let depth = self.depth + 1;
        if depth > self.config.max_depth {
            return Err(RmlError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(Self {
            safe,
            depth,
            ..*self
        })
    }

    /// Whether template values are IRI-safe encoded at this level
    pub fn safe(&self) -> bool {
        self.safe
    }

    /// Nesting level, 1 at the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Coercion policy for reference values
    pub fn coercion(&self) -> CoercionPolicy {
        self.config.coercion
    }
}

/// Candidate term values of one expression variant for one record
pub trait Evaluate {
    fn evaluate<C>(&self, ctx: &C, scope: &Scope<'_>) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized;
}

impl Evaluate for Constant {
    fn evaluate<C>(&self, _ctx: &C, _scope: &Scope<'_>) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        Ok(vec![self.value.clone()])
    }
}

impl Evaluate for Reference {
    fn evaluate<C>(&self, ctx: &C, scope: &Scope<'_>) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        ctx.strings_for(&self.name, scope.coercion())
    }
}

impl Evaluate for Template {
    fn evaluate<C>(&self, ctx: &C, scope: &Scope<'_>) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        self.generate(ctx, scope.safe(), scope.coercion())
    }
}

impl Evaluate for CompositeReference {
    fn evaluate<C>(&self, ctx: &C, scope: &Scope<'_>) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        // Computed names are field names, never IRIs
        let names = self.inner.evaluate(ctx, &scope.nested(false)?)?;

        let mut values = Vec::new();
        for name in &names {
            values.extend(ctx.strings_for(name, scope.coercion())?);
        }
        tracing::trace!(
            names = names.len(),
            values = values.len(),
            "Resolved composite reference"
        );
        Ok(values)
    }
}

impl Evaluate for FunctionCall {
    fn evaluate<C>(&self, ctx: &C, scope: &Scope<'_>) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        let invoker = scope.functions.ok_or_else(|| {
            RmlError::configuration(format!(
                "No function invoker configured for <{}>",
                self.function
            ))
        })?;

        let arg_scope = scope.nested(false)?;
        let mut arguments = Vec::with_capacity(self.arguments.len());
        for arg in &self.arguments {
            arguments.push(EvaluatedArgument {
                parameter: &arg.parameter,
                values: arg.value.evaluate(ctx, &arg_scope)?,
            });
        }

        Ok(invoker.invoke(&self.function, &arguments)?)
    }
}

impl Evaluate for Expression {
    fn evaluate<C>(&self, ctx: &C, scope: &Scope<'_>) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        match self {
            Expression::Constant(c) => c.evaluate(ctx, scope),
            Expression::Reference(r) => r.evaluate(ctx, scope),
            Expression::Template(t) => t.evaluate(ctx, scope),
            Expression::CompositeReference(c) => c.evaluate(ctx, scope),
            Expression::FunctionCall(f) => f.evaluate(ctx, scope),
        }
    }
}

/// Expression evaluator
///
/// Holds the configuration and the optional function-invocation collaborator.
/// Cheap to clone; shareable across threads.
#[derive(Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
    functions: Option<Arc<dyn FunctionInvoker>>,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("config", &self.config)
            .field("functions", &self.functions.is_some())
            .finish()
    }
}

impl Evaluator {
    /// Create an evaluator with the given configuration
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            functions: None,
        }
    }

    /// Set the function-invocation collaborator
    pub fn with_functions(mut self, functions: Arc<dyn FunctionInvoker>) -> Self {
        self.functions = Some(functions);
        self
    }

    /// The active configuration
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate an expression against one record
    ///
    /// `safe` selects IRI-safe encoding of template values; pass `true` when
    /// the values become IRIs. An empty result means the expression produces
    /// no term for this record; errors are reserved for malformed expressions,
    /// coercion failures under [`CoercionPolicy::Abort`] and function failures.
    pub fn evaluate<C>(&self, expr: &Expression, ctx: &C, safe: bool) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        let span = tracing::debug_span!("rml_evaluate", kind = expr.kind(), safe);
        let _guard = span.enter();

        let scope = Scope::root(&self.config, self.functions.as_deref(), safe)?;
        let values = expr.evaluate(ctx, &scope)?;
        tracing::trace!(count = values.len(), "Evaluated expression");
        Ok(values)
    }
}
