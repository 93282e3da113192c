//! Expression trees
//!
//! An [`Expression`] describes how the candidate values of a term are obtained
//! from a record. Trees are built once per mapping rule and never mutated;
//! they are `Send + Sync` and may be evaluated concurrently for any number of
//! records.
//!
//! Trees serialize as externally tagged JSON:
//!
//! ```
//! use fluree_db_rml::Expression;
//!
//! let expr: Expression = serde_json::from_str(
//!     r#"{"compositeReference": {"template": "{kind}_id"}}"#,
//! ).unwrap();
//! assert_eq!(expr.referenced_names(), vec!["kind"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RmlError, RmlResult};
use crate::template::Template;
use crate::vocab::{FNML, R2RML, RML};

/// Expression variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expression {
    /// Fixed value
    Constant(Constant),
    /// Field of the current record
    Reference(Reference),
    /// String template with `{name}` placeholders
    Template(Template),
    /// Field whose name is computed by another expression
    CompositeReference(CompositeReference),
    /// Call to an external function
    FunctionCall(FunctionCall),
}

/// `rr:constant`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constant {
    pub value: String,
}

/// `rml:reference` / `rr:column`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference {
    pub name: String,
}

/// Indirect reference
///
/// Each value of `inner` is a field name, looked up again in the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeReference {
    pub inner: Box<Expression>,
}

/// Function execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function identifier (IRI)
    pub function: String,
    /// Input bindings, in declaration order
    #[serde(default)]
    pub arguments: Vec<FunctionArgument>,
}

/// Input binding of a function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArgument {
    /// Parameter identifier (IRI)
    pub parameter: String,
    /// Expression producing the parameter values
    pub value: Expression,
}

impl FunctionArgument {
    pub fn new(parameter: impl Into<String>, value: Expression) -> Self {
        Self {
            parameter: parameter.into(),
            value,
        }
    }
}

impl Expression {
    /// Create a constant expression
    pub fn constant(value: impl Into<String>) -> Self {
        Expression::Constant(Constant {
            value: value.into(),
        })
    }

    /// Create a reference expression
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Reference(Reference { name: name.into() })
    }

    /// Create a template expression, parsing its placeholders
    pub fn template(pattern: impl Into<String>) -> Self {
        Expression::Template(Template::new(pattern))
    }

    /// Create a composite reference over an inner expression
    pub fn composite(inner: Expression) -> Self {
        Expression::CompositeReference(CompositeReference {
            inner: Box::new(inner),
        })
    }

    /// Create a function call expression
    pub fn function(function: impl Into<String>, arguments: Vec<FunctionArgument>) -> Self {
        Expression::FunctionCall(FunctionCall {
            function: function.into(),
            arguments,
        })
    }

    /// Build an expression from a term map property and its value
    ///
    /// Recognizes `rr:constant`, `rr:template`, `rr:column` and
    /// `rml:reference`.
    pub fn from_property(property: &str, value: impl Into<String>) -> RmlResult<Self> {
        match property {
            R2RML::CONSTANT => Ok(Expression::constant(value)),
            R2RML::TEMPLATE | RML::TEMPLATE => Ok(Expression::template(value)),
            R2RML::COLUMN | RML::REFERENCE => Ok(Expression::reference(value)),
            FNML::FUNCTION_VALUE => Err(RmlError::configuration(
                "fnml:functionValue requires a function call with arguments",
            )),
            other => Err(RmlError::configuration(format!(
                "Unsupported expression property: <{}>",
                other
            ))),
        }
    }

    /// Short variant name, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Constant(_) => "constant",
            Expression::Reference(_) => "reference",
            Expression::Template(_) => "template",
            Expression::CompositeReference(_) => "compositeReference",
            Expression::FunctionCall(_) => "functionCall",
        }
    }

    /// Field names this expression reads directly
    ///
    /// Names computed at evaluation time by a composite reference cannot be
    /// known here; only the names its inner expression reads are listed.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Constant(_) => {}
            Expression::Reference(r) => names.push(r.name.as_str()),
            Expression::Template(t) => names.extend(t.referenced_names()),
            Expression::CompositeReference(c) => c.inner.collect_names(names),
            Expression::FunctionCall(f) => {
                for arg in &f.arguments {
                    arg.value.collect_names(names);
                }
            }
        }
    }

    /// Nesting depth of this tree; leaves have depth 1
    ///
    /// Walks the whole tree. Use [`Expression::validate`] to bound the walk.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Reference(_) | Expression::Template(_) => 1,
            Expression::CompositeReference(c) => 1 + c.inner.depth(),
            Expression::FunctionCall(f) => {
                1 + f
                    .arguments
                    .iter()
                    .map(|arg| arg.value.depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Check the tree for authoring defects
    ///
    /// Rejects empty reference names, empty function identifiers and trees
    /// nested deeper than `max_depth`. The depth walk stops at `max_depth`,
    /// so arbitrarily deep trees are rejected without exhausting the stack.
    pub fn validate(&self, max_depth: usize) -> RmlResult<()> {
        if !self.within_depth(max_depth) {
            return Err(RmlError::DepthExceeded { limit: max_depth });
        }
        self.validate_shape()
    }

    /// Check that the tree is at most `budget` levels deep
    fn within_depth(&self, budget: usize) -> bool {
        if budget == 0 {
            return false;
        }
        match self {
            Expression::Constant(_) | Expression::Reference(_) | Expression::Template(_) => true,
            Expression::CompositeReference(c) => c.inner.within_depth(budget - 1),
            Expression::FunctionCall(f) => f
                .arguments
                .iter()
                .all(|arg| arg.value.within_depth(budget - 1)),
        }
    }

    fn validate_shape(&self) -> RmlResult<()> {
        match self {
            Expression::Constant(_) | Expression::Template(_) => Ok(()),
            Expression::Reference(r) => {
                if r.name.is_empty() {
                    return Err(RmlError::configuration("Reference with empty name"));
                }
                Ok(())
            }
            Expression::CompositeReference(c) => c.inner.validate_shape(),
            Expression::FunctionCall(f) => {
                if f.function.is_empty() {
                    return Err(RmlError::configuration(
                        "Function call without function identifier",
                    ));
                }
                for arg in &f.arguments {
                    arg.value.validate_shape()?;
                }
                Ok(())
            }
        }
    }
}

impl From<Template> for Expression {
    fn from(template: Template) -> Self {
        Expression::Template(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_expression_is_send_sync() {
        assert_send_sync::<Expression>();
    }

    #[test]
    fn test_referenced_names() {
        let expr = Expression::function(
            "http://example.org/fn#concat",
            vec![
                FunctionArgument::new("http://example.org/fn#a", Expression::reference("first")),
                FunctionArgument::new(
                    "http://example.org/fn#b",
                    Expression::composite(Expression::template("{kind}_{lang}")),
                ),
                FunctionArgument::new("http://example.org/fn#c", Expression::constant("x")),
            ],
        );
        assert_eq!(expr.referenced_names(), vec!["first", "kind", "lang"]);
    }

    #[test]
    fn test_from_property() {
        assert_eq!(
            Expression::from_property(R2RML::COLUMN, "id").unwrap(),
            Expression::reference("id")
        );
        assert_eq!(
            Expression::from_property(RML::REFERENCE, "$.id").unwrap(),
            Expression::reference("$.id")
        );
        assert_eq!(
            Expression::from_property(R2RML::TEMPLATE, "{id}").unwrap(),
            Expression::template("{id}")
        );
        assert_eq!(
            Expression::from_property(R2RML::CONSTANT, "x").unwrap(),
            Expression::constant("x")
        );

        let err = Expression::from_property("http://example.org/unknown", "x").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_depth_and_validate() {
        let expr = Expression::composite(Expression::composite(Expression::reference("a")));
        assert_eq!(expr.depth(), 3);
        assert!(expr.validate(3).is_ok());
        assert!(matches!(
            expr.validate(2),
            Err(RmlError::DepthExceeded { limit: 2 })
        ));

        assert!(Expression::reference("").validate(8).unwrap_err().is_configuration());
        assert!(Expression::function("", vec![])
            .validate(8)
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_validate_rejects_deep_tree_without_walking_it() {
        let mut expr = Expression::reference("a");
        for _ in 0..10_000 {
            expr = Expression::composite(expr);
        }
        assert!(matches!(
            expr.validate(32),
            Err(RmlError::DepthExceeded { limit: 32 })
        ));

        let wide = Expression::function(
            "http://example.org/fn#f",
            vec![
                FunctionArgument::new("p1", Expression::reference("a")),
                FunctionArgument::new(
                    "p2",
                    Expression::composite(Expression::composite(Expression::reference("b"))),
                ),
            ],
        );
        assert!(wide.validate(4).is_ok());
        assert!(wide.validate(3).is_err());
    }

    #[test]
    fn test_serde_shape() {
        let expr = Expression::function(
            "http://example.org/fn#upper",
            vec![FunctionArgument::new(
                "http://example.org/fn#input",
                Expression::reference("name"),
            )],
        );
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "functionCall": {
                    "function": "http://example.org/fn#upper",
                    "arguments": [
                        {"parameter": "http://example.org/fn#input", "value": {"reference": "name"}}
                    ]
                }
            })
        );

        let parsed: Expression = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, expr);
    }
}
