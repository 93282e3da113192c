//! RML expression evaluation for Fluree DB graph sources
//!
//! This crate generates candidate term values from the records of a logical
//! source (CSV rows, JSON or XML nodes, relational rows, SPARQL solutions),
//! driven by the expressions of RML/R2RML term maps. It covers the evaluation
//! engine only: reading sources and assembling RDF graphs happen elsewhere.
//!
//! # Key Features
//!
//! - **Templates**: `{name}` placeholders with `\{`/`\}` escapes, expanded to
//!   the full cartesian product of multi-valued fields
//! - **IRI-safe encoding**: RFC 3987 percent-encoding of template values for
//!   IRI term maps
//! - **Composite references**: field names computed by another expression
//! - **Function calls**: delegated to a pluggable [`FunctionInvoker`]
//! - **Build once, evaluate many**: expression trees are immutable and can be
//!   evaluated concurrently
//!
//! # Usage
//!
//! Build an [`Expression`] once per term map, then evaluate it against each
//! record with an [`Evaluator`]:
//!
//! ```
//! use fluree_db_rml::{Evaluator, Expression, Record};
//!
//! let expr = Expression::template("http://example.org/person/{name}");
//! let record = Record::new().with("name", ["Ada Lovelace", "Grace Hopper"]);
//!
//! let values = Evaluator::default().evaluate(&expr, &record, true).unwrap();
//! assert_eq!(
//!     values,
//!     vec![
//!         "http://example.org/person/Ada%20Lovelace",
//!         "http://example.org/person/Grace%20Hopper",
//!     ]
//! );
//! ```
//!
//! An expression that yields no values for a record is not an error: the
//! result is an empty list and no term is generated.

pub mod config;
pub mod context;
pub mod error;
pub mod eval;
pub mod expression;
pub mod function;
pub mod iri;
pub mod template;
pub mod term_map;
pub mod value;
pub mod vocab;

pub use config::{CoercionPolicy, EvaluatorConfig};
pub use context::{IterationContext, Record, Row, RowSchema};
pub use error::{FunctionError, RmlError, RmlResult};
pub use eval::{Evaluate, Evaluator, Scope};
pub use expression::{
    CompositeReference, Constant, Expression, FunctionArgument, FunctionCall, Reference,
};
pub use function::{EvaluatedArgument, FunctionInvoker, FunctionRegistry};
pub use iri::to_iri_safe;
pub use template::{expand_template, parse_placeholders, Placeholder, Template};
pub use term_map::{ExpressionMap, TermType};
pub use value::RawValue;
