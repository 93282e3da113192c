//! Term maps
//!
//! An [`ExpressionMap`] pairs an expression with the kind of term its values
//! become. The term type decides whether template values are IRI-safe
//! encoded: only IRI term maps encode. Language and datatype maps are
//! expression maps producing literals.

use serde::{Deserialize, Serialize};

use crate::context::IterationContext;
use crate::error::RmlResult;
use crate::eval::Evaluator;
use crate::expression::Expression;
use crate::vocab::R2RML;

/// Term type
///
/// Specifies whether a term map generates IRIs, blank nodes, or literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TermType {
    /// Generate an IRI (default for subject and predicate maps)
    #[default]
    Iri,
    /// Generate a blank node
    BlankNode,
    /// Generate a literal
    Literal,
}

impl TermType {
    /// Parse term type from its `rr:` IRI
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            R2RML::IRI => Some(TermType::Iri),
            R2RML::BLANK_NODE => Some(TermType::BlankNode),
            R2RML::LITERAL => Some(TermType::Literal),
            _ => None,
        }
    }

    /// Check if this term type produces IRIs
    pub fn is_iri(&self) -> bool {
        matches!(self, TermType::Iri)
    }

    /// Check if this term type produces blank nodes
    pub fn is_blank_node(&self) -> bool {
        matches!(self, TermType::BlankNode)
    }

    /// Check if this term type produces literals
    pub fn is_literal(&self) -> bool {
        matches!(self, TermType::Literal)
    }
}

/// Expression with the term type of its values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionMap {
    expression: Expression,
    #[serde(default)]
    term_type: TermType,
}

impl ExpressionMap {
    /// Create an expression map
    pub fn new(expression: Expression, term_type: TermType) -> Self {
        Self {
            expression,
            term_type,
        }
    }

    /// Create an expression map producing IRIs
    pub fn iri(expression: Expression) -> Self {
        Self::new(expression, TermType::Iri)
    }

    /// Create an expression map producing literals
    ///
    /// Use for object literals as well as language and datatype maps.
    pub fn literal(expression: Expression) -> Self {
        Self::new(expression, TermType::Literal)
    }

    /// Create an expression map producing blank node identifiers
    pub fn blank_node(expression: Expression) -> Self {
        Self::new(expression, TermType::BlankNode)
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn term_type(&self) -> TermType {
        self.term_type
    }

    /// Field names this map reads directly
    pub fn referenced_names(&self) -> Vec<&str> {
        self.expression.referenced_names()
    }

    /// Generate the candidate term values for one record
    pub fn generate_values<C>(&self, evaluator: &Evaluator, ctx: &C) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        evaluator.evaluate(&self.expression, ctx, self.term_type.is_iri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Record;

    #[test]
    fn test_term_type_from_iri() {
        assert_eq!(
            TermType::from_iri("http://www.w3.org/ns/r2rml#IRI"),
            Some(TermType::Iri)
        );
        assert_eq!(
            TermType::from_iri("http://www.w3.org/ns/r2rml#BlankNode"),
            Some(TermType::BlankNode)
        );
        assert_eq!(
            TermType::from_iri("http://www.w3.org/ns/r2rml#Literal"),
            Some(TermType::Literal)
        );
        assert_eq!(TermType::from_iri("invalid"), None);
    }

    #[test]
    fn test_iri_map_encodes_template_values() {
        let record = Record::new().with("name", ["hello world"]);
        let map = ExpressionMap::iri(Expression::template("http://example.org/{name}"));
        let values = map.generate_values(&Evaluator::default(), &record).unwrap();
        assert_eq!(values, vec!["http://example.org/hello%20world"]);
    }

    #[test]
    fn test_literal_map_keeps_values() {
        let record = Record::new().with("name", ["hello world"]);
        let map = ExpressionMap::literal(Expression::template("Name: {name}"));
        let values = map.generate_values(&Evaluator::default(), &record).unwrap();
        assert_eq!(values, vec!["Name: hello world"]);
    }

    #[test]
    fn test_language_map_from_reference() {
        let record = Record::new().with("lang", ["en", "nl"]);
        let map = ExpressionMap::literal(Expression::reference("lang"));
        assert_eq!(map.referenced_names(), vec!["lang"]);
        let values = map.generate_values(&Evaluator::default(), &record).unwrap();
        assert_eq!(values, vec!["en", "nl"]);
    }

    #[test]
    fn test_serde_default_term_type() {
        let map: ExpressionMap =
            serde_json::from_str(r#"{"expression": {"template": "http://ex.org/{id}"}}"#).unwrap();
        assert_eq!(map.term_type(), TermType::Iri);
        assert_eq!(map.referenced_names(), vec!["id"]);
    }
}
