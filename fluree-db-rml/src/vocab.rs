//! Mapping vocabulary constants
//!
//! IRIs of the R2RML, RML and FNML terms that select an expression kind or a
//! term type.
//!
//! # Usage
//!
//! ```
//! use fluree_db_rml::vocab::R2RML;
//!
//! let iri = "http://www.w3.org/ns/r2rml#template";
//! assert_eq!(iri, R2RML::TEMPLATE);
//! ```

/// R2RML vocabulary namespace and constants
pub struct R2RML;

impl R2RML {
    /// R2RML namespace IRI
    pub const NS: &'static str = "http://www.w3.org/ns/r2rml#";

    // ==========================================================================
    // Term map properties
    // ==========================================================================

    /// rr:constant - A constant-valued term map
    pub const CONSTANT: &'static str = "http://www.w3.org/ns/r2rml#constant";

    /// rr:column - A column-valued term map
    pub const COLUMN: &'static str = "http://www.w3.org/ns/r2rml#column";

    /// rr:template - A template-valued term map
    pub const TEMPLATE: &'static str = "http://www.w3.org/ns/r2rml#template";

    // ==========================================================================
    // Term types
    // ==========================================================================

    /// rr:IRI - Generate IRIs
    pub const IRI: &'static str = "http://www.w3.org/ns/r2rml#IRI";

    /// rr:BlankNode - Generate blank nodes
    pub const BLANK_NODE: &'static str = "http://www.w3.org/ns/r2rml#BlankNode";

    /// rr:Literal - Generate literals
    pub const LITERAL: &'static str = "http://www.w3.org/ns/r2rml#Literal";
}

/// RML vocabulary
pub struct RML;

impl RML {
    /// RML namespace IRI
    pub const NS: &'static str = "http://semweb.mmlab.be/ns/rml#";

    /// rml:reference - A reference into the logical source iteration
    pub const REFERENCE: &'static str = "http://semweb.mmlab.be/ns/rml#reference";

    /// rml:template - RML alias of rr:template
    pub const TEMPLATE: &'static str = "http://semweb.mmlab.be/ns/rml#template";
}

/// Function Ontology mapping vocabulary
pub struct FNML;

impl FNML {
    /// FNML namespace IRI
    pub const NS: &'static str = "http://semweb.mmlab.be/ns/fnml#";

    /// fnml:functionValue - A term map whose value is a function execution
    pub const FUNCTION_VALUE: &'static str = "http://semweb.mmlab.be/ns/fnml#functionValue";
}
