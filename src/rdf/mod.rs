//! RDF data model produced by the parsers
//!
//! Quads are owned values built from the parser event stream:
//! - RDF terms (IRIs, blank nodes, literals) wrapping oxrdf primitives
//! - Quads (triple + optional named graph)
//! - Conversion from rio parser events
//!
//! # Example
//!
//! ```rust
//! use rapper_rdf::rdf::{Literal, NamedNode, Quad, RdfPredicate};
//!
//! let quad = Quad::triple(
//!     NamedNode::new("http://bar").unwrap().into(),
//!     RdfPredicate::new("http://baz").unwrap(),
//!     Literal::new_simple_literal("1").into(),
//! );
//!
//! assert_eq!(quad.value_string(), "http://bar http://baz 1");
//! assert_eq!(quad.to_string(), "<http://bar> <http://baz> \"1\" .");
//! ```

mod convert;
mod types;

pub(crate) use convert::{quad_from_rio, triple_from_rio};

pub use types::{
    BlankNode, GraphName, Literal, NamedNode, Quad, RdfError, RdfObject, RdfPredicate,
    RdfResult, RdfSubject,
};
