//! RDF type definitions
//!
//! This module provides wrapper types around the oxrdf library for RDF primitives.

use oxrdf::{
    BlankNode as OxBlankNode, GraphName as OxGraphName, Literal as OxLiteral,
    NamedNode as OxNamedNode, Quad as OxQuad, Subject as OxSubject, Term as OxTerm,
};
use std::fmt;
use thiserror::Error;

/// RDF errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid blank node
    #[error("Invalid blank node: {0}")]
    InvalidBlankNode(String),

    /// Invalid literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Named node (IRI)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(OxNamedNode);

impl NamedNode {
    /// Create a new named node from an IRI string
    pub fn new(iri: impl Into<String>) -> RdfResult<Self> {
        OxNamedNode::new(iri)
            .map(Self)
            .map_err(|e| RdfError::InvalidIri(e.to_string()))
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Plain value of the node, the IRI itself
    pub fn value(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl From<OxNamedNode> for NamedNode {
    fn from(node: OxNamedNode) -> Self {
        Self(node)
    }
}

impl From<NamedNode> for OxNamedNode {
    fn from(node: NamedNode) -> Self {
        node.0
    }
}

/// Blank node (anonymous node)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    /// Create a blank node from a string identifier (without the `_:` prefix)
    pub fn new(id: impl Into<String>) -> RdfResult<Self> {
        OxBlankNode::new(id)
            .map(Self)
            .map_err(|e| RdfError::InvalidBlankNode(e.to_string()))
    }

    /// Get the blank node identifier
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Plain value of the node: the identifier with its `_:` prefix
    pub fn value(&self) -> String {
        format!("_:{}", self.as_str())
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.as_str())
    }
}

impl From<OxBlankNode> for BlankNode {
    fn from(node: OxBlankNode) -> Self {
        Self(node)
    }
}

impl From<BlankNode> for OxBlankNode {
    fn from(node: BlankNode) -> Self {
        node.0
    }
}

/// RDF literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    /// Create a simple literal (plain string)
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    /// Create a literal with language tag
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        OxLiteral::new_language_tagged_literal(value, language)
            .map(Self)
            .map_err(|e| RdfError::InvalidLiteral(e.to_string()))
    }

    /// Create a typed literal
    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        self.0.value()
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Get the datatype
    pub fn datatype(&self) -> NamedNode {
        NamedNode(self.0.datatype().into_owned())
    }
}

impl fmt::Display for Literal {
    // oxrdf takes care of N-Triples escaping and the xsd:string shorthand
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<OxLiteral> for Literal {
    fn from(lit: OxLiteral) -> Self {
        Self(lit)
    }
}

impl From<Literal> for OxLiteral {
    fn from(lit: Literal) -> Self {
        lit.0
    }
}

/// RDF subject (NamedNode or BlankNode)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfSubject {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
}

impl RdfSubject {
    /// Check if this is a blank node
    pub fn is_blank_node(&self) -> bool {
        matches!(self, RdfSubject::BlankNode(_))
    }

    /// Plain value of the subject
    pub fn value(&self) -> String {
        match self {
            RdfSubject::NamedNode(n) => n.value().to_string(),
            RdfSubject::BlankNode(b) => b.value(),
        }
    }
}

impl fmt::Display for RdfSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfSubject::NamedNode(n) => write!(f, "{}", n),
            RdfSubject::BlankNode(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for RdfSubject {
    fn from(node: NamedNode) -> Self {
        RdfSubject::NamedNode(node)
    }
}

impl From<BlankNode> for RdfSubject {
    fn from(node: BlankNode) -> Self {
        RdfSubject::BlankNode(node)
    }
}

impl From<RdfSubject> for OxSubject {
    fn from(subject: RdfSubject) -> Self {
        match subject {
            RdfSubject::NamedNode(n) => OxSubject::NamedNode(n.0),
            RdfSubject::BlankNode(b) => OxSubject::BlankNode(b.0),
        }
    }
}

/// RDF predicate (always a NamedNode)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfPredicate(NamedNode);

impl RdfPredicate {
    /// Create a new predicate from an IRI
    pub fn new(iri: impl Into<String>) -> RdfResult<Self> {
        Ok(Self(NamedNode::new(iri)?))
    }

    /// Plain value of the predicate, its IRI
    pub fn value(&self) -> &str {
        self.0.value()
    }
}

impl fmt::Display for RdfPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NamedNode> for RdfPredicate {
    fn from(node: NamedNode) -> Self {
        RdfPredicate(node)
    }
}

impl From<RdfPredicate> for NamedNode {
    fn from(pred: RdfPredicate) -> Self {
        pred.0
    }
}

/// RDF object (NamedNode, BlankNode, or Literal)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfObject {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
}

impl RdfObject {
    /// Plain value of the object; literals yield their lexical form
    pub fn value(&self) -> String {
        match self {
            RdfObject::NamedNode(n) => n.value().to_string(),
            RdfObject::BlankNode(b) => b.value(),
            RdfObject::Literal(l) => l.value().to_string(),
        }
    }
}

impl fmt::Display for RdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfObject::NamedNode(n) => write!(f, "{}", n),
            RdfObject::BlankNode(b) => write!(f, "{}", b),
            RdfObject::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl From<NamedNode> for RdfObject {
    fn from(node: NamedNode) -> Self {
        RdfObject::NamedNode(node)
    }
}

impl From<BlankNode> for RdfObject {
    fn from(node: BlankNode) -> Self {
        RdfObject::BlankNode(node)
    }
}

impl From<Literal> for RdfObject {
    fn from(lit: Literal) -> Self {
        RdfObject::Literal(lit)
    }
}

impl From<RdfObject> for OxTerm {
    fn from(object: RdfObject) -> Self {
        match object {
            RdfObject::NamedNode(n) => OxTerm::NamedNode(n.0),
            RdfObject::BlankNode(b) => OxTerm::BlankNode(b.0),
            RdfObject::Literal(l) => OxTerm::Literal(l.0),
        }
    }
}

/// Name of the graph a quad belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphName {
    /// Named graph identified by an IRI
    NamedNode(NamedNode),
    /// Graph identified by a blank node
    BlankNode(BlankNode),
}

impl GraphName {
    /// Plain value of the graph name
    pub fn value(&self) -> String {
        match self {
            GraphName::NamedNode(n) => n.value().to_string(),
            GraphName::BlankNode(b) => b.value(),
        }
    }
}

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphName::NamedNode(n) => write!(f, "{}", n),
            GraphName::BlankNode(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for GraphName {
    fn from(node: NamedNode) -> Self {
        GraphName::NamedNode(node)
    }
}

impl From<BlankNode> for GraphName {
    fn from(node: BlankNode) -> Self {
        GraphName::BlankNode(node)
    }
}

/// RDF quad (triple + optional named graph)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Subject
    pub subject: RdfSubject,
    /// Predicate
    pub predicate: RdfPredicate,
    /// Object
    pub object: RdfObject,
    /// Graph (None = default graph)
    pub graph: Option<GraphName>,
}

impl Quad {
    /// Create a new quad
    pub fn new(
        subject: RdfSubject,
        predicate: RdfPredicate,
        object: RdfObject,
        graph: Option<GraphName>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Create a quad in the default graph
    pub fn triple(subject: RdfSubject, predicate: RdfPredicate, object: RdfObject) -> Self {
        Self::new(subject, predicate, object, None)
    }

    /// Check whether the quad lives in the default graph
    pub fn in_default_graph(&self) -> bool {
        self.graph.is_none()
    }

    /// Term values joined by single spaces, e.g. `http://bar http://baz 1`.
    ///
    /// The graph value is appended only for quads in a named graph.
    pub fn value_string(&self) -> String {
        let mut out = format!(
            "{} {} {}",
            self.subject.value(),
            self.predicate.value(),
            self.object.value()
        );
        if let Some(graph) = &self.graph {
            out.push(' ');
            out.push_str(&graph.value());
        }
        out
    }

    /// Convert to oxrdf Quad
    pub fn to_oxrdf(&self) -> OxQuad {
        let subject: OxSubject = self.subject.clone().into();
        let predicate: OxNamedNode = self.predicate.clone().0.into();
        let object: OxTerm = self.object.clone().into();
        let graph_name = match &self.graph {
            Some(GraphName::NamedNode(n)) => OxGraphName::NamedNode(n.0.clone()),
            Some(GraphName::BlankNode(b)) => OxGraphName::BlankNode(b.0.clone()),
            None => OxGraphName::DefaultGraph,
        };

        OxQuad::new(subject, predicate, object, graph_name)
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(graph) = &self.graph {
            write!(
                f,
                "{} {} {} {} .",
                self.subject, self.predicate, self.object, graph
            )
        } else {
            write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_baz(value: &str) -> Quad {
        Quad::triple(
            NamedNode::new("http://bar").unwrap().into(),
            RdfPredicate::new("http://baz").unwrap(),
            Literal::new_simple_literal(value).into(),
        )
    }

    #[test]
    fn test_named_node() {
        let node = NamedNode::new("http://example.org/alice").unwrap();
        assert_eq!(node.as_str(), "http://example.org/alice");
        assert_eq!(node.to_string(), "<http://example.org/alice>");
    }

    #[test]
    fn test_invalid_iri_rejected() {
        let err = NamedNode::new("not an iri").unwrap_err();
        assert!(matches!(err, RdfError::InvalidIri(_)));
    }

    #[test]
    fn test_blank_node_value_keeps_prefix() {
        let node = BlankNode::new("b0").unwrap();
        assert_eq!(node.as_str(), "b0");
        assert_eq!(node.value(), "_:b0");
        assert_eq!(node.to_string(), "_:b0");
    }

    #[test]
    fn test_literal() {
        let lit = Literal::new_simple_literal("Alice");
        assert_eq!(lit.value(), "Alice");
        assert_eq!(lit.to_string(), "\"Alice\"");

        let lit = Literal::new_language_tagged_literal("Alice", "en").unwrap();
        assert_eq!(lit.language(), Some("en"));
        assert_eq!(lit.to_string(), "\"Alice\"@en");

        let dt = NamedNode::new("http://www.w3.org/2001/XMLSchema#integer").unwrap();
        let lit = Literal::new_typed_literal("42", dt.clone());
        assert_eq!(lit.datatype(), dt);
        assert_eq!(
            lit.to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_literal_display_escapes_quotes() {
        let lit = Literal::new_simple_literal("say \"hi\"\n");
        assert_eq!(lit.to_string(), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_quad_value_string() {
        assert_eq!(bar_baz("1").value_string(), "http://bar http://baz 1");

        let mut quad = bar_baz("2");
        quad.graph = Some(NamedNode::new("http://g").unwrap().into());
        assert_eq!(quad.value_string(), "http://bar http://baz 2 http://g");
        assert!(!quad.in_default_graph());
    }

    #[test]
    fn test_quad_display_is_nquads() {
        assert_eq!(
            bar_baz("1").to_string(),
            "<http://bar> <http://baz> \"1\" ."
        );

        let mut quad = bar_baz("1");
        quad.graph = Some(BlankNode::new("g1").unwrap().into());
        assert_eq!(
            quad.to_string(),
            "<http://bar> <http://baz> \"1\" _:g1 ."
        );
    }

    #[test]
    fn test_quad_to_oxrdf() {
        let ox = bar_baz("1").to_oxrdf();
        assert_eq!(ox.graph_name, OxGraphName::DefaultGraph);
        assert_eq!(ox.predicate.as_str(), "http://baz");
    }
}
