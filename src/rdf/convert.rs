//! Conversion from rio parser events into owned quads

use super::{BlankNode, GraphName, Literal, NamedNode, Quad, RdfObject, RdfPredicate, RdfSubject};
use crate::error::{ParseError, ParseResult};
use rio_api::model;

/// Convert a rio quad into an owned [`Quad`]
pub fn quad_from_rio(q: model::Quad<'_>) -> ParseResult<Quad> {
    Ok(Quad::new(
        convert_subject(q.subject)?,
        convert_predicate(q.predicate)?,
        convert_object(q.object)?,
        q.graph_name.map(convert_graph_name).transpose()?,
    ))
}

/// Convert a rio triple into an owned [`Quad`] in the default graph
pub fn triple_from_rio(t: model::Triple<'_>) -> ParseResult<Quad> {
    Ok(Quad::triple(
        convert_subject(t.subject)?,
        convert_predicate(t.predicate)?,
        convert_object(t.object)?,
    ))
}

fn convert_subject(s: model::Subject<'_>) -> ParseResult<RdfSubject> {
    match s {
        model::Subject::NamedNode(n) => Ok(NamedNode::new(n.iri)?.into()),
        model::Subject::BlankNode(b) => Ok(BlankNode::new(b.id)?.into()),
        _ => Err(ParseError::Unsupported(
            "quoted triple in subject position".to_string(),
        )),
    }
}

fn convert_predicate(p: model::NamedNode<'_>) -> ParseResult<RdfPredicate> {
    Ok(RdfPredicate::new(p.iri)?)
}

fn convert_object(o: model::Term<'_>) -> ParseResult<RdfObject> {
    match o {
        model::Term::NamedNode(n) => Ok(NamedNode::new(n.iri)?.into()),
        model::Term::BlankNode(b) => Ok(BlankNode::new(b.id)?.into()),
        model::Term::Literal(l) => {
            let literal = match l {
                model::Literal::Simple { value } => Literal::new_simple_literal(value),
                model::Literal::LanguageTaggedString { value, language } => {
                    Literal::new_language_tagged_literal(value, language)?
                }
                model::Literal::Typed { value, datatype } => {
                    Literal::new_typed_literal(value, NamedNode::new(datatype.iri)?)
                }
            };
            Ok(literal.into())
        }
        _ => Err(ParseError::Unsupported(
            "quoted triple in object position".to_string(),
        )),
    }
}

fn convert_graph_name(g: model::GraphName<'_>) -> ParseResult<GraphName> {
    match g {
        model::GraphName::NamedNode(n) => Ok(NamedNode::new(n.iri)?.into()),
        model::GraphName::BlankNode(b) => Ok(BlankNode::new(b.id)?.into()),
    }
}
