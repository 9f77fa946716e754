//! In-process backend on top of the rio parsers

use super::{ParseBackend, ParseOptions, Quads};
use crate::error::{ParseError, ParseResult};
use crate::format::NativeSyntax;
use crate::input::RdfInput;
use crate::rdf::{quad_from_rio, triple_from_rio, Quad};
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{NQuadsParser, NTriplesParser, TriGParser, TurtleParser};
use rio_xml::RdfXmlParser;

/// Parses Turtle, N-Triples, N-Quads, TriG and RDF/XML without leaving the process
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl ParseBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn parse(&self, input: RdfInput, options: &ParseOptions) -> ParseResult<Quads> {
        let syntax = options
            .format
            .native_syntax()
            .ok_or(ParseError::UnsupportedFormat(options.format))?;
        let base = options.base_iri()?;
        let reader = input.into_reader()?;

        let quads: Box<dyn Iterator<Item = ParseResult<Quad>>> = match syntax {
            NativeSyntax::Turtle => {
                Box::new(TurtleParser::new(reader, base).into_iter(triple_from_rio))
            }
            NativeSyntax::NTriples => Box::new(NTriplesParser::new(reader).into_iter(triple_from_rio)),
            NativeSyntax::NQuads => Box::new(NQuadsParser::new(reader).into_iter(quad_from_rio)),
            NativeSyntax::TriG => Box::new(TriGParser::new(reader, base).into_iter(quad_from_rio)),
            NativeSyntax::RdfXml => {
                Box::new(RdfXmlParser::new(reader, base).into_iter(triple_from_rio))
            }
        };

        Ok(Quads::new(self.name(), quads))
    }
}
