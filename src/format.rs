//! Accepted RDF serialization formats
//!
//! The allow-list mirrors the identifiers rapper understands, including a few
//! MIME-type and extension aliases. A format string is validated once, when it
//! is turned into a [`Format`], so parsing never starts with a bad format.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// RDF serialization format accepted by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Format {
    /// `application/rdf+xml`
    ApplicationRdfXml,
    /// `atom`
    Atom,
    /// `dot`
    Dot,
    /// `grddl`
    Grddl,
    /// `html`
    Html,
    /// `json-triples`
    JsonTriples,
    /// `json`
    Json,
    /// `jsonld`
    JsonLd,
    /// `nquads`
    NQuads,
    /// `n-quads`
    NQuadsDashed,
    /// `ntriples`
    NTriples,
    /// `n-triples`
    NTriplesDashed,
    /// `rdfa`
    Rdfa,
    /// `rdfxml`
    RdfXml,
    /// `rdfxml-abbrev`
    RdfXmlAbbrev,
    /// `rdfxml-xmp`
    RdfXmlXmp,
    /// `rss-1.0`
    Rss10,
    /// `trig`
    TriG,
    /// `turtle`
    #[default]
    Turtle,
    /// `text/turtle`
    TextTurtle,
    /// `ttl`
    Ttl,
    /// `xml`
    Xml,
}

/// Syntaxes the in-process rio parsers can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeSyntax {
    /// Turtle (also accepts N-Triples)
    Turtle,
    /// N-Triples
    NTriples,
    /// N-Quads
    NQuads,
    /// TriG
    TriG,
    /// RDF/XML
    RdfXml,
}

impl Format {
    /// Every accepted format, in the order used by error messages
    pub const ALL: [Format; 22] = [
        Format::ApplicationRdfXml,
        Format::Atom,
        Format::Dot,
        Format::Grddl,
        Format::Html,
        Format::JsonTriples,
        Format::Json,
        Format::JsonLd,
        Format::NQuads,
        Format::NQuadsDashed,
        Format::NTriples,
        Format::NTriplesDashed,
        Format::Rdfa,
        Format::RdfXml,
        Format::RdfXmlAbbrev,
        Format::RdfXmlXmp,
        Format::Rss10,
        Format::TriG,
        Format::Turtle,
        Format::TextTurtle,
        Format::Ttl,
        Format::Xml,
    ];

    /// Identifier of the format as accepted by [`Format::from_str`]
    pub fn as_str(self) -> &'static str {
        match self {
            Format::ApplicationRdfXml => "application/rdf+xml",
            Format::Atom => "atom",
            Format::Dot => "dot",
            Format::Grddl => "grddl",
            Format::Html => "html",
            Format::JsonTriples => "json-triples",
            Format::Json => "json",
            Format::JsonLd => "jsonld",
            Format::NQuads => "nquads",
            Format::NQuadsDashed => "n-quads",
            Format::NTriples => "ntriples",
            Format::NTriplesDashed => "n-triples",
            Format::Rdfa => "rdfa",
            Format::RdfXml => "rdfxml",
            Format::RdfXmlAbbrev => "rdfxml-abbrev",
            Format::RdfXmlXmp => "rdfxml-xmp",
            Format::Rss10 => "rss-1.0",
            Format::TriG => "trig",
            Format::Turtle => "turtle",
            Format::TextTurtle => "text/turtle",
            Format::Ttl => "ttl",
            Format::Xml => "xml",
        }
    }

    /// Name handed to `rapper -i`
    ///
    /// Aliases collapse onto rapper's own parser names; the remaining
    /// identifiers pass through and rapper reports the ones it cannot read.
    pub fn rapper_syntax(self) -> &'static str {
        match self {
            Format::ApplicationRdfXml | Format::Xml => "rdfxml",
            Format::NQuadsDashed => "nquads",
            Format::NTriplesDashed => "ntriples",
            Format::TextTurtle | Format::Ttl => "turtle",
            other => other.as_str(),
        }
    }

    /// In-process parser for this format, if there is one
    pub fn native_syntax(self) -> Option<NativeSyntax> {
        match self {
            Format::Turtle | Format::TextTurtle | Format::Ttl => Some(NativeSyntax::Turtle),
            Format::NTriples | Format::NTriplesDashed => Some(NativeSyntax::NTriples),
            Format::NQuads | Format::NQuadsDashed => Some(NativeSyntax::NQuads),
            Format::TriG => Some(NativeSyntax::TriG),
            Format::RdfXml | Format::ApplicationRdfXml | Format::Xml => Some(NativeSyntax::RdfXml),
            _ => None,
        }
    }

    /// Best-effort guess from a file extension
    pub fn guess_from_path(path: impl AsRef<Path>) -> Option<Format> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Some(Format::Turtle),
            "nt" => Some(Format::NTriples),
            "nq" => Some(Format::NQuads),
            "trig" => Some(Format::TriG),
            "rdf" | "owl" | "xml" => Some(Format::RdfXml),
            "jsonld" => Some(Format::JsonLd),
            "json" => Some(Format::Json),
            "html" | "htm" | "xhtml" => Some(Format::Rdfa),
            _ => None,
        }
    }

    /// Comma separated list of every accepted identifier
    pub fn valid_values() -> String {
        Format::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Given format is invalid, it must be one of: {}",
                    Format::valid_values()
                ))
            })
    }
}

impl TryFrom<String> for Format {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.as_str().to_string()
    }
}
