//! rapper-rdf
//!
//! Streams RDF quads out of documents in any of the formats understood by the
//! raptor2 `rapper` tool. Parsing is delegated either to `rapper` itself, run
//! as a subprocess, or to the in-process rio parsers.
//!
//! # Overview
//!
//! - [`format`]: the allow-list of accepted format identifiers
//! - [`input`]: strings, files, readers and HTTP bodies as parser input
//! - [`parser`]: the [`Parser`] front end and its backends
//! - [`rdf`]: the quads produced
//! - [`config`]: YAML / environment configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use rapper_rdf::{Backend, Parser};
//!
//! let parser = Parser::new().with_backend(Backend::Native);
//! let doc = "<http://bar> <http://baz> \"1\" .\n<http://bar> <http://baz> \"2\" .\n";
//!
//! let values: Vec<String> = parser
//!     .parse(doc)
//!     .unwrap()
//!     .map(|quad| quad.unwrap().value_string())
//!     .collect();
//!
//! assert_eq!(values, vec!["http://bar http://baz 1", "http://bar http://baz 2"]);
//! ```
//!
//! An unknown format is rejected before anything is parsed:
//!
//! ```rust
//! use rapper_rdf::Parser;
//!
//! let err = Parser::new().with_format("invalid").err().unwrap();
//! assert!(err.to_string().starts_with("Given format is invalid, it must be one of: "));
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod parser;
pub mod rdf;

// Re-export main types for convenience
pub use config::ParserConfig;
pub use error::{ParseError, ParseResult};
pub use format::{Format, NativeSyntax};
pub use input::{HttpResponse, MessageBody, RdfInput};
pub use parser::{
    Backend, NativeBackend, ParseBackend, ParseOptions, Parser, Quads, RapperBackend,
    RapperCommand,
};
pub use rdf::Quad;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
