//! Quad parser front end
//!
//! A [`Parser`] validates its format up front, normalises the input and hands
//! it to one of two backends:
//! - [`RapperBackend`]: runs the raptor2 `rapper` tool and reads its N-Quads output
//! - [`NativeBackend`]: parses in-process with the rio parsers
//!
//! Either way the result is a lazy, single-pass [`Quads`] iterator.

mod native;
mod rapper;

pub use native::NativeBackend;
pub use rapper::{RapperBackend, RapperCommand, DEFAULT_RAPPER_BIN};

use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult};
use crate::format::Format;
use crate::input::{HttpResponse, RdfInput};
use crate::rdf::Quad;
use oxiri::Iri;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Settings shared by every backend for a single parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Input syntax
    pub format: Format,
    /// Base URI for resolving relative IRIs
    pub base_uri: Option<String>,
    /// Directory for temporary input files (None = system temp dir)
    pub temp_dir: Option<PathBuf>,
}

impl ParseOptions {
    /// Base URI as a parsed IRI, for the rio parsers
    pub fn base_iri(&self) -> ParseResult<Option<Iri<String>>> {
        self.base_uri.clone().map(parse_base_uri).transpose()
    }
}

fn parse_base_uri(uri: String) -> ParseResult<Iri<String>> {
    Iri::parse(uri).map_err(|e| ParseError::InvalidBaseUri(e.to_string()))
}

/// Something that turns a document into quads
pub trait ParseBackend {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Parse `input` according to `options`
    fn parse(&self, input: RdfInput, options: &ParseOptions) -> ParseResult<Quads>;
}

/// Which backend a [`Parser`] uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Always run the rapper command
    #[default]
    Rapper,
    /// Always parse in-process
    Native,
    /// Use rapper when it is installed, otherwise parse in-process
    Auto,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Rapper => "rapper",
            Backend::Native => "native",
            Backend::Auto => "auto",
        })
    }
}

impl FromStr for Backend {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rapper" => Ok(Backend::Rapper),
            "native" => Ok(Backend::Native),
            "auto" => Ok(Backend::Auto),
            other => Err(ParseError::InvalidBackend(other.to_string())),
        }
    }
}

/// Lazy, single-pass stream of parsed quads
///
/// Quads come out in the order the backend produced them. The stream is fused:
/// after the first error or the end of input it only returns `None`.
pub struct Quads {
    inner: Box<dyn Iterator<Item = ParseResult<Quad>>>,
    backend: &'static str,
    emitted: usize,
    done: bool,
}

impl Quads {
    /// Wrap a backend iterator
    pub fn new(
        backend: &'static str,
        inner: impl Iterator<Item = ParseResult<Quad>> + 'static,
    ) -> Self {
        Self {
            inner: Box::new(inner),
            backend,
            emitted: 0,
            done: false,
        }
    }

    /// Number of quads yielded so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Collect every quad, stopping at the first error
    pub fn collect_quads(self) -> ParseResult<Vec<Quad>> {
        self.collect()
    }
}

impl Iterator for Quads {
    type Item = ParseResult<Quad>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.inner.next() {
            Some(Ok(quad)) => {
                self.emitted += 1;
                Some(Ok(quad))
            }
            Some(Err(e)) => {
                self.done = true;
                debug!(backend = self.backend, emitted = self.emitted, "Parse stopped: {}", e);
                Some(Err(e))
            }
            None => {
                self.done = true;
                debug!(backend = self.backend, emitted = self.emitted, "Parse finished");
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Quads {}

/// RDF parser producing [`Quads`] from any supported input
///
/// # Example
///
/// ```no_run
/// use rapper_rdf::{Backend, Parser};
///
/// let parser = Parser::new()
///     .with_backend(Backend::Native)
///     .with_base_uri("http://test/base/")?;
///
/// for quad in parser.parse("<name> <http://baz> \"1\" .")? {
///     println!("{}", quad?);
/// }
/// # Ok::<(), rapper_rdf::ParseError>(())
/// ```
pub struct Parser {
    options: ParseOptions,
    backend: Backend,
    rapper: RapperCommand,
    rapper_available: OnceLock<bool>,
}

impl Parser {
    /// Create a parser with default settings: Turtle input, rapper backend
    pub fn new() -> Self {
        Self {
            options: ParseOptions::default(),
            backend: Backend::default(),
            rapper: RapperCommand::default(),
            rapper_available: OnceLock::new(),
        }
    }

    /// Create a parser from a loaded configuration
    pub fn from_config(config: &ParserConfig) -> ParseResult<Self> {
        let mut parser = Self::new()
            .with_format_kind(config.format)
            .with_backend(config.backend)
            .with_rapper_command(RapperCommand::new(&config.rapper_bin));
        if let Some(base) = &config.base_uri {
            parser = parser.with_base_uri(base.clone())?;
        }
        if let Some(dir) = &config.temp_dir {
            parser.set_dir_path_for_temporary_files(dir);
        }
        Ok(parser)
    }

    /// Resolve relative IRIs against `base_uri`
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> ParseResult<Self> {
        let base_uri = base_uri.into();
        parse_base_uri(base_uri.clone())?;
        self.options.base_uri = Some(base_uri);
        Ok(self)
    }

    /// Set the input format by name, failing on identifiers outside the allow-list
    pub fn with_format(mut self, format: &str) -> ParseResult<Self> {
        self.set_format(format)?;
        Ok(self)
    }

    /// Set an already validated input format
    pub fn with_format_kind(mut self, format: Format) -> Self {
        self.options.format = format;
        self
    }

    /// Change the input format by name
    pub fn set_format(&mut self, format: &str) -> ParseResult<()> {
        self.options.format = format.parse()?;
        Ok(())
    }

    /// Current input format
    pub fn format(&self) -> Format {
        self.options.format
    }

    /// Current base URI
    pub fn base_uri(&self) -> Option<&str> {
        self.options.base_uri.as_deref()
    }

    /// Write temporary input files into `dir` instead of the system temp dir
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.set_dir_path_for_temporary_files(dir);
        self
    }

    /// Change the directory for temporary input files
    pub fn set_dir_path_for_temporary_files(&mut self, dir: impl Into<PathBuf>) {
        self.options.temp_dir = Some(dir.into());
    }

    /// Directory for temporary input files, if one was set
    pub fn temp_dir(&self) -> Option<&Path> {
        self.options.temp_dir.as_deref()
    }

    /// Select the backend
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Use a specific rapper executable
    pub fn with_rapper_command(mut self, rapper: RapperCommand) -> Self {
        self.rapper = rapper;
        self.rapper_available = OnceLock::new();
        self
    }

    /// Parse a string, byte buffer, file, path or reader
    pub fn parse(&self, input: impl Into<RdfInput>) -> ParseResult<Quads> {
        let input = input.into();
        let backend = self.resolve_backend();
        info!(
            backend = backend.name(),
            format = %self.options.format,
            input = input.kind(),
            "Parsing RDF input"
        );
        backend.parse(input, &self.options)
    }

    /// Parse an explicit byte stream such as an open file or a socket
    pub fn parse_stream(&self, stream: impl Read + 'static) -> ParseResult<Quads> {
        self.parse(RdfInput::from_reader(stream))
    }

    /// Parse the body of an HTTP response
    pub fn parse_response(&self, response: impl HttpResponse) -> ParseResult<Quads> {
        self.parse(RdfInput::from_response(response)?)
    }

    fn resolve_backend(&self) -> Box<dyn ParseBackend> {
        match self.backend {
            Backend::Rapper => Box::new(RapperBackend::new(self.rapper.clone())),
            Backend::Native => Box::new(NativeBackend),
            Backend::Auto => {
                let available = *self
                    .rapper_available
                    .get_or_init(|| self.rapper.is_available());
                if available {
                    Box::new(RapperBackend::new(self.rapper.clone()))
                } else {
                    warn!(
                        program = %self.rapper.program().display(),
                        "rapper not available, falling back to the native parser"
                    );
                    Box::new(NativeBackend)
                }
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
