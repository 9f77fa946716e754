//! Error types for parsing

use crate::format::Format;
use crate::rdf::RdfError;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while configuring a parser or reading quads
#[derive(Error, Debug)]
pub enum ParseError {
    /// Requested format is not in the allow-list
    #[error("{0}")]
    InvalidFormat(String),

    /// Base URI is not an absolute IRI
    #[error("Invalid base URI: {0}")]
    InvalidBaseUri(String),

    /// Unknown backend name
    #[error("Invalid backend: {0} (expected one of: rapper, native, auto)")]
    InvalidBackend(String),

    /// Format has no in-process parser
    #[error("Format {0} is not supported by the native parser")]
    UnsupportedFormat(Format),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The rapper process could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// Program that was invoked
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// rapper exited unsuccessfully
    #[error("rapper exited with {status}: {stderr}")]
    RapperFailed {
        /// Exit status of the child
        status: ExitStatus,
        /// Captured standard error
        stderr: String,
    },

    /// Syntax error reported by a parser
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// A parsed term was rejected by the data model
    #[error("Invalid term: {0}")]
    InvalidTerm(#[from] RdfError),

    /// Construct the data model cannot represent
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),
}

impl From<rio_turtle::TurtleError> for ParseError {
    fn from(e: rio_turtle::TurtleError) -> Self {
        ParseError::Syntax(e.to_string())
    }
}

impl From<rio_xml::RdfXmlError> for ParseError {
    fn from(e: rio_xml::RdfXmlError) -> Self {
        ParseError::Syntax(e.to_string())
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(e: serde_yaml::Error) -> Self {
        ParseError::Config(e.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
