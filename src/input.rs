//! Parser input normalisation
//!
//! Documents arrive as strings, byte buffers, open files, paths, arbitrary
//! readers or HTTP messages. [`RdfInput`] reduces all of them to one readable
//! byte sequence for the backends.

use crate::error::ParseResult;
use bytes::Bytes;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// An HTTP message body that can be drained into memory
pub trait MessageBody {
    /// Consume the body and return its bytes
    fn into_body_bytes(self) -> ParseResult<Bytes>;
}

/// An HTTP response carrying an RDF document in its body
pub trait HttpResponse {
    /// Body type of the response
    type Body: MessageBody;

    /// Consume the response and return its body
    fn into_body(self) -> Self::Body;
}

impl MessageBody for Bytes {
    fn into_body_bytes(self) -> ParseResult<Bytes> {
        Ok(self)
    }
}

impl MessageBody for String {
    fn into_body_bytes(self) -> ParseResult<Bytes> {
        Ok(Bytes::from(self))
    }
}

impl MessageBody for Vec<u8> {
    fn into_body_bytes(self) -> ParseResult<Bytes> {
        Ok(Bytes::from(self))
    }
}

impl MessageBody for reqwest::blocking::Response {
    fn into_body_bytes(self) -> ParseResult<Bytes> {
        Ok(self.bytes()?)
    }
}

impl HttpResponse for reqwest::blocking::Response {
    type Body = Self;

    fn into_body(self) -> Self::Body {
        self
    }
}

/// A document to parse
pub enum RdfInput {
    /// Document held in a string
    Text(String),
    /// Document held in a byte buffer
    Bytes(Bytes),
    /// Open file handle, read from its current position
    File(File),
    /// Path to a file on disk
    Path(PathBuf),
    /// Any other byte stream
    Reader(Box<dyn Read>),
}

impl RdfInput {
    /// Wrap an explicit byte stream
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        RdfInput::Reader(Box::new(reader))
    }

    /// Take the body of an HTTP response
    pub fn from_response(response: impl HttpResponse) -> ParseResult<Self> {
        Self::from_body(response.into_body())
    }

    /// Take an HTTP message body
    pub fn from_body(body: impl MessageBody) -> ParseResult<Self> {
        Ok(RdfInput::Bytes(body.into_body_bytes()?))
    }

    /// Short description used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            RdfInput::Text(_) => "text",
            RdfInput::Bytes(_) => "bytes",
            RdfInput::File(_) => "file",
            RdfInput::Path(_) => "path",
            RdfInput::Reader(_) => "reader",
        }
    }

    /// Turn the input into a buffered reader
    pub fn into_reader(self) -> io::Result<Box<dyn BufRead>> {
        Ok(match self {
            RdfInput::Text(text) => Box::new(Cursor::new(text.into_bytes())),
            RdfInput::Bytes(bytes) => Box::new(Cursor::new(bytes)),
            RdfInput::File(file) => Box::new(BufReader::new(file)),
            RdfInput::Path(path) => Box::new(BufReader::new(File::open(path)?)),
            RdfInput::Reader(reader) => Box::new(BufReader::new(reader)),
        })
    }

    /// Copy the whole document into `sink`, returning the number of bytes written
    pub fn write_to(self, sink: &mut impl Write) -> io::Result<u64> {
        let mut reader = self.into_reader()?;
        io::copy(&mut reader, sink)
    }
}

impl fmt::Debug for RdfInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfInput::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            RdfInput::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            RdfInput::File(file) => f.debug_tuple("File").field(file).finish(),
            RdfInput::Path(path) => f.debug_tuple("Path").field(path).finish(),
            RdfInput::Reader(_) => f.write_str("Reader"),
        }
    }
}

impl From<String> for RdfInput {
    fn from(text: String) -> Self {
        RdfInput::Text(text)
    }
}

impl From<&str> for RdfInput {
    fn from(text: &str) -> Self {
        RdfInput::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RdfInput {
    fn from(bytes: Vec<u8>) -> Self {
        RdfInput::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for RdfInput {
    fn from(bytes: Bytes) -> Self {
        RdfInput::Bytes(bytes)
    }
}

impl From<File> for RdfInput {
    fn from(file: File) -> Self {
        RdfInput::File(file)
    }
}

impl From<PathBuf> for RdfInput {
    fn from(path: PathBuf) -> Self {
        RdfInput::Path(path)
    }
}

impl From<&Path> for RdfInput {
    fn from(path: &Path) -> Self {
        RdfInput::Path(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom};

    const DOC: &str = "<http://bar> <http://baz> \"1\" .\n";

    struct FakeResponse(String);

    impl HttpResponse for FakeResponse {
        type Body = String;

        fn into_body(self) -> String {
            self.0
        }
    }

    fn drain(input: RdfInput) -> String {
        let mut out = Vec::new();
        input.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_every_shape_yields_same_bytes() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let named = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(named.path(), DOC).unwrap();

        let inputs = vec![
            RdfInput::from(DOC),
            RdfInput::from(DOC.as_bytes().to_vec()),
            RdfInput::from(file),
            RdfInput::from(named.path()),
            RdfInput::from_reader(Cursor::new(DOC.to_string())),
            RdfInput::from_response(FakeResponse(DOC.to_string())).unwrap(),
            RdfInput::from_body(Bytes::from_static(DOC.as_bytes())).unwrap(),
        ];

        for input in inputs {
            let kind = input.kind();
            assert_eq!(drain(input), DOC, "input kind {kind}");
        }
    }

    #[test]
    fn test_file_is_read_from_current_position() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"junk\n").unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        file.seek(SeekFrom::Start(5)).unwrap();

        assert_eq!(drain(RdfInput::from(file)), DOC);
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let err = RdfInput::from(PathBuf::from("/nonexistent/doc.ttl"))
            .into_reader()
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_debug_hides_contents() {
        let input = RdfInput::from(DOC);
        assert_eq!(format!("{input:?}"), format!("Text({})", DOC.len()));
    }
}
