//! Backend that shells out to the raptor2 `rapper` tool
//!
//! The input is written to a temporary file, rapper converts it to N-Quads on
//! stdout, and the output is read back line by line. The temporary file and the
//! child process are owned by the returned iterator and released when it
//! finishes or is dropped.

use super::{ParseBackend, ParseOptions, Quads};
use crate::error::{ParseError, ParseResult};
use crate::input::RdfInput;
use crate::rdf::{quad_from_rio, Quad};
use rio_api::parser::QuadsParser;
use rio_turtle::NQuadsParser;
use std::ffi::OsString;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Default executable name, looked up on `PATH`
pub const DEFAULT_RAPPER_BIN: &str = "rapper";

/// Exit code rapper uses when the parse succeeded with warnings
const EXIT_WARNINGS: i32 = 2;

/// Location and invocation of the rapper executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RapperCommand {
    program: PathBuf,
}

impl RapperCommand {
    /// Use the given executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this command runs
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the default `rapper` executable can be run
    pub fn rapper_command_is_available() -> bool {
        Self::default().is_available()
    }

    /// Whether this executable can be run
    pub fn is_available(&self) -> bool {
        match self.version() {
            Ok(version) => {
                debug!(program = %self.program.display(), %version, "rapper found");
                true
            }
            Err(e) => {
                debug!(program = %self.program.display(), "rapper unavailable: {}", e);
                false
            }
        }
    }

    /// Version string reported by `rapper --version`
    pub fn version(&self) -> ParseResult<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(ParseError::RapperFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Arguments passed to rapper for parsing the file at `input`
    pub fn command_line(&self, input: &Path, options: &ParseOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-q".into(),
            "-i".into(),
            options.format.rapper_syntax().into(),
            "-o".into(),
            "nquads".into(),
            input.as_os_str().to_owned(),
        ];
        if let Some(base) = &options.base_uri {
            args.push(base.into());
        }
        args
    }

    fn spawn(&self, input: &Path, options: &ParseOptions) -> ParseResult<Child> {
        let args = self.command_line(input, options);
        debug!(program = %self.program.display(), ?args, "Spawning rapper");

        Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))
    }

    fn spawn_error(&self, source: io::Error) -> ParseError {
        ParseError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl Default for RapperCommand {
    fn default() -> Self {
        Self::new(DEFAULT_RAPPER_BIN)
    }
}

/// Parses by running rapper as a subprocess
#[derive(Debug, Clone, Default)]
pub struct RapperBackend {
    command: RapperCommand,
}

impl RapperBackend {
    /// Create a backend running `command`
    pub fn new(command: RapperCommand) -> Self {
        Self { command }
    }
}

impl ParseBackend for RapperBackend {
    fn name(&self) -> &'static str {
        "rapper"
    }

    fn parse(&self, input: RdfInput, options: &ParseOptions) -> ParseResult<Quads> {
        // Paths go to rapper as they are; everything else is staged in a temp file.
        let (path, temp_file) = match input {
            RdfInput::Path(path) => (path, None),
            other => {
                let temp_file = write_temp_file(other, options.temp_dir.as_deref())?;
                (temp_file.path().to_path_buf(), Some(temp_file))
            }
        };

        let mut child = self.command.spawn(&path, options)?;
        info!(pid = child.id(), path = %path.display(), "rapper started");

        let stderr = child.stderr.take().map(drain_stderr);
        let Some(stdout) = child.stdout.take() else {
            let mut running = RunningRapper::new(child, stderr, temp_file);
            running.abort();
            return Err(io::Error::other("rapper stdout was not captured").into());
        };

        let quads = NQuadsParser::new(BufReader::new(stdout)).into_iter(quad_from_rio);
        let mut running = RunningRapper::new(child, stderr, temp_file);
        running.quads = Some(Box::new(quads));

        Ok(Quads::new(self.name(), running))
    }
}

fn write_temp_file(input: RdfInput, dir: Option<&Path>) -> ParseResult<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("rapper-rdf-");
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    let written = input.write_to(file.as_file_mut())?;
    file.as_file_mut().flush()?;
    debug!(path = %file.path().display(), bytes = written, "Staged rapper input");

    Ok(file)
}

// rapper blocks once the stderr pipe is full, so drain it while stdout is read
fn drain_stderr(mut pipe: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            debug!("Reading rapper stderr failed: {}", e);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// A running rapper process and the quads it is producing
struct RunningRapper {
    quads: Option<Box<dyn Iterator<Item = ParseResult<Quad>>>>,
    child: Option<Child>,
    stderr: Option<JoinHandle<String>>,
    input: Option<NamedTempFile>,
}

impl RunningRapper {
    fn new(
        child: Child,
        stderr: Option<JoinHandle<String>>,
        input: Option<NamedTempFile>,
    ) -> Self {
        Self {
            quads: None,
            child: Some(child),
            stderr,
            input,
        }
    }

    /// Reap the child after stdout ended and report a failed exit
    fn finish(&mut self) -> ParseResult<()> {
        self.quads = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        self.input = None;
        let stderr = self
            .stderr
            .take()
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default();

        if status.success() {
            debug!(%status, "rapper exited");
            Ok(())
        } else if status.code() == Some(EXIT_WARNINGS) {
            warn!(stderr = stderr.trim(), "rapper reported warnings");
            Ok(())
        } else {
            warn!(%status, stderr = stderr.trim(), "rapper failed");
            Err(ParseError::RapperFailed {
                status,
                stderr: stderr.trim().to_string(),
            })
        }
    }

    /// Kill the child if it is still running
    fn abort(&mut self) {
        self.quads = None;
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!("Killing rapper failed: {}", e);
            }
            if let Err(e) = child.wait() {
                debug!("Reaping rapper failed: {}", e);
            }
        }
        self.input = None;
    }
}

impl Iterator for RunningRapper {
    type Item = ParseResult<Quad>;

    fn next(&mut self) -> Option<Self::Item> {
        let quads = self.quads.as_mut()?;
        match quads.next() {
            Some(Ok(quad)) => Some(Ok(quad)),
            Some(Err(e)) => {
                self.abort();
                Some(Err(e))
            }
            None => self.finish().err().map(Err),
        }
    }
}

impl Drop for RunningRapper {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    #[test]
    fn test_command_line_without_base() {
        let options = ParseOptions {
            format: Format::Ttl,
            ..ParseOptions::default()
        };
        let args = RapperCommand::default().command_line(Path::new("/tmp/in.ttl"), &options);
        assert_eq!(args, vec!["-q", "-i", "turtle", "-o", "nquads", "/tmp/in.ttl"]);
    }

    #[test]
    fn test_command_line_with_base() {
        let options = ParseOptions {
            format: Format::ApplicationRdfXml,
            base_uri: Some("http://test/base/".to_string()),
            temp_dir: None,
        };
        let args = RapperCommand::default().command_line(Path::new("in.rdf"), &options);
        assert_eq!(
            args,
            vec!["-q", "-i", "rdfxml", "-o", "nquads", "in.rdf", "http://test/base/"]
        );
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let command = RapperCommand::new("/nonexistent/rapper");
        assert!(!command.is_available());
        assert!(matches!(command.version(), Err(ParseError::Spawn { .. })));
    }

    #[test]
    fn test_spawn_failure_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = ParseOptions {
            temp_dir: Some(dir.path().to_path_buf()),
            ..ParseOptions::default()
        };
        let backend = RapperBackend::new(RapperCommand::new("/nonexistent/rapper"));

        let result = backend.parse(RdfInput::from("<http://a> <http://b> <http://c> ."), &options);
        assert!(matches!(result, Err(ParseError::Spawn { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_temp_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_temp_file(RdfInput::from("abc"), Some(dir.path())).unwrap();

        assert!(file.path().starts_with(dir.path()));
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "abc");

        drop(file);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
