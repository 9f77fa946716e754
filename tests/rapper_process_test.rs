//! Subprocess handling of the rapper backend, run against shell scripts that
//! stand in for the real `rapper` executable.
#![cfg(unix)]

use rapper_rdf::{Backend, ParseError, Parser, RapperCommand};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const TEST_RDF: &str = "<http://bar> <http://baz> \"1\" .\n<http://bar> <http://baz> \"2\" .\n";

const EXPECTED: [&str; 2] = ["http://bar http://baz 1", "http://bar http://baz 2"];

// Forking while another test still holds a script open for writing makes
// exec fail with ETXTBSY, so these tests run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> std::sync::MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable `rapper` script; the input file arrives as `$6`
fn fake_rapper(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("rapper");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 2.0.16; exit 0; fi\n{body}\n"
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn rapper_parser(script: &Path, tmp: &Path) -> Parser {
    Parser::new()
        .with_backend(Backend::Rapper)
        .with_rapper_command(RapperCommand::new(script))
        .with_temp_dir(tmp)
}

fn assert_empty(dir: &TempDir) {
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "temporary files left behind: {leftovers:?}");
}

#[test]
fn test_quads_read_from_rapper_stdout() {
    let _guard = serial();
    let bin = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let script = fake_rapper(&bin, "cat \"$6\"");

    let quads = rapper_parser(&script, tmp.path()).parse(TEST_RDF).unwrap();
    let values: Vec<String> = quads.map(|q| q.unwrap().value_string()).collect();

    assert_eq!(values, EXPECTED);
    assert_empty(&tmp);
}

#[test]
fn test_failed_exit_reports_stderr() {
    let _guard = serial();
    let bin = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let script = fake_rapper(
        &bin,
        "head -n 1 \"$6\"\necho 'rapper: Error - syntax error at line 2' >&2\nexit 1",
    );

    let results: Vec<_> = rapper_parser(&script, tmp.path())
        .parse(TEST_RDF)
        .unwrap()
        .collect();

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].as_ref().unwrap().value_string(),
        "http://bar http://baz 1"
    );
    match &results[1] {
        Err(ParseError::RapperFailed { status, stderr }) => {
            assert_eq!(status.code(), Some(1));
            assert_eq!(stderr, "rapper: Error - syntax error at line 2");
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_empty(&tmp);
}

#[test]
fn test_warnings_exit_is_not_a_failure() {
    let _guard = serial();
    let bin = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let script = fake_rapper(
        &bin,
        "cat \"$6\"\necho 'rapper: Warning - unknown attribute' >&2\nexit 2",
    );

    let quads = rapper_parser(&script, tmp.path())
        .parse(TEST_RDF)
        .unwrap()
        .collect_quads()
        .unwrap();

    let values: Vec<String> = quads.iter().map(|q| q.value_string()).collect();
    assert_eq!(values, EXPECTED);
    assert_empty(&tmp);
}

#[test]
fn test_early_drop_kills_rapper() {
    let _guard = serial();
    let bin = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let script = fake_rapper(&bin, "cat \"$6\"\nexec sleep 30");

    let mut quads = rapper_parser(&script, tmp.path()).parse(TEST_RDF).unwrap();
    assert_eq!(
        quads.next().unwrap().unwrap().value_string(),
        "http://bar http://baz 1"
    );

    let started = Instant::now();
    drop(quads);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_empty(&tmp);
}

#[test]
fn test_path_input_is_passed_through() {
    let _guard = serial();
    let bin = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let fixtures = TempDir::new().unwrap();
    let doc = fixtures.path().join("doc.nt");
    std::fs::write(&doc, TEST_RDF).unwrap();

    // Echo the input path as a literal so the test can see what rapper got
    let script = fake_rapper(&bin, "echo \"<http://s> <http://p> \\\"$6\\\" .\"");

    let quads = rapper_parser(&script, tmp.path())
        .parse(doc.as_path())
        .unwrap()
        .collect_quads()
        .unwrap();

    assert_eq!(quads.len(), 1);
    assert_eq!(
        quads[0].value_string(),
        format!("http://s http://p {}", doc.display())
    );
    assert_empty(&tmp);
}

#[test]
fn test_auto_prefers_available_rapper() {
    let _guard = serial();
    let bin = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let script = fake_rapper(&bin, "echo '<http://fake> <http://p> \"rapper\" .'");

    let command = RapperCommand::new(&script);
    assert!(command.is_available());
    assert_eq!(command.version().unwrap(), "2.0.16");

    let parser = Parser::new()
        .with_backend(Backend::Auto)
        .with_rapper_command(command)
        .with_temp_dir(tmp.path());
    let values: Vec<String> = parser
        .parse(TEST_RDF)
        .unwrap()
        .map(|q| q.unwrap().value_string())
        .collect();

    assert_eq!(values, vec!["http://fake http://p rapper"]);
    assert_empty(&tmp);
}
