// Shared test helpers for integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

/// A reporter command running inside `dir`, in English and without colors.
pub fn reporter(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("harness-reporter").unwrap();
    cmd.current_dir(dir)
        .env_remove("HARNESS_REPORTER_LOG")
        .args(["--lang", "en", "run", "--no-color"]);
    cmd
}

pub fn workspace() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

pub fn module_start(name: &str) -> Value {
    json!({"event": "moduleStart", "name": name})
}

pub fn test_start(name: &str) -> Value {
    json!({"event": "testStart", "name": name})
}

pub fn test_done(name: &str, assertions: Vec<Value>) -> Value {
    json!({"event": "testDone", "name": name, "outcome": {"assertions": assertions, "duration_ms": 1}})
}

pub fn done(assertions: Vec<Value>, duration_ms: u64) -> Value {
    json!({"event": "done", "summary": {"assertions": assertions, "duration_ms": duration_ms}})
}

pub fn pass() -> Value {
    json!({})
}

pub fn assertion_failure(message: &str, trace: &str) -> Value {
    json!({"error": {"kind": "assertion", "message": message, "trace": trace}})
}

pub fn generic_failure(trace: &str) -> Value {
    json!({"error": {"kind": "generic", "trace": trace}})
}

/// Joins events into the JSON-lines stream a runner would print.
pub fn stream(events: &[Value]) -> String {
    events.iter().map(|e| format!("{e}\n")).collect()
}

pub fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
