//! # DirPack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `dirpack` binary inside its own temporary working directory,
//! with the user config location redirected there too, so runs never touch
//! the developer's real configuration or each other's archives.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// # Get DirPack Command (`dirpack_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `dirpack` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn dirpack_cmd() -> Command {
    Command::cargo_bin("dirpack").expect("Failed to find dirpack binary for testing")
}

/// # Sandboxed Command (`dirpack_in`)
///
/// Like `dirpack_cmd`, but runs in `dir` with `HOME` and `XDG_CONFIG_HOME`
/// pointing inside it.
pub fn dirpack_in(dir: &Path) -> Command {
    let mut cmd = dirpack_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// # Fixture Workspace (`fixture_workspace`)
///
/// Creates a temporary directory containing:
///
/// ```text
/// fixtures/foo/a.txt      "hello"
/// fixtures/foo/bar/b.txt  "world"
/// ```
pub fn fixture_workspace() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let foo = temp_dir.path().join("fixtures/foo");
    fs::create_dir_all(foo.join("bar")).expect("Failed to create fixture dirs");
    fs::write(foo.join("a.txt"), "hello").expect("Failed to write a.txt");
    fs::write(foo.join("bar/b.txt"), "world").expect("Failed to write b.txt");
    temp_dir
}
