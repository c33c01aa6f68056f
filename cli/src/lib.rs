//! # DirPack Library
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//!
//! The packaging pipeline behind the `dirpack` binary. `main.rs` only parses
//! arguments and installs logging; everything else lives here so the
//! benchmarks in `cli/benches/` can drive `common::archive` directly.
//!
pub mod commands; // The pack command
pub mod common; // Archive machinery: walker, tar writer, encoders
pub mod core; // Configuration and error types
