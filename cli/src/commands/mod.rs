//! # DirPack Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Command handlers invoked from `main.rs`. DirPack currently exposes a single
//! command, `pack`, whose flags sit at the top level of the CLI.
//!

/// Packages a directory into a (compressed) tar archive.
pub mod pack;
