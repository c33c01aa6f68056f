//! # DirPack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared building blocks used by the command layer. Keeping them under
//! `common::` separates the packaging machinery from command-line handling
//! (`commands::`) and infrastructure (`core::`).
//!
//! - **`archive`**: directory walking, tar framing, and compression encoders.
//!

/// Utilities for producing archive files (walker, tar writer, encoders).
pub mod archive;
