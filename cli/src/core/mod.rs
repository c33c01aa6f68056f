//! # DirPack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every part of DirPack:
//! - `config`: layered configuration loading into an explicit `PackConfig`
//! - `error`: the `DirpackError` taxonomy and the crate-wide `Result` alias
//!
//! ```rust,ignore
//! use crate::core::config; // For resolving run settings
//! use crate::core::error::{DirpackError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
