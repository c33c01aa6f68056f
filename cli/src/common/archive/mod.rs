//! # DirPack Archive Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Everything needed to turn a directory into a (compressed) archive stream.
//!
//! ## Architecture
//!
//! - **`walk`**: enumerates the regular files under a root directory.
//! - **`tar`**: writes each file as a tar entry and drives the whole pipeline.
//! - **`compression`**: selects the streaming encoder the tar stream is written through.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::common::archive::{compression::CompressionMethod, tar, walk::WalkOptions};
//! use std::path::Path;
//!
//! # fn run() -> crate::core::error::Result<()> {
//! let encoder = CompressionMethod::Zstd.encoder(Vec::new(), None)?;
//! let (encoder, stats) = tar::archive_dir(Path::new("./site"), encoder, &WalkOptions::default())?;
//! let compressed = encoder.finish()?;
//! # Ok(())
//! # }
//! ```
//!

/// Streaming compression encoders and their selection by suffix.
pub mod compression;
/// Tar entry writing and the directory archive pipeline.
pub mod tar;
/// Recursive discovery of the files to archive.
pub mod walk;
