//! # DirPack Path Walker (`common::archive::walk`)
//!
//! File: cli/src/common/archive/walk.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Enumerates every regular file below a root directory, in a deterministic
//! order, so the archive pipeline can package them one by one.
//!
//! ## Architecture
//!
//! The walker is a thin layer over `walkdir::WalkDir`:
//!
//! - Entries are sorted by file name at every level, giving lexical,
//!   depth-first order that is stable across runs and platforms.
//! - Directories produce no records; only regular files are collected.
//!   Symlinks are skipped unless `follow_links` is set, in which case their
//!   targets are classified instead.
//! - The walk is all-or-nothing. The first error (missing root, unreadable
//!   subdirectory, symlink loop) aborts it with `DirpackError::Traversal` and
//!   whatever was collected so far is discarded.
//! - An optional excluded path (the archive currently being written) is
//!   never collected.
//!
//! Returned paths are the root joined with each file's relative path, so they
//! are absolute exactly when the root is.
//!
use crate::core::error::{DirpackError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Options controlling a directory walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Follow symbolic links to files and directories.
    pub follow_links: bool,
    /// Canonical path of a file that must not be collected.
    pub exclude: Option<PathBuf>,
}

/// # Collect Files (`collect_files`)
///
/// Recursively collects the paths of all regular files under `root`.
///
/// ## Errors
///
/// Returns `DirpackError::Traversal` if `root` does not exist, is not a
/// directory, or any entry below it cannot be read.
pub fn collect_files(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|e| traversal_error(root, e))?;
    if !metadata.is_dir() {
        return Err(traversal_error(root, io::Error::other("not a directory")).into());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for entry_result in walker {
        let entry = entry_result.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            // Loop errors carry no io::Error of their own.
            let message = e.to_string();
            let source = e.into_io_error().unwrap_or_else(|| io::Error::other(message));
            traversal_error(&path, source)
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            debug!("Skipping non-regular entry: {}", entry.path().display());
            continue;
        }
        if is_excluded(entry.path(), options.exclude.as_deref()) {
            debug!("Skipping output archive: {}", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }

    info!("Found {} file(s) under {}", files.len(), root.display());
    Ok(files)
}

/// Cheap name check first; only a name match pays for canonicalization.
fn is_excluded(path: &Path, exclude: Option<&Path>) -> bool {
    let Some(exclude) = exclude else {
        return false;
    };
    if path.file_name() != exclude.file_name() {
        return false;
    }
    fs::canonicalize(path)
        .map(|canonical| canonical == exclude)
        .unwrap_or(false)
}

fn traversal_error(path: &Path, source: io::Error) -> DirpackError {
    DirpackError::Traversal {
        path: path.to_path_buf(),
        source,
    }
}
