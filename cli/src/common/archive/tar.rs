//! # DirPack TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module packages a directory into a tar stream. It is the heart of
//! DirPack: the walker finds the files, this module frames each one as a tar
//! entry and streams it into whatever writer it was given. That writer is
//! usually a compression encoder from `common::archive::compression`.
//!
//! ## Architecture
//!
//! - **`append_entry`** writes a single file: open, stat, build a GNU header
//!   from the metadata, then stream the payload. The entry name is the file's
//!   *full* path as walked (not the base name), so directory structure is kept
//!   without emitting directory entries. The name is normalized lexically
//!   (`a/x/../b` becomes `a/b`) and any leading `/`, `.` or `..` is stripped
//!   the way GNU tar does, because tar member names must be relative.
//! - **`archive_dir`** walks the root once, appends every file in walk order,
//!   stops at the first failure, and on success writes the tar terminator and
//!   returns the writer to the caller, who finishes the encoder chain.
//!
//! Nothing is rolled back on failure: entries written before the failing one
//! stay in the stream.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::common::archive::{tar, walk::WalkOptions};
//! use std::path::Path;
//!
//! # fn run() -> crate::core::error::Result<()> {
//! let (bytes, stats) = tar::archive_dir(Path::new("fixtures/foo"), Vec::new(), &WalkOptions::default())?;
//! println!("{} entries, {} payload bytes, {} archive bytes", stats.entries, stats.bytes, bytes.len());
//! # Ok(())
//! # }
//! ```
//!
use super::walk::{self, WalkOptions};
use crate::core::error::{DirpackError, Result};
use std::fs::File;
use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use tar::{Builder, Header, HeaderMode};
use tracing::{debug, info};

/// Totals for a completed archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    /// Number of file entries written.
    pub entries: usize,
    /// Sum of payload sizes, excluding headers and padding.
    pub bytes: u64,
}

/// # Archive Directory (`archive_dir`)
///
/// Packages every regular file under `source` into a tar stream written to
/// `sink`.
///
/// Files are appended in the order the walker returns them. The first error
/// aborts the run and is returned as is. On success the two terminating zero
/// blocks are written and `sink` is handed back; flushing or finishing it is
/// left to the caller.
///
/// ## Errors
///
/// - `DirpackError::Traversal` if the walk fails (nothing is written then).
/// - `DirpackError::EntryRead` / `DirpackError::EntryWrite` from `append_entry`.
/// - `DirpackError::Finalize` if the terminator cannot be written.
pub fn archive_dir<W: Write>(
    source: &Path,
    sink: W,
    options: &WalkOptions,
) -> Result<(W, PackStats)> {
    let files = walk::collect_files(source, options)?;

    let mut builder = Builder::new(sink);
    let mut stats = PackStats::default();
    for path in &files {
        stats.bytes += append_entry(&mut builder, path)?;
        stats.entries += 1;
    }

    let sink = builder
        .into_inner()
        .map_err(|source| DirpackError::Finalize {
            stage: "tar terminator",
            source,
        })?;

    info!(
        "Archived {} entries ({} bytes) from {}",
        stats.entries,
        stats.bytes,
        source.display()
    );
    Ok((sink, stats))
}

/// # Append Entry (`append_entry`)
///
/// Writes one file into the archive as a header followed by its content.
/// Returns the payload size in bytes.
///
/// The source handle is owned by this function and closed on every path out
/// of it, including failed header or payload writes.
///
/// ## Errors
///
/// - `DirpackError::EntryRead` if the file cannot be opened or stat'd, or is
///   no longer a regular file.
/// - `DirpackError::EntryWrite` if writing the header or payload fails.
pub fn append_entry<W: Write>(builder: &mut Builder<W>, path: &Path) -> Result<u64> {
    let mut file = File::open(path).map_err(|e| read_error(path, e))?;
    let metadata = file.metadata().map_err(|e| read_error(path, e))?;
    if !metadata.is_file() {
        return Err(read_error(path, io::Error::other("not a regular file")).into());
    }

    let size = metadata.len();
    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(&metadata, HeaderMode::Complete);

    let name = entry_name(path);
    // Cap the copy at the stat'd size so a growing file cannot overrun its header.
    builder
        .append_data(&mut header, &name, (&mut file).take(size))
        .map_err(|source| DirpackError::EntryWrite {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Added entry {} ({} bytes)", name.display(), size);
    Ok(size)
}

/// Archive member name for `path`: the full path with `.` dropped, each `..`
/// folded into the component before it, and any root or prefix removed.
/// A `..` with nothing left to fold is dropped.
pub fn entry_name(path: &Path) -> PathBuf {
    let mut parts: Vec<&OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.into_iter().collect()
}

fn read_error(path: &Path, source: io::Error) -> DirpackError {
    DirpackError::EntryRead {
        path: path.to_path_buf(),
        source,
    }
}
