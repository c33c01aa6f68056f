//! # DirPack Compression Encoders (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module turns a compression identifier (the archive suffix the user
//! asked for) into a streaming encoder wrapped around a destination sink. The
//! tar builder writes into whatever this module hands back, so archiving and
//! compressing stay independent of each other.
//!
//! ## Architecture
//!
//! - **`CompressionMethod`**: the supported methods, keyed by their archive suffix
//!   (`.tar`, `.tar.gz`, `.tar.zst`) through a single lookup table. Unknown
//!   suffixes are rejected with `DirpackError::UnsupportedEncoding`.
//! - **`StreamEncoder`**: the capability every encoder provides. It is a `Write`
//!   whose `finish` writes any trailer and returns the sink underneath, so the
//!   caller can flush and close the sink afterwards.
//! - Concrete encoders: `Identity` (pass-through), `flate2::write::GzEncoder`,
//!   and `zstd::stream::write::Encoder`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::common::archive::compression::CompressionMethod;
//!
//! # fn run() -> crate::core::error::Result<()> {
//! let method: CompressionMethod = ".tar.gz".parse()?;
//! let mut encoder = method.encoder(Vec::new(), Some(9))?;
//! encoder.write_all(b"payload")?;
//! let compressed: Vec<u8> = encoder.finish()?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{DirpackError, Result};
use flate2::{write::GzEncoder, Compression};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use tracing::debug;

/// A streaming transform layered over a sink `W`.
///
/// Bytes written go through the transform into `W`. `finish` must be called
/// once all data is written; it emits trailing bytes (checksums, frame
/// epilogues) and returns the sink. Dropping an encoder without finishing it
/// may lose buffered output.
pub trait StreamEncoder<W: Write>: Write {
    /// Writes any pending trailer and hands back the wrapped sink.
    fn finish(self: Box<Self>) -> io::Result<W>;
}

/// Pass-through encoder used for plain `.tar` output.
#[derive(Debug)]
pub struct Identity<W: Write>(W);

impl<W: Write> Identity<W> {
    pub fn new(sink: W) -> Self {
        Self(sink)
    }
}

impl<W: Write> Write for Identity<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<W: Write> StreamEncoder<W> for Identity<W> {
    fn finish(self: Box<Self>) -> io::Result<W> {
        let mut sink = self.0;
        sink.flush()?;
        Ok(sink)
    }
}

impl<W: Write> StreamEncoder<W> for GzEncoder<W> {
    fn finish(self: Box<Self>) -> io::Result<W> {
        GzEncoder::finish(*self)
    }
}

impl<W: Write> StreamEncoder<W> for zstd::stream::write::Encoder<'static, W> {
    fn finish(self: Box<Self>) -> io::Result<W> {
        zstd::stream::write::Encoder::finish(*self)
    }
}

/// # Compression Method (`CompressionMethod`)
///
/// The compression applied to the tar stream. The archive file suffix doubles
/// as the identifier the user selects it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    /// Plain tar, bytes pass through unchanged.
    None,
    /// Gzip (deflate family) via `flate2`.
    Gzip,
    /// Zstandard via the `zstd` crate.
    #[default]
    Zstd,
}

/// Identifier table. The first column is what users type and what the
/// archive file name ends with.
const METHODS: &[(&str, CompressionMethod)] = &[
    (".tar", CompressionMethod::None),
    (".tar.gz", CompressionMethod::Gzip),
    (".tar.zst", CompressionMethod::Zstd),
];

/// Accepted gzip levels.
const GZIP_LEVELS: std::ops::RangeInclusive<i32> = 0..=9;

impl CompressionMethod {
    /// The archive suffix for this method, e.g. `.tar.zst`.
    pub fn suffix(self) -> &'static str {
        METHODS
            .iter()
            .find(|(_, method)| *method == self)
            .map(|(id, _)| *id)
            .unwrap_or(".tar")
    }

    /// Short human-readable algorithm name for logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            CompressionMethod::None => "none",
            CompressionMethod::Gzip => "gzip",
            CompressionMethod::Zstd => "zstd",
        }
    }

    /// File name of the archive produced with this method (`archive<suffix>`).
    pub fn archive_file_name(self) -> String {
        format!("archive{}", self.suffix())
    }

    /// Comma-separated list of every accepted identifier.
    pub fn supported() -> String {
        METHODS
            .iter()
            .map(|(id, _)| *id)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// # Validate Level (`validate`)
    ///
    /// Checks that `level` is acceptable for this method without building an
    /// encoder, so a bad selection can be rejected before any output exists.
    ///
    /// ## Errors
    ///
    /// Returns `DirpackError::EncoderInit` if the level is outside the range
    /// the algorithm accepts.
    pub fn validate(self, level: Option<i32>) -> Result<()> {
        let Some(level) = level else {
            return Ok(());
        };
        let range = match self {
            CompressionMethod::None => return Ok(()),
            CompressionMethod::Gzip => GZIP_LEVELS,
            CompressionMethod::Zstd => zstd::compression_level_range(),
        };
        if !range.contains(&level) {
            return Err(self
                .init_error(format!(
                    "level {} out of range {}..={}",
                    level,
                    range.start(),
                    range.end()
                ))
                .into());
        }
        Ok(())
    }

    /// # Build Encoder (`encoder`)
    ///
    /// Wraps `sink` in the streaming encoder for this method.
    ///
    /// `level` is optional; `None` selects the algorithm's default (gzip 6,
    /// zstd 3). It is ignored for plain `.tar`.
    ///
    /// ## Errors
    ///
    /// Returns `DirpackError::EncoderInit` if the level is rejected by
    /// `validate` or the encoder context cannot be created.
    pub fn encoder<W: Write + 'static>(
        self,
        sink: W,
        level: Option<i32>,
    ) -> Result<Box<dyn StreamEncoder<W>>> {
        self.validate(level)?;
        match self {
            CompressionMethod::None => {
                if let Some(level) = level {
                    debug!("Ignoring compression level {} for uncompressed tar", level);
                }
                Ok(Box::new(Identity::new(sink)))
            }
            CompressionMethod::Gzip => {
                let compression = match level {
                    Some(l) => Compression::new(l as u32),
                    None => Compression::default(),
                };
                debug!("Using gzip encoder at level {}", compression.level());
                Ok(Box::new(GzEncoder::new(sink, compression)))
            }
            CompressionMethod::Zstd => {
                let level = level.unwrap_or(zstd::DEFAULT_COMPRESSION_LEVEL);
                let encoder = zstd::stream::write::Encoder::new(sink, level)
                    .map_err(|e| self.init_error(e.to_string()))?;
                debug!("Using zstd encoder at level {}", level);
                Ok(Box::new(encoder))
            }
        }
    }

    fn init_error(self, reason: String) -> DirpackError {
        DirpackError::EncoderInit {
            method: self.name().to_string(),
            reason,
        }
    }
}

impl FromStr for CompressionMethod {
    type Err = DirpackError;

    fn from_str(id: &str) -> std::result::Result<Self, Self::Err> {
        METHODS
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, method)| *method)
            .ok_or_else(|| DirpackError::UnsupportedEncoding {
                id: id.to_string(),
                expected: Self::supported(),
            })
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
