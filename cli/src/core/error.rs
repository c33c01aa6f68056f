//! # DirPack Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error taxonomy for DirPack. Every failure in the
//! packaging pipeline is fatal to the run, so the variants below mirror the
//! stages where a run can stop:
//!
//! - **Traversal**: the source root is missing, unreadable, or a sub-path fails mid-walk.
//! - **EntryRead**: a discovered file can no longer be opened or stat'd.
//! - **EntryWrite**: writing a header or payload into the (possibly compressing) sink failed.
//! - **UnsupportedEncoding** / **EncoderInit**: the compression selection is invalid.
//! - **Finalize**: finishing the encoder chain or syncing the sink failed.
//! - **Config**: a configuration file could not be used.
//!
//! ## Architecture
//!
//! - `DirpackError`: a `thiserror` enum carrying the typed failure.
//! - `Result<T>`: an alias for `anyhow::Result<T>` so callers can layer context
//!   with `anyhow::Context` while the typed error stays reachable through
//!   `downcast_ref::<DirpackError>()`.
//!
//! Variants wrapping an `io::Error` keep it as `#[source]` only. The alternate
//! `{:#}` form used by `main` appends the cause once.
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Classify a failure coming back from the pipeline
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<DirpackError>(), Some(DirpackError::Traversal { .. })) => {
//!         println!("Source directory could not be walked");
//!     }
//!     Err(e) => return Err(e),
//!     Ok(stats) => println!("Packed {} entries", stats.entries),
//! }
//! ```
//!
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the DirPack application.
#[derive(Error, Debug)]
pub enum DirpackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to traverse '{}'", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read entry '{}'", path.display())]
    EntryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write entry '{}' to the archive", path.display())]
    EntryWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported compression '{id}'. Expected one of: {expected}")]
    UnsupportedEncoding { id: String, expected: String },

    #[error("Failed to initialize {method} encoder: {reason}")]
    EncoderInit { method: String, reason: String },

    #[error("Failed to finalize archive ({stage})")]
    Finalize {
        stage: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = DirpackError::Config("Unknown field 'foo'".to_string());
        assert_eq!(config_err.to_string(), "Configuration error: Unknown field 'foo'");

        let traversal = DirpackError::Traversal {
            path: PathBuf::from("fixtures/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(traversal.to_string(), "Failed to traverse 'fixtures/missing'");

        let unsupported = DirpackError::UnsupportedEncoding {
            id: ".tar.bz2".into(),
            expected: ".tar, .tar.gz, .tar.zst".into(),
        };
        assert_eq!(
            unsupported.to_string(),
            "Unsupported compression '.tar.bz2'. Expected one of: .tar, .tar.gz, .tar.zst"
        );
    }

    #[test]
    fn test_chain_reports_io_cause_once() {
        let err: anyhow::Error = DirpackError::EntryWrite {
            path: PathBuf::from("fixtures/foo/a.txt"),
            source: io::Error::other("sink full"),
        }
        .into();
        let rendered = format!("{:#}", err);
        assert_eq!(
            rendered,
            "Failed to write entry 'fixtures/foo/a.txt' to the archive: sink full"
        );
        assert_eq!(rendered.matches("sink full").count(), 1);
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = DirpackError::EncoderInit {
            method: "gzip".into(),
            reason: "level 12 out of range 0..=9".into(),
        }
        .into();
        let err = err.context("Failed to select encoder");
        assert!(matches!(
            err.downcast_ref::<DirpackError>(),
            Some(DirpackError::EncoderInit { .. })
        ));
    }
}
