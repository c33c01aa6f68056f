//! # DirPack Pack Command
//!
//! File: cli/src/commands/pack.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the single DirPack command: package a directory
//! into `archive<suffix>` in the current working directory, optionally
//! compressed.
//!
//! ## Architecture
//!
//! The run moves through a small state machine:
//!
//! - **Idle**: configuration is resolved, the compression selection and source
//!   root are validated. Failing here leaves no output file behind.
//! - **Packaging**: the archive file is created, wrapped in the selected
//!   encoder, and `common::archive::tar::archive_dir` writes every file.
//! - **Finalizing**: the encoder trailer is written, the buffered sink flushed
//!   and the file synced to disk.
//! - **Done** or **Failed**.
//!
//! There is no retry. A run that fails after Idle leaves a truncated archive on
//! disk; the next run overwrites it.
//!
//! ## Examples
//!
//! ```bash
//! # Package ./site as archive.tar.zst (default compression)
//! dirpack --path ./site
//!
//! # Gzip at maximum level
//! dirpack -p ./site -c .tar.gz -l 9
//!
//! # Plain tar, following symlinks
//! dirpack -p ./site -c .tar --follow-links
//! ```
//!
use crate::common::archive::compression::StreamEncoder;
use crate::common::archive::tar::{self, PackStats};
use crate::common::archive::walk::WalkOptions;
use crate::core::config::{self, FileConfig, PackConfig};
use crate::core::error::{DirpackError, Result};
use anyhow::Context;
use clap::Parser;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Pack Arguments (`PackArgs`)
///
/// Command-line arguments for a packaging run. Options left unset fall back to
/// `.dirpack.toml`, the user configuration file, and then built-in defaults.
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Path to the directory to archive.
    #[arg(short, long)]
    pub path: String,

    /// Compression method. Options: '.tar.zst' (default), '.tar.gz' or '.tar'.
    #[arg(short, long)]
    pub compression: Option<String>,

    /// Compression level (gzip: 0-9, zstd: 1-22 or negative for fast modes).
    #[arg(short, long, allow_negative_numbers = true)]
    pub level: Option<i32>,

    /// Follow symbolic links while walking the source directory.
    #[arg(long)]
    pub follow_links: bool,
}

impl PackArgs {
    /// The command-line layer of the configuration.
    fn overrides(&self) -> FileConfig {
        FileConfig {
            compression: self.compression.clone(),
            level: self.level,
            // An absent flag must not mask a `follow_links = true` from a config file.
            follow_links: self.follow_links.then_some(true),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    /// Path of the archive written.
    pub archive: PathBuf,
    /// Entry and byte totals.
    pub stats: PackStats,
}

/// Lifecycle of one packaging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Packaging,
    Finalizing,
    Done,
    Failed,
}

impl RunState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_advance_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, Packaging)
                | (Packaging, Finalizing)
                | (Finalizing, Done)
                | (Idle, Failed)
                | (Packaging, Failed)
                | (Finalizing, Failed)
        )
    }
}

/// Output chain used by the command: encoder over a buffered archive file.
type ArchiveEncoder = Box<dyn StreamEncoder<BufWriter<File>>>;

/// One packaging run over a resolved configuration.
struct PackRun<'a> {
    config: &'a PackConfig,
    state: RunState,
}

impl<'a> PackRun<'a> {
    fn new(config: &'a PackConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal run state transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!("Run state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs to completion, recording `Failed` on any error.
    fn execute(&mut self) -> Result<PackSummary> {
        let outcome = self.package();
        if outcome.is_err() {
            self.advance(RunState::Failed);
        }
        outcome
    }

    fn package(&mut self) -> Result<PackSummary> {
        let cfg = self.config;

        // Idle: reject bad selections before any output exists.
        cfg.compression.validate(cfg.level)?;
        let source_meta = fs::metadata(&cfg.source).map_err(|source| DirpackError::Traversal {
            path: cfg.source.clone(),
            source,
        })?;
        if !source_meta.is_dir() {
            return Err(DirpackError::Traversal {
                path: cfg.source.clone(),
                source: std::io::Error::other("not a directory"),
            }
            .into());
        }

        self.advance(RunState::Packaging);
        let archive_path = cfg.archive_path();
        info!(
            "Packaging {} into {} ({})",
            cfg.source.display(),
            archive_path.display(),
            cfg.compression.name()
        );
        let file = File::create(&archive_path)
            .with_context(|| format!("Failed to create archive file {}", archive_path.display()))?;
        let options = WalkOptions {
            follow_links: cfg.follow_links,
            exclude: fs::canonicalize(&archive_path).ok(),
        };
        let encoder = cfg
            .compression
            .encoder(BufWriter::new(file), cfg.level)
            .context("Failed to select encoder")?;
        let (encoder, stats) = tar::archive_dir(&cfg.source, encoder, &options)?;

        self.advance(RunState::Finalizing);
        finalize(encoder)?;

        self.advance(RunState::Done);
        Ok(PackSummary {
            archive: archive_path,
            stats,
        })
    }
}

/// Closes the output chain outermost-first: encoder trailer, buffer, file.
fn finalize(encoder: ArchiveEncoder) -> Result<()> {
    let buffered = encoder.finish().map_err(|source| DirpackError::Finalize {
        stage: "encoder trailer",
        source,
    })?;
    let file = buffered
        .into_inner()
        .map_err(|e| DirpackError::Finalize {
            stage: "buffer flush",
            source: e.into_error(),
        })?;
    file.sync_all().map_err(|source| DirpackError::Finalize {
        stage: "sync",
        source,
    })?;
    Ok(())
}

/// # Pack (`pack`)
///
/// Packages `config.source` into `config.archive_path()`.
///
/// ## Errors
///
/// Any `DirpackError` raised along the pipeline; see `core::error`.
pub fn pack(config: &PackConfig) -> Result<PackSummary> {
    PackRun::new(config).execute()
}

/// # Handle Pack Command (`handle_pack`)
///
/// Entry point from `main`: resolves the configuration from the arguments,
/// runs the packaging pipeline, and prints a one-line summary.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` once the archive is complete on disk, otherwise the
///   first error encountered.
pub fn handle_pack(args: PackArgs) -> Result<()> {
    info!("Handling pack command...");
    debug!("Pack args: {:?}", args);

    let cfg = config::load_config(&args.path, args.overrides())
        .context("Failed to load DirPack configuration")?;
    let summary = pack(&cfg)?;

    info!("Successfully created {}", summary.archive.display());
    println!(
        "✅ Created {} ({} entries, {} bytes)",
        summary.archive.display(),
        summary.stats.entries,
        summary.stats.bytes
    );
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::compression::CompressionMethod;
    use std::io::Read;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    /// Creates `src/a.txt`, `src/bar/b.txt` and an empty `out/` directory.
    fn workspace() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        let out = temp_dir.path().join("out");
        fs::create_dir_all(src.join("bar")).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(src.join("a.txt"), "hello").unwrap();
        fs::write(src.join("bar/b.txt"), "world").unwrap();
        (temp_dir, src, out)
    }

    fn config(source: &Path, output_dir: &Path, compression: CompressionMethod) -> PackConfig {
        PackConfig {
            source: source.to_path_buf(),
            compression,
            level: None,
            follow_links: false,
            output_dir: output_dir.to_path_buf(),
        }
    }

    fn decompressed(path: &Path, compression: CompressionMethod) -> Vec<u8> {
        let raw = fs::read(path).unwrap();
        match compression {
            CompressionMethod::None => raw,
            CompressionMethod::Gzip => {
                let mut out = Vec::new();
                flate2::read::GzDecoder::new(raw.as_slice())
                    .read_to_end(&mut out)
                    .unwrap();
                out
            }
            CompressionMethod::Zstd => zstd::stream::decode_all(raw.as_slice()).unwrap(),
        }
    }

    fn entry_names(container: &[u8]) -> Vec<String> {
        ::tar::Archive::new(container)
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_state_transitions() {
        use RunState::*;
        assert!(Idle.can_advance_to(Packaging));
        assert!(Packaging.can_advance_to(Finalizing));
        assert!(Finalizing.can_advance_to(Done));
        for from in [Idle, Packaging, Finalizing] {
            assert!(from.can_advance_to(Failed));
        }
        assert!(!Done.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Packaging));
        assert!(!Idle.can_advance_to(Done));
    }

    #[test]
    fn test_pack_every_method_yields_same_container() -> Result<()> {
        let (_guard, src, out) = workspace();
        let mut containers = Vec::new();

        for method in [CompressionMethod::None, CompressionMethod::Gzip, CompressionMethod::Zstd] {
            let cfg = config(&src, &out, method);
            let mut run = PackRun::new(&cfg);
            let summary = run.execute()?;

            assert_eq!(run.state, RunState::Done);
            assert_eq!(summary.archive, out.join(format!("archive{}", method.suffix())));
            assert_eq!(summary.stats, PackStats { entries: 2, bytes: 10 });
            containers.push(decompressed(&summary.archive, method));
        }

        let names = entry_names(&containers[0]);
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("src/a.txt"));
        assert!(names[1].ends_with("src/bar/b.txt"));
        assert_eq!(containers[0], containers[1]);
        assert_eq!(containers[0], containers[2]);
        Ok(())
    }

    #[test]
    fn test_missing_source_creates_no_archive() {
        let (guard, _src, out) = workspace();
        let cfg = config(&guard.path().join("missing"), &out, CompressionMethod::Zstd);
        let mut run = PackRun::new(&cfg);

        let err = run.execute().unwrap_err();

        assert_eq!(run.state, RunState::Failed);
        assert!(matches!(
            err.downcast_ref::<DirpackError>(),
            Some(DirpackError::Traversal { .. })
        ));
        assert!(!cfg.archive_path().exists());
    }

    #[test]
    fn test_bad_level_fails_before_output() {
        let (_guard, src, out) = workspace();
        let mut cfg = config(&src, &out, CompressionMethod::Gzip);
        cfg.level = Some(42);

        let err = pack(&cfg).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DirpackError>(),
            Some(DirpackError::EncoderInit { .. })
        ));
        assert!(!cfg.archive_path().exists());
    }

    #[test]
    fn test_output_inside_source_is_not_archived() -> Result<()> {
        let (_guard, src, _out) = workspace();
        let cfg = config(&src, &src, CompressionMethod::None);

        let summary = pack(&cfg)?;

        assert_eq!(summary.stats.entries, 2);
        let names = entry_names(&fs::read(&summary.archive)?);
        assert!(names.iter().all(|n| !n.ends_with("archive.tar")), "{names:?}");
        Ok(())
    }

    #[test]
    fn test_rerun_overwrites_archive() -> Result<()> {
        let (_guard, src, out) = workspace();
        let cfg = config(&src, &out, CompressionMethod::None);
        fs::write(cfg.archive_path(), vec![0xffu8; 64 * 1024])?;

        let first = pack(&cfg)?;
        let first_bytes = fs::read(&first.archive)?;
        let second = pack(&cfg)?;

        assert_eq!(entry_names(&first_bytes), entry_names(&fs::read(&second.archive)?));
        assert!(first_bytes.len() < 64 * 1024);
        Ok(())
    }

    #[test]
    fn test_overrides_only_set_given_flags() {
        let args = PackArgs::parse_from(["dirpack", "--path", "site"]);
        assert_eq!(args.overrides(), FileConfig::default());

        let args = PackArgs::parse_from([
            "dirpack", "-p", "site", "-c", ".tar.gz", "-l", "-1", "--follow-links",
        ]);
        assert_eq!(
            args.overrides(),
            FileConfig {
                compression: Some(".tar.gz".into()),
                level: Some(-1),
                follow_links: Some(true),
            }
        );
    }
}
