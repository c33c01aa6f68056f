//! # DirPack Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module resolves the settings for a single packaging run into one
//! explicit `PackConfig` value that is handed to the pipeline. Nothing is kept
//! in global state.
//!
//! ## Architecture
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults (`.tar.zst`, algorithm default level, symlinks not followed)
//! 2. User config `config.toml` in the platform config directory (e.g. `~/.config/dirpack/`)
//! 3. Project config `.dirpack.toml` in the current working directory
//! 4. Command-line flags
//!
//! Every layer is a `FileConfig` whose fields are all optional, so a layer only
//! overrides what it actually sets. After merging, the compression identifier
//! is parsed (unknown identifiers are rejected, not defaulted) and the source
//! path has a leading `~` expanded.
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! # .dirpack.toml
//! compression = ".tar.gz"
//! level = 9
//! follow_links = false
//! ```
//!
//! Loading:
//!
//! ```rust,ignore
//! let overrides = FileConfig { compression: Some(".tar".into()), ..Default::default() };
//! let cfg = config::load_config("~/projects/site", overrides)?;
//! println!("Writing {}", cfg.archive_path().display());
//! ```
//!
use crate::common::archive::compression::CompressionMethod;
use crate::core::error::{DirpackError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the per-project configuration file looked up in the working directory.
const PROJECT_CONFIG_FILENAME: &str = ".dirpack.toml";
/// Name of the configuration file inside the user config directory.
const USER_CONFIG_FILENAME: &str = "config.toml";

/// # Configuration Layer (`FileConfig`)
///
/// One layer of settings, as read from a TOML file or gathered from the
/// command line. Unset fields fall through to lower layers.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct FileConfig {
    /// Compression identifier: `.tar`, `.tar.gz` or `.tar.zst`.
    pub compression: Option<String>,
    /// Compression level passed to the encoder.
    pub level: Option<i32>,
    /// Follow symbolic links while walking the source tree.
    pub follow_links: Option<bool>,
}

impl FileConfig {
    /// Layers `upper` on top of `self`; fields set in `upper` win.
    fn overlay(self, upper: FileConfig) -> FileConfig {
        FileConfig {
            compression: upper.compression.or(self.compression),
            level: upper.level.or(self.level),
            follow_links: upper.follow_links.or(self.follow_links),
        }
    }
}

/// # Effective Pack Configuration (`PackConfig`)
///
/// The fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Root directory to package.
    pub source: PathBuf,
    /// Compression applied to the tar stream.
    pub compression: CompressionMethod,
    /// Optional compression level; `None` uses the algorithm default.
    pub level: Option<i32>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Directory the archive file is written into.
    pub output_dir: PathBuf,
}

impl PackConfig {
    /// Full path of the archive this run writes: `<output_dir>/archive<suffix>`.
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(self.compression.archive_file_name())
    }
}

/// # Load Configuration (`load_config`)
///
/// Resolves the configuration for packaging `source`, merging the user and
/// project configuration files beneath the command-line `overrides`. The
/// archive is placed in the current working directory.
///
/// ## Errors
///
/// Returns an error if the working directory cannot be determined, a
/// configuration file cannot be read or parsed (`DirpackError::Config`), or
/// the resulting compression identifier is unknown
/// (`DirpackError::UnsupportedEncoding`).
pub fn load_config(source: &str, overrides: FileConfig) -> Result<PackConfig> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;

    let user = load_user_config()?.unwrap_or_default();
    let project = load_config_from_path(&current_dir.join(PROJECT_CONFIG_FILENAME))?
        .unwrap_or_default();
    let merged = user.overlay(project).overlay(overrides);
    debug!("Merged configuration layers: {:?}", merged);

    let cfg = resolve_config(source, merged, current_dir)?;
    debug!("Final loaded configuration: {:?}", cfg);
    Ok(cfg)
}

/// Turns merged settings into a `PackConfig`.
pub fn resolve_config(source: &str, settings: FileConfig, output_dir: PathBuf) -> Result<PackConfig> {
    let compression = match settings.compression.as_deref() {
        Some(id) => id.parse::<CompressionMethod>()?,
        None => CompressionMethod::default(),
    };

    Ok(PackConfig {
        source: PathBuf::from(shellexpand::tilde(source).into_owned()),
        compression,
        level: settings.level,
        follow_links: settings.follow_links.unwrap_or(false),
        output_dir,
    })
}

fn load_user_config() -> Result<Option<FileConfig>> {
    match ProjectDirs::from("com", "DirPack", "dirpack") {
        Some(proj_dirs) => load_config_from_path(&proj_dirs.config_dir().join(USER_CONFIG_FILENAME)),
        None => {
            warn!("Could not determine user config directory.");
            Ok(None)
        }
    }
}

/// Reads one configuration layer. A missing file is not an error.
fn load_config_from_path(path: &Path) -> Result<Option<FileConfig>> {
    if !path.is_file() {
        debug!("No configuration file at {}", path.display());
        return Ok(None);
    }
    info!("Loading configuration from: {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let layer = toml::from_str(&content)
        .map_err(|e| DirpackError::Config(format!("{}: {}", path.display(), e.message())))?;
    Ok(Some(layer))
}
