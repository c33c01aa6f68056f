//! # DirPack Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** DirPack is a deliberately small archiver with a few
//! compression options. It is not meant for production backups.
//!
//! ## Overview
//!
//! This file is the composition root of the DirPack CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Installing the tracing subscriber based on verbosity flags
//! - Running the pack command and reporting any failure
//!
//! ## Architecture
//!
//! DirPack has a single command, so its flags are flattened directly into the
//! top-level `Cli` struct. Library code only emits `tracing` events; this is
//! the one place that decides where they go (stdout) and at which level.
//!
//! ## Examples
//!
//! ```bash
//! # Package a folder as archive.tar.zst
//! dirpack --path ./fixtures/foo
//!
//! # Gzip instead, with debug logging
//! dirpack -vv -p ./fixtures/foo -c .tar.gz
//! ```
//!
//! Processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (or `RUST_LOG`)
//! 3. Run the pack command
//! 4. Log any error once at ERROR level and exit with status 1
//!
use clap::Parser;
use dirpack::commands;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "dirpack",
    about = "📦 DirPack: Archive and compress a folder",
    long_about = "A very simple archiver with a few compression options.\n\
                  Writes archive<suffix> (e.g. archive.tar.zst) into the current directory.",
    version
)]
struct Cli {
    #[command(flatten)]
    pack: commands::pack::PackArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::pack::handle_pack(cli.pack) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
