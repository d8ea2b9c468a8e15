//! cli
//!
//! Command-line interface layer for releasegate.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Wire the repository, checks and hosting provider for the working directory
//! - Delegate to the [`crate::engine`] pipeline
//!
//! The CLI layer is thin: every check and the publish step live in the
//! engine, behind its collaborator traits.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::engine;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
