//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Echo every shell command and its output
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Releasegate - validate a repository for release and publish it
#[derive(Parser, Debug)]
#[command(name = "rgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if rgate was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub debug: bool,

    /// Print errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the repository is ready to release a version
    #[command(
        name = "validate",
        long_about = "Check that the repository is ready to release a version.\n\n\
            Runs, in order: version format, sync with the remote, manifest, \
            support files, license year, tests, documentation lint, changelog \
            date, and open issues. Stops at the first failing check. An \
            out-of-date license year and open issues only warn.",
        after_help = "\
EXAMPLES:
    rgate validate 1.2.0
    rgate validate v2.0.0-beta1

VERSION FORMAT:
    1.2.3 or v1.2.3, optionally followed by -dev, -alpha, -beta, -RC or -p
    and an optional number (1.2.3-RC2)."
    )]
    Validate {
        /// Version to validate
        version: Option<String>,
    },

    /// Validate, then publish a release to the hosting provider
    #[command(
        name = "release",
        long_about = "Validate the repository, then publish the version as a release \
            on the hosting provider and sync the tag back.\n\n\
            Waits for the configured delay before starting so the release can be \
            cancelled with Ctrl-C.",
        after_help = "\
EXAMPLES:
    rgate release 1.2.0
    rgate release 1.2.0 --yes    # skip the cancel window"
    )]
    Release {
        /// Version to release
        version: Option<String>,

        /// Start immediately, without the cancel window
        #[arg(short, long)]
        yes: bool,
    },

    /// List open issues on the hosting provider
    Issues,

    /// Run only the documentation lint
    Docs,

    /// Create a local annotated tag with the changelog as its message
    Tag {
        /// Version to tag
        version: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    rgate completion bash > ~/.local/share/bash-completion/completions/rgate

    # Zsh
    rgate completion zsh > ~/.zfunc/_rgate

    # Fish
    rgate completion fish > ~/.config/fish/completions/rgate.fish

    # PowerShell
    rgate completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
