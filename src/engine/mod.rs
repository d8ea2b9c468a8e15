//! engine
//!
//! Drives a repository through the ordered release-readiness checks and,
//! for a release, publishes it.
//!
//! # Lifecycle
//!
//! ```text
//! version -> sync -> manifest -> support files -> license year -> tests
//!         -> doc lint -> changelog -> issues [-> publish -> sync]
//! ```
//!
//! Every step is fatal on failure except the license-year check and the
//! issue listing, which only warn. Nothing runs after the first fatal
//! failure and no state survives a run.
//!
//! # Collaborators
//!
//! The pipeline never touches the filesystem, VCS or network directly:
//! - [`crate::repo::RepositoryGateway`] for VCS state
//! - [`crate::checks::CheckRunner`] for local checks
//! - [`crate::forge::HostingProvider`] for the remote API

pub mod context;
pub mod pipeline;

pub use context::{Step, ValidationContext};
pub use pipeline::{lint_docs, show_issues, tag_version, ValidationPipeline};

use std::path::PathBuf;

use thiserror::Error;

use crate::checks::CheckError;
use crate::core::config::{Config, ConfigError};
use crate::core::version::InvalidVersion;
use crate::forge::{
    create_provider, detect_provider, undetected_provider, ForgeError, HostingProvider,
};
use crate::repo::{RepoError, RepositoryGateway};
use crate::ui::output::{Logger, Verbosity};

/// Execution context from global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (errors only).
    pub quiet: bool,
}

impl Context {
    /// Directory the command operates on.
    pub fn working_dir(&self) -> std::io::Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Console logger at the verbosity the flags ask for.
    pub fn logger(&self) -> Logger {
        Logger::console(Verbosity::from_flags(self.quiet, self.debug))
    }
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Please specify a version number.")]
    MissingVersion,

    #[error(transparent)]
    InvalidVersion(#[from] InvalidVersion),

    #[error("sync failed: {0}")]
    Sync(#[source] RepoError),

    #[error("manifest is not valid: {0}")]
    Manifest(String),

    /// A support file is missing or empty.
    #[error("{0}")]
    MissingSupportFile(CheckError),

    /// Carries the last line of test output.
    #[error("tests failed: {0}")]
    TestFailure(String),

    #[error("documentation lint failed: {0}")]
    DocLint(String),

    #[error("Please update and commit {changelog}: last changed {changelog_date}, last commit {last_commit}.")]
    ChangelogStale {
        changelog: String,
        changelog_date: String,
        last_commit: String,
    },

    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Any other local check failure (unreadable files).
    #[error(transparent)]
    Check(CheckError),
}

impl From<CheckError> for PipelineError {
    fn from(e: CheckError) -> Self {
        match e {
            CheckError::Manifest(message) => PipelineError::Manifest(message),
            CheckError::MissingSupportFile { .. } | CheckError::EmptySupportFile { .. } => {
                PipelineError::MissingSupportFile(e)
            }
            CheckError::TestFailure(line) => PipelineError::TestFailure(line),
            CheckError::DocLint(message) => PipelineError::DocLint(message),
            other @ CheckError::Io { .. } => PipelineError::Check(other),
        }
    }
}

/// Build the hosting provider for the repository's origin.
///
/// The provider is picked by matching each configured hostname against the
/// origin; its credentials come from the layered configuration.
pub fn connect_provider(
    repo: &dyn RepositoryGateway,
    config: &Config,
    logger: &Logger,
) -> Result<Box<dyn HostingProvider>, PipelineError> {
    let origin = repo.origin()?;
    let kind = detect_provider(&origin, |kind| config.hostname(kind))
        .ok_or_else(|| undetected_provider(&origin))?;
    logger.debug(format!("Using {} for origin {}", kind, origin));

    let settings = config.provider_settings(kind)?;
    Ok(create_provider(kind, &origin, &settings)?)
}
