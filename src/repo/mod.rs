//! repo
//!
//! Local version-control operations used by the release pipeline.
//!
//! # Architecture
//!
//! [`RepositoryGateway`] is the only doorway to the VCS. Implementations
//! shell out to the VCS binary through [`crate::core::shell::Shell`]:
//!
//! - [`git::GitRepository`] for `.git` checkouts
//! - [`hg::HgRepository`] for `.hg` checkouts
//! - [`mock::MockRepository`] for deterministic tests
//!
//! [`open_repository`] picks the implementation from the directory layout.

pub mod git;
pub mod hg;
pub mod mock;

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::core::shell::{Shell, ShellError, ShellOutput};
use crate::ui::output::Logger;

/// A commit timestamp with its original offset.
pub type CommitDate = DateTime<FixedOffset>;

/// Errors from repository operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepoError {
    /// Neither `.git` nor `.hg` found.
    #[error("not a git or mercurial repository: {path}")]
    NotARepo {
        /// The directory that was checked
        path: PathBuf,
    },

    /// The repository has no remote origin configured.
    #[error("could not determine remote origin: {0}")]
    NoOrigin(String),

    /// A VCS command failed or could not be started.
    #[error("'{command}' failed: {message}")]
    CommandFailed {
        /// The command line that failed
        command: String,
        /// Last output line or spawn error
        message: String,
    },

    /// Uncommitted or untracked changes after syncing.
    #[error("working copy has uncommitted changes:\n{}", .0.join("\n"))]
    DirtyWorktree(Vec<String>),

    /// A commit date could not be read.
    #[error("could not parse commit date '{value}': {message}")]
    DateParse {
        /// The raw value reported by the VCS
        value: String,
        /// Parser error
        message: String,
    },
}

impl From<ShellError> for RepoError {
    fn from(e: ShellError) -> Self {
        RepoError::CommandFailed {
            message: e.source.to_string(),
            command: e.command,
        }
    }
}

/// VCS operations the pipeline depends on.
pub trait RepositoryGateway {
    /// VCS name ("git", "hg", "mock").
    fn kind(&self) -> &'static str;

    /// Raw remote origin string (e.g. `git@github.com:acme/widget.git`).
    fn origin(&self) -> Result<String, RepoError>;

    /// Name of the current branch.
    fn branch(&self) -> Result<String, RepoError>;

    /// Pull from and push to the remote, then require a clean working copy.
    ///
    /// # Errors
    ///
    /// - `CommandFailed` if pull or push fails
    /// - `DirtyWorktree` if the status is not empty afterwards
    fn sync(&self) -> Result<(), RepoError>;

    /// Date of the last commit that touched `path`.
    fn file_date(&self, path: &str) -> Result<CommitDate, RepoError>;

    /// Date of the last commit in the repository.
    fn last_commit_date(&self) -> Result<CommitDate, RepoError>;

    /// Log lines (with changed file names) since `since`, oldest first.
    fn log_since(&self, since: &CommitDate) -> Result<Vec<String>, RepoError>;

    /// Create an annotated tag.
    fn tag(&self, name: &str, message: &str) -> Result<(), RepoError>;
}

/// Open the repository rooted at `dir`.
///
/// # Errors
///
/// Returns `RepoError::NotARepo` if `dir` contains neither `.git` nor `.hg`.
pub fn open_repository(
    dir: &Path,
    logger: &Logger,
) -> Result<Box<dyn RepositoryGateway>, RepoError> {
    let shell = Shell::new(dir, logger.clone());
    if dir.join(".git").exists() {
        Ok(Box::new(git::GitRepository::new(shell)))
    } else if dir.join(".hg").exists() {
        Ok(Box::new(hg::HgRepository::new(shell)))
    } else {
        Err(RepoError::NotARepo {
            path: dir.to_path_buf(),
        })
    }
}

/// Run a VCS command and require a zero exit.
pub(crate) fn checked(
    shell: &Shell,
    program: &str,
    args: &[&str],
) -> Result<ShellOutput, RepoError> {
    let output = shell.run(program, args)?;
    if output.success() {
        Ok(output)
    } else {
        Err(RepoError::CommandFailed {
            command: format!("{} {}", program, args.join(" ")),
            message: output.last_line().to_string(),
        })
    }
}

/// Parse an RFC 3339 commit date as printed by the VCS.
pub(crate) fn parse_commit_date(value: &str) -> Result<CommitDate, RepoError> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value).map_err(|e| RepoError::DateParse {
        value: value.to_string(),
        message: e.to_string(),
    })
}
