//! repo::git
//!
//! Git implementation of [`RepositoryGateway`] using the `git` CLI.

use super::{checked, parse_commit_date, CommitDate, RepoError, RepositoryGateway};
use crate::core::shell::Shell;

/// A Git working copy.
#[derive(Debug, Clone)]
pub struct GitRepository {
    shell: Shell,
}

impl GitRepository {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    fn git(&self, args: &[&str]) -> Result<Vec<String>, RepoError> {
        Ok(checked(&self.shell, "git", args)?.lines)
    }

    fn log_date(&self, path: Option<&str>) -> Result<CommitDate, RepoError> {
        let mut args = vec!["log", "-1", "--format=%aI"];
        if let Some(path) = path {
            args.extend(["--", path]);
        }
        let lines = self.git(&args)?;
        parse_commit_date(lines.first().map(String::as_str).unwrap_or_default())
    }
}

impl RepositoryGateway for GitRepository {
    fn kind(&self) -> &'static str {
        "git"
    }

    fn origin(&self) -> Result<String, RepoError> {
        let output = self
            .shell
            .run("git", &["config", "--get", "remote.origin.url"])?;
        match output.lines.first().map(|l| l.trim()) {
            Some(url) if output.success() && !url.is_empty() => Ok(url.to_string()),
            _ => Err(RepoError::NoOrigin(
                "remote.origin.url is not set".to_string(),
            )),
        }
    }

    fn branch(&self) -> Result<String, RepoError> {
        let lines = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(lines.first().map(|l| l.trim().to_string()).unwrap_or_default())
    }

    fn sync(&self) -> Result<(), RepoError> {
        self.git(&["pull"])?;
        self.git(&["push"])?;

        let status = checked(&self.shell, "git", &["status", "--porcelain"])?;
        if status.is_empty() {
            Ok(())
        } else {
            Err(RepoError::DirtyWorktree(status.lines))
        }
    }

    fn file_date(&self, path: &str) -> Result<CommitDate, RepoError> {
        self.log_date(Some(path))
    }

    fn last_commit_date(&self) -> Result<CommitDate, RepoError> {
        self.log_date(None)
    }

    fn log_since(&self, since: &CommitDate) -> Result<Vec<String>, RepoError> {
        let since = format!("--since={}", since.to_rfc3339());
        self.git(&["log", "--name-only", &since, "--reverse"])
    }

    fn tag(&self, name: &str, message: &str) -> Result<(), RepoError> {
        let message = format!("--message={}", message);
        self.git(&["tag", "-a", name, &message])?;
        Ok(())
    }
}
