//! repo::hg
//!
//! Mercurial implementation of [`RepositoryGateway`] using the `hg` CLI.
//!
//! `hg push` exits with status 1 when there is nothing to push; that case is
//! treated as success.

use super::{checked, parse_commit_date, CommitDate, RepoError, RepositoryGateway};
use crate::core::shell::Shell;

/// Template printing the commit date as RFC 3339.
const DATE_TEMPLATE: &str = "{date|rfc3339date}";

/// A Mercurial working copy.
#[derive(Debug, Clone)]
pub struct HgRepository {
    shell: Shell,
}

impl HgRepository {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    fn hg(&self, args: &[&str]) -> Result<Vec<String>, RepoError> {
        Ok(checked(&self.shell, "hg", args)?.lines)
    }

    fn log_date(&self, path: Option<&str>) -> Result<CommitDate, RepoError> {
        let mut args = vec!["log", "-l", "1", "--template", DATE_TEMPLATE];
        if let Some(path) = path {
            args.push(path);
        }
        let lines = self.hg(&args)?;
        parse_commit_date(lines.first().map(String::as_str).unwrap_or_default())
    }
}

/// Format a date for `hg log --date ">DATE"`.
fn date_spec(since: &CommitDate) -> String {
    format!(">{}", since.format("%Y-%m-%d %H:%M:%S %z"))
}

impl RepositoryGateway for HgRepository {
    fn kind(&self) -> &'static str {
        "hg"
    }

    fn origin(&self) -> Result<String, RepoError> {
        let output = self.shell.run("hg", &["paths", "default"])?;
        match output.lines.first().map(|l| l.trim()) {
            Some(path) if output.success() && !path.is_empty() => Ok(path.to_string()),
            _ => Err(RepoError::NoOrigin(
                "paths.default is not set".to_string(),
            )),
        }
    }

    fn branch(&self) -> Result<String, RepoError> {
        let lines = self.hg(&["branch"])?;
        Ok(lines.first().map(|l| l.trim().to_string()).unwrap_or_default())
    }

    fn sync(&self) -> Result<(), RepoError> {
        self.hg(&["pull", "-u"])?;

        let push = self.shell.run("hg", &["push"])?;
        if push.status > 1 {
            return Err(RepoError::CommandFailed {
                command: "hg push".to_string(),
                message: push.last_line().to_string(),
            });
        }

        let status = checked(&self.shell, "hg", &["status"])?;
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
        let date = date_spec(since);
        self.hg(&["log", "-v", "--date", &date])
    }

    fn tag(&self, name: &str, message: &str) -> Result<(), RepoError> {
        self.hg(&["tag", "-m", message, name])?;
        Ok(())
    }
}
