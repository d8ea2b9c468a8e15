//! repo::mock
//!
//! Mock repository for deterministic pipeline tests.
//!
//! Holds a fixed origin, branch, and commit dates; records every call and
//! can fail a chosen operation. Clones share state.

use std::sync::{Arc, Mutex};

use super::{CommitDate, RepoError, RepositoryGateway};

/// Operation names used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOp {
    Origin,
    Branch,
    Sync,
    FileDate,
    LastCommitDate,
    LogSince,
    Tag,
}

/// Mock repository for testing.
#[derive(Debug, Clone)]
pub struct MockRepository {
    inner: Arc<Mutex<MockRepositoryInner>>,
}

#[derive(Debug)]
struct MockRepositoryInner {
    origin: Option<String>,
    branch: String,
    last_commit: CommitDate,
    file_dates: Vec<(String, CommitDate)>,
    log: Vec<String>,
    fail_on: Option<(RepoOp, RepoError)>,
    calls: Vec<RepoOp>,
    tags: Vec<(String, String)>,
}

impl MockRepository {
    /// A clean repository whose every file was last touched at `last_commit`.
    pub fn new(origin: impl Into<String>, branch: impl Into<String>, last_commit: CommitDate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockRepositoryInner {
                origin: Some(origin.into()),
                branch: branch.into(),
                last_commit,
                file_dates: Vec::new(),
                log: Vec::new(),
                fail_on: None,
                calls: Vec::new(),
                tags: Vec::new(),
            })),
        }
    }

    /// Remove the origin so `origin()` fails with `NoOrigin`.
    pub fn without_origin(self) -> Self {
        self.inner.lock().unwrap().origin = None;
        self
    }

    /// Set the last-commit date of a single file.
    pub fn with_file_date(self, path: impl Into<String>, date: CommitDate) -> Self {
        self.inner.lock().unwrap().file_dates.push((path.into(), date));
        self
    }

    /// Lines returned by `log_since`.
    pub fn with_log(self, lines: Vec<String>) -> Self {
        self.inner.lock().unwrap().log = lines;
        self
    }

    /// Fail `op` with `error`.
    pub fn fail_on(self, op: RepoOp, error: RepoError) -> Self {
        self.inner.lock().unwrap().fail_on = Some((op, error));
        self
    }

    /// All calls, in order.
    pub fn calls(&self) -> Vec<RepoOp> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of calls to `op`.
    pub fn call_count(&self, op: RepoOp) -> usize {
        self.calls().into_iter().filter(|c| *c == op).count()
    }

    /// Tags created so far as `(name, message)`.
    pub fn tags(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().tags.clone()
    }

    /// Record `op` and return the configured failure for it, if any.
    fn enter(&self, op: RepoOp) -> Result<(), RepoError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(op);
        match &inner.fail_on {
            Some((fail_op, error)) if *fail_op == op => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl RepositoryGateway for MockRepository {
    fn kind(&self) -> &'static str {
        "mock"
    }

    fn origin(&self) -> Result<String, RepoError> {
        self.enter(RepoOp::Origin)?;
        self.inner
            .lock()
            .unwrap()
            .origin
            .clone()
            .ok_or_else(|| RepoError::NoOrigin("no origin configured".to_string()))
    }

    fn branch(&self) -> Result<String, RepoError> {
        self.enter(RepoOp::Branch)?;
        Ok(self.inner.lock().unwrap().branch.clone())
    }

    fn sync(&self) -> Result<(), RepoError> {
        self.enter(RepoOp::Sync)
    }

    fn file_date(&self, path: &str) -> Result<CommitDate, RepoError> {
        self.enter(RepoOp::FileDate)?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .file_dates
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, d)| *d)
            .unwrap_or(inner.last_commit))
    }

    fn last_commit_date(&self) -> Result<CommitDate, RepoError> {
        self.enter(RepoOp::LastCommitDate)?;
        Ok(self.inner.lock().unwrap().last_commit)
    }

    fn log_since(&self, _since: &CommitDate) -> Result<Vec<String>, RepoError> {
        self.enter(RepoOp::LogSince)?;
        Ok(self.inner.lock().unwrap().log.clone())
    }

    fn tag(&self, name: &str, message: &str) -> Result<(), RepoError> {
        self.enter(RepoOp::Tag)?;
        self.inner
            .lock()
            .unwrap()
            .tags
            .push((name.to_string(), message.to_string()));
        Ok(())
    }
}
