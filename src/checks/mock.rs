//! checks::mock
//!
//! Mock check runner for deterministic pipeline tests.
//!
//! Every support file passes and every command succeeds unless configured
//! otherwise. File contents served by `read_file` are set per path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{CheckError, CheckRunner};
use crate::core::config::SupportFile;

/// Operation names used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckOp {
    ValidateManifest,
    PackageName,
    SupportFile,
    ReadFile,
    RunTests,
    LintDocs,
}

/// Mock check runner for testing.
#[derive(Debug, Clone)]
pub struct MockChecks {
    inner: Arc<Mutex<MockChecksInner>>,
}

#[derive(Debug, Default)]
struct MockChecksInner {
    package_name: String,
    files: HashMap<String, String>,
    missing: Vec<String>,
    fail_on: Option<(CheckOp, CheckError)>,
    calls: HashMap<CheckOp, usize>,
    checked_files: Vec<String>,
}

impl MockChecks {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockChecksInner {
                package_name: package_name.into(),
                ..Default::default()
            })),
        }
    }

    /// Serve `contents` for `path` from `read_file`.
    pub fn with_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .files
            .insert(path.into(), contents.into());
        self
    }

    /// Report the support file at `path` as missing.
    pub fn with_missing(self, path: impl Into<String>) -> Self {
        self.inner.lock().unwrap().missing.push(path.into());
        self
    }

    /// Fail `op` with `error`.
    pub fn fail_on(self, op: CheckOp, error: CheckError) -> Self {
        self.inner.lock().unwrap().fail_on = Some((op, error));
        self
    }

    /// Number of calls to `op`.
    pub fn call_count(&self, op: CheckOp) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    /// Support file paths checked, in order.
    pub fn checked_files(&self) -> Vec<String> {
        self.inner.lock().unwrap().checked_files.clone()
    }

    fn enter(&self, op: CheckOp) -> Result<(), CheckError> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(op).or_insert(0) += 1;
        match &inner.fail_on {
            Some((fail_op, error)) if *fail_op == op => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl CheckRunner for MockChecks {
    fn validate_manifest(&self) -> Result<(), CheckError> {
        self.enter(CheckOp::ValidateManifest)
    }

    fn package_name(&self) -> Result<String, CheckError> {
        self.enter(CheckOp::PackageName)?;
        Ok(self.inner.lock().unwrap().package_name.clone())
    }

    fn check_support_file(&self, file: &SupportFile) -> Result<(), CheckError> {
        self.enter(CheckOp::SupportFile)?;
        let mut inner = self.inner.lock().unwrap();
        inner.checked_files.push(file.path.clone());
        if inner.missing.contains(&file.path) {
            return Err(CheckError::MissingSupportFile {
                role: file.role.clone(),
                path: file.path.clone(),
            });
        }
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<String, CheckError> {
        self.enter(CheckOp::ReadFile)?;
        self.inner
            .lock()
            .unwrap()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| CheckError::Io {
                path: path.to_string(),
                message: "not found".to_string(),
            })
    }

    fn run_tests(&self) -> Result<(), CheckError> {
        self.enter(CheckOp::RunTests)
    }

    fn lint_docs(&self) -> Result<(), CheckError> {
        self.enter(CheckOp::LintDocs)
    }
}
