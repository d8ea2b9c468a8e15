//! checks
//!
//! Local release-readiness checks: manifest, support files, tests, and
//! documentation lint.
//!
//! # Implementations
//!
//! - [`local::LocalChecks`] runs the configured commands and inspects files
//!   under the repository root.
//! - [`mock::MockChecks`] counts invocations and can fail any operation.

pub mod local;
pub mod mock;

use thiserror::Error;

use crate::core::config::SupportFile;

/// Errors from local checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckError {
    /// Manifest validation failed or the package name is unreadable.
    #[error("manifest check failed: {0}")]
    Manifest(String),

    /// A required support file does not exist.
    #[error("the {role} file: {path} is missing")]
    MissingSupportFile { role: String, path: String },

    /// A required support file exists but has no content.
    #[error("the {role} file: {path} is empty")]
    EmptySupportFile { role: String, path: String },

    /// The test command exited non-zero; carries its last output line.
    #[error("tests failed: {0}")]
    TestFailure(String),

    /// The documentation lint reported problems.
    #[error("documentation lint failed: {0}")]
    DocLint(String),

    /// A file could not be read.
    #[error("failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

/// Local checks the pipeline depends on.
pub trait CheckRunner {
    /// Validate the package manifest with the configured command.
    fn validate_manifest(&self) -> Result<(), CheckError>;

    /// Package name, from configuration or the manifest.
    fn package_name(&self) -> Result<String, CheckError>;

    /// Require `file` to exist and be non-empty.
    ///
    /// A directory counts as present when it has at least one entry.
    fn check_support_file(&self, file: &SupportFile) -> Result<(), CheckError>;

    /// Read a file relative to the repository root.
    fn read_file(&self, path: &str) -> Result<String, CheckError>;

    /// Run the test suite.
    fn run_tests(&self) -> Result<(), CheckError>;

    /// Run the documentation lint.
    fn lint_docs(&self) -> Result<(), CheckError>;
}
