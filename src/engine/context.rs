//! engine::context
//!
//! Per-run accumulator for the validation pipeline.

use crate::core::version::Version;

/// A pipeline step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Version,
    Sync,
    Manifest,
    SupportFiles,
    LicenseYear,
    Tests,
    DocLint,
    Changelog,
    Issues,
    Publish,
    Resync,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Version => "version",
            Step::Sync => "sync",
            Step::Manifest => "manifest",
            Step::SupportFiles => "support-files",
            Step::LicenseYear => "license-year",
            Step::Tests => "tests",
            Step::DocLint => "doc-lint",
            Step::Changelog => "changelog",
            Step::Issues => "issues",
            Step::Publish => "publish",
            Step::Resync => "resync",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State of a single pipeline run.
///
/// Created once the version is valid and dropped when the run ends. Never
/// shared between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Package name, known once the manifest step has passed.
    pub package_name: Option<String>,
    /// The version being validated.
    pub version: Version,
    /// Source ref of the release, set on publish.
    pub branch: Option<String>,
    /// Steps that passed, in order.
    pub checks_passed: Vec<Step>,
    /// Steps skipped, with the reason.
    pub skipped: Vec<(Step, String)>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
}

impl ValidationContext {
    pub fn new(version: Version) -> Self {
        Self {
            package_name: None,
            version,
            branch: None,
            checks_passed: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Package name, or an empty string before the manifest step.
    pub fn package(&self) -> &str {
        self.package_name.as_deref().unwrap_or_default()
    }

    pub fn pass(&mut self, step: Step) {
        self.checks_passed.push(step);
    }

    pub fn skip(&mut self, step: Step, reason: impl Into<String>) {
        self.skipped.push((step, reason.into()));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Whether `step` passed in this run.
    pub fn passed(&self, step: Step) -> bool {
        self.checks_passed.contains(&step)
    }
}
