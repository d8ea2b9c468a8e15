//! forge::mock
//!
//! Mock hosting provider for deterministic testing.
//!
//! # Design
//!
//! The mock serves a fixed list of open issues, records every call, and can
//! be configured to fail a specific operation. Clones share state, so a test
//! can hand one clone to the pipeline and inspect the other afterwards.
//!
//! # Example
//!
//! ```
//! use releasegate::forge::mock::MockProvider;
//! use releasegate::forge::{HostingProvider, Issue};
//!
//! let provider = MockProvider::new("acme/widget").with_issues(vec![Issue {
//!     number: 1,
//!     title: "Crash".to_string(),
//!     url: "https://example.com/1".to_string(),
//! }]);
//!
//! assert_eq!(provider.list_open_issues().unwrap().len(), 1);
//! assert_eq!(provider.operations().len(), 1);
//! ```

use std::sync::{Arc, Mutex};

use super::traits::{ForgeError, HostingProvider, Issue, ReleaseRequest};

/// Mock provider for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockProvider {
    identity: String,
    inner: Arc<Mutex<MockProviderInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockProviderInner {
    /// Issues returned by `list_open_issues`.
    issues: Vec<Issue>,
    /// Published releases, in order.
    releases: Vec<ReleaseRequest>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list_open_issues with the given error.
    ListOpenIssues(ForgeError),
    /// Fail publish_release with the given error.
    PublishRelease(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListOpenIssues,
    PublishRelease(ReleaseRequest),
}

impl MockProvider {
    /// Create a mock with no issues for the given `owner/repo` identity.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            inner: Arc::new(Mutex::new(MockProviderInner::default())),
        }
    }

    /// Serve these issues from `list_open_issues`.
    pub fn with_issues(self, issues: Vec<Issue>) -> Self {
        self.inner.lock().unwrap().issues = issues;
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// ```
    /// use releasegate::forge::mock::{FailOn, MockProvider};
    /// use releasegate::forge::{ForgeError, HostingProvider};
    ///
    /// let provider = MockProvider::new("acme/widget")
    ///     .fail_on(FailOn::ListOpenIssues(ForgeError::RateLimited));
    /// assert!(provider.list_open_issues().is_err());
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.inner.lock().unwrap().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Releases accepted so far.
    pub fn releases(&self) -> Vec<ReleaseRequest> {
        self.inner.lock().unwrap().releases.clone()
    }

    fn record(&self, op: MockOperation) {
        self.inner.lock().unwrap().operations.push(op);
    }

    fn failure(&self, list: bool) -> Option<ForgeError> {
        match &self.inner.lock().unwrap().fail_on {
            Some(FailOn::ListOpenIssues(e)) if list => Some(e.clone()),
            Some(FailOn::PublishRelease(e)) if !list => Some(e.clone()),
            _ => None,
        }
    }
}

impl HostingProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn repo_identity(&self) -> &str {
        &self.identity
    }

    fn list_open_issues(&self) -> Result<Vec<Issue>, ForgeError> {
        self.record(MockOperation::ListOpenIssues);
        if let Some(e) = self.failure(true) {
            return Err(e);
        }
        Ok(self.inner.lock().unwrap().issues.clone())
    }

    fn publish_release(&self, request: &ReleaseRequest) -> Result<(), ForgeError> {
        self.record(MockOperation::PublishRelease(request.clone()));
        if let Some(e) = self.failure(false) {
            return Err(e);
        }
        self.inner.lock().unwrap().releases.push(request.clone());
        Ok(())
    }
}
