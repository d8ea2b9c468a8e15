//! forge::traits
//!
//! Hosting provider trait definition and the shared request/response types.
//!
//! # Design
//!
//! The `HostingProvider` trait is synchronous: every call blocks until the
//! remote API answers. Providers are immutable after construction; the
//! repository identity and the credentials are baked in by the factory.
//!
//! # Example
//!
//! ```ignore
//! use releasegate::forge::{HostingProvider, ReleaseRequest};
//!
//! fn publish(provider: &dyn HostingProvider) -> Result<(), ForgeError> {
//!     for issue in provider.list_open_issues()? {
//!         println!("{}. {}", issue.number, issue.title);
//!     }
//!     provider.publish_release(&ReleaseRequest {
//!         tag_name: "1.2.0".to_string(),
//!         source_ref: "main".to_string(),
//!         release_notes: "Changes".to_string(),
//!         is_prerelease: false,
//!     })
//! }
//! ```

use thiserror::Error;

/// Errors from hosting provider operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// The remote origin string has no usable path component.
    #[error("malformed remote origin: {0}")]
    MalformedOrigin(String),

    /// Network failure or a response body that is not JSON.
    #[error("transport error: {0}")]
    Transport(String),

    /// The hosting API answered without the expected confirmation field.
    #[error("release rejected: {0}")]
    ReleaseRejected(String),

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },
}

/// An open issue reported by a hosting provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Provider-assigned issue number (GitLab `iid`, Bitbucket `id`)
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Web URL for viewing the issue
    pub url: String,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number, self.title)
    }
}

/// Request to publish a release.
///
/// Built by the pipeline right before the publish call and consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Tag to create (the version string)
    pub tag_name: String,
    /// Branch or commit the tag points at
    pub source_ref: String,
    /// Release notes (the changelog contents)
    pub release_notes: String,
    /// Mark the release as a pre-release
    pub is_prerelease: bool,
}

/// The HostingProvider trait for interacting with remote hosting services.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Nothing is retried; failures
/// propagate to the caller immediately.
pub trait HostingProvider {
    /// Get the provider name (e.g., "github", "gitlab").
    fn name(&self) -> &'static str;

    /// Get the repository identity in `owner/repo` form.
    fn repo_identity(&self) -> &str;

    /// List all open issues, oldest created first.
    ///
    /// Pages through every result page and flattens them. An empty list is
    /// a valid outcome.
    ///
    /// # Errors
    ///
    /// - `Transport` if a page cannot be fetched or decoded
    /// - `AuthFailed` / `NotFound` / `ApiError` for non-success responses
    fn list_open_issues(&self) -> Result<Vec<Issue>, ForgeError>;

    /// Publish a release (tag + release notes) on the hosting service.
    ///
    /// Syncing the local repository afterwards is the caller's job.
    ///
    /// # Errors
    ///
    /// - `ReleaseRejected` if the response lacks the provider's confirmation field
    fn publish_release(&self, request: &ReleaseRequest) -> Result<(), ForgeError>;
}
