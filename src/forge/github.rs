//! forge::github
//!
//! GitHub hosting provider using the REST API.
//!
//! # Authentication
//!
//! A username plus personal access token is sent as basic auth (the
//! `user:token@api.github.com` form). A token without a username is sent
//! as a bearer token.
//!
//! # Endpoints
//!
//! - Issues: `GET /repos/{owner}/{repo}/issues?sort=created&direction=asc&page=N`
//! - Release: `POST /repos/{owner}/{repo}/releases`, confirmed by `id`
//!
//! # Example
//!
//! ```ignore
//! use releasegate::forge::github::GitHubProvider;
//! use releasegate::forge::{Credentials, HostingProvider};
//!
//! let provider = GitHubProvider::from_origin(
//!     "git@github.com:acme/widget.git",
//!     "https://api.github.com",
//!     Credentials::Bearer("ghp_xxx".into()),
//! )?;
//! for issue in provider.list_open_issues()? {
//!     println!("{}", issue);
//! }
//! ```

use serde::Deserialize;
use serde_json::json;

use super::http::{decode, Credentials, HttpTransport, PagedHttpClient, Transport};
use super::origin::{parse_origin, RepoIdentity};
use super::traits::{ForgeError, HostingProvider, Issue, ReleaseRequest};

/// Default GitHub API host.
pub const DEFAULT_HOSTNAME: &str = "api.github.com";

/// GitHub hosting provider.
#[derive(Debug)]
pub struct GitHubProvider {
    client: PagedHttpClient,
    identity: RepoIdentity,
}

impl GitHubProvider {
    /// Create a provider for an already-parsed identity over any transport.
    pub fn with_transport(identity: RepoIdentity, transport: Box<dyn Transport>) -> Self {
        Self {
            client: PagedHttpClient::new(transport),
            identity,
        }
    }

    /// Create a provider from a remote origin.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::MalformedOrigin` if the origin has no path.
    pub fn from_origin(
        origin: &str,
        api_base: &str,
        credentials: Credentials,
    ) -> Result<Self, ForgeError> {
        let identity = parse_origin(origin)?;
        let transport = HttpTransport::new(api_base, credentials);
        Ok(Self::with_transport(identity, Box::new(transport)))
    }

    /// API base URL for a configured hostname.
    ///
    /// `api.github.com` is used as-is; any other host is treated as GitHub
    /// Enterprise, which serves the API under `/api/v3`.
    pub fn api_base_for(hostname: &str) -> String {
        if hostname == DEFAULT_HOSTNAME {
            format!("https://{}", hostname)
        } else {
            format!("https://{}/api/v3", hostname)
        }
    }

    /// Get the parsed repository identity.
    pub fn identity(&self) -> &RepoIdentity {
        &self.identity
    }

    fn repo_path(&self, endpoint: &str) -> String {
        format!("/repos/{}/{}", self.identity.owner_path, endpoint)
    }
}

impl HostingProvider for GitHubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn repo_identity(&self) -> &str {
        &self.identity.owner_path
    }

    fn list_open_issues(&self) -> Result<Vec<Issue>, ForgeError> {
        let pages = self.client.get(
            self.repo_path("issues"),
            &[("sort", "created"), ("direction", "asc")],
        );

        let mut issues = Vec::new();
        for page in pages {
            for item in page? {
                let issue: GitHubIssue = decode(item)?;
                issues.push(issue.into());
            }
        }
        Ok(issues)
    }

    fn publish_release(&self, request: &ReleaseRequest) -> Result<(), ForgeError> {
        let body = json!({
            "tag_name": request.tag_name,
            "target_commitish": request.source_ref,
            "name": request.tag_name,
            "body": request.release_notes,
            "draft": false,
            "prerelease": request.is_prerelease,
        });

        let response = self.client.post(self.repo_path("releases"), &[], body)?;
        match response.get("id") {
            Some(id) if !id.is_null() => Ok(()),
            _ => Err(ForgeError::ReleaseRejected(response.to_string())),
        }
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub issue list item (subset).
#[derive(Deserialize)]
struct GitHubIssue {
    number: u64,
    title: String,
    html_url: String,
}

impl From<GitHubIssue> for Issue {
    fn from(gh: GitHubIssue) -> Self {
        Issue {
            number: gh.number,
            title: gh.title,
            url: gh.html_url,
        }
    }
}
