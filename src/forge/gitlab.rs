//! forge::gitlab
//!
//! GitLab hosting provider using the v4 REST API.
//!
//! # Authentication
//!
//! The access token travels as the `private_token` query parameter on every
//! request, including page fetches.
//!
//! # Endpoints
//!
//! Projects are addressed by their URL-encoded path (`group%2Fsub%2Frepo`).
//!
//! - Issues: `GET /projects/{id}/issues?state=opened&sort=asc&page=N`
//! - Release: `POST /projects/{id}/repository/tags`, confirmed by `name`
//!
//! Issues are numbered by their project-scoped `iid`, not the global `id`.

use serde::Deserialize;
use serde_json::json;
use url::form_urlencoded::byte_serialize;

use super::http::{decode, Credentials, HttpTransport, PagedHttpClient, Transport};
use super::origin::{parse_origin, RepoIdentity};
use super::traits::{ForgeError, HostingProvider, Issue, ReleaseRequest};

/// Default GitLab host.
pub const DEFAULT_HOSTNAME: &str = "gitlab.com";

/// GitLab hosting provider.
#[derive(Debug)]
pub struct GitLabProvider {
    client: PagedHttpClient,
    identity: RepoIdentity,
    /// Host used to build issue URLs when the API omits `web_url`
    web_host: String,
}

impl GitLabProvider {
    /// Create a provider for an already-parsed identity over any transport.
    pub fn with_transport(
        identity: RepoIdentity,
        token: &str,
        transport: Box<dyn Transport>,
    ) -> Self {
        let web_host = if identity.hostname.is_empty() {
            DEFAULT_HOSTNAME.to_string()
        } else {
            identity.hostname.clone()
        };
        Self {
            client: PagedHttpClient::new(transport).with_auth_query("private_token", token),
            identity,
            web_host,
        }
    }

    /// Create a provider from a remote origin.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::MalformedOrigin` if the origin has no path.
    pub fn from_origin(origin: &str, api_base: &str, token: &str) -> Result<Self, ForgeError> {
        let identity = parse_origin(origin)?;
        let transport = HttpTransport::new(api_base, Credentials::None);
        Ok(Self::with_transport(identity, token, Box::new(transport)))
    }

    /// API base URL for a configured hostname.
    pub fn api_base_for(hostname: &str) -> String {
        format!("https://{}/api/v4", hostname)
    }

    /// URL-encoded project path used as the project id.
    pub fn project_id(&self) -> String {
        byte_serialize(self.identity.owner_path.as_bytes()).collect()
    }

    fn project_path(&self, endpoint: &str) -> String {
        format!("/projects/{}/{}", self.project_id(), endpoint)
    }

    fn fallback_issue_url(&self, iid: u64) -> String {
        format!(
            "https://{}/{}/issues/{}",
            self.web_host, self.identity.owner_path, iid
        )
    }
}

impl HostingProvider for GitLabProvider {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    fn repo_identity(&self) -> &str {
        &self.identity.owner_path
    }

    fn list_open_issues(&self) -> Result<Vec<Issue>, ForgeError> {
        let pages = self.client.get(
            self.project_path("issues"),
            &[("state", "opened"), ("sort", "asc")],
        );

        let mut issues = Vec::new();
        for page in pages {
            for item in page? {
                let gl: GitLabIssue = decode(item)?;
                let url = gl
                    .web_url
                    .unwrap_or_else(|| self.fallback_issue_url(gl.iid));
                issues.push(Issue {
                    number: gl.iid,
                    title: gl.title,
                    url,
                });
            }
        }
        Ok(issues)
    }

    fn publish_release(&self, request: &ReleaseRequest) -> Result<(), ForgeError> {
        let body = json!({
            "id": self.identity.owner_path,
            "tag_name": request.tag_name,
            "ref": request.source_ref,
            "release_description": request.release_notes,
        });

        let response = self
            .client
            .post(self.project_path("repository/tags"), &[], body)?;
        match response.get("name") {
            Some(name) if !name.is_null() => Ok(()),
            _ => Err(ForgeError::ReleaseRejected(response.to_string())),
        }
    }
}

/// GitLab issue list item (subset).
#[derive(Deserialize)]
struct GitLabIssue {
    iid: u64,
    title: String,
    #[serde(default)]
    web_url: Option<String>,
}
