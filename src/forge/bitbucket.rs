//! forge::bitbucket
//!
//! Bitbucket Cloud hosting provider using the 2.0 REST API.
//!
//! Authentication is basic auth with the account username and an app
//! password. Issue lists are wrapped in a `values` field.
//!
//! Publishing releases is not supported by this provider: Bitbucket has no
//! release object, and `publish_release` always fails with
//! `ForgeError::ReleaseRejected`.

use serde::Deserialize;

use super::http::{decode, Credentials, HttpTransport, PagedHttpClient, Transport};
use super::origin::{parse_origin, RepoIdentity};
use super::traits::{ForgeError, HostingProvider, Issue, ReleaseRequest};

/// Default Bitbucket API host.
pub const DEFAULT_HOSTNAME: &str = "api.bitbucket.org";

/// Web host used for issue links on Bitbucket Cloud.
const WEB_HOST: &str = "bitbucket.org";

/// Bitbucket hosting provider.
#[derive(Debug)]
pub struct BitbucketProvider {
    client: PagedHttpClient,
    identity: RepoIdentity,
    web_host: String,
}

impl BitbucketProvider {
    /// Create a provider for an already-parsed identity over any transport.
    pub fn with_transport(identity: RepoIdentity, transport: Box<dyn Transport>) -> Self {
        let web_host = if identity.hostname.is_empty() {
            WEB_HOST.to_string()
        } else {
            identity.hostname.clone()
        };
        Self {
            client: PagedHttpClient::new(transport).with_values_field("values"),
            identity,
            web_host,
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
        username: &str,
        password: &str,
    ) -> Result<Self, ForgeError> {
        let identity = parse_origin(origin)?;
        let transport = HttpTransport::new(
            api_base,
            Credentials::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
        );
        Ok(Self::with_transport(identity, Box::new(transport)))
    }

    /// API base URL for a configured hostname.
    pub fn api_base_for(hostname: &str) -> String {
        format!("https://{}/2.0", hostname)
    }
}

impl HostingProvider for BitbucketProvider {
    fn name(&self) -> &'static str {
        "bitbucket"
    }

    fn repo_identity(&self) -> &str {
        &self.identity.owner_path
    }

    fn list_open_issues(&self) -> Result<Vec<Issue>, ForgeError> {
        let path = format!("/repositories/{}/issues", self.identity.owner_path);
        let pages = self.client.get(path, &[("sort", "created_on")]);

        let mut issues = Vec::new();
        for page in pages {
            for item in page? {
                let bb: BitbucketIssue = decode(item)?;
                issues.push(Issue {
                    url: format!(
                        "https://{}/{}/issues/{}",
                        self.web_host, self.identity.owner_path, bb.id
                    ),
                    number: bb.id,
                    title: bb.title,
                });
            }
        }
        Ok(issues)
    }

    fn publish_release(&self, _request: &ReleaseRequest) -> Result<(), ForgeError> {
        Err(ForgeError::ReleaseRejected(
            "Bitbucket release not implemented".to_string(),
        ))
    }
}

/// Bitbucket issue list item (subset).
#[derive(Deserialize)]
struct BitbucketIssue {
    id: u64,
    title: String,
}
