//! forge::factory
//!
//! Provider selection and creation.
//!
//! # Design
//!
//! Commands call [`detect_provider`] and [`create_provider`] instead of
//! importing a concrete provider, so the pipeline only ever sees a
//! `Box<dyn HostingProvider>`.
//!
//! # Provider Detection
//!
//! Each provider has a configured hostname. When it is left at the default
//! API host, the origin is matched against the public web host instead:
//!
//! | Provider  | Default hostname    | Matched web host |
//! |-----------|---------------------|------------------|
//! | GitHub    | `api.github.com`    | `github.com`     |
//! | GitLab    | `gitlab.com`        | `gitlab.com`     |
//! | Bitbucket | `api.bitbucket.org` | `bitbucket.org`  |
//!
//! A non-default hostname (self-hosted GitLab, GitHub Enterprise) is matched
//! against the origin's host directly. Providers are tried in the order
//! above; the first match wins.

use super::bitbucket::{self, BitbucketProvider};
use super::github::{self, GitHubProvider};
use super::gitlab::{self, GitLabProvider};
use super::http::Credentials;
use super::origin::parse_origin;
use super::traits::{ForgeError, HostingProvider};

/// Supported hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    GitHub,
    GitLab,
    Bitbucket,
}

impl ProviderKind {
    /// All providers, in detection order.
    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::GitHub,
            ProviderKind::GitLab,
            ProviderKind::Bitbucket,
        ]
    }

    /// Provider name as used in configuration section headers.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::GitLab => "gitlab",
            ProviderKind::Bitbucket => "bitbucket",
        }
    }

    /// Parse a provider from its name (case-insensitive).
    ///
    /// ```
    /// use releasegate::forge::ProviderKind;
    ///
    /// assert_eq!(ProviderKind::parse("GitLab"), Some(ProviderKind::GitLab));
    /// assert_eq!(ProviderKind::parse("gitea"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ProviderKind::GitHub),
            "gitlab" => Some(ProviderKind::GitLab),
            "bitbucket" => Some(ProviderKind::Bitbucket),
            _ => None,
        }
    }

    /// Hostname used when the configuration does not set one.
    pub fn default_hostname(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => github::DEFAULT_HOSTNAME,
            ProviderKind::GitLab => gitlab::DEFAULT_HOSTNAME,
            ProviderKind::Bitbucket => bitbucket::DEFAULT_HOSTNAME,
        }
    }

    /// Public web host that origins point at for the default hostname.
    pub fn web_hostname(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github.com",
            ProviderKind::GitLab => "gitlab.com",
            ProviderKind::Bitbucket => "bitbucket.org",
        }
    }

    /// API base URL derived from a configured hostname.
    pub fn api_base_for(&self, hostname: &str) -> String {
        match self {
            ProviderKind::GitHub => GitHubProvider::api_base_for(hostname),
            ProviderKind::GitLab => GitLabProvider::api_base_for(hostname),
            ProviderKind::Bitbucket => BitbucketProvider::api_base_for(hostname),
        }
    }

    /// Whether `origin` belongs to this provider given its configured hostname.
    pub fn matches_origin(&self, origin: &str, configured_hostname: &str) -> bool {
        let Ok(identity) = parse_origin(origin) else {
            return false;
        };
        let expected = if configured_hostname.eq_ignore_ascii_case(self.default_hostname()) {
            self.web_hostname()
        } else {
            configured_hostname
        };
        let host = identity.hostname.to_ascii_lowercase();
        let expected = expected.to_ascii_lowercase();
        if expected.is_empty() {
            return false;
        }

        // Subdomains (`ssh.github.com`) and SSH host aliases (`github.com-work`)
        // still name the provider's host somewhere in the origin.
        host == expected
            || host.ends_with(&format!(".{}", expected))
            || origin.to_ascii_lowercase().contains(&expected)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Connection settings for one provider, resolved from configuration.
#[derive(Clone, Default)]
pub struct ProviderSettings {
    /// Configured hostname (see the detection table above)
    pub hostname: String,
    /// Explicit API base URL; derived from `hostname` when unset
    pub api_base: Option<String>,
    /// GitHub / Bitbucket account name
    pub username: Option<String>,
    /// Token (GitHub, GitLab) or app password (Bitbucket)
    pub secret: Option<String>,
}

// Custom Debug to avoid exposing secrets
impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("hostname", &self.hostname)
            .field("api_base", &self.api_base)
            .field("username", &self.username)
            .field("has_secret", &self.secret.is_some())
            .finish()
    }
}

/// Detect the provider for a remote origin.
///
/// `hostname_for` returns the configured hostname of each provider.
///
/// ```
/// use releasegate::forge::{detect_provider, ProviderKind};
///
/// let kind = detect_provider("git@github.com:acme/widget.git", |k| {
///     k.default_hostname().to_string()
/// });
/// assert_eq!(kind, Some(ProviderKind::GitHub));
/// ```
pub fn detect_provider<F>(origin: &str, hostname_for: F) -> Option<ProviderKind>
where
    F: Fn(ProviderKind) -> String,
{
    ProviderKind::all()
        .iter()
        .copied()
        .find(|kind| kind.matches_origin(origin, &hostname_for(*kind)))
}

/// Create a provider for `origin`.
///
/// # Errors
///
/// - `ForgeError::MalformedOrigin` if the origin has no repository path
/// - `ForgeError::AuthFailed` if a required credential is missing
pub fn create_provider(
    kind: ProviderKind,
    origin: &str,
    settings: &ProviderSettings,
) -> Result<Box<dyn HostingProvider>, ForgeError> {
    let api_base = settings
        .api_base
        .clone()
        .unwrap_or_else(|| kind.api_base_for(&settings.hostname));

    match kind {
        ProviderKind::GitHub => {
            let token = require(kind, "token", settings.secret.as_deref())?;
            let credentials = match &settings.username {
                Some(username) => Credentials::Basic {
                    username: username.clone(),
                    password: token.to_string(),
                },
                None => Credentials::Bearer(token.to_string()),
            };
            Ok(Box::new(GitHubProvider::from_origin(
                origin,
                &api_base,
                credentials,
            )?))
        }
        ProviderKind::GitLab => {
            let token = require(kind, "token", settings.secret.as_deref())?;
            Ok(Box::new(GitLabProvider::from_origin(
                origin, &api_base, token,
            )?))
        }
        ProviderKind::Bitbucket => {
            let username = require(kind, "username", settings.username.as_deref())?;
            let password = require(kind, "password", settings.secret.as_deref())?;
            Ok(Box::new(BitbucketProvider::from_origin(
                origin, &api_base, username, password,
            )?))
        }
    }
}

fn require<'a>(
    kind: ProviderKind,
    key: &str,
    value: Option<&'a str>,
) -> Result<&'a str, ForgeError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        ForgeError::AuthFailed(format!("missing {}.{} in configuration", kind.name(), key))
    })
}

/// Comma-separated list of supported provider names.
pub fn available_providers_string() -> String {
    ProviderKind::all()
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error for an origin no configured provider claims.
pub fn undetected_provider(origin: &str) -> ForgeError {
    ForgeError::NotFound(format!(
        "Could not detect hosting provider from remote origin: {}. Supported providers: {}",
        origin,
        available_providers_string()
    ))
}
