//! forge::origin
//!
//! Derives a repository identity from a raw VCS remote origin.
//!
//! Supported forms:
//! - SSH: `git@github.com:owner/repo.git`, `hg@bitbucket.org:owner/repo`
//! - URL: `https://gitlab.example.org/group/sub/repo.git`, `ssh://hg@bitbucket.org/owner/repo`
//! - Bare path: `owner/repo` (what `owner_path` looks like after parsing)

use url::Url;

use super::traits::ForgeError;

/// Suffixes stripped from the end of an origin path.
const VCS_SUFFIXES: &[&str] = &[".git", ".hg"];

/// Repository identity derived from a remote origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    /// Host segment of the origin (empty for a bare path)
    pub hostname: String,
    /// Slash-joined path without leading/trailing slashes or VCS suffix
    pub owner_path: String,
}

impl std::fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.owner_path)
    }
}

/// Parse a remote origin into a [`RepoIdentity`].
///
/// # Errors
///
/// Returns `ForgeError::MalformedOrigin` when no path component remains.
///
/// # Example
///
/// ```
/// use releasegate::forge::parse_origin;
///
/// let ssh = parse_origin("git@github.com:acme/widget.git").unwrap();
/// let https = parse_origin("https://github.com/acme/widget.git").unwrap();
/// assert_eq!(ssh.owner_path, "acme/widget");
/// assert_eq!(ssh.owner_path, https.owner_path);
/// assert_eq!(ssh.hostname, "github.com");
/// ```
pub fn parse_origin(origin: &str) -> Result<RepoIdentity, ForgeError> {
    let origin = origin.trim();

    let (hostname, path) = if let Some((host, path)) = split_scp_like(origin) {
        (host.to_string(), path.to_string())
    } else if let Ok(url) = Url::parse(origin) {
        (
            url.host_str().unwrap_or_default().to_string(),
            url.path().to_string(),
        )
    } else {
        (String::new(), origin.to_string())
    };

    let owner_path = normalize_path(&path);
    if owner_path.is_empty() {
        return Err(ForgeError::MalformedOrigin(origin.to_string()));
    }

    Ok(RepoIdentity {
        hostname,
        owner_path,
    })
}

/// Split `user@host:path` (scp-like SSH syntax) into host and path.
///
/// Anything containing `://` is a URL and is left to the URL parser.
fn split_scp_like(origin: &str) -> Option<(&str, &str)> {
    if origin.contains("://") {
        return None;
    }
    let (user_host, path) = origin.split_once(':')?;
    let (_, host) = user_host.split_once('@')?;
    if host.is_empty() || host.contains('/') {
        return None;
    }
    Some((host, path))
}

/// Trim slashes and strip trailing VCS suffixes until neither applies.
///
/// Stripping to a fixed point keeps re-parsing a normalized path a no-op.
fn normalize_path(path: &str) -> String {
    let mut current = path.trim_matches('/');
    while let Some(stripped) = VCS_SUFFIXES
        .iter()
        .find_map(|suffix| current.strip_suffix(suffix))
    {
        current = stripped.trim_matches('/');
    }
    current.to_string()
}
