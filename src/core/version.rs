//! core::version
//!
//! Release version strings and their classification.
//!
//! # Grammar
//!
//! `[v]MAJOR.MINOR.PATCH[-SUFFIX[N]]` where `SUFFIX` is one of `dev`,
//! `alpha`, `beta`, `RC` or `p`, optionally followed by digits.
//!
//! # Classification
//!
//! - **Pre-release**: `0.x`, or the string contains `dev`, `alpha` or `beta`
//! - **Doc-lint exempt**: `0.x`, or the string contains `dev` or `alpha`
//!
//! Release candidates (`RC`) and patch suffixes (`p`) are stable.
//!
//! # Example
//!
//! ```
//! use releasegate::core::version::Version;
//!
//! let version = Version::new("2.0.0-beta2").unwrap();
//! assert!(version.is_prerelease());
//! assert!(version.doc_lint_skip_reason().is_none());
//!
//! assert!(Version::new("1.2").is_err());
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?\d+\.\d+\.\d+(-(dev|alpha|beta|RC|p)\d*)?$")
        .expect("version regex must compile")
});

/// Error for a string outside the version grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid version '{0}': expected MAJOR.MINOR.PATCH with optional -dev, -alphaN, -betaN, -RCN or -pN suffix")]
pub struct InvalidVersion(pub String);

/// A validated release version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Validate and wrap a version string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVersion` if the string does not match the grammar.
    pub fn new(version: impl Into<String>) -> Result<Self, InvalidVersion> {
        let version = version.into();
        if is_valid(&version) {
            Ok(Self(version))
        } else {
            Err(InvalidVersion(version))
        }
    }

    /// Get the version as given (including any `v` prefix).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the version is not yet production-stable.
    pub fn is_prerelease(&self) -> bool {
        is_prerelease(&self.0)
    }

    /// Why the documentation lint does not apply, if it doesn't.
    pub fn doc_lint_skip_reason(&self) -> Option<&'static str> {
        doc_lint_skip_reason(&self.0)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `version` matches the release grammar.
pub fn is_valid(version: &str) -> bool {
    VERSION_REGEX.is_match(version)
}

/// Pre-release classification; a pure function of the string.
pub fn is_prerelease(version: &str) -> bool {
    let bare = version.strip_prefix('v').unwrap_or(version);
    bare.starts_with("0.")
        || bare.contains("dev")
        || bare.contains("alpha")
        || bare.contains("beta")
}

/// Reason the documentation lint is skipped for `version`, if any.
pub fn doc_lint_skip_reason(version: &str) -> Option<&'static str> {
    let bare = version.strip_prefix('v').unwrap_or(version);
    if bare.starts_with("0.") {
        Some("0.x versions")
    } else if bare.contains("dev") {
        Some("development releases")
    } else if bare.contains("alpha") {
        Some("alpha releases")
    } else {
        None
    }
}
