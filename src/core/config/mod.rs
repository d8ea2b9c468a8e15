//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Two configuration files share one schema ([`ConfigFile`]):
//! - **Home**: user-level settings, typically credentials
//! - **Repo**: per-repository overrides, typically files and commands
//!
//! # Precedence
//!
//! Values are resolved per key, later overriding earlier:
//! 1. Built-in defaults
//! 2. Home config file
//! 3. Repo config file
//!
//! A repo file that only sets `[github] hostname` keeps the token from the
//! home file. Extra `[files]` keys from both files are combined.
//!
//! # Locations
//!
//! - Home: `$RELEASEGATE_CONFIG` if set, else `~/.releasegate/config.toml`
//! - Repo: `<repo>/.releasegate/config.toml`
//!
//! Missing files are not an error.
//!
//! # Example
//!
//! ```no_run
//! use releasegate::core::config::Config;
//! use releasegate::forge::ProviderKind;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! println!("GitLab host: {}", config.hostname(ProviderKind::GitLab));
//! for file in config.support_files() {
//!     println!("{} -> {}", file.role, file.path);
//! }
//! ```

pub mod schema;

pub use schema::{
    CommandsSection, ConfigFile, FilesSection, PackageSection, ProviderSection, ReleaseSection,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::forge::{ProviderKind, ProviderSettings};

/// Environment variable overriding the home config location.
pub const CONFIG_ENV: &str = "RELEASEGATE_CONFIG";

/// Config directory name, under the home directory and the repo root.
const CONFIG_DIR: &str = ".releasegate";

/// Config file name inside [`CONFIG_DIR`].
const CONFIG_FILE: &str = "config.toml";

/// Default manifest validation command.
pub const DEFAULT_MANIFEST_COMMAND: &str = "cargo verify-project";

/// Default test command.
pub const DEFAULT_TESTS_COMMAND: &str = "cargo test";

/// Default documentation lint command.
pub const DEFAULT_DOCS_COMMAND: &str = "cargo doc --no-deps";

/// Default package manifest.
pub const DEFAULT_MANIFEST: &str = "Cargo.toml";

/// Default operator cancel window for `release`, in seconds.
pub const DEFAULT_RELEASE_DELAY_SECS: u64 = 5;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no value set for '{key}' in configuration")]
    Missing { key: String },
}

/// A required support file: its role (config key) and relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportFile {
    /// Role name, e.g. "changelog"
    pub role: String,
    /// Path relative to the repository root
    pub path: String,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules: repo over home over defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Home configuration
    pub home: ConfigFile,
    /// Repository configuration (if found)
    pub repo: Option<ConfigFile>,
    home_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_root` is provided, also loads the repo config file.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load(repo_root: Option<&Path>) -> Result<Config, ConfigError> {
        let home_path = Self::home_config_path().filter(|p| p.is_file());
        let home = match &home_path {
            Some(path) => Self::read_file(path)?,
            None => ConfigFile::default(),
        };

        let repo_path = repo_root
            .map(Self::repo_config_path)
            .filter(|p| p.is_file());
        let repo = match &repo_path {
            Some(path) => Some(Self::read_file(path)?),
            None => None,
        };

        Ok(Config {
            home,
            repo,
            home_path,
            repo_path,
        })
    }

    /// Build a config from already-parsed layers.
    pub fn from_layers(home: ConfigFile, repo: Option<ConfigFile>) -> Config {
        Config {
            home,
            repo,
            home_path: None,
            repo_path: None,
        }
    }

    /// Path of the home config file, whether or not it exists.
    ///
    /// `None` only when neither the override variable nor a home directory
    /// is available.
    pub fn home_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Path of the repo config file for a repository root.
    pub fn repo_config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Read, parse and validate one config file.
    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Layers in precedence order, highest first.
    fn layers(&self) -> impl Iterator<Item = &ConfigFile> {
        self.repo.iter().chain(std::iter::once(&self.home))
    }

    /// First value set by any layer.
    fn lookup<T>(&self, get: impl Fn(&ConfigFile) -> Option<T>) -> Option<T> {
        self.layers().find_map(get)
    }

    fn provider_value(
        &self,
        kind: ProviderKind,
        get: impl Fn(&ProviderSection) -> Option<&String>,
    ) -> Option<String> {
        self.lookup(|layer| {
            let section = match kind {
                ProviderKind::GitHub => layer.github.as_ref(),
                ProviderKind::GitLab => layer.gitlab.as_ref(),
                ProviderKind::Bitbucket => layer.bitbucket.as_ref(),
            }?;
            get(section).cloned()
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Configured hostname of a provider.
    pub fn hostname(&self, kind: ProviderKind) -> String {
        self.provider_value(kind, |s| s.hostname.as_ref())
            .unwrap_or_else(|| kind.default_hostname().to_string())
    }

    /// Resolve the connection settings of a provider.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent credential:
    /// `github.token`, `gitlab.token`, `bitbucket.username` or
    /// `bitbucket.password`.
    pub fn provider_settings(&self, kind: ProviderKind) -> Result<ProviderSettings, ConfigError> {
        let username = self.provider_value(kind, |s| s.username.as_ref());
        let secret = match kind {
            ProviderKind::GitHub | ProviderKind::GitLab => {
                self.provider_value(kind, |s| s.token.as_ref())
            }
            ProviderKind::Bitbucket => self.provider_value(kind, |s| s.password.as_ref()),
        };

        let missing = |key: &str| ConfigError::Missing {
            key: format!("{}.{}", kind.name(), key),
        };
        if kind == ProviderKind::Bitbucket && username.is_none() {
            return Err(missing("username"));
        }
        if secret.is_none() {
            return Err(missing(if kind == ProviderKind::Bitbucket {
                "password"
            } else {
                "token"
            }));
        }

        Ok(ProviderSettings {
            hostname: self.hostname(kind),
            api_base: self.provider_value(kind, |s| s.api_base.as_ref()),
            username,
            secret,
        })
    }

    /// Required support files in check order.
    ///
    /// The five named roles come first (changelog, contributing, license,
    /// readme, tests), then extra keys from both layers sorted by role.
    pub fn support_files(&self) -> Vec<SupportFile> {
        let named: [(&str, fn(&FilesSection) -> Option<&String>, &str); 5] = [
            ("changelog", |f| f.changelog.as_ref(), "CHANGELOG.md"),
            ("contributing", |f| f.contributing.as_ref(), "CONTRIBUTING.md"),
            ("license", |f| f.license.as_ref(), "LICENSE"),
            ("readme", |f| f.readme.as_ref(), "README.md"),
            ("tests", |f| f.tests.as_ref(), "tests"),
        ];

        let mut files: Vec<SupportFile> = named
            .iter()
            .map(|(role, get, default)| SupportFile {
                role: role.to_string(),
                path: self
                    .lookup(|layer| layer.files.as_ref().and_then(get).cloned())
                    .unwrap_or_else(|| default.to_string()),
            })
            .collect();

        let mut extra = std::collections::BTreeMap::new();
        // Lowest precedence first so higher layers overwrite.
        for layer in [Some(&self.home), self.repo.as_ref()].into_iter().flatten() {
            if let Some(section) = &layer.files {
                for (role, path) in &section.extra {
                    extra.insert(role.clone(), path.clone());
                }
            }
        }
        files.extend(
            extra
                .into_iter()
                .map(|(role, path)| SupportFile { role, path }),
        );
        files
    }

    /// Path of the support file with the given role, if configured.
    pub fn support_file(&self, role: &str) -> Option<String> {
        self.support_files()
            .into_iter()
            .find(|f| f.role == role)
            .map(|f| f.path)
    }

    /// Path of the changelog file.
    pub fn changelog_file(&self) -> String {
        self.support_file("changelog")
            .unwrap_or_else(|| "CHANGELOG.md".to_string())
    }

    /// Path of the license file.
    pub fn license_file(&self) -> String {
        self.support_file("license")
            .unwrap_or_else(|| "LICENSE".to_string())
    }

    /// Manifest validation command.
    pub fn manifest_command(&self) -> String {
        self.lookup(|l| l.commands.as_ref().and_then(|c| c.manifest.clone()))
            .unwrap_or_else(|| DEFAULT_MANIFEST_COMMAND.to_string())
    }

    /// Test command.
    pub fn tests_command(&self) -> String {
        self.lookup(|l| l.commands.as_ref().and_then(|c| c.tests.clone()))
            .unwrap_or_else(|| DEFAULT_TESTS_COMMAND.to_string())
    }

    /// Documentation lint command.
    pub fn docs_command(&self) -> String {
        self.lookup(|l| l.commands.as_ref().and_then(|c| c.docs.clone()))
            .unwrap_or_else(|| DEFAULT_DOCS_COMMAND.to_string())
    }

    /// Package manifest file, relative to the repository root.
    pub fn manifest_file(&self) -> String {
        self.lookup(|l| l.package.as_ref().and_then(|p| p.manifest.clone()))
            .unwrap_or_else(|| DEFAULT_MANIFEST.to_string())
    }

    /// Package name override, if configured.
    pub fn package_name(&self) -> Option<String> {
        self.lookup(|l| l.package.as_ref().and_then(|p| p.name.clone()))
    }

    /// Operator cancel window before a release starts.
    pub fn release_delay(&self) -> Duration {
        let secs = self
            .lookup(|l| l.release.as_ref().and_then(|r| r.delay_secs))
            .unwrap_or(DEFAULT_RELEASE_DELAY_SECS);
        Duration::from_secs(secs)
    }

    /// Get the path to the loaded home config file.
    pub fn home_config_loaded_from(&self) -> Option<&Path> {
        self.home_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
