//! core::config::schema
//!
//! Configuration schema types.
//!
//! Both the home and the repository configuration files share one schema,
//! [`ConfigFile`]. Every field is optional; resolution against the other
//! layer and the built-in defaults happens in [`super::Config`].
//!
//! # Validation
//!
//! Values are validated after parsing: hostnames must be bare host names,
//! file names and commands must be non-empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One configuration file (home or repository scope).
///
/// # Example
///
/// ```toml
/// [github]
/// username = "octocat"
/// token = "ghp_..."
///
/// [gitlab]
/// hostname = "git.example.org"
/// token = "glpat-..."
///
/// [files]
/// changelog = "CHANGES.md"
/// security = "SECURITY.md"
///
/// [commands]
/// tests = "cargo test --all-features"
///
/// [release]
/// delay_secs = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// GitHub connection settings
    pub github: Option<ProviderSection>,

    /// GitLab connection settings
    pub gitlab: Option<ProviderSection>,

    /// Bitbucket connection settings
    pub bitbucket: Option<ProviderSection>,

    /// Required support files
    pub files: Option<FilesSection>,

    /// Shell command lines for the check steps
    pub commands: Option<CommandsSection>,

    /// Package manifest settings
    pub package: Option<PackageSection>,

    /// Release command settings
    pub release: Option<ReleaseSection>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, section) in [
            ("github", &self.github),
            ("gitlab", &self.gitlab),
            ("bitbucket", &self.bitbucket),
        ] {
            if let Some(section) = section {
                section.validate(name)?;
            }
        }

        if let Some(files) = &self.files {
            files.validate()?;
        }

        if let Some(commands) = &self.commands {
            commands.validate()?;
        }

        if let Some(package) = &self.package {
            if package.manifest.as_deref() == Some("") {
                return Err(ConfigError::InvalidValue(
                    "package.manifest cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Settings for one hosting provider.
///
/// GitHub reads `username` and `token`, GitLab reads `token`, Bitbucket reads
/// `username` and `password`. `api_base` overrides the URL derived from
/// `hostname` (for proxies and test servers).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSection {
    /// API hostname (e.g., "api.github.com")
    pub hostname: Option<String>,

    /// Full API base URL
    pub api_base: Option<String>,

    /// Account name
    pub username: Option<String>,

    /// Access token
    pub token: Option<String>,

    /// Account or app password
    pub password: Option<String>,
}

impl ProviderSection {
    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        if let Some(hostname) = &self.hostname {
            if hostname.is_empty() || hostname.contains("://") || hostname.contains('/') {
                return Err(ConfigError::InvalidValue(format!(
                    "{}.hostname must be a bare host name, got '{}'",
                    section, hostname
                )));
            }
        }
        if let Some(api_base) = &self.api_base {
            url::Url::parse(api_base).map_err(|e| {
                ConfigError::InvalidValue(format!(
                    "{}.api_base '{}' is not a URL: {}",
                    section, api_base, e
                ))
            })?;
        }
        Ok(())
    }
}

/// Support files checked before release, keyed by role.
///
/// The five named roles have defaults; any extra key adds another required
/// file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesSection {
    pub changelog: Option<String>,
    pub contributing: Option<String>,
    pub license: Option<String>,
    pub readme: Option<String>,
    pub tests: Option<String>,

    /// Additional required files
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl FilesSection {
    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("changelog", &self.changelog),
            ("contributing", &self.contributing),
            ("license", &self.license),
            ("readme", &self.readme),
            ("tests", &self.tests),
        ];
        let empty_named = named
            .iter()
            .find(|(_, value)| value.as_deref() == Some(""))
            .map(|(key, _)| *key);
        let empty_extra = self
            .extra
            .iter()
            .find(|(_, value)| value.is_empty())
            .map(|(key, _)| key.as_str());

        match empty_named.or(empty_extra) {
            Some(key) => Err(ConfigError::InvalidValue(format!(
                "files.{} cannot be empty",
                key
            ))),
            None => Ok(()),
        }
    }
}

/// Shell command lines run by the check steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommandsSection {
    /// Validates the package manifest
    pub manifest: Option<String>,

    /// Runs the test suite
    pub tests: Option<String>,

    /// Lints API documentation
    pub docs: Option<String>,
}

impl CommandsSection {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("manifest", &self.manifest),
            ("tests", &self.tests),
            ("docs", &self.docs),
        ] {
            if let Some(command) = value {
                if command.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "commands.{} cannot be empty",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Package manifest settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSection {
    /// Manifest file, relative to the repository root
    pub manifest: Option<String>,

    /// Package name; overrides the name read from the manifest
    pub name: Option<String>,
}

/// Release command settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseSection {
    /// Seconds the operator has to cancel before a release starts
    pub delay_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_file {
        use super::*;

        #[test]
        fn defaults() {
            let config = ConfigFile::default();
            assert!(config.github.is_none());
            assert!(config.files.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn parses_all_sections() {
            let config: ConfigFile = toml::from_str(
                r#"
                [github]
                username = "octocat"
                token = "ghp_x"

                [gitlab]
                hostname = "git.example.org"

                [bitbucket]
                username = "bb"
                password = "pw"

                [files]
                changelog = "CHANGES.md"
                security = "SECURITY.md"

                [commands]
                tests = "make test"

                [package]
                manifest = "package.json"

                [release]
                delay_secs = 0
                "#,
            )
            .unwrap();

            assert_eq!(
                config.github.as_ref().and_then(|g| g.token.as_deref()),
                Some("ghp_x")
            );
            let files = config.files.as_ref().unwrap();
            assert_eq!(files.changelog.as_deref(), Some("CHANGES.md"));
            assert_eq!(
                files.extra.get("security").map(String::as_str),
                Some("SECURITY.md")
            );
            assert_eq!(config.release.as_ref().unwrap().delay_secs, Some(0));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn reject_unknown_sections() {
            let result: Result<ConfigFile, _> = toml::from_str("[deploy]\ntarget = \"prod\"\n");
            assert!(result.is_err());
        }

        #[test]
        fn reject_unknown_provider_keys() {
            let result: Result<ConfigFile, _> = toml::from_str("[github]\nowner = \"acme\"\n");
            assert!(result.is_err());
        }

        #[test]
        fn roundtrip() {
            let config = ConfigFile {
                gitlab: Some(ProviderSection {
                    hostname: Some("git.example.org".to_string()),
                    token: Some("glpat".to_string()),
                    ..Default::default()
                }),
                commands: Some(CommandsSection {
                    tests: Some("cargo test".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: ConfigFile = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn hostname_with_scheme_rejected() {
            let config = ConfigFile {
                github: Some(ProviderSection {
                    hostname: Some("https://github.example.com".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue(_))
            ));
        }

        #[test]
        fn api_base_must_be_url() {
            let config = ConfigFile {
                bitbucket: Some(ProviderSection {
                    api_base: Some("not a url".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_extra_file_rejected() {
            let mut files = FilesSection::default();
            files.extra.insert("security".to_string(), String::new());
            let config = ConfigFile {
                files: Some(files),
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("files.security"));
        }

        #[test]
        fn blank_command_rejected() {
            let config = ConfigFile {
                commands: Some(CommandsSection {
                    docs: Some("   ".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }
}
