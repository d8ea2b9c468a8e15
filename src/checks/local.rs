//! checks::local
//!
//! [`CheckRunner`] over the real filesystem and configured shell commands.
//!
//! # Package name
//!
//! Read from the manifest unless `[package] name` is configured:
//! - TOML manifests: `package.name`, else `project.name`
//! - JSON manifests (`*.json`): top-level `name`

use std::fs;
use std::path::{Path, PathBuf};

use super::{CheckError, CheckRunner};
use crate::core::config::{Config, SupportFile};
use crate::core::shell::{Shell, ShellOutput};

/// Checks against a repository checkout.
#[derive(Debug, Clone)]
pub struct LocalChecks {
    root: PathBuf,
    shell: Shell,
    manifest_file: String,
    manifest_command: String,
    tests_command: String,
    docs_command: String,
    package_name: Option<String>,
}

impl LocalChecks {
    /// Checks rooted at the shell's working directory, configured from `config`.
    pub fn from_config(shell: Shell, config: &Config) -> Self {
        Self {
            root: shell.cwd().to_path_buf(),
            manifest_file: config.manifest_file(),
            manifest_command: config.manifest_command(),
            tests_command: config.tests_command(),
            docs_command: config.docs_command(),
            package_name: config.package_name(),
            shell,
        }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn run(&self, command: &str) -> Result<ShellOutput, String> {
        self.shell.run_line(command).map_err(|e| e.to_string())
    }
}

/// Extract the package name from manifest contents.
fn manifest_name(file_name: &str, contents: &str) -> Result<String, String> {
    let name = if file_name.ends_with(".json") {
        let json: serde_json::Value =
            serde_json::from_str(contents).map_err(|e| format!("{}: {}", file_name, e))?;
        json.get("name").and_then(|n| n.as_str()).map(str::to_string)
    } else {
        let toml: toml::Value =
            toml::from_str(contents).map_err(|e| format!("{}: {}", file_name, e))?;
        ["package", "project"].iter().find_map(|table| {
            toml.get(table)
                .and_then(|t| t.get("name"))
                .and_then(|n| n.as_str())
                .map(str::to_string)
        })
    };

    name.filter(|n| !n.is_empty())
        .ok_or_else(|| format!("{} does not declare a package name", file_name))
}

/// Read a text file, replacing invalid UTF-8 rather than failing on it.
fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whether `path` has content: a non-blank file or a non-empty directory.
fn has_content(path: &Path) -> std::io::Result<bool> {
    if path.is_dir() {
        Ok(fs::read_dir(path)?.next().is_some())
    } else {
        Ok(!read_text(path)?.trim().is_empty())
    }
}

impl CheckRunner for LocalChecks {
    fn validate_manifest(&self) -> Result<(), CheckError> {
        let output = self.run(&self.manifest_command).map_err(CheckError::Manifest)?;
        if output.success() {
            Ok(())
        } else {
            Err(CheckError::Manifest(output.last_line().to_string()))
        }
    }

    fn package_name(&self) -> Result<String, CheckError> {
        if let Some(name) = &self.package_name {
            return Ok(name.clone());
        }
        let contents = fs::read_to_string(self.path(&self.manifest_file)).map_err(|e| {
            CheckError::Manifest(format!("cannot read {}: {}", self.manifest_file, e))
        })?;
        manifest_name(&self.manifest_file, &contents).map_err(CheckError::Manifest)
    }

    fn check_support_file(&self, file: &SupportFile) -> Result<(), CheckError> {
        let path = self.path(&file.path);
        if !path.exists() {
            return Err(CheckError::MissingSupportFile {
                role: file.role.clone(),
                path: file.path.clone(),
            });
        }
        match has_content(&path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CheckError::EmptySupportFile {
                role: file.role.clone(),
                path: file.path.clone(),
            }),
            Err(e) => Err(CheckError::Io {
                path: file.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn read_file(&self, path: &str) -> Result<String, CheckError> {
        read_text(&self.path(path)).map_err(|e| CheckError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn run_tests(&self) -> Result<(), CheckError> {
        let output = self.run(&self.tests_command).map_err(CheckError::TestFailure)?;
        if output.success() {
            Ok(())
        } else {
            Err(CheckError::TestFailure(output.last_line().to_string()))
        }
    }

    fn lint_docs(&self) -> Result<(), CheckError> {
        let output = self.run(&self.docs_command).map_err(CheckError::DocLint)?;
        if !output.success() {
            return Err(CheckError::DocLint(output.last_line().to_string()));
        }

        let warnings = output
            .lines
            .iter()
            .filter(|l| l.trim_start().starts_with("warning:"))
            .count();
        if warnings > 0 {
            return Err(CheckError::DocLint(format!(
                "{} documentation warning(s)",
                warnings
            )));
        }
        Ok(())
    }
}
