//! core::shell
//!
//! Synchronous process invocation with output logging.
//!
//! Every command is echoed at debug level as `> command` and every output
//! line as `< line`. A non-zero exit is not an error here; callers decide
//! what a failure means for their step.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::ui::output::Logger;

/// The command could not be started at all.
#[derive(Debug, Error)]
#[error("failed to run '{command}': {source}")]
pub struct ShellError {
    pub command: String,
    #[source]
    pub source: std::io::Error,
}

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Standard output lines followed by standard error lines
    pub lines: Vec<String>,
    /// Exit code; -1 when terminated by a signal
    pub status: i32,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Last non-blank output line, or an empty string.
    pub fn last_line(&self) -> &str {
        self.lines
            .iter()
            .rev()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }

    /// Whether the command printed nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// Runs commands in a fixed working directory.
#[derive(Debug, Clone)]
pub struct Shell {
    cwd: PathBuf,
    logger: Logger,
}

impl Shell {
    pub fn new(cwd: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            cwd: cwd.into(),
            logger,
        }
    }

    /// Working directory for every command.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Run `program` with `args`, without a shell.
    ///
    /// # Errors
    ///
    /// Returns `ShellError` if the program cannot be started.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<ShellOutput, ShellError> {
        let display = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let mut cmd = Command::new(program);
        cmd.args(args);
        self.execute(cmd, display)
    }

    /// Run a full command line through `sh -c`.
    ///
    /// Used for configured commands such as `cargo test --all-features`.
    ///
    /// # Errors
    ///
    /// Returns `ShellError` if `sh` cannot be started.
    pub fn run_line(&self, command_line: &str) -> Result<ShellOutput, ShellError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        self.execute(cmd, command_line.to_string())
    }

    fn execute(&self, mut cmd: Command, display: String) -> Result<ShellOutput, ShellError> {
        self.logger.debug(format!("> {}", display));

        let output = cmd
            .current_dir(&self.cwd)
            .output()
            .map_err(|source| ShellError {
                command: display,
                source,
            })?;

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(str::to_string)
            .collect();

        for line in &lines {
            self.logger.debug(format!("< {}", line));
        }

        Ok(ShellOutput {
            lines,
            status: output.status.code().unwrap_or(-1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::output::Verbosity;
    use tempfile::TempDir;

    #[test]
    fn last_line_skips_blank_lines() {
        let output = ShellOutput {
            lines: vec!["running 3 tests".into(), "test result: FAILED".into(), "".into()],
            status: 101,
        };
        assert_eq!(output.last_line(), "test result: FAILED");
        assert!(!output.success());
        assert!(!output.is_empty());
    }

    #[test]
    fn empty_output() {
        let output = ShellOutput {
            lines: vec!["  ".into()],
            status: 0,
        };
        assert!(output.is_empty());
        assert_eq!(output.last_line(), "");
    }

    #[cfg(unix)]
    mod process {
        use super::*;

        #[test]
        fn run_line_captures_lines_and_status() {
            let temp = TempDir::new().unwrap();
            let logger = Logger::capture().with_verbosity(Verbosity::Debug);
            let shell = Shell::new(temp.path(), logger.clone());

            let output = shell.run_line("echo one; echo two >&2; exit 3").unwrap();

            assert_eq!(output.lines, vec!["one", "two"]);
            assert_eq!(output.status, 3);
            assert_eq!(
                logger.captured().out,
                vec!["> echo one; echo two >&2; exit 3", "< one", "< two"]
            );
        }

        #[test]
        fn run_uses_working_directory() {
            let temp = TempDir::new().unwrap();
            std::fs::write(temp.path().join("marker.txt"), "x").unwrap();
            let shell = Shell::new(temp.path(), Logger::capture());

            let output = shell.run("ls", &[]).unwrap();
            assert!(output.success());
            assert!(output.lines.contains(&"marker.txt".to_string()));
        }

        #[test]
        fn missing_program_is_error() {
            let temp = TempDir::new().unwrap();
            let shell = Shell::new(temp.path(), Logger::capture());
            let err = shell.run("definitely-not-a-real-program-xyz", &[]).unwrap_err();
            assert!(err.to_string().contains("definitely-not-a-real-program-xyz"));
        }
    }
}
