//! ui::output
//!
//! Logging and console output.
//!
//! # Design
//!
//! A [`Logger`] is created once in `main` and passed explicitly to every
//! component that reports progress. It routes by severity to two sinks:
//! debug and info go to the normal stream, warnings and errors to the error
//! stream. Clones share the same sinks.
//!
//! `--quiet` suppresses info and warnings; `--debug` adds debug lines
//! (shell echo). Errors are always shown.
//!
//! Tests use [`Logger::capture`] and read the buffered lines back.

use std::fmt::Display;
use std::sync::{Arc, Mutex};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - standard output
    #[default]
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Whether this level goes to the error stream.
    pub fn is_error_stream(self) -> bool {
        self >= Level::Warn
    }

    fn enabled(self, verbosity: Verbosity) -> bool {
        match verbosity {
            Verbosity::Quiet => self == Level::Error,
            Verbosity::Normal => self >= Level::Info,
            Verbosity::Debug => true,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Level::Debug | Level::Info => "",
            Level::Warn => "warning: ",
            Level::Error => "error: ",
        }
    }
}

/// Lines written to a capturing logger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Normal stream (debug + info)
    pub out: Vec<String>,
    /// Error stream (warn + error)
    pub err: Vec<String>,
}

#[derive(Debug)]
enum Sink {
    Console,
    Capture(Captured),
}

/// Severity-routed logger with two sinks.
#[derive(Debug, Clone)]
pub struct Logger {
    verbosity: Verbosity,
    sink: Arc<Mutex<Sink>>,
}

impl Logger {
    /// Logger writing to stdout/stderr.
    pub fn console(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            sink: Arc::new(Mutex::new(Sink::Console)),
        }
    }

    /// Logger buffering lines in memory, at normal verbosity.
    pub fn capture() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            sink: Arc::new(Mutex::new(Sink::Capture(Captured::default()))),
        }
    }

    /// Same sinks, different verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Write one message at `level`.
    pub fn log(&self, level: Level, message: impl Display) {
        if !level.enabled(self.verbosity) {
            return;
        }
        let line = format!("{}{}", level.prefix(), message);

        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        match &mut *sink {
            Sink::Console if level.is_error_stream() => eprintln!("{}", line),
            Sink::Console => println!("{}", line),
            Sink::Capture(captured) if level.is_error_stream() => captured.err.push(line),
            Sink::Capture(captured) => captured.out.push(line),
        }
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }

    /// Lines captured so far; empty for a console logger.
    pub fn captured(&self) -> Captured {
        let sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        match &*sink {
            Sink::Capture(captured) => captured.clone(),
            Sink::Console => Captured::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn routes_by_severity() {
        let logger = Logger::capture();
        logger.info("Validating widget 1.0.0");
        logger.warn("There are open issues:");
        logger.error("CHANGELOG appears out of date.");

        let captured = logger.captured();
        assert_eq!(captured.out, vec!["Validating widget 1.0.0"]);
        assert_eq!(
            captured.err,
            vec![
                "warning: There are open issues:",
                "error: CHANGELOG appears out of date."
            ]
        );
    }

    #[test]
    fn debug_only_when_enabled() {
        let logger = Logger::capture();
        logger.debug("> git pull");
        assert!(logger.captured().out.is_empty());

        let logger = logger.with_verbosity(Verbosity::Debug);
        logger.debug("> git pull");
        assert_eq!(logger.captured().out, vec!["> git pull"]);
    }

    #[test]
    fn quiet_keeps_errors_only() {
        let logger = Logger::capture().with_verbosity(Verbosity::Quiet);
        logger.info("hidden");
        logger.warn("hidden");
        logger.error("shown");
        let captured = logger.captured();
        assert!(captured.out.is_empty());
        assert_eq!(captured.err, vec!["error: shown"]);
    }

    #[test]
    fn clones_share_sinks() {
        let logger = Logger::capture();
        let clone = logger.clone();
        clone.info("from clone");
        assert_eq!(logger.captured().out, vec!["from clone"]);
    }
}
