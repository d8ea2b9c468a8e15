//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Severity-routed logger and verbosity
//! - [`prompts`] - Operator cancel window
//!
//! # Design
//!
//! All console output goes through a [`output::Logger`] so that tests can
//! capture it and `--quiet` / `--debug` apply uniformly.

pub mod output;
pub mod prompts;
