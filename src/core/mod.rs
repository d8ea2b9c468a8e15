//! core
//!
//! Core configuration, version policy, and process plumbing.
//!
//! # Modules
//!
//! - [`config`] - Layered configuration schema and loading
//! - [`version`] - Version grammar and pre-release classification
//! - [`shell`] - Synchronous command execution with debug echo

pub mod config;
pub mod shell;
pub mod version;
