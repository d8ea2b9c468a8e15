//! Releasegate - validate a repository for release and publish it
//!
//! Releasegate drives a local git or mercurial checkout through an ordered
//! set of release-readiness checks (support files, license year, tests,
//! documentation lint, changelog date, open issues) and, on request,
//! publishes the version as a release on GitHub, GitLab or Bitbucket.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - The validation pipeline and its error taxonomy
//! - [`forge`] - Hosting provider abstraction (origin parsing, paged HTTP)
//! - [`repo`] - Version control gateway (git, hg)
//! - [`checks`] - Local checks (manifest, support files, tests, doc lint)
//! - [`core`] - Configuration, version policy, shell execution
//! - [`ui`] - Severity-routed logging and the release countdown
//!
//! # Correctness Invariants
//!
//! 1. The version is validated before anything touches the repository
//! 2. Steps run in a fixed order and the first fatal failure stops the run
//! 3. Only the license-year check and the issue listing are non-fatal
//! 4. Nothing is published unless every fatal check passed

pub mod checks;
pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod repo;
pub mod ui;
