//! forge
//!
//! Abstraction for remote hosting providers (GitHub, GitLab, Bitbucket).
//!
//! # Architecture
//!
//! The `HostingProvider` trait defines the two remote operations the release
//! pipeline needs: listing open issues and publishing a release. Commands
//! use [`detect_provider`] and [`create_provider`] rather than importing a
//! concrete provider.
//!
//! # Modules
//!
//! - `traits`: `HostingProvider` trait, `Issue`, `ReleaseRequest`, `ForgeError`
//! - `origin`: remote origin parsing (`RepoIdentity`)
//! - [`http`]: paged JSON client and the reqwest transport
//! - [`github`], [`gitlab`], [`bitbucket`]: provider implementations
//! - [`mock`]: mock implementation for deterministic testing
//! - `factory`: provider detection and creation

pub mod bitbucket;
mod factory;
pub mod github;
pub mod gitlab;
pub mod http;
pub mod mock;
mod origin;
mod traits;

pub use factory::{
    available_providers_string, create_provider, detect_provider, undetected_provider,
    ProviderKind, ProviderSettings,
};
pub use http::Credentials;
pub use origin::{parse_origin, RepoIdentity};
pub use traits::*;
