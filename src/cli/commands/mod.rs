//! cli::commands
//!
//! Command handlers.
//!
//! Each handler opens a [`Session`] for the working directory and hands
//! the collaborators to the engine.

mod completion;
mod docs;
mod issues;
mod release;
mod tag;
mod validate;

pub use completion::completion;
pub use docs::docs;
pub use issues::issues;
pub use release::release;
pub use tag::tag;
pub use validate::validate;

use crate::checks::local::LocalChecks;
use crate::cli::args::Command;
use crate::core::config::Config;
use crate::core::shell::Shell;
use crate::engine::{self, Context, ValidationPipeline};
use crate::forge::HostingProvider;
use crate::repo::{open_repository, RepositoryGateway};
use crate::ui::output::Logger;
use anyhow::{Context as _, Result};

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Validate { version } => validate(ctx, version.as_deref()),
        Command::Release { version, yes } => release(ctx, version.as_deref(), yes),
        Command::Issues => issues(ctx),
        Command::Docs => docs(ctx),
        Command::Tag { version } => tag(ctx, version.as_deref()),
        Command::Completion { shell } => completion(shell),
    }
}

/// Collaborators for one invocation.
pub(crate) struct Session {
    pub logger: Logger,
    pub config: Config,
    pub repo: Box<dyn RepositoryGateway>,
    pub checks: LocalChecks,
}

impl Session {
    /// Load configuration and open the repository at the working directory.
    pub fn open(ctx: &Context) -> Result<Self> {
        let logger = ctx.logger();
        let cwd = ctx
            .working_dir()
            .context("Failed to determine working directory")?;

        let config = Config::load(Some(&cwd)).context("Failed to load configuration")?;
        if let Some(path) = config.home_config_loaded_from() {
            logger.debug(format!("Loaded {}", path.display()));
        }
        if let Some(path) = config.repo_config_loaded_from() {
            logger.debug(format!("Loaded {}", path.display()));
        }

        let repo = open_repository(&cwd, &logger)?;
        let checks = LocalChecks::from_config(Shell::new(cwd.clone(), logger.clone()), &config);

        Ok(Self {
            logger,
            config,
            repo,
            checks,
        })
    }

    /// Hosting provider for the repository's origin.
    pub fn provider(&self) -> Result<Box<dyn HostingProvider>> {
        Ok(engine::connect_provider(
            self.repo.as_ref(),
            &self.config,
            &self.logger,
        )?)
    }

    /// Pipeline over this session and `forge`.
    pub fn pipeline<'a>(&'a self, forge: &'a dyn HostingProvider) -> ValidationPipeline<'a> {
        ValidationPipeline::new(
            self.repo.as_ref(),
            &self.checks,
            forge,
            &self.config,
            self.logger.clone(),
        )
    }
}
