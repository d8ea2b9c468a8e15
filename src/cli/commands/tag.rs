//! tag command - Create a local release tag

use super::Session;
use crate::engine::{tag_version, Context};
use anyhow::Result;

/// Tag `version` locally with the changelog as the tag message.
pub fn tag(ctx: &Context, version: Option<&str>) -> Result<()> {
    let session = Session::open(ctx)?;
    tag_version(
        session.repo.as_ref(),
        &session.checks,
        &session.config,
        &session.logger,
        version.unwrap_or_default(),
    )?;
    Ok(())
}
