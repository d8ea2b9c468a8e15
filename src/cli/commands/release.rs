//! release command - Validate, then publish a release

use std::time::Duration;

use super::Session;
use crate::engine::Context;
use anyhow::Result;

/// Validate `version` and publish it to the hosting provider.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `version` - Version to release
/// * `yes` - Skip the cancel window
pub fn release(ctx: &Context, version: Option<&str>, yes: bool) -> Result<()> {
    let session = Session::open(ctx)?;
    let forge = session.provider()?;

    let delay = if yes {
        Duration::ZERO
    } else {
        session.config.release_delay()
    };
    session
        .pipeline(forge.as_ref())
        .release(version.unwrap_or_default(), delay)?;
    Ok(())
}
