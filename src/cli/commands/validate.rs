//! validate command - Check that the repository is ready to release

use super::Session;
use crate::engine::Context;
use anyhow::Result;

/// Run every release check for `version` without publishing.
pub fn validate(ctx: &Context, version: Option<&str>) -> Result<()> {
    let session = Session::open(ctx)?;
    let forge = session.provider()?;
    session
        .pipeline(forge.as_ref())
        .validate(version.unwrap_or_default())?;
    Ok(())
}
