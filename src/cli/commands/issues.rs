//! issues command - List open issues on the hosting provider

use super::Session;
use crate::engine::{show_issues, Context};
use anyhow::Result;

/// Print open issues, oldest first.
pub fn issues(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let forge = session.provider()?;
    show_issues(forge.as_ref(), &session.logger)?;
    Ok(())
}
