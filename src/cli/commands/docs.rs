//! docs command - Run the documentation lint

use super::Session;
use crate::engine::{lint_docs, Context};
use anyhow::Result;

/// Run the configured documentation lint.
pub fn docs(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    lint_docs(&session.checks, &session.logger)?;
    Ok(())
}
