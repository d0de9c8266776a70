//! Url command

use std::path::Path;

use anyhow::Result;
use pour_core::validate::{require_host, resolve_url, select_platform, validate_fields};

use crate::GlobalArgs;

/// Print the download URL the installer would fetch. Nothing else goes to
/// stdout, so the output can be piped.
pub fn url(global: &GlobalArgs, path: &Path) -> Result<()> {
    let settings = super::settings(global)?;
    let descriptor = super::load_release(path)?;

    validate_fields(&descriptor)?;
    let host = require_host(&descriptor, settings.platform)?;
    let release = select_platform(&descriptor, &host)?;
    let url = resolve_url(&descriptor, release, &host)?;

    println!("{url}");
    Ok(())
}
