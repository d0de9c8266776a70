//! Check command

use std::path::Path;

use anyhow::Result;
use pour_core::validate::require_host;
use pour_core::{InstallError, Reporter};

use crate::GlobalArgs;
use crate::ui::ConsoleReporter;

/// Validate a descriptor for the target platform.
///
/// Errors fail the command. Warnings are printed and only fail it under
/// `strict`.
pub fn check(global: &GlobalArgs, path: &Path, strict: bool) -> Result<()> {
    let settings = super::settings(global)?;
    let descriptor = super::load_release(path)?;
    let output = ConsoleReporter::new(global.quiet);

    let host = require_host(&descriptor, settings.platform)?;
    let report = pour_core::validate(&descriptor, &host)?;

    output.success(&format!(
        "{} {} is valid for {host}",
        descriptor.package.name, report.version
    ));
    output.info(&format!("url: {}", report.url));
    for artifact in &descriptor.install {
        output.info(&format!(
            "installs: {} -> {}",
            artifact.source,
            artifact.target_name()
        ));
    }

    for warning in &report.warnings {
        output.warning(&warning.to_string());
    }

    if strict && !report.warnings.is_empty() {
        return Err(InstallError::ChecksumMissing {
            name: descriptor.package.name,
            version: descriptor.package.version,
        }
        .into());
    }

    Ok(())
}
