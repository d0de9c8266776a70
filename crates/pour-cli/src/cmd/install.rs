//! Install command

use std::path::Path;

use anyhow::Result;
use pour_core::flow::DeclaredRelease;
use pour_core::validate::require_host;
use pour_core::{Reporter, install_descriptor};

use crate::GlobalArgs;
use crate::ui::ConsoleReporter;

/// Install the release described by `path` (a descriptor or a history file).
pub async fn install(
    global: &GlobalArgs,
    path: &Path,
    allow_unverified: bool,
    dry_run: bool,
) -> Result<()> {
    let settings = super::settings(global)?.with_allow_unverified(allow_unverified);
    let descriptor = super::load_release(path)?;
    let output = ConsoleReporter::new(global.quiet);

    if dry_run {
        let host = require_host(&descriptor, settings.platform)?;
        let validated = DeclaredRelease::new(descriptor).validate(&host, allow_unverified)?;
        output.section(&format!(
            "Would install {} {} for {host}",
            validated.name(),
            validated.version(),
        ));
        output.info(&format!("fetch: {}", validated.url()));
        if !validated.report.is_verifiable() {
            output.warning("no sha256 declared, the download would not be verified");
        }
        for artifact in &validated.descriptor.install {
            output.info(&format!(
                "install: {} -> {}",
                artifact.source,
                settings.bin_dir.join(artifact.target_name()).display()
            ));
        }
        return Ok(());
    }

    output.section(&format!(
        "Installing {} {}",
        descriptor.package.name, descriptor.package.version
    ));

    let client = reqwest::Client::new();
    let report = install_descriptor(descriptor, &settings, &client, &output).await?;

    for file in &report.files {
        output.info(&file.display().to_string());
    }
    Ok(())
}
