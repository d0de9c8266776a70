//! History command

use std::path::Path;

use anyhow::{Context, Result};
use pour_core::Reporter;
use pour_core::validate::validate_fields;
use pour_schema::ReleaseHistory;

use crate::GlobalArgs;
use crate::ui::ConsoleReporter;

/// Load a history file, which checks ordering and identity, then list its
/// releases oldest first.
pub fn history(global: &GlobalArgs, path: &Path) -> Result<()> {
    let history = ReleaseHistory::from_file(path)
        .with_context(|| format!("invalid history {}", path.display()))?;
    let output = ConsoleReporter::new(global.quiet);

    let Some(latest) = history.latest() else {
        output.info("No releases");
        return Ok(());
    };
    output.section(&format!(
        "History for '{}' ({} releases)",
        latest.package.name,
        history.len()
    ));

    for release in &history {
        let platforms = release
            .platforms
            .iter()
            .map(|p| format!("{}/{}", p.os, p.arch.map_or("any", |a| a.as_str())))
            .collect::<Vec<_>>()
            .join(", ");
        let checksum = if release.platforms.iter().all(|p| !p.sha256.trim().is_empty()) {
            "sha256"
        } else {
            "unverified"
        };
        let detail = match validate_fields(release) {
            Ok(_) => checksum.to_string(),
            Err(e) => format!("invalid: {e}"),
        };
        output.row(
            release.package.name.as_str(),
            release.package.version.as_str(),
            &platforms,
            &detail,
        );
    }
    Ok(())
}
