//! List command

use anyhow::{Context, Result};
use pour_core::Reporter;
use pour_core::receipt::read_receipts;

use crate::GlobalArgs;
use crate::ui::ConsoleReporter;

/// List installed packages from their receipts.
pub fn list(global: &GlobalArgs) -> Result<()> {
    let settings = super::settings(global)?;
    let receipts = read_receipts(&settings.receipts_dir()).context("failed to read receipts")?;
    let output = ConsoleReporter::new(global.quiet);

    if receipts.is_empty() {
        output.info("No packages installed.");
        output.info("Run 'pour install <descriptor.toml>' to get started.");
        return Ok(());
    }

    for receipt in &receipts {
        let date = chrono::DateTime::parse_from_rfc3339(&receipt.installed_at)
            .map_or_else(|_| receipt.installed_at.clone(), |dt| dt.format("%Y-%m-%d").to_string());
        let detail = if receipt.verified {
            date
        } else {
            format!("{date} (unverified)")
        };
        output.row(
            receipt.name.as_str(),
            receipt.version.as_str(),
            &receipt.platform,
            &detail,
        );
    }
    Ok(())
}
