//! Import command

use std::path::Path;

use anyhow::{Context, Result};
use pour_core::Reporter;
use pour_core::import::import_formula;

use crate::GlobalArgs;
use crate::ui::ConsoleReporter;

/// Convert a Homebrew formula to a descriptor, written to `output` or stdout.
pub fn import(global: &GlobalArgs, formula: &Path, output_path: Option<&Path>) -> Result<()> {
    let descriptor = import_formula(formula)
        .with_context(|| format!("failed to import {}", formula.display()))?;
    let toml = descriptor.to_toml()?;
    let output = ConsoleReporter::new(global.quiet);

    if descriptor.platforms.iter().any(|p| p.sha256.trim().is_empty()) {
        output.warning("formula declares an empty sha256; run 'pour hash' on the release archive");
    }

    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, toml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            output.success(&format!(
                "Imported {} {} to {}",
                descriptor.package.name,
                descriptor.package.version,
                path.display()
            ));
        }
        None => print!("{toml}"),
    }
    Ok(())
}
