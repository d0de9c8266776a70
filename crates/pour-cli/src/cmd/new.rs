//! New command

use std::path::{Path, PathBuf};

use anyhow::Result;
use pour_core::Reporter;

use crate::GlobalArgs;
use crate::ui::ConsoleReporter;

/// Descriptor template for `name`.
pub fn template(name: &str) -> String {
    format!(
        r#"[package]
name = "{name}"
desc = ""
homepage = "https://github.com/OWNER/{name}"
version = "0.1.0"
license = "MIT"

[[platform]]
os = "macos"
arch = "arm64"
url = "https://github.com/OWNER/{name}/releases/download/{{version}}/{{name}}-{{version}}-{{target}}.tar.gz"
sha256 = ""

[[platform]]
os = "macos"
arch = "x86_64"
url = "https://github.com/OWNER/{name}/releases/download/{{version}}/{{name}}-{{version}}-{{target}}.tar.gz"
sha256 = ""

[[install]]
source = "{name}"
"#
    )
}

/// Create a new descriptor template
pub fn new(global: &GlobalArgs, name: &str, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(format!("{name}.toml"));

    if path.exists() {
        anyhow::bail!("Descriptor already exists: {}", path.display());
    }

    let output = ConsoleReporter::new(global.quiet);
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(&path, template(name))?;

    output.success(&format!("Created descriptor template: {}", path.display()));
    output.info(&format!(
        "Fill in desc and sha256, then run 'pour check {}'.",
        path.display()
    ));

    Ok(path)
}
