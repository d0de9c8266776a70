//! Subcommand implementations and the helpers they share.

pub mod check;
pub mod completions;
pub mod hash;
pub mod history;
pub mod import;
pub mod install;
pub mod list;
pub mod new;
pub mod url;

use std::path::Path;

use anyhow::{Context, Result};
use pour_core::Settings;
use pour_schema::{Arch, Descriptor, Os, Platform, ReleaseHistory};

use crate::GlobalArgs;

/// Resolve locations and target platform from flags and environment.
pub fn settings(global: &GlobalArgs) -> Result<Settings> {
    let home = match &global.home {
        Some(home) => home.clone(),
        None => pour_core::try_pour_home()
            .context("cannot determine the home directory; set POUR_HOME or pass --home")?,
    };

    // Either half of an undetected host can be supplied by flag.
    let os = global.os.or_else(Os::current);
    let arch = global.arch.or_else(Arch::current);
    let mut settings = Settings::new(home)
        .with_platform(os.zip(arch).map(|(os, arch)| Platform::new(os, arch)));
    if let Some(bin_dir) = &global.bin_dir {
        settings = settings.with_bin_dir(bin_dir);
    }
    Ok(settings)
}

/// Read a release from `path`.
///
/// A file with `[[release]]` tables is read as a history and its latest
/// release is returned; anything else is a single descriptor.
pub fn load_release(path: &Path) -> Result<Descriptor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let table: toml::Table = content
        .parse()
        .with_context(|| format!("failed to parse {}", path.display()))?;

    if table.contains_key("release") {
        let history = ReleaseHistory::parse(&content)
            .with_context(|| format!("invalid history {}", path.display()))?;
        let latest = history
            .latest()
            .cloned()
            .context("history has no releases")?;
        tracing::debug!(version = %latest.package.version, "using latest release from history");
        return Ok(latest);
    }

    Descriptor::parse(&content).with_context(|| format!("invalid descriptor {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const DESCRIPTOR: &str = r#"
[package]
name = "kignore"
desc = "Easily add items to .gitignore and cleanup afterwards"
homepage = "https://github.com/kjuulh/gitignore"
version = "0.1.1"
license = "MIT"

[[platform]]
os = "macos"
url = "https://github.com/kjuulh/kignore/releases/download/{version}/kignore-{version}-x86_64-apple-darwin.tar.gz"
sha256 = ""

[[install]]
source = "kignore"
"#;

    #[test]
    fn loads_descriptor_and_history() {
        let dir = tempfile::tempdir().unwrap();

        let single = dir.path().join("kignore.toml");
        std::fs::write(&single, DESCRIPTOR).unwrap();
        assert_eq!(load_release(&single).unwrap().package.version, "0.1.1");

        let newer = DESCRIPTOR.replace("0.1.1", "0.1.2");
        let history = format!(
            "{}\n{}",
            DESCRIPTOR.replace("[package]", "[[release]]\n[release.package]")
                .replace("[[platform]]", "[[release.platform]]")
                .replace("[[install]]", "[[release.install]]"),
            newer
                .replace("[package]", "[[release]]\n[release.package]")
                .replace("[[platform]]", "[[release.platform]]")
                .replace("[[install]]", "[[release.install]]"),
        );
        let path = dir.path().join("history.toml");
        std::fs::write(&path, history).unwrap();
        assert_eq!(load_release(&path).unwrap().package.version, "0.1.2");
    }

    #[test]
    fn settings_follow_flags() {
        let cli = crate::Cli::try_parse_from([
            "pour", "--home", "/tmp/pour-home", "--os", "linux", "--arch", "arm64", "list",
        ])
        .unwrap();
        let settings = settings(&cli.global).unwrap();
        assert_eq!(settings.bin_dir, Path::new("/tmp/pour-home/bin"));
        assert_eq!(settings.platform.unwrap().target_triple(), "aarch64-unknown-linux-gnu");
    }
}
