//! Print the contents of a descriptor or history file.
//!
//! ```text
//! cargo run -p pour-schema --example inspect -- packages/kignore.toml
//! ```

use pour_schema::{Descriptor, ReleaseHistory};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let Some(path) = std::env::args().nth(1) else {
        anyhow::bail!("usage: inspect <descriptor.toml | history.toml>");
    };
    let path = Path::new(&path);

    if let Ok(history) = ReleaseHistory::from_file(path) {
        println!("Releases ({}):", history.len());
        for release in history.iter() {
            println!(" - {} {}", release.package.name, release.package.version);
        }
        return Ok(());
    }

    let descriptor = Descriptor::from_file(path)?;
    println!("Name: {}", descriptor.package.name);
    println!("Version: {}", descriptor.package.version);
    println!("Platforms ({}):", descriptor.platforms.len());
    for platform in &descriptor.platforms {
        let arch = platform.arch.map_or("any", |a| a.as_str());
        println!(" - {} / {arch}: {}", platform.os, platform.url);
    }
    for artifact in &descriptor.install {
        println!("bin/{} <- {}", artifact.target_name(), artifact.source);
    }

    Ok(())
}
