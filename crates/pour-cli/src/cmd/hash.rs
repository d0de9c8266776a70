//! Hash command

use std::path::PathBuf;

use anyhow::{Context, Result};
use pour_core::io::download::sha256_file;

/// Compute SHA256 hash of files, one `<digest> <path>` line each.
pub fn hash(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let hash = sha256_file(file).with_context(|| format!("failed to hash {}", file.display()))?;
        println!("{} {}", hash, file.display());
    }
    Ok(())
}
