//! Copy extracted executables into the binary directory.
//!
//! Every source is located before the first write, so a release whose
//! archive lacks one of its declared files installs nothing. Each copy is
//! written under a temporary name in the destination directory and renamed
//! into place.

use std::fs;
use std::path::{Path, PathBuf};

use pour_schema::InstallArtifact;

use crate::error::InstallError;
use crate::io::extract::ExtractedFile;

/// A planned copy: where the file is in the extracted tree and where it goes.
#[derive(Debug, Clone)]
pub struct PlannedCopy {
    /// File inside the extraction directory.
    pub source: PathBuf,
    /// File name under the binary directory.
    pub target: String,
}

/// Find the extracted file for `source`.
///
/// An entry at the archive root wins; otherwise the shallowest file with that
/// name, which covers archives that wrap their contents in a top-level
/// directory (`kignore-0.1.3/kignore`). Ties go to the lexically first path.
pub fn locate_source<'a>(files: &'a [ExtractedFile], source: &str) -> Option<&'a ExtractedFile> {
    if let Some(direct) = files.iter().find(|f| f.relative_path == Path::new(source)) {
        return Some(direct);
    }

    files
        .iter()
        .filter(|f| f.relative_path.file_name().is_some_and(|n| n == source))
        .min_by(|a, b| {
            let depth = |f: &ExtractedFile| f.relative_path.components().count();
            depth(a)
                .cmp(&depth(b))
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        })
}

/// Resolve every install entry against the extracted files.
///
/// # Errors
///
/// Returns [`InstallError::Install`] naming the first entry whose source is
/// not in the archive.
pub fn plan(
    files: &[ExtractedFile],
    artifacts: &[InstallArtifact],
) -> Result<Vec<PlannedCopy>, InstallError> {
    artifacts
        .iter()
        .map(|artifact| {
            let found = locate_source(files, &artifact.source).ok_or_else(|| {
                InstallError::install(
                    "missing archive entry",
                    format!("'{}' is not in the archive", artifact.source),
                )
            })?;
            Ok(PlannedCopy {
                source: found.absolute_path.clone(),
                target: artifact.target_name().to_string(),
            })
        })
        .collect()
}

/// Execute a plan, returning the installed paths in plan order.
///
/// # Errors
///
/// Returns [`InstallError::Install`] if the directory cannot be created or a
/// copy fails. Files installed before the failure are left in place.
pub fn apply(plan: &[PlannedCopy], bin_dir: &Path) -> Result<Vec<PathBuf>, InstallError> {
    fs::create_dir_all(bin_dir).map_err(|e| {
        InstallError::install("create binary directory", format!("{}: {e}", bin_dir.display()))
    })?;

    let mut installed = Vec::with_capacity(plan.len());
    for copy in plan {
        let dest = bin_dir.join(&copy.target);
        copy_executable(&copy.source, &dest)?;
        tracing::debug!(from = %copy.source.display(), to = %dest.display(), "installed");
        installed.push(dest);
    }
    Ok(installed)
}

/// [`plan`] then [`apply`].
///
/// # Errors
///
/// See [`plan`] and [`apply`].
pub fn install_artifacts(
    files: &[ExtractedFile],
    artifacts: &[InstallArtifact],
    bin_dir: &Path,
) -> Result<Vec<PathBuf>, InstallError> {
    let plan = plan(files, artifacts)?;
    apply(&plan, bin_dir)
}

fn copy_executable(source: &Path, dest: &Path) -> Result<(), InstallError> {
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = dest.with_file_name(format!(".{file_name}.pour-tmp"));

    let result = (|| -> std::io::Result<()> {
        fs::copy(source, &staging)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&staging, fs::Permissions::from_mode(0o755))?;
        }
        fs::rename(&staging, dest)
    })();

    result.map_err(|e| {
        fs::remove_file(&staging).ok();
        InstallError::install("copy into binary directory", format!("{}: {e}", dest.display()))
    })
}
