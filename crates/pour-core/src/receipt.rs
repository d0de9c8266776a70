//! Install receipts: one JSON file per installed package.
//!
//! A later install of the same package overwrites its receipt.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::InstallError;
use crate::flow::InstallReport;

/// Path of the receipt for `name` inside `dir`.
pub fn receipt_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Persist `report` as `<dir>/<name>.json`.
pub fn write_receipt(dir: &Path, report: &InstallReport) -> Result<PathBuf, InstallError> {
    fs::create_dir_all(dir)
        .map_err(|e| InstallError::install("create receipts directory", e))?;

    let path = receipt_path(dir, report.name.as_str());
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| InstallError::install("serialize receipt", e))?;

    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json)
        .and_then(|()| fs::rename(&staging, &path))
        .map_err(|e| {
            fs::remove_file(&staging).ok();
            InstallError::install("write receipt", format!("{}: {e}", path.display()))
        })?;

    tracing::debug!(path = %path.display(), "receipt written");
    Ok(path)
}

/// Read every receipt in `dir`, sorted by package name.
///
/// A missing directory means nothing is installed. Unreadable receipts are
/// skipped with a warning.
pub fn read_receipts(dir: &Path) -> std::io::Result<Vec<InstallReport>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut receipts = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str::<InstallReport>(&s).map_err(|e| e.to_string()));
        match parsed {
            Ok(report) => receipts.push(report),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable receipt"),
        }
    }

    receipts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(receipts)
}
