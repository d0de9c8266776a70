//! Install Flow Typestate Pattern
//!
//! Models one install attempt as a series of explicit state transitions:
//!
//! ```text
//! DeclaredRelease --[validate()]--> ValidatedRelease --[fetch()]--> FetchedRelease
//!     --[verify()]--> VerifiedRelease --[install()]--> InstalledRelease
//! ```
//!
//! Each transition consumes the previous state, so an artifact cannot be
//! extracted before its digest has been compared, and nothing is downloaded
//! for a descriptor that failed validation.
//!
//! # Usage
//!
//! ```ignore
//! let validated = DeclaredRelease::new(descriptor).validate(&host, false)?;
//! let fetched = validated.fetch(&client, &tmp_root, &reporter).await?;
//! let installed = fetched.verify(&reporter)?.install(&bin_dir, &reporter).await?;
//! ```

use std::path::{Path, PathBuf};

use pour_schema::{Descriptor, InstallArtifact, InstallState, PackageName, Platform, Version};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::config::Settings;
use crate::error::InstallError;
use crate::io::download::{DownloadRequest, Downloaded};
use crate::io::extract;
use crate::paths::filename_from_url;
use crate::reporter::Reporter;
use crate::validate::{self, ValidationReport};

/// Result of [`install_descriptor`].
pub type InstallResult = Result<InstallReport, InstallError>;

/// What a successful install did, also persisted as the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    pub name: PackageName,
    pub version: Version,
    /// Resolved download URL.
    pub url: String,
    /// Digest of the bytes actually downloaded.
    pub sha256: String,
    /// `false` when the release declared no checksum.
    pub verified: bool,
    /// Target triple the release was installed for.
    pub platform: String,
    /// Installed executables, in install order.
    pub files: Vec<PathBuf>,
    /// RFC 3339 timestamp.
    pub installed_at: String,
}

/// State 1: a descriptor that has been read but not checked.
///
/// # Transitions
///
/// - [`validate()`](Self::validate) -> [`ValidatedRelease`]
#[derive(Debug, Clone)]
pub struct DeclaredRelease {
    pub descriptor: Descriptor,
}

/// State 2: fields, platform gate and URL have been checked for one host.
///
/// # Transitions
///
/// - [`fetch()`](Self::fetch) -> [`FetchedRelease`]
#[derive(Debug, Clone)]
pub struct ValidatedRelease {
    pub descriptor: Descriptor,
    pub report: ValidationReport,
    pub host: Platform,
}

/// State 3: the artifact is on disk in a scratch directory and its digest is
/// known.
///
/// # Transitions
///
/// - [`verify()`](Self::verify) -> [`VerifiedRelease`]
#[derive(Debug)]
pub struct FetchedRelease {
    pub validated: ValidatedRelease,
    pub download: Downloaded,
    /// Removed on drop, taking the archive and extracted tree with it.
    pub temp_dir: TempDir,
}

/// State 4: the digest has been compared, or skipped for an unverified
/// release.
///
/// # Transitions
///
/// - [`install()`](Self::install) -> [`InstalledRelease`]
#[derive(Debug)]
pub struct VerifiedRelease {
    pub fetched: FetchedRelease,
    pub verified: bool,
}

/// State 5: executables are in the binary directory.
#[derive(Debug, Clone)]
pub struct InstalledRelease {
    pub report: InstallReport,
}

impl DeclaredRelease {
    pub fn new(descriptor: Descriptor) -> Self {
        Self { descriptor }
    }

    pub fn state(&self) -> InstallState {
        InstallState::Declared
    }

    /// Run every pure check for `host`.
    ///
    /// A release without a checksum is refused here, before any network
    /// access, unless `allow_unverified` is set.
    pub fn validate(
        self,
        host: &Platform,
        allow_unverified: bool,
    ) -> Result<ValidatedRelease, InstallError> {
        let report = validate::validate(&self.descriptor, host)?;

        if !report.is_verifiable() && !allow_unverified {
            return Err(InstallError::ChecksumMissing {
                name: self.descriptor.package.name.clone(),
                version: self.descriptor.package.version.clone(),
            });
        }

        tracing::debug!(
            name = %self.descriptor.package.name,
            version = %report.version,
            url = %report.url,
            "validated"
        );

        Ok(ValidatedRelease {
            descriptor: self.descriptor,
            report,
            host: *host,
        })
    }
}

impl ValidatedRelease {
    pub fn state(&self) -> InstallState {
        InstallState::Validated
    }

    pub fn name(&self) -> &PackageName {
        &self.descriptor.package.name
    }

    pub fn version(&self) -> &Version {
        &self.descriptor.package.version
    }

    pub fn url(&self) -> &Url {
        &self.report.url
    }

    /// Download the artifact into a fresh scratch directory under `tmp_root`.
    pub async fn fetch<R: Reporter>(
        self,
        client: &Client,
        tmp_root: &Path,
        reporter: &R,
    ) -> Result<FetchedRelease, InstallError> {
        tokio::fs::create_dir_all(tmp_root)
            .await
            .map_err(|e| InstallError::install("create scratch directory", e))?;
        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("{}-", self.name()))
            .tempdir_in(tmp_root)
            .map_err(|e| InstallError::install("create scratch directory", e))?;

        let file_name = match filename_from_url(self.url().as_str()) {
            "" => "artifact",
            name => name,
        };
        let dest = temp_dir.path().join(file_name);

        let download = DownloadRequest::new(
            client,
            self.name(),
            self.version(),
            self.url(),
            &dest,
            reporter,
        )
        .execute()
        .await?;

        Ok(FetchedRelease {
            validated: self,
            download,
            temp_dir,
        })
    }
}

impl FetchedRelease {
    pub fn state(&self) -> InstallState {
        InstallState::Fetched
    }

    /// Compare the downloaded digest with the declared one.
    ///
    /// On mismatch the artifact is deleted and nothing is extracted.
    pub fn verify<R: Reporter>(self, reporter: &R) -> Result<VerifiedRelease, InstallError> {
        let name = self.validated.name();
        let version = self.validated.version();

        let Some(expected) = self.validated.report.checksum.digest() else {
            tracing::warn!(%name, %version, "no checksum declared, skipping verification");
            reporter.warning(&format!(
                "{name} {version}: no sha256 declared, installing unverified"
            ));
            return Ok(VerifiedRelease {
                fetched: self,
                verified: false,
            });
        };

        reporter.verifying(name, version);
        if !expected.matches(&self.download.sha256) {
            let err = InstallError::ChecksumMismatch {
                expected: expected.to_string(),
                actual: self.download.sha256.clone(),
            };
            std::fs::remove_file(&self.download.path).ok();
            return Err(err);
        }

        Ok(VerifiedRelease {
            fetched: self,
            verified: true,
        })
    }
}

impl VerifiedRelease {
    pub fn state(&self) -> InstallState {
        InstallState::Verified
    }

    /// Unpack the archive and copy the declared executables into `bin_dir`.
    pub async fn install<R: Reporter>(
        self,
        bin_dir: &Path,
        reporter: &R,
    ) -> Result<InstalledRelease, InstallError> {
        let validated = &self.fetched.validated;
        let name = validated.name().clone();
        let version = validated.version().clone();

        reporter.extracting(&name, &version);
        let archive = self.fetched.download.path.clone();
        let archive_name = filename_from_url(validated.url().as_str()).to_string();
        let extract_dir = self.fetched.temp_dir.path().join("extracted");
        let artifacts: Vec<InstallArtifact> = validated.descriptor.install.clone();
        let bin_dir = bin_dir.to_path_buf();

        let total = artifacts.len() as u64;
        reporter.installing(&name, &version, 0, total);

        let files = tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>, InstallError> {
            let extracted = extract::extract_named(&archive, &archive_name, &extract_dir)?;
            crate::install::install_artifacts(&extracted, &artifacts, &bin_dir)
        })
        .await
        .map_err(|e| InstallError::install("extraction task", e))??;

        reporter.installing(&name, &version, total, total);

        let report = InstallReport {
            name,
            version,
            url: validated.url().to_string(),
            sha256: self.fetched.download.sha256.clone(),
            verified: self.verified,
            platform: Platform::new(
                validated.report.platform.os,
                validated.report.platform.arch.unwrap_or(validated.host.arch),
            )
            .target_triple(),
            files,
            installed_at: chrono::Utc::now().to_rfc3339(),
        };

        Ok(InstalledRelease { report })
    }
}

impl InstalledRelease {
    pub fn state(&self) -> InstallState {
        InstallState::Installed
    }
}

/// Run the whole flow for one descriptor and record a receipt.
pub async fn install_descriptor<R: Reporter>(
    descriptor: Descriptor,
    settings: &Settings,
    client: &Client,
    reporter: &R,
) -> InstallResult {
    let name = descriptor.package.name.clone();
    let version = descriptor.package.version.clone();

    let result = run(descriptor, settings, client, reporter).await;
    match &result {
        Ok(report) => {
            let detail = if report.verified {
                format!("{} file(s)", report.files.len())
            } else {
                format!("{} file(s), unverified", report.files.len())
            };
            reporter.done(&name, &version, &detail);
            tracing::info!(%name, %version, state = %InstallState::Installed, "install complete");
        }
        Err(e) => {
            let state = InstallState::Failed(e.reason());
            tracing::info!(%name, %version, %state, error = %e, "install stopped");
        }
    }
    result
}

async fn run<R: Reporter>(
    descriptor: Descriptor,
    settings: &Settings,
    client: &Client,
    reporter: &R,
) -> InstallResult {
    let host = validate::require_host(&descriptor, settings.platform)?;
    let validated = DeclaredRelease::new(descriptor).validate(&host, settings.allow_unverified)?;
    let fetched = validated
        .fetch(client, &settings.tmp_dir(), reporter)
        .await?;
    let installed = fetched
        .verify(reporter)?
        .install(&settings.bin_dir, reporter)
        .await?;

    crate::receipt::write_receipt(&settings.receipts_dir(), &installed.report)?;
    Ok(installed.report)
}
