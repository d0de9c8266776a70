//! TOML release descriptor parsing
//!
//! One file describes one immutable release of a package.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arch::{Arch, Os, Platform};
use crate::error::SchemaError;
use crate::hash::Checksum;
use crate::types::{PackageName, Version};

/// Identity and provenance of a release, the `[package]` table.
///
/// Every field defaults to empty so that a missing value is reported by
/// validation with its field name rather than as a TOML parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Unique name that identifies this package.
    #[serde(default)]
    pub name: PackageName,
    /// Short human-readable summary of the package.
    #[serde(default, alias = "description")]
    pub desc: String,
    /// URL of the project's homepage.
    #[serde(default)]
    pub homepage: String,
    /// Version of this release.
    #[serde(default)]
    pub version: Version,
    /// SPDX license identifier.
    #[serde(default)]
    pub license: String,
}

/// Download location and checksum for one platform, a `[[platform]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRelease {
    /// Operating system the artifact is built for.
    pub os: Os,
    /// Architecture the artifact is built for; `None` accepts any host arch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,
    /// URL template; see `pour_core::validate::resolve_url` for placeholders.
    pub url: String,
    /// Declared SHA256 of the artifact. Empty means unverified.
    #[serde(default)]
    pub sha256: String,
}

impl PlatformRelease {
    /// Whether this entry's guard holds on `host`.
    pub fn matches(&self, host: &Platform) -> bool {
        self.os == host.os && self.arch.is_none_or(|a| a.runs_on(host.arch))
    }

    /// Interpret the declared `sha256`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] for a non-empty malformed digest.
    pub fn checksum(&self) -> Result<Checksum, SchemaError> {
        Checksum::parse(&self.sha256)
    }
}

/// One executable to copy into the binary directory, an `[[install]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallArtifact {
    /// File name inside the extracted archive.
    pub source: String,
    /// Name under the binary directory; defaults to `source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl InstallArtifact {
    /// Install `source` under its own name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
        }
    }

    /// Install `source` renamed to `target`.
    pub fn renamed(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: Some(target.into()),
        }
    }

    /// The effective destination file name.
    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.source)
    }
}

/// Complete release descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Core metadata for the release.
    pub package: PackageInfo,
    /// Per-platform download blocks, checked in order.
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformRelease>,
    /// Executables to install, in order.
    #[serde(default)]
    pub install: Vec<InstallArtifact>,
}

impl Descriptor {
    /// Parse a descriptor from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Io` if the file cannot be read, or
    /// `SchemaError::Parse` if the TOML content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a descriptor from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` if the TOML content is invalid or does
    /// not match the expected schema.
    pub fn parse(content: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize this descriptor to a pretty-printed TOML string.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Serialize` if serialization fails.
    pub fn to_toml(&self) -> Result<String, SchemaError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The first platform block whose guard holds on `host`.
    pub fn platform_for(&self, host: &Platform) -> Option<&PlatformRelease> {
        self.platforms.iter().find(|p| p.matches(host))
    }
}

impl std::str::FromStr for Descriptor {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
