//! Install lifecycle states and failure tags.

use serde::{Deserialize, Serialize};

/// Why an install attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// A descriptor field is empty or malformed.
    InvalidField,
    /// The download URL template did not resolve to an absolute URL.
    UnresolvedUrl,
    /// No platform block matches the host.
    UnsupportedPlatform,
    /// The artifact could not be downloaded.
    FetchError,
    /// The downloaded bytes do not match the declared digest.
    ChecksumMismatch,
    /// No digest was declared and unverified installs are not allowed.
    ChecksumMissing,
    /// The archive could not be unpacked.
    ExtractionError,
    /// Copying into the binary directory failed.
    InstallError,
}

impl FailureReason {
    /// Stable identifier used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidField => "InvalidField",
            Self::UnresolvedUrl => "UnresolvedURL",
            Self::UnsupportedPlatform => "UnsupportedPlatform",
            Self::FetchError => "FetchError",
            Self::ChecksumMismatch => "ChecksumMismatch",
            Self::ChecksumMissing => "ChecksumMissing",
            Self::ExtractionError => "ExtractionError",
            Self::InstallError => "InstallError",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stages of a single install attempt.
///
/// `Declared -> Validated -> Fetched -> Verified -> Installed`, with any stage
/// able to move to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    /// Descriptor read, nothing checked yet.
    Declared,
    /// Fields, platform and URL checked.
    Validated,
    /// Artifact downloaded and hashed.
    Fetched,
    /// Digest compared (or skipped for an unverified release).
    Verified,
    /// Executables copied into the binary directory.
    Installed,
    /// Stopped with a reason.
    Failed(FailureReason),
}

impl std::fmt::Display for InstallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declared => f.write_str("declared"),
            Self::Validated => f.write_str("validated"),
            Self::Fetched => f.write_str("fetched"),
            Self::Verified => f.write_str("verified"),
            Self::Installed => f.write_str("installed"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}
