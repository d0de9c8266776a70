//! Domain-specific errors for install operations

use pour_schema::{FailureReason, PackageName, SchemaError, Version};
use thiserror::Error;

use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;

/// Why a descriptor could not be installed.
///
/// Every variant maps onto one [`FailureReason`] via [`InstallError::reason`].
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("cannot resolve download URL '{url}': {reason}")]
    UnresolvedUrl { url: String, reason: String },

    #[error("{name} has no install block for {host} (supported: {supported})")]
    UnsupportedPlatform {
        name: PackageName,
        host: String,
        supported: String,
    },

    #[error("download failed: {0}")]
    Fetch(#[from] DownloadError),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("{name} {version} declares no sha256; refusing to install unverified binaries")]
    ChecksumMissing { name: PackageName, version: Version },

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("{context}: {message}")]
    Install {
        context: &'static str,
        message: String,
    },
}

impl InstallError {
    /// Create an install-stage error with context.
    pub fn install(ctx: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Install {
            context: ctx,
            message: msg.to_string(),
        }
    }

    /// The flat failure tag for this error.
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::InvalidField { .. } => FailureReason::InvalidField,
            Self::UnresolvedUrl { .. } => FailureReason::UnresolvedUrl,
            Self::UnsupportedPlatform { .. } => FailureReason::UnsupportedPlatform,
            Self::Fetch(_) => FailureReason::FetchError,
            Self::ChecksumMismatch { .. } => FailureReason::ChecksumMismatch,
            Self::ChecksumMissing { .. } => FailureReason::ChecksumMissing,
            Self::Extraction(_) => FailureReason::ExtractionError,
            Self::Install { .. } => FailureReason::InstallError,
        }
    }
}

impl From<SchemaError> for InstallError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::InvalidField { field, reason } => Self::InvalidField {
                field: field.to_string(),
                reason,
            },
            other => Self::InvalidField {
                field: "descriptor".to_string(),
                reason: other.to_string(),
            },
        }
    }
}
