//! SHA-256 digests and the declared checksum of a release.
//!
//! ```
//! use pour_schema::Checksum;
//!
//! assert!(Checksum::parse("").unwrap().is_missing());
//! assert!(Checksum::parse("not-a-digest").is_err());
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SchemaError;

/// A validated SHA256 digest (64 hex characters)
///
/// Digests are normalized to lowercase so they compare equal to the output
/// of `hex::encode`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Create a new `Sha256Digest`, validating the input.
    ///
    /// Accepts strings with or without a `sha256:` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] for `platform.sha256` if the hex
    /// portion is not exactly 64 ASCII hex characters.
    pub fn new(s: impl Into<String>) -> Result<Self, SchemaError> {
        let s = s.into();
        let hex = s.strip_prefix("sha256:").unwrap_or(&s);

        if hex.len() != 64 {
            return Err(SchemaError::field(
                "platform.sha256",
                format!("expected 64 hex characters, got {} in '{s}'", hex.len()),
            ));
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SchemaError::field(
                "platform.sha256",
                format!("contains non-hex characters in '{s}'"),
            ));
        }

        Ok(Self(hex.to_lowercase()))
    }

    /// Get the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a hex digest computed from downloaded bytes.
    pub fn matches(&self, actual_hex: &str) -> bool {
        self.0.eq_ignore_ascii_case(actual_hex)
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The declared integrity state of an artifact.
///
/// An empty `sha256` in a descriptor is not an error at parse time: it is
/// the explicit "unverified" state, which validation flags and install
/// refuses unless unverified installs are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checksum {
    /// No digest was declared.
    Missing,
    /// A SHA256 digest the downloaded bytes must match.
    Sha256(Sha256Digest),
}

impl Checksum {
    /// Interpret a declared `sha256` value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] if the value is non-empty but not
    /// a valid digest.
    pub fn parse(declared: &str) -> Result<Self, SchemaError> {
        let trimmed = declared.trim();
        if trimmed.is_empty() {
            Ok(Self::Missing)
        } else {
            Sha256Digest::new(trimmed).map(Self::Sha256)
        }
    }

    /// Returns `true` if no digest was declared.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The declared digest, if any.
    pub fn digest(&self) -> Option<&Sha256Digest> {
        match self {
            Self::Missing => None,
            Self::Sha256(d) => Some(d),
        }
    }
}
