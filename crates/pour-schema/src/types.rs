//! Package name and version newtypes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use crate::error::SchemaError;

/// A normalized package name.
///
/// Names are lowercased on construction; [`PackageName::validate`] checks
/// that the result is a usable token.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name, normalizing the input to lowercase.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// Return the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the name is a valid token: ASCII letters, digits, `-`, `_`,
    /// `.` or `+`, starting with a letter or digit.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] for `package.name`.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let Some(first) = self.0.chars().next() else {
            return Err(SchemaError::field("package.name", "must not be empty"));
        };
        if !first.is_ascii_alphanumeric() {
            return Err(SchemaError::field(
                "package.name",
                format!("'{}' must start with a letter or digit", self.0),
            ));
        }
        if let Some(bad) = self
            .0
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+')))
        {
            return Err(SchemaError::field(
                "package.name",
                format!("'{}' contains invalid character '{bad}'", self.0),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.to_lowercase()
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.to_lowercase()
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.0
    }
}

/// A release version as declared in a descriptor.
///
/// The declared text is kept verbatim so that a malformed value survives
/// parsing and is reported by validation instead of by the TOML reader.
/// Ordering follows semantic versioning when both sides parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (
            semver::Version::parse(&self.0),
            semver::Version::parse(&other.0),
        ) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Version {
    /// Create a new version from the given string (stored as-is).
    pub fn new(v: &str) -> Self {
        Self(v.to_string())
    }

    /// Return the version string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the version as a dotted numeric triple (`MAJOR.MINOR.PATCH`).
    ///
    /// Pre-release and build suffixes are rejected; release descriptors only
    /// ever name final versions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] for `package.version`.
    pub fn parse_triple(&self) -> Result<semver::Version, SchemaError> {
        if self.0.is_empty() {
            return Err(SchemaError::field("package.version", "must not be empty"));
        }
        let parsed = semver::Version::parse(&self.0).map_err(|e| {
            SchemaError::field(
                "package.version",
                format!("'{}' is not a dotted numeric triple: {e}", self.0),
            )
        })?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(SchemaError::field(
                "package.version",
                format!("'{}' must not carry pre-release or build metadata", self.0),
            ));
        }
        Ok(parsed)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for Version {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
