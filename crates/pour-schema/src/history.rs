//! Append-only list of release descriptors for one package.
//!
//! A history file holds one `[[release]]` table per revision, oldest first.
//! Each table is a complete [`Descriptor`]; later revisions supersede earlier
//! ones but never rewrite them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::Descriptor;
use crate::error::SchemaError;
use crate::types::Version;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    release: Vec<Descriptor>,
}

/// Ordered revisions of a single package, strictly increasing by version.
#[derive(Debug, Clone, Default)]
pub struct ReleaseHistory {
    releases: Vec<Descriptor>,
}

impl ReleaseHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a history file from disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error, or the first ordering violation found
    /// while appending the releases in file order.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a history from TOML.
    ///
    /// # Errors
    ///
    /// See [`ReleaseHistory::from_file`].
    pub fn parse(content: &str) -> Result<Self, SchemaError> {
        let file: HistoryFile = toml::from_str(content)?;
        if file.release.is_empty() {
            return Err(SchemaError::field("release", "history has no releases"));
        }
        let mut history = Self::new();
        for release in file.release {
            history.push(release)?;
        }
        Ok(history)
    }

    /// Render the history back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Serialize` if serialization fails.
    pub fn to_toml(&self) -> Result<String, SchemaError> {
        let file = HistoryFile {
            release: self.releases.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Append a new revision.
    ///
    /// The revision must carry a valid version strictly greater than the
    /// newest one, and the same name and homepage.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] for a malformed version or an
    /// identity change, and [`SchemaError::NotMonotonic`] for a version that
    /// does not increase.
    pub fn push(&mut self, release: Descriptor) -> Result<(), SchemaError> {
        let next = release.package.version.parse_triple()?;

        if let Some(last) = self.releases.last() {
            if last.package.name != release.package.name {
                return Err(SchemaError::field(
                    "package.name",
                    format!(
                        "release {} is named '{}', history is for '{}'",
                        release.package.version, release.package.name, last.package.name
                    ),
                ));
            }
            if last.package.homepage != release.package.homepage {
                return Err(SchemaError::field(
                    "package.homepage",
                    format!(
                        "release {} changes homepage from '{}' to '{}'",
                        release.package.version, last.package.homepage, release.package.homepage
                    ),
                ));
            }
            let previous = last.package.version.parse_triple()?;
            if next <= previous {
                return Err(SchemaError::NotMonotonic {
                    previous: last.package.version.clone(),
                    next: release.package.version,
                });
            }
        }

        self.releases.push(release);
        Ok(())
    }

    /// The newest revision.
    pub fn latest(&self) -> Option<&Descriptor> {
        self.releases.last()
    }

    /// Look up a revision by exact version.
    pub fn find(&self, version: &Version) -> Option<&Descriptor> {
        self.releases.iter().find(|r| &r.package.version == version)
    }

    /// Revisions, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor> {
        self.releases.iter()
    }

    /// Number of revisions.
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// Returns `true` if the history has no revisions.
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReleaseHistory {
    type Item = &'a Descriptor;
    type IntoIter = std::slice::Iter<'a, Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
