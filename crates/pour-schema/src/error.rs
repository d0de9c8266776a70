//! Errors raised while reading descriptors and histories.

use crate::types::Version;

/// Errors produced while parsing or checking descriptor data.
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    /// The descriptor file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content does not match the descriptor schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The descriptor could not be rendered back to TOML.
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field is empty or malformed.
    #[error("Invalid field `{field}`: {reason}")]
    InvalidField {
        /// Dotted path of the offending field (e.g. `package.version`).
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// A release was appended whose version does not follow the previous one.
    #[error("Release history is not monotonic: {next} does not follow {previous}")]
    NotMonotonic {
        /// Newest version already in the history.
        previous: Version,
        /// Version that was rejected.
        next: Version,
    },

    /// An operating system name that `pour` does not know.
    #[error("Unknown operating system: {0}")]
    UnknownOs(String),

    /// An architecture name that `pour` does not know.
    #[error("Unknown architecture: {0}")]
    UnknownArch(String),
}

impl SchemaError {
    /// Shorthand for [`SchemaError::InvalidField`].
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
