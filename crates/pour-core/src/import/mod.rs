//! Importers translating other packaging formats into pour descriptors.

/// Homebrew formula importer.
pub mod homebrew;

use thiserror::Error;

pub use homebrew::{import_formula, parse_formula};

/// Why a formula could not be converted.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("formula has no {0}")]
    Missing(&'static str),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}
