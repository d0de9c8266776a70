pub mod config;
pub mod error;
pub mod flow;
pub mod import;
pub mod install;
pub mod io;
pub mod paths;
pub mod receipt;
pub mod validate;

pub mod reporter;

pub use config::Settings;
pub use error::InstallError;
pub use flow::{InstallReport, InstallResult, install_descriptor};
pub use paths::*;
pub use reporter::{NullReporter, Reporter};
pub use validate::{ValidationReport, ValidationWarning, validate};

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("pour/", env!("CARGO_PKG_VERSION"));
