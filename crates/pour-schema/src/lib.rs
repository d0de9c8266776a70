//! Shared types and the TOML descriptor format for `pour`.
//!
//! A [`Descriptor`] is the declarative record for one package release: its
//! identity, the download URL and checksum for each supported platform, and
//! the executables to copy out of the archive. Revisions of the same package
//! are kept in an append-only [`ReleaseHistory`].

pub mod arch;
pub mod descriptor;
pub mod error;
pub mod hash;
pub mod history;
pub mod state;
pub mod types;

// Re-exports
pub use arch::*;
pub use descriptor::{Descriptor, InstallArtifact, PackageInfo, PlatformRelease};
pub use error::SchemaError;
pub use hash::*;
pub use history::ReleaseHistory;
pub use state::{FailureReason, InstallState};
pub use types::*;
