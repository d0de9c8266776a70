//! Resolved settings for one `pour` invocation.
//!
//! The CLI builds a [`Settings`] from flags and environment; the library
//! only ever reads locations and policy from it.
//!
//! ```text
//! $POUR_HOME/
//! ├── bin/        # installed executables (default binary directory)
//! ├── tmp/        # per-install scratch directories
//! └── receipts/   # <name>.json per installed package
//! ```

use std::path::PathBuf;

use pour_schema::Platform;

/// Install policy and filesystem layout.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root state directory.
    pub home: PathBuf,
    /// Destination for installed executables.
    pub bin_dir: PathBuf,
    /// Platform used for the platform gate and URL placeholders. `None` when
    /// the host is not one descriptors can name.
    pub platform: Option<Platform>,
    /// Install releases that declare no checksum (flagged, not verified).
    pub allow_unverified: bool,
}

impl Settings {
    /// Default layout under `home` for the current host.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            bin_dir: home.join("bin"),
            home,
            platform: Platform::current(),
            allow_unverified: false,
        }
    }

    /// Override the binary directory.
    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = bin_dir.into();
        self
    }

    /// Override the target platform.
    pub fn with_platform(mut self, platform: impl Into<Option<Platform>>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Allow or refuse releases without a checksum.
    pub fn with_allow_unverified(mut self, allow: bool) -> Self {
        self.allow_unverified = allow;
        self
    }

    /// Scratch space, on the same volume as `home`.
    pub fn tmp_dir(&self) -> PathBuf {
        self.home.join("tmp")
    }

    /// Install receipts.
    pub fn receipts_dir(&self) -> PathBuf {
        self.home.join("receipts")
    }
}
