//! Host platform detection and the names used in descriptors.
//!
//! A platform is an operating system plus a CPU architecture. Descriptors
//! key their download URL and checksum by platform, and the installer picks
//! the entry matching [`Platform::current`] (or an explicit override).
//!
//! # Example
//!
//! ```
//! use pour_schema::{Arch, Os, Platform};
//!
//! let host = Platform::new(Os::MacOs, Arch::X86_64);
//! assert_eq!(host.target_triple(), "x86_64-apple-darwin");
//! ```

use crate::error::SchemaError;

/// CPU architecture of a release artifact or host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// ARM64 architecture (Apple Silicon, Graviton, ...)
    #[default]
    #[serde(alias = "aarch64")]
    Arm64,
    /// `x86_64` architecture
    #[serde(rename = "x86_64", alias = "amd64")]
    X86_64,
    /// Universal binary (works on both architectures)
    Universal,
}

impl Arch {
    /// Architecture this binary was compiled for, or `None` for CPUs no
    /// descriptor can name (riscv64, powerpc, ...).
    pub fn current() -> Option<Self> {
        if cfg!(target_arch = "aarch64") {
            Some(Self::Arm64)
        } else if cfg!(target_arch = "x86_64") {
            Some(Self::X86_64)
        } else {
            None
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X86_64 => "x86_64",
            Self::Universal => "universal",
        }
    }

    /// Rust-convention architecture name (`aarch64` / `x86_64`).
    ///
    /// Distinct from [`as_str()`](Self::as_str) which uses platform names
    /// (`arm64`). This is the spelling release archives use in their target
    /// triple.
    pub fn rust_name(&self) -> &'static str {
        match self {
            Self::Arm64 => "aarch64",
            Self::X86_64 => "x86_64",
            Self::Universal => "universal",
        }
    }

    /// Whether an artifact built for `self` runs on a `host` machine.
    pub fn runs_on(self, host: Arch) -> bool {
        self == Self::Universal || self == host
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            "universal" => Ok(Self::Universal),
            _ => Err(SchemaError::UnknownArch(s.to_string())),
        }
    }
}

/// Operating system of a release artifact or host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// macOS (`darwin`)
    #[serde(rename = "macos", alias = "darwin", alias = "osx", alias = "mac")]
    MacOs,
    /// Linux
    Linux,
    /// Windows
    Windows,
}

impl Os {
    /// Operating system this binary was compiled for, or `None` for systems
    /// no descriptor can name (FreeBSD, illumos, ...).
    pub fn current() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::MacOs)
        } else if cfg!(target_os = "linux") {
            Some(Self::Linux)
        } else if cfg!(target_os = "windows") {
            Some(Self::Windows)
        } else {
            None
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// Vendor and system part of a Rust target triple.
    pub fn triple_suffix(&self) -> &'static str {
        match self {
            Self::MacOs => "apple-darwin",
            Self::Linux => "unknown-linux-gnu",
            Self::Windows => "pc-windows-msvc",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "darwin" | "osx" | "mac" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            "windows" | "win" => Ok(Self::Windows),
            _ => Err(SchemaError::UnknownOs(s.to_string())),
        }
    }
}

/// The operating system and architecture an install targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Build a platform from its parts.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The platform this binary is running on, if descriptors can name it.
    pub fn current() -> Option<Self> {
        Some(Self::new(Os::current()?, Arch::current()?))
    }

    /// Rust target triple, e.g. `x86_64-apple-darwin`.
    pub fn target_triple(&self) -> String {
        format!("{}-{}", self.arch.rust_name(), self.os.triple_suffix())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
