//! pour - verified installs of prebuilt release binaries
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Reads declarative TOML release descriptors, checks them, and installs the
//! executables they name into a binary directory after verifying the
//! downloaded archive's SHA-256.
//!
//! # Architecture
//!
//! - **Typestate Pattern**: installs run `DeclaredRelease` → `ValidatedRelease`
//!   → `FetchedRelease` → `VerifiedRelease` → `InstalledRelease` (see
//!   `pour_core::flow`).
//! - **Reporter**: commands hand a [`ui::ConsoleReporter`] to the core so the
//!   library never writes to the terminal itself.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.pour/
//! ├── bin/        # Installed executables
//! ├── tmp/        # Per-install scratch space
//! └── receipts/   # <name>.json per installed package
//! ```

pub mod cmd;
pub mod ui;

use clap::{Args, Parser, Subcommand};
use pour_schema::{Arch, Os};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pour")]
#[command(author, version, about = "pour - verified installs of prebuilt release binaries")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// State directory (default: ~/.pour)
    #[arg(long, global = true, env = "POUR_HOME")]
    pub home: Option<PathBuf>,

    /// Where executables are installed (default: <home>/bin)
    #[arg(long, global = true, env = "POUR_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Target operating system instead of the running one (macos, linux, windows)
    #[arg(long, global = true, env = "POUR_OS")]
    pub os: Option<Os>,

    /// Target architecture instead of the running one (x86_64, arm64, universal)
    #[arg(long, global = true, env = "POUR_ARCH")]
    pub arch: Option<Arch>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a release descriptor for the target platform
    Check {
        /// Descriptor file
        path: PathBuf,
        /// Treat warnings (such as a missing sha256) as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print the resolved download URL for the target platform
    Url {
        /// Descriptor file
        path: PathBuf,
    },
    /// Download, verify and install a release
    Install {
        /// Descriptor file, or a history file (its latest release is installed)
        path: PathBuf,
        /// Install releases that declare no sha256
        #[arg(long, env = "POUR_ALLOW_UNVERIFIED")]
        allow_unverified: bool,
        /// Show what would happen without downloading or writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Check a history file and list its releases
    History {
        /// History file with [[release]] tables
        path: PathBuf,
    },
    /// List installed packages
    List,
    /// Convert a Homebrew formula into a descriptor
    Import {
        /// Formula file (.rb)
        formula: PathBuf,
        /// Write the descriptor here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a new descriptor template
    New {
        /// Package name
        name: String,
        /// Directory to save the descriptor in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Compute SHA256 hash of files (for descriptor authoring)
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
