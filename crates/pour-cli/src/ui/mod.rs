//! Terminal output for the `pour` binary.
//!
//! - [`theme`] - Colors, icons, and column widths
//! - [`console`] - [`ConsoleReporter`], the `pour_core::Reporter` used by commands

pub mod console;
pub mod theme;

pub use console::ConsoleReporter;
pub use theme::Theme;
