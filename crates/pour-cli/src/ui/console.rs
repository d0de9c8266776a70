//! Line-oriented terminal reporter.
//!
//! Status lines go to stdout, warnings and errors to stderr. Colors are only
//! emitted when stdout is a terminal and `NO_COLOR` is unset.

use std::io::IsTerminal;
use std::sync::Mutex;

use crossterm::style::{Color, Stylize};
use pour_core::Reporter;
use pour_schema::{PackageName, Version};

use super::theme::{Theme, format_size};

#[derive(Debug)]
pub struct ConsoleReporter {
    theme: Theme,
    color: bool,
    quiet: bool,
    /// Last download size announced, so progress is printed once per file.
    announced: Mutex<Option<String>>,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self {
            theme: Theme::default(),
            color,
            quiet,
            announced: Mutex::new(None),
        }
    }

    /// Apply `color` if styling is enabled.
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn package(&self, name: &PackageName, version: &Version) -> String {
        format!(
            "{} {}",
            self.paint(name.as_str(), self.theme.colors.package_name),
            self.paint(version.as_str(), self.theme.colors.version)
        )
    }

    fn status(&self, icon: &str, color: Color, line: &str) {
        if !self.quiet {
            println!("{} {line}", self.paint(icon, color));
        }
    }

    /// Print an aligned row for `pour list`.
    pub fn row(&self, name: &str, version: &str, platform: &str, detail: &str) {
        let layout = &self.theme.layout;
        let name = format!("{name:<w$}", w = layout.name_width);
        let version = format!("{version:<w$}", w = layout.version_width);
        let platform = format!("{platform:<w$}", w = layout.platform_width);
        println!(
            "  {} {} {} {}",
            self.paint(&name, self.theme.colors.package_name),
            self.paint(&version, self.theme.colors.version),
            self.paint(&platform, self.theme.colors.secondary),
            self.paint(detail, self.theme.colors.secondary)
        );
    }

    /// Print the error line for a failed command. Never suppressed by `quiet`.
    pub fn failure(&self, tag: &str, message: &str) {
        let prefix = format!("error[{tag}]:");
        eprintln!("{} {message}", self.paint(&prefix, self.theme.colors.error));
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        if !self.quiet {
            println!("{}", self.bold(title));
        }
    }

    fn downloading(&self, name: &PackageName, version: &Version, current: u64, total: Option<u64>) {
        if current != 0 {
            return;
        }
        let key = format!("{name}@{version}");
        let Ok(mut announced) = self.announced.lock() else {
            return;
        };
        if announced.as_deref() == Some(key.as_str()) {
            return;
        }
        *announced = Some(key);

        let size = total.map(|t| format!(" ({})", format_size(t))).unwrap_or_default();
        self.status(
            self.theme.icons.active,
            self.theme.colors.active,
            &format!("fetching {}{size}", self.package(name, version)),
        );
    }

    fn verifying(&self, name: &PackageName, version: &Version) {
        self.status(
            self.theme.icons.active,
            self.theme.colors.active,
            &format!("verifying {}", self.package(name, version)),
        );
    }

    fn extracting(&self, name: &PackageName, version: &Version) {
        self.status(
            self.theme.icons.active,
            self.theme.colors.active,
            &format!("extracting {}", self.package(name, version)),
        );
    }

    fn installing(&self, name: &PackageName, version: &Version, current: u64, total: u64) {
        if current == 0 {
            self.status(
                self.theme.icons.active,
                self.theme.colors.active,
                &format!("installing {} ({total} file(s))", self.package(name, version)),
            );
        }
    }

    fn done(&self, name: &PackageName, version: &Version, detail: &str) {
        self.status(
            self.theme.icons.success,
            self.theme.colors.success,
            &format!(
                "{} {}",
                self.package(name, version),
                self.paint(detail, self.theme.colors.secondary)
            ),
        );
    }

    fn info(&self, msg: &str) {
        self.status(self.theme.icons.info, self.theme.colors.secondary, msg);
    }

    fn success(&self, msg: &str) {
        self.status(self.theme.icons.success, self.theme.colors.success, msg);
    }

    fn warning(&self, msg: &str) {
        eprintln!(
            "{} {msg}",
            self.paint(self.theme.icons.warning, self.theme.colors.warning)
        );
    }
}
