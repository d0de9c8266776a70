//! Convert a binary-only Homebrew formula into a descriptor.
//!
//! This is a line-oriented reader for the small subset of the formula DSL
//! used by prebuilt-binary formulas: metadata string calls, `url`/`sha256`
//! inside `if OS.mac?`/`on_macos do` style blocks, and `bin.install` inside
//! `def install`. Anything else is ignored.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use pour_schema::{
    Arch, Descriptor, InstallArtifact, Os, PackageInfo, PackageName, PlatformRelease, Version,
};
use regex::Regex;

use super::ImportError;

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^class\s+([A-Z][A-Za-z0-9_]*)\s*<\s*Formula\b").expect("valid regex")
});
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(desc|homepage|version|license|url|sha256)\s*\(?\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid regex")
});
static STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("valid regex"));
static DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^def\s+([A-Za-z_][A-Za-z0-9_?!]*)").expect("valid regex"));
static ON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^on_([a-z_]+)\s+do\b").expect("valid regex"));
static DO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdo(\s*\|[^|]*\|)?$").expect("valid regex"));

/// One open block in the formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Class,
    Os(Os),
    Arch(Arch),
    Install,
    Other,
}

#[derive(Debug, Default)]
struct PendingPlatform {
    os: Option<Os>,
    arch: Option<Arch>,
    url: Option<String>,
    sha256: Option<String>,
}

/// Read and convert a formula file.
pub fn import_formula(path: &Path) -> Result<Descriptor, ImportError> {
    let source = fs::read_to_string(path)?;
    parse_formula(&source)
}

/// Convert formula source text.
///
/// # Errors
///
/// Returns [`ImportError::Missing`] if there is no `class ... < Formula`, no
/// `url` or no `bin.install`, and [`ImportError::Syntax`] for an `end`
/// without a matching block.
pub fn parse_formula(source: &str) -> Result<Descriptor, ImportError> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut class_name: Option<String> = None;
    let mut package = PackageInfo::default();
    let mut platforms: Vec<PendingPlatform> = Vec::new();
    let mut install = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line == "end" || line.starts_with("end ") || line.starts_with("end#") {
            if frames.pop().is_none() {
                return Err(ImportError::Syntax {
                    line: idx + 1,
                    message: "'end' without an open block".to_string(),
                });
            }
            continue;
        }

        if let Some(caps) = CLASS_RE.captures(line) {
            class_name = Some(caps[1].to_string());
            frames.push(Frame::Class);
            continue;
        }

        if let Some(cond) = line.strip_prefix("if ") {
            frames.push(condition_frame(cond));
            continue;
        }
        if let Some(cond) = line.strip_prefix("elsif ") {
            frames.pop();
            frames.push(condition_frame(cond));
            continue;
        }
        if line == "else" {
            frames.pop();
            frames.push(Frame::Other);
            continue;
        }
        if line.starts_with("unless ") || line.starts_with("case ") || line.starts_with("begin") {
            frames.push(Frame::Other);
            continue;
        }

        if let Some(caps) = ON_RE.captures(line) {
            frames.push(on_block_frame(&caps[1]));
            continue;
        }

        if let Some(caps) = DEF_RE.captures(line) {
            frames.push(if &caps[1] == "install" {
                Frame::Install
            } else {
                Frame::Other
            });
            continue;
        }

        if DO_RE.is_match(line) {
            frames.push(Frame::Other);
            continue;
        }

        if frames.last() == Some(&Frame::Install) {
            if let Some(args) = line.strip_prefix("bin.install") {
                install.extend(parse_bin_install(args));
            }
            continue;
        }

        let Some(caps) = FIELD_RE.captures(line) else {
            continue;
        };
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str())
            .to_string();

        match &caps[1] {
            "url" => {
                let (os, arch) = context(&frames);
                platforms.push(PendingPlatform {
                    os,
                    arch,
                    url: Some(value),
                    sha256: None,
                });
            }
            "sha256" => match platforms.last_mut() {
                Some(p) if p.sha256.is_none() => p.sha256 = Some(value),
                _ => {
                    let (os, arch) = context(&frames);
                    platforms.push(PendingPlatform {
                        os,
                        arch,
                        url: None,
                        sha256: Some(value),
                    });
                }
            },
            // Metadata inside nested blocks (resources, bottles) is not ours.
            _ if frames.len() > 1 => {}
            "desc" => package.desc = value,
            "homepage" => package.homepage = value,
            "version" => package.version = Version::new(&value),
            "license" => package.license = value,
            _ => {}
        }
    }

    let class_name = class_name.ok_or(ImportError::Missing("'class ... < Formula'"))?;
    package.name = PackageName::new(&kebab_case(&class_name));

    let platforms = platforms
        .into_iter()
        .filter_map(finish_platform)
        .collect::<Vec<_>>();
    if platforms.is_empty() {
        return Err(ImportError::Missing("url"));
    }
    if install.is_empty() {
        return Err(ImportError::Missing("bin.install"));
    }

    tracing::debug!(
        name = %package.name,
        platforms = platforms.len(),
        artifacts = install.len(),
        "imported formula"
    );

    Ok(Descriptor {
        package,
        platforms,
        install,
    })
}

fn condition_frame(cond: &str) -> Frame {
    let cond = cond.trim();
    if cond.contains("OS.mac?") {
        Frame::Os(Os::MacOs)
    } else if cond.contains("OS.linux?") {
        Frame::Os(Os::Linux)
    } else if cond.contains("Hardware::CPU.intel?") {
        Frame::Arch(Arch::X86_64)
    } else if cond.contains("Hardware::CPU.arm?") {
        Frame::Arch(Arch::Arm64)
    } else {
        Frame::Other
    }
}

fn on_block_frame(kind: &str) -> Frame {
    match kind {
        "macos" => Frame::Os(Os::MacOs),
        "linux" => Frame::Os(Os::Linux),
        "intel" => Frame::Arch(Arch::X86_64),
        "arm" => Frame::Arch(Arch::Arm64),
        _ => Frame::Other,
    }
}

/// Innermost os and arch guards currently open.
fn context(frames: &[Frame]) -> (Option<Os>, Option<Arch>) {
    let os = frames.iter().rev().find_map(|f| match f {
        Frame::Os(os) => Some(*os),
        _ => None,
    });
    let arch = frames.iter().rev().find_map(|f| match f {
        Frame::Arch(arch) => Some(*arch),
        _ => None,
    });
    (os, arch)
}

fn finish_platform(pending: PendingPlatform) -> Option<PlatformRelease> {
    let url = pending.url?.replace("#{version}", "{version}");
    let os = pending.os.unwrap_or_else(|| os_from_url(&url));
    let arch = pending.arch.or_else(|| arch_from_url(&url));
    Some(PlatformRelease {
        os,
        arch,
        url,
        sha256: pending.sha256.unwrap_or_default(),
    })
}

/// Homebrew is macOS-first, so an unguarded URL without a recognisable OS
/// is treated as macOS.
fn os_from_url(url: &str) -> Os {
    let lower = url.to_lowercase();
    if lower.contains("linux") {
        Os::Linux
    } else if lower.contains("windows") {
        Os::Windows
    } else {
        Os::MacOs
    }
}

fn arch_from_url(url: &str) -> Option<Arch> {
    let lower = url.to_lowercase();
    if lower.contains("x86_64") || lower.contains("amd64") {
        Some(Arch::X86_64)
    } else if lower.contains("aarch64") || lower.contains("arm64") {
        Some(Arch::Arm64)
    } else if lower.contains("universal") {
        Some(Arch::Universal)
    } else {
        None
    }
}

/// `bin.install "a", "b"` and `bin.install "a" => "b"`.
fn parse_bin_install(args: &str) -> Vec<InstallArtifact> {
    args.split(',')
        .filter_map(|part| {
            let mut sides = part.splitn(2, "=>").map(first_string);
            let source = sides.next().flatten()?;
            match sides.next().flatten() {
                Some(target) => Some(InstallArtifact::renamed(source, target)),
                None => Some(InstallArtifact::new(source)),
            }
        })
        .collect()
}

fn first_string(text: &str) -> Option<String> {
    let caps = STRING_RE.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// `GitIgnore` -> `git-ignore`.
fn kebab_case(class_name: &str) -> String {
    let mut out = String::with_capacity(class_name.len() + 4);
    for (i, ch) in class_name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIGNORE_011: &str = r#"class Kignore < Formula
  desc "Easily add items to .gitignore and cleanup afterwards"
  homepage "https://github.com/kjuulh/gitignore"
  version '0.1.1'
  license "MIT"

  if OS.mac?
    url "https://github.com/kjuulh/kignore/releases/download/#{version}/kignore-#{version}-x86_64-apple-darwin.tar.gz"
    sha256 ""
  end

  def install
    bin.install "kignore"
  end
end
"#;

    const KIGNORE_013: &str = r##"class Kignore < Formula
  desc "Easily add items to .gitignore and cleanup afterwards"
  homepage "https://github.com/kjuulh/gitignore"
  version '0.1.3'
  license "MIT"

  on_macos do
    if Hardware::CPU.intel?
      url "https://github.com/kjuulh/kignore/releases/download/#{version}/kignore-#{version}-x86_64-apple-darwin.tar.gz"
      sha256 "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
    end
    if Hardware::CPU.arm?
      url "https://github.com/kjuulh/kignore/releases/download/#{version}/kignore-#{version}-universal-apple-darwin.tar.gz"
      sha256 "fcde2b2edba56bf408601fb721fe9b5c338d10ee429ea04fae5511b68fbf8fb9"
    end
  end

  def install
    bin.install "kignore"
    bin.install "git-ignore"
    bin.install "git-ignore" => "git-kignore"
  end

  test do
    system "#{bin}/kignore", "--help"
  end
end
"##;

    #[test]
    fn imports_first_formula() {
        let d = parse_formula(KIGNORE_011).unwrap();
        assert_eq!(d.package.name, "kignore");
        assert_eq!(d.package.version, "0.1.1");
        assert_eq!(d.package.license, "MIT");
        assert_eq!(d.platforms.len(), 1);

        let p = &d.platforms[0];
        assert_eq!(p.os, Os::MacOs);
        assert_eq!(p.arch, Some(Arch::X86_64));
        assert_eq!(
            p.url,
            "https://github.com/kjuulh/kignore/releases/download/{version}/kignore-{version}-x86_64-apple-darwin.tar.gz"
        );
        assert!(p.sha256.is_empty());
        assert_eq!(d.install, vec![InstallArtifact::new("kignore")]);
    }

    #[test]
    fn imports_nested_guards_and_renames() {
        let d = parse_formula(KIGNORE_013).unwrap();
        assert_eq!(d.platforms.len(), 2);
        assert_eq!(d.platforms[0].arch, Some(Arch::X86_64));
        assert_eq!(d.platforms[1].os, Os::MacOs);
        assert_eq!(d.platforms[1].arch, Some(Arch::Arm64));
        assert_eq!(
            d.install,
            vec![
                InstallArtifact::new("kignore"),
                InstallArtifact::new("git-ignore"),
                InstallArtifact::renamed("git-ignore", "git-kignore"),
            ]
        );
    }

    #[test]
    fn imported_descriptor_round_trips_as_toml() {
        let d = parse_formula(KIGNORE_013).unwrap();
        let reparsed = Descriptor::parse(&d.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed, d);
    }

    #[test]
    fn multiple_install_arguments() {
        let artifacts = parse_bin_install(r#" "kignore", 'git-ignore'"#);
        assert_eq!(
            artifacts,
            vec![
                InstallArtifact::new("kignore"),
                InstallArtifact::new("git-ignore")
            ]
        );
    }

    #[test]
    fn class_names() {
        assert_eq!(kebab_case("Kignore"), "kignore");
        assert_eq!(kebab_case("GitIgnore"), "git-ignore");
        assert_eq!(kebab_case("Python3"), "python3");
    }

    #[test]
    fn missing_pieces_are_errors() {
        assert!(matches!(
            parse_formula("desc \"x\"\n"),
            Err(ImportError::Missing(_))
        ));

        let no_install = KIGNORE_011.replace("bin.install \"kignore\"", "");
        assert!(matches!(
            parse_formula(&no_install),
            Err(ImportError::Missing("bin.install"))
        ));

        let extra_end = format!("{KIGNORE_011}end\n");
        assert!(matches!(
            parse_formula(&extra_end),
            Err(ImportError::Syntax { line: 16, .. })
        ));
    }
}
