//! Release manifest validation.
//!
//! Everything here is pure: no network, no filesystem. The install flow runs
//! these checks before it touches either, so a malformed descriptor never
//! causes a request and an unsupported host never causes a write.

use std::collections::HashSet;

use pour_schema::{Checksum, Descriptor, Platform, PlatformRelease, SchemaError};
use reqwest::Url;

use crate::error::InstallError;

/// Non-fatal findings reported by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The selected platform block has an empty `sha256`, so the artifact
    /// cannot be verified.
    ChecksumMissing,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChecksumMissing => {
                f.write_str("ChecksumMissing: sha256 is empty, integrity verification is disabled")
            }
        }
    }
}

/// Outcome of a successful validation for one host.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Parsed release version.
    pub version: semver::Version,
    /// The platform block selected for the host.
    pub platform: PlatformRelease,
    /// Fully resolved download URL.
    pub url: Url,
    /// Declared checksum of the selected block.
    pub checksum: Checksum,
    /// Findings that do not stop validation.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Returns `true` if the artifact will be checked against a digest.
    pub fn is_verifiable(&self) -> bool {
        !self.checksum.is_missing()
    }
}

/// Check every descriptor field that does not depend on the host.
///
/// # Errors
///
/// Returns [`InstallError::InvalidField`] naming the first offending field.
pub fn validate_fields(descriptor: &Descriptor) -> Result<semver::Version, InstallError> {
    let pkg = &descriptor.package;

    pkg.name.validate()?;
    require("package.desc", &pkg.desc)?;
    require("package.homepage", &pkg.homepage)?;
    require("package.license", &pkg.license)?;
    let version = pkg.version.parse_triple()?;

    let homepage = Url::parse(&pkg.homepage).map_err(|e| {
        SchemaError::field("package.homepage", format!("'{}': {e}", pkg.homepage))
    })?;
    if !matches!(homepage.scheme(), "http" | "https") {
        return Err(SchemaError::field(
            "package.homepage",
            format!("'{}' must be an http(s) URL", pkg.homepage),
        )
        .into());
    }

    for platform in &descriptor.platforms {
        require("platform.url", &platform.url)?;
        platform.checksum()?;
    }

    if descriptor.install.is_empty() {
        return Err(SchemaError::field("install", "at least one artifact is required").into());
    }
    let mut targets = HashSet::new();
    for artifact in &descriptor.install {
        plain_file_name("install.source", &artifact.source)?;
        plain_file_name("install.target", artifact.target_name())?;
        if !targets.insert(artifact.target_name()) {
            return Err(SchemaError::field(
                "install.target",
                format!("'{}' is installed more than once", artifact.target_name()),
            )
            .into());
        }
    }

    Ok(version)
}

/// The platform gate: pick the first block whose guard holds on `host`.
///
/// # Errors
///
/// Returns [`InstallError::UnsupportedPlatform`] if no block matches,
/// including when the descriptor declares none.
pub fn select_platform<'a>(
    descriptor: &'a Descriptor,
    host: &Platform,
) -> Result<&'a PlatformRelease, InstallError> {
    descriptor
        .platform_for(host)
        .ok_or_else(|| InstallError::UnsupportedPlatform {
            name: descriptor.package.name.clone(),
            host: host.to_string(),
            supported: supported_platforms(descriptor),
        })
}

/// The host the platform gate runs against.
///
/// `host` is `None` when the running system is not one a descriptor can name
/// and no override was given.
///
/// # Errors
///
/// Returns [`InstallError::UnsupportedPlatform`] for an unknown host.
pub fn require_host(
    descriptor: &Descriptor,
    host: Option<Platform>,
) -> Result<Platform, InstallError> {
    host.ok_or_else(|| InstallError::UnsupportedPlatform {
        name: descriptor.package.name.clone(),
        host: format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        supported: supported_platforms(descriptor),
    })
}

fn supported_platforms(descriptor: &Descriptor) -> String {
    if descriptor.platforms.is_empty() {
        return "none".to_string();
    }
    descriptor
        .platforms
        .iter()
        .map(|p| format!("{}/{}", p.os, p.arch.map_or("any", |a| a.as_str())))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Substitute placeholders in a platform block's URL template.
///
/// Supported placeholders: `{version}`, `{name}`, `{os}` (`macos`),
/// `{arch}` (`x86_64` / `aarch64`) and `{target}` (`x86_64-apple-darwin`).
/// Ruby-style `#{version}` is accepted as `{version}`. The block's own arch
/// is used when it names one, otherwise the host's.
///
/// # Errors
///
/// Returns [`InstallError::UnresolvedUrl`] if a placeholder is left over or
/// the result is not an absolute `http(s)` URL with a host.
pub fn resolve_url(
    descriptor: &Descriptor,
    release: &PlatformRelease,
    host: &Platform,
) -> Result<Url, InstallError> {
    let arch = release.arch.unwrap_or(host.arch);
    let target = Platform::new(release.os, arch).target_triple();

    let resolved = release
        .url
        .trim()
        .replace("#{", "{")
        .replace("{version}", descriptor.package.version.as_str())
        .replace("{name}", descriptor.package.name.as_str())
        .replace("{os}", release.os.as_str())
        .replace("{arch}", arch.rust_name())
        .replace("{target}", &target);

    let unresolved = |reason: String| InstallError::UnresolvedUrl {
        url: resolved.clone(),
        reason,
    };

    if let Some(start) = resolved.find('{') {
        let end = resolved[start..]
            .find('}')
            .map_or(resolved.len(), |i| start + i + 1);
        return Err(unresolved(format!(
            "unknown placeholder {}",
            &resolved[start..end]
        )));
    }

    let url = Url::parse(&resolved).map_err(|e| unresolved(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(unresolved(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(unresolved("missing host".to_string()));
    }
    Ok(url)
}

/// Interpret a block's declared `sha256`.
///
/// An empty value is not an error here; it comes back with
/// [`ValidationWarning::ChecksumMissing`] and the install flow decides.
///
/// # Errors
///
/// Returns [`InstallError::InvalidField`] for a value that is neither empty
/// nor 64 hex characters.
pub fn check_checksum(
    release: &PlatformRelease,
) -> Result<(Checksum, Option<ValidationWarning>), InstallError> {
    let checksum = release.checksum()?;
    let warning = checksum
        .is_missing()
        .then_some(ValidationWarning::ChecksumMissing);
    Ok((checksum, warning))
}

/// Run every check for `host` and collect warnings.
///
/// Field checks come first so a malformed descriptor fails with
/// `InvalidField` regardless of the host.
///
/// # Errors
///
/// Returns the first failure from [`validate_fields`], [`select_platform`]
/// or [`resolve_url`].
pub fn validate(descriptor: &Descriptor, host: &Platform) -> Result<ValidationReport, InstallError> {
    let version = validate_fields(descriptor)?;
    let platform = select_platform(descriptor, host)?;
    let url = resolve_url(descriptor, platform, host)?;
    let (checksum, warning) = check_checksum(platform)?;
    let warnings = warning.into_iter().collect();

    Ok(ValidationReport {
        version,
        platform: platform.clone(),
        url,
        checksum,
        warnings,
    })
}

fn require(field: &'static str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        Err(SchemaError::field(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn plain_file_name(field: &'static str, name: &str) -> Result<(), SchemaError> {
    require(field, name)?;
    if name == "." || name == ".." || name.contains(['/', '\\']) || name.contains('\0') {
        return Err(SchemaError::field(
            field,
            format!("'{name}' must be a plain file name"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pour_schema::{Arch, FailureReason, InstallArtifact, Os};

    const DIGEST: &str = "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae";

    fn descriptor(version: &str, sha256: &str) -> Descriptor {
        Descriptor::parse(&format!(
            r#"
[package]
name = "kignore"
desc = "Easily add items to .gitignore and cleanup afterwards"
homepage = "https://github.com/kjuulh/gitignore"
version = "{version}"
license = "MIT"

[[platform]]
os = "macos"
arch = "x86_64"
url = "https://github.com/kjuulh/kignore/releases/download/{{version}}/kignore-{{version}}-x86_64-apple-darwin.tar.gz"
sha256 = "{sha256}"

[[install]]
source = "kignore"
"#
        ))
        .unwrap()
    }

    fn mac_intel() -> Platform {
        Platform::new(Os::MacOs, Arch::X86_64)
    }

    #[test]
    fn valid_descriptor_passes() {
        let report = validate(&descriptor("0.1.3", DIGEST), &mac_intel()).unwrap();
        assert_eq!(report.version, semver::Version::new(0, 1, 3));
        assert_eq!(
            report.url.as_str(),
            "https://github.com/kjuulh/kignore/releases/download/0.1.3/kignore-0.1.3-x86_64-apple-darwin.tar.gz"
        );
        assert!(report.warnings.is_empty());
        assert!(report.is_verifiable());
    }

    #[test]
    fn empty_checksum_is_flagged() {
        let report = validate(&descriptor("0.1.1", ""), &mac_intel()).unwrap();
        assert_eq!(report.warnings, vec![ValidationWarning::ChecksumMissing]);
        assert!(!report.is_verifiable());
    }

    #[test]
    fn checksum_states() {
        let d = descriptor("0.1.3", &DIGEST.to_uppercase());
        let (checksum, warning) = check_checksum(&d.platforms[0]).unwrap();
        assert_eq!(checksum.digest().unwrap().as_str(), DIGEST);
        assert!(warning.is_none());

        let d = descriptor("0.1.1", "");
        let (checksum, warning) = check_checksum(&d.platforms[0]).unwrap();
        assert!(checksum.is_missing());
        assert_eq!(warning, Some(ValidationWarning::ChecksumMissing));
    }

    #[test]
    fn malformed_version_is_invalid_field() {
        let err = validate(&descriptor("abc", DIGEST), &mac_intel()).unwrap_err();
        assert_eq!(err.reason(), FailureReason::InvalidField);
        assert!(err.to_string().contains("package.version"));
    }

    #[test]
    fn malformed_checksum_is_invalid_field() {
        let err = validate_fields(&descriptor("0.1.3", "not-a-digest")).unwrap_err();
        assert_eq!(err.reason(), FailureReason::InvalidField);
    }

    #[test]
    fn empty_required_fields_are_rejected() {
        let mut d = descriptor("0.1.3", DIGEST);
        d.package.license = String::new();
        let err = validate_fields(&d).unwrap_err();
        assert!(err.to_string().contains("package.license"));

        let mut d = descriptor("0.1.3", DIGEST);
        d.package.homepage = "not a url".into();
        assert_eq!(
            validate_fields(&d).unwrap_err().reason(),
            FailureReason::InvalidField
        );
    }

    #[test]
    fn install_entries_are_checked() {
        let mut d = descriptor("0.1.3", DIGEST);
        d.install.clear();
        assert!(validate_fields(&d).is_err());

        let mut d = descriptor("0.1.3", DIGEST);
        d.install.push(InstallArtifact::new("../escape"));
        assert!(validate_fields(&d).is_err());

        let mut d = descriptor("0.1.3", DIGEST);
        d.install.push(InstallArtifact::renamed("git-ignore", "kignore"));
        let err = validate_fields(&d).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        let mut d = descriptor("0.1.3", DIGEST);
        d.install.push(InstallArtifact::new("git-ignore"));
        d.install
            .push(InstallArtifact::renamed("git-ignore", "git-kignore"));
        assert!(validate_fields(&d).is_ok());
    }

    #[test]
    fn other_hosts_are_unsupported() {
        let d = descriptor("0.1.3", DIGEST);
        let err = validate(&d, &Platform::new(Os::Linux, Arch::X86_64)).unwrap_err();
        assert_eq!(err.reason(), FailureReason::UnsupportedPlatform);
        assert!(err.to_string().contains("macos/x86_64"));

        let mut bare = d.clone();
        bare.platforms.clear();
        let err = select_platform(&bare, &mac_intel()).unwrap_err();
        assert_eq!(err.reason(), FailureReason::UnsupportedPlatform);
    }

    #[test]
    fn unknown_host_is_unsupported() {
        let d = descriptor("0.1.3", DIGEST);
        let err = require_host(&d, None).unwrap_err();
        assert_eq!(err.reason(), FailureReason::UnsupportedPlatform);
        assert!(err.to_string().contains(std::env::consts::OS));
        assert!(err.to_string().contains("macos/x86_64"));

        assert_eq!(require_host(&d, Some(mac_intel())).unwrap(), mac_intel());
    }

    #[test]
    fn invalid_version_wins_over_platform() {
        let d = descriptor("abc", DIGEST);
        let err = validate(&d, &Platform::new(Os::Linux, Arch::Arm64)).unwrap_err();
        assert_eq!(err.reason(), FailureReason::InvalidField);
    }

    #[test]
    fn url_placeholders() {
        let mut d = descriptor("1.2.3", DIGEST);
        d.platforms[0].arch = None;
        d.platforms[0].url = "https://dl.example.com/#{version}/{name}-{target}-{os}-{arch}.tar.gz".into();
        let host = Platform::new(Os::MacOs, Arch::Arm64);
        let url = resolve_url(&d, &d.platforms[0], &host).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dl.example.com/1.2.3/kignore-aarch64-apple-darwin-macos-aarch64.tar.gz"
        );
    }

    #[test]
    fn unresolved_urls() {
        let mut d = descriptor("0.1.3", DIGEST);
        let host = mac_intel();

        d.platforms[0].url = "https://example.com/{revision}.tar.gz".into();
        let err = resolve_url(&d, &d.platforms[0], &host).unwrap_err();
        assert_eq!(err.reason(), FailureReason::UnresolvedUrl);
        assert!(err.to_string().contains("{revision}"));

        d.platforms[0].url = "releases/{version}.tar.gz".into();
        assert_eq!(
            resolve_url(&d, &d.platforms[0], &host).unwrap_err().reason(),
            FailureReason::UnresolvedUrl
        );

        d.platforms[0].url = "ftp://example.com/{version}.tar.gz".into();
        assert_eq!(
            resolve_url(&d, &d.platforms[0], &host).unwrap_err().reason(),
            FailureReason::UnresolvedUrl
        );
    }
}
