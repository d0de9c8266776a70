//! End-to-end tests driving the `pour` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// Test context with an isolated POUR_HOME
struct TestContext {
    temp_dir: TempDir,
    pour_home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let pour_home = temp_dir.path().join(".pour");
        Self {
            temp_dir,
            pour_home,
        }
    }

    fn pour_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_pour");
        let mut cmd = Command::new(bin_path);
        cmd.env("HOME", self.temp_dir.path());
        cmd.env("POUR_HOME", &self.pour_home);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("POUR_BIN_DIR");
        cmd.env_remove("POUR_OS");
        cmd.env_remove("POUR_ARCH");
        cmd.env_remove("POUR_ALLOW_UNVERIFIED");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run on a macOS/x86_64 target regardless of the test host.
    fn run(&self, args: &[&str]) -> Output {
        self.pour_cmd()
            .args(["--os", "macos", "--arch", "x86_64"])
            .args(args)
            .output()
            .expect("failed to run pour")
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("failed to write fixture");
        path
    }

    fn bin(&self) -> PathBuf {
        self.pour_home.join("bin")
    }
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../packages")
        .join(name)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn kignore_archive() -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, body) in [
        ("kignore", &b"#!/bin/sh\necho kignore\n"[..]),
        ("git-ignore", &b"#!/bin/sh\necho git-ignore\n"[..]),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append_data(&mut header, path, body).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn descriptor(version: &str, url: &str, sha256: &str) -> String {
    format!(
        r#"[package]
name = "kignore"
desc = "Easily add items to .gitignore and cleanup afterwards"
homepage = "https://github.com/kjuulh/gitignore"
version = "{version}"
license = "MIT"

[[platform]]
os = "macos"
arch = "x86_64"
url = "{url}"
sha256 = "{sha256}"

[[install]]
source = "kignore"

[[install]]
source = "git-ignore"

[[install]]
source = "git-ignore"
target = "git-kignore"
"#
    )
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.pour_cmd().arg("--help").output().expect("failed to run pour");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_check_flags_missing_checksum() {
    let ctx = TestContext::new();
    let path = fixture("kignore.toml");

    let output = ctx.run(&["check", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("kignore 0.1.1 is valid"));
    assert!(stderr(&output).contains("ChecksumMissing"));

    let output = ctx.run(&["check", "--strict", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error[ChecksumMissing]"));
}

#[test]
fn test_check_rejects_bad_version() {
    let ctx = TestContext::new();
    let path = ctx.write(
        "bad.toml",
        &descriptor("abc", "https://example.com/k.tar.gz", ""),
    );
    let output = ctx.run(&["check", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error[InvalidField]"));
    assert!(stderr(&output).contains("package.version"));
}

#[test]
fn test_check_on_other_platform() {
    let ctx = TestContext::new();
    let path = fixture("kignore.toml");
    let output = ctx
        .pour_cmd()
        .args(["--os", "linux", "--arch", "x86_64", "check", path.to_str().unwrap()])
        .output()
        .expect("failed to run pour");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error[UnsupportedPlatform]"));
}

#[test]
fn test_url_command() {
    let ctx = TestContext::new();
    let path = fixture("kignore.toml");
    let output = ctx.run(&["url", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "https://github.com/kjuulh/kignore/releases/download/0.1.1/kignore-0.1.1-x86_64-apple-darwin.tar.gz"
    );
}

#[test]
fn test_install_refuses_unverified_without_flag() {
    let ctx = TestContext::new();
    let path = fixture("kignore.toml");
    let output = ctx.run(&["install", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error[ChecksumMissing]"));
    assert!(!ctx.bin().exists());
}

#[test]
fn test_install_and_list() {
    let body = kignore_archive();
    let digest = hex::encode(Sha256::digest(&body));
    let mut server = mockito::Server::new();
    let mock = server
        .mock(
            "GET",
            "/releases/download/0.1.3/kignore-0.1.3-x86_64-apple-darwin.tar.gz",
        )
        .with_body(&body)
        .expect(1)
        .create();

    let ctx = TestContext::new();
    let url = format!(
        "{}/releases/download/{{version}}/kignore-{{version}}-x86_64-apple-darwin.tar.gz",
        server.url()
    );
    let path = ctx.write("kignore.toml", &descriptor("0.1.3", &url, &digest));

    let output = ctx.run(&["install", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    mock.assert();

    let mut installed: Vec<_> = std::fs::read_dir(ctx.bin())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    installed.sort();
    assert_eq!(installed, ["git-ignore", "git-kignore", "kignore"]);

    let output = ctx.run(&["list"]);
    assert!(output.status.success());
    let listed = stdout(&output);
    assert!(listed.contains("kignore"));
    assert!(listed.contains("0.1.3"));
    assert!(listed.contains("x86_64-apple-darwin"));
}

#[test]
fn test_install_tampered_archive() {
    let body = kignore_archive();
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/kignore.tar.gz")
        .with_body(&body)
        .create();

    let ctx = TestContext::new();
    let path = ctx.write(
        "kignore.toml",
        &descriptor(
            "0.1.3",
            &format!("{}/kignore.tar.gz", server.url()),
            &hex::encode(Sha256::digest(b"something else")),
        ),
    );

    let output = ctx.run(&["install", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error[ChecksumMismatch]"));
    // The failure is reported once, as the tagged error line.
    assert_eq!(err.matches("checksum mismatch").count(), 1, "stderr: {err}");
    assert!(!ctx.bin().exists());
}

#[test]
fn test_install_missing_archive_is_fetch_error() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/kignore.tar.gz")
        .with_status(404)
        .create();

    let ctx = TestContext::new();
    let path = ctx.write(
        "kignore.toml",
        &descriptor(
            "0.1.3",
            &format!("{}/kignore.tar.gz", server.url()),
            &hex::encode(Sha256::digest(b"x")),
        ),
    );

    let output = ctx.run(&["install", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error[FetchError]"), "stderr: {err}");
    assert_eq!(err.lines().count(), 1, "stderr: {err}");
    assert!(!ctx.bin().exists());
}

#[test]
fn test_packaged_history() {
    let ctx = TestContext::new();
    let path = fixture("kignore.history.toml");
    let path = path.to_str().unwrap();

    let output = ctx.run(&["history", path]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let listed = stdout(&output);
    assert!(listed.contains("3 releases"));
    for version in ["0.1.1", "0.1.2", "0.1.3"] {
        assert!(listed.contains(version), "missing {version}");
    }

    let output = ctx.run(&["check", path]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("kignore 0.1.3 is valid"));
    assert!(stderr(&output).contains("ChecksumMissing"));

    let output = ctx.run(&["install", "--dry-run", path]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error[ChecksumMissing]"));

    let output = ctx.run(&["install", "--dry-run", "--allow-unverified", path]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let plan = stdout(&output);
    assert!(plan.contains("kignore-0.1.3-x86_64-apple-darwin.tar.gz"));
    assert!(plan.contains("git-kignore"));
    assert!(!ctx.pour_home.exists());
}

#[test]
fn test_install_dry_run_makes_no_requests() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create();

    let ctx = TestContext::new();
    let path = ctx.write(
        "kignore.toml",
        &descriptor(
            "0.1.3",
            &format!("{}/kignore.tar.gz", server.url()),
            &hex::encode(Sha256::digest(b"x")),
        ),
    );

    let output = ctx.run(&["install", "--dry-run", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("git-kignore"));
    mock.assert();
    assert!(!ctx.pour_home.exists());
}

#[test]
fn test_hash_command() {
    let ctx = TestContext::new();
    let path = ctx.write("foo.txt", "foo");
    let output = ctx.run(&["hash", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output)
        .starts_with("2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae "));
}

#[test]
fn test_import_formula() {
    let ctx = TestContext::new();
    let out = ctx.temp_dir.path().join("out/kignore.toml");
    let output = ctx.run(&[
        "import",
        fixture("kignore-bin.rb").to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    // The imported descriptor resolves to the same URL as the hand-written one.
    let imported = ctx.run(&["url", out.to_str().unwrap()]);
    let reference = ctx.run(&["url", fixture("kignore.toml").to_str().unwrap()]);
    assert!(imported.status.success());
    assert_eq!(stdout(&imported), stdout(&reference));
}

#[test]
fn test_history_and_latest_install_target() {
    let ctx = TestContext::new();
    let release = |version: &str| {
        descriptor(version, "https://example.com/{version}/k.tar.gz", "")
            .replace("[package]", "[[release]]\n[release.package]")
            .replace("[[platform]]", "[[release.platform]]")
            .replace("[[install]]", "[[release.install]]")
    };
    let path = ctx.write(
        "history.toml",
        &format!("{}\n{}\n{}", release("0.1.1"), release("0.1.2"), release("0.1.3")),
    );

    let output = ctx.run(&["history", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("3 releases"));

    let output = ctx.run(&["url", path.to_str().unwrap()]);
    assert_eq!(stdout(&output).trim(), "https://example.com/0.1.3/k.tar.gz");

    let out_of_order = ctx.write(
        "bad-history.toml",
        &format!("{}\n{}", release("0.1.2"), release("0.1.1")),
    );
    let output = ctx.run(&["history", out_of_order.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_new_template() {
    let ctx = TestContext::new();
    let dir = ctx.temp_dir.path().join("pkgs");
    let output = ctx.run(&["new", "anvil", "-o", dir.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(dir.join("anvil.toml").is_file());

    let again = ctx.run(&["new", "anvil", "-o", dir.to_str().unwrap()]);
    assert!(!again.status.success());
}
