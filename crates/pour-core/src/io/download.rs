//! Async download with streaming SHA256 and progress reporting.
//!
//! The digest is computed while the body is written to disk, so the
//! artifact is read exactly once. Comparing it with the declared checksum is
//! left to the caller (see `flow::FetchedRelease::verify`).

use std::path::{Path, PathBuf};

use futures::StreamExt;
use pour_schema::{PackageName, Version};
use reqwest::{Client, StatusCode, Url};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::Reporter;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A downloaded file and the digest of its bytes.
#[derive(Debug, Clone)]
pub struct Downloaded {
    /// Where the bytes were written.
    pub path: PathBuf,
    /// Lowercase hex SHA256 of the bytes.
    pub sha256: String,
    /// Number of bytes written.
    pub size: u64,
}

/// Request for a download operation
pub struct DownloadRequest<'a, R: Reporter> {
    pub client: &'a Client,
    pub pkg_name: &'a PackageName,
    pub version: &'a Version,
    pub url: &'a Url,
    pub dest: &'a Path,
    pub reporter: &'a R,
}

impl<R: Reporter> std::fmt::Debug for DownloadRequest<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadRequest")
            .field("pkg_name", self.pkg_name)
            .field("version", self.version)
            .field("url", &self.url.as_str())
            .field("dest", &self.dest)
            .finish_non_exhaustive()
    }
}

impl<'a, R: Reporter> DownloadRequest<'a, R> {
    pub fn new(
        client: &'a Client,
        pkg_name: &'a PackageName,
        version: &'a Version,
        url: &'a Url,
        dest: &'a Path,
        reporter: &'a R,
    ) -> Self {
        Self {
            client,
            pkg_name,
            version,
            url,
            dest,
            reporter,
        }
    }

    /// Execute the download, hashing as it streams.
    ///
    /// On any error the partially written file is removed.
    pub async fn execute(self) -> Result<Downloaded, DownloadError> {
        let dest = self.dest;
        match download_and_hash(self).await {
            Ok(downloaded) => Ok(downloaded),
            Err(e) => {
                tokio::fs::remove_file(dest).await.ok();
                Err(e)
            }
        }
    }
}

async fn download_and_hash<R: Reporter>(
    req: DownloadRequest<'_, R>,
) -> Result<Downloaded, DownloadError> {
    tracing::debug!(url = %req.url, dest = %req.dest.display(), "downloading");

    let response = req
        .client
        .get(req.url.clone())
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            url: req.url.to_string(),
            status,
        });
    }

    let total_size = response.content_length();
    req.reporter
        .downloading(req.pkg_name, req.version, 0, total_size);

    let mut file = File::create(req.dest).await?;
    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
        req.reporter
            .downloading(req.pkg_name, req.version, downloaded, total_size);
    }

    file.flush().await?;
    let sha256 = hex::encode(hasher.finalize());
    tracing::debug!(bytes = downloaded, %sha256, "download complete");

    Ok(Downloaded {
        path: req.dest.to_path_buf(),
        sha256,
        size: downloaded,
    })
}

/// Compute SHA256 of a file on disk (streaming).
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    use std::io::Read;

    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 65536]; // 64KB buffer

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullReporter;

    #[tokio::test]
    async fn streams_and_hashes() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/kignore.tar.gz")
            .with_status(200)
            .with_body("foo")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("kignore.tar.gz");
        let url = Url::parse(&format!("{}/kignore.tar.gz", server.url())).unwrap();
        let client = Client::new();
        let name = PackageName::new("kignore");
        let version = Version::new("0.1.3");

        let downloaded = DownloadRequest::new(&client, &name, &version, &url, &dest, &NullReporter)
            .execute()
            .await
            .unwrap();

        assert_eq!(
            downloaded.sha256,
            "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
        );
        assert_eq!(downloaded.size, 3);
        assert_eq!(std::fs::read(&dest).unwrap(), b"foo");
        assert_eq!(sha256_file(&dest).unwrap(), downloaded.sha256);
    }

    #[tokio::test]
    async fn http_errors_leave_nothing_behind() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing.tar.gz")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.tar.gz");
        let url = Url::parse(&format!("{}/missing.tar.gz", server.url())).unwrap();
        let client = Client::new();
        let name = PackageName::new("kignore");
        let version = Version::new("0.1.3");

        let err = DownloadRequest::new(&client, &name, &version, &url, &dest, &NullReporter)
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DownloadError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
        assert!(!dest.exists());
    }
}
