use std::io::Read;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::ProgressBar;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::error::{MinemError, MinemResult};

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming, SHA-1 validated downloader.
///
/// Bytes go to a private temporary file next to the destination and only
/// reach the destination path through an atomic rename once the checksum
/// matches. The temporary file is removed on every other outcome.
pub struct Downloader {
    client: Client,
    /// Optional progress bar ticked per received chunk.
    progress: Option<ProgressBar>,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Download `url` to `dest`, replacing it only if the payload's SHA-1
    /// equals `sha1_expected` (case-insensitive hex).
    ///
    /// Creates the destination directory as needed. The progress bar, if
    /// any, is finished and cleared whatever the outcome.
    pub async fn download_verified(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: &str,
    ) -> MinemResult<PathBuf> {
        let result = self.publish_verified(url, dest, sha1_expected).await;
        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
        result
    }

    async fn publish_verified(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: &str,
    ) -> MinemResult<PathBuf> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| MinemError::io(&dir, e))?;

        let tmp = tempfile::Builder::new()
            .prefix(".minem-")
            .suffix(".part")
            .tempfile_in(&dir)
            .map_err(|e| MinemError::io(&dir, e))?;
        debug!("Streaming {} into {:?}", url, tmp.path());

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MinemError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let (Some(pb), Some(len)) = (&self.progress, response.content_length()) {
            pb.set_length(len);
        }

        self.stream_into(response, &tmp).await?;

        let tmp_path = tmp.path().to_path_buf();
        let actual = tokio::task::spawn_blocking(move || sha1_file(&tmp_path))
            .await
            .map_err(|e| MinemError::Other(format!("Task join error: {e}")))??;

        if !actual.eq_ignore_ascii_case(sha1_expected) {
            // Removing the temp file here leaves any previous artifact in place.
            let _ = tmp.close();
            return Err(MinemError::IntegrityMismatch {
                expected: sha1_expected.to_string(),
                actual,
            });
        }
        info!("server hash verified");

        // A failed persist hands the temp file back inside the error; dropping
        // it deletes the file.
        tmp.persist(dest)
            .map_err(|e| MinemError::io(dest, e.error))?;

        debug!("Published {:?}", dest);
        Ok(dest.to_path_buf())
    }

    async fn stream_into(
        &self,
        response: reqwest::Response,
        tmp: &NamedTempFile,
    ) -> MinemResult<()> {
        let tmp_path = tmp.path();
        let handle = tmp
            .as_file()
            .try_clone()
            .map_err(|e| MinemError::io(tmp_path, e))?;
        let mut file = tokio::fs::File::from_std(handle);

        let mut stream = response.bytes_stream();
        let mut downloaded = 0_u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| MinemError::io(tmp_path, e))?;

            downloaded = downloaded.saturating_add(chunk.len() as u64);
            if let Some(pb) = &self.progress {
                pb.inc(chunk.len() as u64);
            }
        }

        file.flush().await.map_err(|e| MinemError::io(tmp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| MinemError::io(tmp_path, e))?;

        debug!("Received {} bytes", downloaded);
        Ok(())
    }
}

/// Hex-encoded SHA-1 of a file, read in fixed-size chunks.
pub fn sha1_file(path: &Path) -> MinemResult<String> {
    let mut file = std::fs::File::open(path).map_err(|e| MinemError::io(path, e))?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).map_err(|e| MinemError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
