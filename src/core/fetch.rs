// ─── Artifact Fetcher ───
// Two-hop lookup (manifest → version metadata) followed by a verified
// download of the server jar.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::info;

use crate::core::downloader::Downloader;
use crate::core::error::{MinemError, MinemResult};
use crate::core::version::{VersionManifest, VersionMetadata};

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    /// Concrete version id the selector resolved to.
    pub version: String,
    pub path: PathBuf,
    pub sha1: String,
}

pub struct ArtifactFetcher {
    client: reqwest::Client,
    manifest_url: String,
    progress: Option<ProgressBar>,
}

impl ArtifactFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            manifest_url: VersionManifest::endpoint(),
            progress: None,
        }
    }

    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Resolve `selector`, download the server jar and publish it as
    /// `dest_dir/file_name` once its SHA-1 matches the metadata.
    pub async fn fetch(
        &self,
        selector: &str,
        dest_dir: &Path,
        file_name: &str,
    ) -> MinemResult<FetchedArtifact> {
        // 1. Fetch version manifest
        let manifest = VersionManifest::fetch(&self.client, &self.manifest_url).await?;

        // 2. Resolve alias and find the matching entry
        let entry = manifest.resolve(selector)?;
        let version = entry.id.clone();

        // 3. Fetch the per-version metadata
        let metadata = VersionMetadata::fetch(&self.client, &entry.url).await?;

        // 4. Pick the server download
        let artifact = metadata
            .server_artifact()
            .ok_or_else(|| MinemError::ArtifactNotAvailable(version.clone()))?;

        info!(
            "downloading minecraft server version {} as {}",
            version, file_name
        );

        // 5-7. Stream, verify and publish
        let mut downloader = Downloader::new(self.client.clone());
        if let Some(pb) = &self.progress {
            downloader = downloader.with_progress(pb.clone());
        }
        let path = downloader
            .download_verified(&artifact.url, &dest_dir.join(file_name), &artifact.sha1)
            .await?;

        Ok(FetchedArtifact {
            version,
            path,
            sha1: artifact.sha1,
        })
    }
}
