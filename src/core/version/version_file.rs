// ─── Version File ───
// Parses the per-version metadata document down to the server download.

use serde::Deserialize;
use tracing::debug;

use crate::core::error::MinemResult;

use super::manifest::get_document;

/// The parts of a Mojang version JSON that matter for a dedicated server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionMetadata {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub server: Option<DownloadArtifact>,
}

/// Raw download descriptor; every field may be missing upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadArtifact {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A server download that can be fetched and verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerArtifact {
    pub url: String,
    pub sha1: String,
    pub size: Option<u64>,
}

impl VersionMetadata {
    /// Fetch the metadata document a manifest entry points at.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> MinemResult<Self> {
        debug!("Fetching version metadata from {}", url);
        get_document(client, url).await
    }

    /// The server download, if this version publishes one with a checksum.
    ///
    /// A descriptor without `sha1` is reported as absent: unverifiable
    /// binaries are never downloaded.
    pub fn server_artifact(&self) -> Option<ServerArtifact> {
        let server = self.downloads.as_ref()?.server.as_ref()?;
        let url = server.url.as_deref().filter(|u| !u.is_empty())?;
        let sha1 = server.sha1.as_deref().filter(|s| !s.is_empty())?;
        Some(ServerArtifact {
            url: url.to_string(),
            sha1: sha1.to_string(),
            size: server.size,
        })
    }
}
