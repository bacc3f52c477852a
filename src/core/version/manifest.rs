// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest and resolving
// the `latest` / `latest-snapshot` aliases against it.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::error::{MinemError, MinemResult};

pub const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Environment variable that points the fetcher at a mirror of the manifest.
pub const MANIFEST_URL_ENV: &str = "MINEM_MANIFEST_URL";

pub const LATEST_ALIAS: &str = "latest";
pub const LATEST_SNAPSHOT_ALIAS: &str = "latest-snapshot";

/// Top-level Mojang version manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// The manifest's alias table.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    /// Location of the per-version metadata document.
    pub url: String,
}

impl VersionManifest {
    /// Manifest endpoint, honouring the `MINEM_MANIFEST_URL` override.
    pub fn endpoint() -> String {
        std::env::var(MANIFEST_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| VERSION_MANIFEST_URL.to_string())
    }

    /// Fetch the version manifest. Never cached.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> MinemResult<Self> {
        info!("Fetching Minecraft version manifest...");
        let manifest: VersionManifest = get_document(client, url).await?;
        debug!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Map a selector to a concrete version id. Literal ids pass through.
    pub fn resolve_alias<'a>(&'a self, selector: &'a str) -> &'a str {
        match selector {
            LATEST_ALIAS => &self.latest.release,
            LATEST_SNAPSHOT_ALIAS => &self.latest.snapshot,
            other => other,
        }
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Resolve a selector (alias or literal id) to its manifest entry.
    ///
    /// An alias pointing at an id missing from `versions` is treated the same
    /// as an unknown literal id.
    pub fn resolve(&self, selector: &str) -> MinemResult<&VersionEntry> {
        let id = self.resolve_alias(selector);
        self.find_version(id)
            .ok_or_else(|| MinemError::VersionNotFound(id.to_string()))
    }
}

/// GET a JSON document from the distribution endpoint.
///
/// Transport failures, non-2xx statuses and undecodable bodies all surface
/// as `ManifestUnavailable`.
pub(crate) async fn get_document<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> MinemResult<T> {
    let unavailable = |reason: String| MinemError::ManifestUnavailable {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("HTTP {}", status.as_u16())));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| unavailable(e.to_string()))
}
