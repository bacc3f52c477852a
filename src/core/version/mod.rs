pub mod manifest;
pub mod version_file;

pub use manifest::{LatestVersions, VersionEntry, VersionManifest};
pub use version_file::{DownloadArtifact, ServerArtifact, VersionDownloads, VersionMetadata};
