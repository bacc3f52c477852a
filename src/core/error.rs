use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the minem core.
/// Every module returns `Result<T, MinemError>`.
#[derive(Debug, Error)]
pub enum MinemError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("version manifest unavailable at {url}: {reason}")]
    ManifestUnavailable { url: String, reason: String },

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Version resolution ──────────────────────────────
    #[error("unable to find minecraft version '{0}'")]
    VersionNotFound(String),

    #[error("unable to find a verifiable server download for version {0}")]
    ArtifactNotAvailable(String),

    // ── Integrity ───────────────────────────────────────
    #[error("expected server hash to equal {expected}, but got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // ── Config ──────────────────────────────────────────
    #[error("no minem.json was found at {0:?}, use 'minem init' to create one")]
    ConfigMissing(PathBuf),

    #[error("minem.json at {path:?} is malformed: {source}")]
    ConfigMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no server named '{0}' in the global server list")]
    ServerNotFound(String),

    // ── Launch ──────────────────────────────────────────
    #[error("{path:?} wasn't found, use 'minem download latest' to download the latest version")]
    ArtifactMissing { path: PathBuf },

    #[error("java runtime not found: {0}")]
    RuntimeNotFound(String),

    #[error("failed to spawn server process: {source}")]
    SpawnFailed { source: std::io::Error },

    // ── Properties ──────────────────────────────────────
    #[error("setting '{0}' was not found in server.properties")]
    SettingNotFound(String),

    #[error("'{value}' is not a valid value for '{key}': only letters, digits and spaces are allowed")]
    InvalidSettingValue { key: String, value: String },

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type MinemResult<T> = Result<T, MinemError>;

impl From<std::io::Error> for MinemError {
    fn from(source: std::io::Error) -> Self {
        MinemError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl MinemError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MinemError::Io {
            path: path.into(),
            source,
        }
    }
}
