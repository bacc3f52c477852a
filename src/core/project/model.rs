use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JVM heap bounds, passed verbatim to `-Xms` / `-Xmx` (e.g. "1G").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryBounds {
    pub min: String,
    pub max: String,
}

/// Project-local server configuration persisted as `minem.json`.
///
/// Read once at the start of every command and never written back, except
/// by `init` which scaffolds the default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// File name of the server jar inside `server_dir`.
    pub server_file: String,
    /// Install directory, relative to the project root.
    pub server_dir: String,
    pub mem: MemoryBounds,
    /// Extra arguments passed to the server after `nogui`.
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra JVM arguments placed before `-jar`.
    #[serde(default)]
    pub java_args: Vec<String>,
    /// Explicit Java binary; `java` is looked up on PATH when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_file: "server.jar".into(),
            server_dir: "server".into(),
            mem: MemoryBounds {
                min: "1G".into(),
                max: "2G".into(),
            },
            args: Vec::new(),
            java_args: Vec::new(),
            java_path: None,
        }
    }
}
