use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{MinemError, MinemResult};

pub const REGISTRY_FILE: &str = ".minem.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerStatus::Online => write!(f, "online"),
            ServerStatus::Offline => write!(f, "offline"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerEntry {
    pub name: String,
    pub path: PathBuf,
    pub status: ServerStatus,
}

/// Contents of `~/.minem.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

impl Registry {
    pub fn find(&self, name: &str) -> Option<&ServerEntry> {
        self.servers.iter().find(|s| s.name == name)
    }
}

/// The registry file on disk. Every operation re-reads it.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.minem.json`.
    pub fn default_location() -> MinemResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| MinemError::Other("unable to locate the home directory".into()))?;
        Ok(Self::new(home.join(REGISTRY_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file as `{}` if it does not exist yet.
    pub async fn ensure_exists(&self) -> MinemResult<()> {
        if !self.path.exists() {
            debug!("Creating global registry at {:?}", self.path);
            tokio::fs::write(&self.path, "{}")
                .await
                .map_err(|e| MinemError::io(&self.path, e))?;
        }
        Ok(())
    }

    pub async fn load(&self) -> MinemResult<Registry> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Registry::default()),
            Err(e) => return Err(MinemError::io(&self.path, e)),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn save(&self, registry: &Registry) -> MinemResult<()> {
        let json = serde_json::to_string_pretty(registry)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| MinemError::io(&self.path, e))
    }

    /// Add `name` → `path` as offline. Returns `false` if the name is taken.
    pub async fn register(&self, name: &str, path: &Path) -> MinemResult<bool> {
        let mut registry = self.load().await?;
        if registry.find(name).is_some() {
            return Ok(false);
        }
        registry.servers.push(ServerEntry {
            name: name.to_string(),
            path: path.to_path_buf(),
            status: ServerStatus::Offline,
        });
        self.save(&registry).await?;
        Ok(true)
    }

    pub async fn lookup(&self, name: &str) -> MinemResult<ServerEntry> {
        self.load()
            .await?
            .find(name)
            .cloned()
            .ok_or_else(|| MinemError::ServerNotFound(name.to_string()))
    }

    /// Update the status of the entry registered at `path`, if any.
    pub async fn set_status_for_path(&self, path: &Path, status: ServerStatus) -> MinemResult<()> {
        let mut registry = self.load().await?;
        let target = canonical(path);
        let Some(entry) = registry
            .servers
            .iter_mut()
            .find(|s| canonical(&s.path) == target)
        else {
            debug!("{:?} is not in the global registry", path);
            return Ok(());
        };
        if entry.status == status {
            return Ok(());
        }
        entry.status = status;
        if let Err(e) = self.save(&registry).await {
            warn!("unable to update server status: {}", e);
        }
        Ok(())
    }
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_empty_and_ensure_writes_braces() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join(REGISTRY_FILE));

        assert_eq!(store.load().await.unwrap(), Registry::default());
        store.ensure_exists().await.unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{}");
        assert!(store.load().await.unwrap().servers.is_empty());
    }

    #[tokio::test]
    async fn register_is_unique_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join(REGISTRY_FILE));

        assert!(store.register("survival", dir.path()).await.unwrap());
        assert!(!store.register("survival", Path::new("/elsewhere")).await.unwrap());

        let entry = store.lookup("survival").await.unwrap();
        assert_eq!(entry.path, dir.path());
        assert_eq!(entry.status, ServerStatus::Offline);
    }

    #[tokio::test]
    async fn lookup_unknown_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join(REGISTRY_FILE));
        let err = store.lookup("creative").await.unwrap_err();
        assert!(matches!(err, MinemError::ServerNotFound(n) if n == "creative"));
    }

    #[tokio::test]
    async fn status_follows_path() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("survival");
        std::fs::create_dir(&project).unwrap();
        let store = RegistryStore::new(dir.path().join(REGISTRY_FILE));
        store.register("survival", &project).await.unwrap();

        store
            .set_status_for_path(&project, ServerStatus::Online)
            .await
            .unwrap();
        assert_eq!(
            store.lookup("survival").await.unwrap().status,
            ServerStatus::Online
        );

        store
            .set_status_for_path(&dir.path().join("other"), ServerStatus::Offline)
            .await
            .unwrap();
        assert_eq!(
            store.lookup("survival").await.unwrap().status,
            ServerStatus::Online
        );
    }

    #[test]
    fn reads_registry_written_by_older_versions() {
        let json = r#"{"servers":[{"name":"lobby","path":"/srv/lobby","status":"offline"}]}"#;
        let registry: Registry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.find("lobby").unwrap().path, PathBuf::from("/srv/lobby"));
    }
}
