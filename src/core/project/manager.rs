use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::model::ServerConfig;
use crate::core::error::{MinemError, MinemResult};

pub const CONFIG_FILE: &str = "minem.json";
pub const EULA_FILE: &str = "eula.txt";
pub const PROPERTIES_FILE: &str = "server.properties";
pub const EULA_URL: &str = "https://account.mojang.com/documents/minecraft_eula";

/// A project directory holding `minem.json` and its loaded config.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ServerConfig,
}

impl Project {
    /// Load `minem.json` from `root`.
    pub async fn load(root: impl Into<PathBuf>) -> MinemResult<Self> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE);

        let raw = match tokio::fs::read_to_string(&config_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MinemError::ConfigMissing(config_path));
            }
            Err(e) => return Err(MinemError::io(config_path, e)),
        };

        let config: ServerConfig =
            serde_json::from_str(&raw).map_err(|source| MinemError::ConfigMalformed {
                path: config_path,
                source,
            })?;

        Ok(Self { root, config })
    }

    /// Scaffold a project at `root`: `minem.json`, the server directory and
    /// an accepted `eula.txt`. An existing `minem.json` is kept as is.
    pub async fn init(root: impl Into<PathBuf>) -> MinemResult<Self> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE);

        let project = if config_path.exists() {
            warn!("{} already exists, keeping it", CONFIG_FILE);
            Self::load(root).await?
        } else {
            info!("creating {}", CONFIG_FILE);
            let config = ServerConfig::default();
            let json = serde_json::to_string_pretty(&config)?;
            tokio::fs::write(&config_path, json)
                .await
                .map_err(|e| MinemError::io(&config_path, e))?;
            Self { root, config }
        };

        info!("creating server directory");
        let server_dir = project.server_dir();
        create_dir_safe(&server_dir).await?;

        info!("creating {}", EULA_FILE);
        info!("(you agree to this): {}", EULA_URL);
        let eula_path = server_dir.join(EULA_FILE);
        tokio::fs::write(&eula_path, "eula=true")
            .await
            .map_err(|e| MinemError::io(&eula_path, e))?;

        Ok(project)
    }

    /// Name the project is registered under: the root's final component.
    pub fn name(&self) -> String {
        let canonical = std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        canonical
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| canonical.to_string_lossy().to_string())
    }

    pub fn server_dir(&self) -> PathBuf {
        self.root.join(&self.config.server_dir)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.server_dir().join(&self.config.server_file)
    }

    pub fn properties_path(&self) -> PathBuf {
        self.server_dir().join(PROPERTIES_FILE)
    }
}

async fn create_dir_safe(path: &Path) -> MinemResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| MinemError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_without_config_is_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Project::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, MinemError::ConfigMissing(p) if p.ends_with(CONFIG_FILE)));
    }

    #[tokio::test]
    async fn load_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let err = Project::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, MinemError::ConfigMalformed { .. }));
    }

    #[tokio::test]
    async fn init_scaffolds_config_server_dir_and_eula() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::init(dir.path()).await.unwrap();

        assert_eq!(project.config, ServerConfig::default());
        assert!(dir.path().join(CONFIG_FILE).is_file());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("server").join(EULA_FILE)).unwrap(),
            "eula=true"
        );
        assert_eq!(
            project.artifact_path(),
            dir.path().join("server").join("server.jar")
        );

        let reloaded = Project::load(dir.path()).await.unwrap();
        assert_eq!(reloaded.config, project.config);
    }

    #[tokio::test]
    async fn init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"serverFile":"paper.jar","serverDir":"srv","mem":{"min":"2G","max":"4G"}}"#,
        )
        .unwrap();

        let project = Project::init(dir.path()).await.unwrap();
        assert_eq!(project.config.server_file, "paper.jar");
        assert!(dir.path().join("srv").join(EULA_FILE).is_file());
    }
}
