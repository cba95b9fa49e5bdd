use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ManagerError, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub commands: CommandsConfig,
    pub log: LogConfig,
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Prepended to every command that changes system state. Empty disables it.
    pub privilege_prefix: String,
    pub security_service: String,
    pub bluetooth_service: String,
    pub interface: String,
    pub hci_node: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub path: PathBuf,
    pub timestamps: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub shell: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            privilege_prefix: "sudo".to_string(),
            security_service: "hcsecd".to_string(),
            bluetooth_service: "bluetooth".to_string(),
            interface: "ubt0".to_string(),
            hci_node: "ubt0hci".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bluetooth_manager.log"),
            timestamps: false,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: "/bin/sh".to_string(),
        }
    }
}

impl ManagerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Create default config if not found
                tracing::debug!("No config at {}, using defaults", path.display());
                let config = Self::default();
                if let Ok(rendered) = toml::to_string_pretty(&config) {
                    let _ = fs::write(path, rendered);
                }
                Ok(config)
            }
            Err(source) => Err(ManagerError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| ManagerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults_and_writes_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hcman.toml");

        let config = ManagerConfig::load(&path).unwrap();
        assert_eq!(config, ManagerConfig::default());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("hcsecd"));
        assert_eq!(ManagerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn unreadable_file_is_reported_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hcman.toml");
        let original = b"[commands]\ninterface = \"ubt1\"\n# caf\xe9\n".to_vec();
        fs::write(&path, &original).unwrap();

        let err = ManagerConfig::load(&path).unwrap_err();

        assert!(matches!(err, ManagerError::ConfigRead { .. }));
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn directory_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = ManagerConfig::load(dir.path()).unwrap_err();

        assert!(matches!(err, ManagerError::ConfigRead { .. }));
        assert!(dir.path().is_dir());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hcman.toml");
        fs::write(&path, "[commands]\ninterface = \"ubt1\"\nhci_node = \"ubt1hci\"\n").unwrap();

        let config = ManagerConfig::load(&path).unwrap();
        assert_eq!(config.commands.interface, "ubt1");
        assert_eq!(config.commands.hci_node, "ubt1hci");
        assert_eq!(config.commands.privilege_prefix, "sudo");
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hcman.toml");
        fs::write(&path, "[commands\n").unwrap();

        let err = ManagerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ManagerError::Config { .. }));
    }
}
