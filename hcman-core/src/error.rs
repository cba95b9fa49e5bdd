use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    /// The shell process for `command` could not be spawned.
    #[error("could not launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A start command ran, but its output reported failure.
    #[error("{service} service failed to start: {}", .output.trim())]
    ServiceStart { service: String, output: String },

    #[error("could not open log file {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read configuration {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ManagerError {
    pub fn is_launch(&self) -> bool {
        matches!(self, ManagerError::Launch { .. })
    }

    pub fn is_service_start(&self) -> bool {
        matches!(self, ManagerError::ServiceStart { .. })
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;
