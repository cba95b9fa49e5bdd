/*!
 * HCMAN Core
 * Bluetooth adapter management on top of `service` and `hccontrol`
 * Onyx Digital Intelligence Development LLC
 */

pub mod activity;
pub mod commands;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod runner;

pub use activity::{ActivityLog, FileLog, LogEntry, MemoryLog};
pub use commands::CommandSet;
pub use config::ManagerConfig;
pub use error::{ManagerError, Result};
pub use orchestrator::{is_service_active, ConnectOutcome, DeviceRecord, ServiceOrchestrator};
pub use runner::{CommandOutput, CommandRunner, ShellRunner};

/// The orchestrator as the front-ends run it: real shell, log file on disk.
pub type SystemOrchestrator = ServiceOrchestrator<ShellRunner, FileLog>;

impl SystemOrchestrator {
    pub fn from_config(config: &ManagerConfig) -> Result<Self> {
        let log = FileLog::open(&config.log.path, config.log.timestamps)?;
        Ok(ServiceOrchestrator::new(
            ShellRunner::new(config.runner.shell.clone()),
            log,
            CommandSet::from_config(&config.commands),
        ))
    }
}
