/*!
 * Bluetooth Service Orchestration
 * Service checks, adapter start, inquiry and connection via hccontrol
 */

use serde::Serialize;
use std::fmt;

use crate::activity::ActivityLog;
use crate::commands::CommandSet;
use crate::error::{ManagerError, Result};
use crate::runner::CommandRunner;

const RUNNING_MARKER: &str = "is running";
const FAILURE_MARKER: &str = "failed";

/// True when `service ... status` output reports the service as running.
pub fn is_service_active(status_output: &str) -> bool {
    status_output.contains(RUNNING_MARKER)
}

/// One line of inquiry output, kept exactly as printed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeviceRecord(String);

impl DeviceRecord {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeviceRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    pub device: String,
    /// Whatever `create_connection` printed. Not inspected.
    pub output: String,
}

pub fn parse_inquiry(output: &str) -> Vec<DeviceRecord> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(DeviceRecord::new)
        .collect()
}

pub struct ServiceOrchestrator<R, L> {
    runner: R,
    log: L,
    commands: CommandSet,
}

impl<R: CommandRunner, L: ActivityLog> ServiceOrchestrator<R, L> {
    pub fn new(runner: R, log: L, commands: CommandSet) -> Self {
        Self {
            runner,
            log,
            commands,
        }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn service_active(&self, service: &str) -> Result<bool> {
        let output = self.runner.run(&self.commands.status(service))?;
        Ok(is_service_active(&output.stdout))
    }

    /// Brings up the security and adapter services, then runs an inquiry.
    ///
    /// Any failure aborts the remaining steps and is logged once.
    pub fn scan(&self) -> Result<Vec<DeviceRecord>> {
        match self.try_scan() {
            Ok(devices) => Ok(devices),
            Err(e) => {
                let message = format!("Failed to scan devices: {}", e);
                tracing::error!("{}", message);
                self.log.error(&message);
                Err(e)
            }
        }
    }

    fn try_scan(&self) -> Result<Vec<DeviceRecord>> {
        let security = &self.commands.security_service;

        if self.service_active(security)? {
            tracing::info!("{} already running", security);
            self.log.action(&format!("{} service already running", security));
        } else {
            self.start_service(security, &self.commands.start_security_service())?;
            self.log.action(&format!("Started {} service", security));
        }

        let bluetooth = &self.commands.bluetooth_service;
        self.start_service(bluetooth, &self.commands.start_bluetooth_service())?;
        self.log.action("Bluetooth service started");

        let output = self.runner.run(&self.commands.inquiry())?;
        let devices = parse_inquiry(&output.stdout);

        tracing::info!("Inquiry found {} device(s)", devices.len());
        self.log.action("Scanned for Bluetooth devices");

        Ok(devices)
    }

    fn start_service(&self, service: &str, command: &str) -> Result<()> {
        tracing::info!("Starting {} service", service);
        let output = self.runner.run(command)?;
        if output.contains(FAILURE_MARKER) {
            return Err(ManagerError::ServiceStart {
                service: service.to_string(),
                output: output.stdout,
            });
        }
        Ok(())
    }

    /// Issues `create_connection` for a raw inquiry line.
    ///
    /// Only a launch failure counts as failure; the command's output is
    /// returned as-is without being checked.
    pub fn connect(&self, device: &str) -> Result<ConnectOutcome> {
        tracing::info!("Connecting to device: {}", device);

        match self.runner.run(&self.commands.create_connection(device)) {
            Ok(output) => {
                self.log.action(&format!("Connected to {}", device));
                Ok(ConnectOutcome {
                    device: device.to_string(),
                    output: output.stdout,
                })
            }
            Err(e) => {
                let message = format!("Failed to connect to device {}: {}", device, e);
                tracing::error!("{}", message);
                self.log.error(&message);
                Err(e)
            }
        }
    }
}
