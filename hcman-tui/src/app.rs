use std::sync::Arc;

use hcman_core::{
    ActivityLog, CommandRunner, ConnectOutcome, DeviceRecord, Result, ServiceOrchestrator,
};
use tokio::task::{JoinError, JoinHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Modal message shown over the device list until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub detail: Option<String>,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    fn with_detail(mut self, detail: &str) -> Self {
        let detail = detail.trim();
        if !detail.is_empty() {
            self.detail = Some(detail.to_string());
        }
        self
    }
}

enum Pending {
    Scan(JoinHandle<Result<Vec<DeviceRecord>>>),
    Connect(JoinHandle<Result<ConnectOutcome>>),
}

pub struct App<R, L> {
    pub devices: Vec<DeviceRecord>,
    pub selected_device: Option<usize>,
    pub notice: Option<Notice>,
    pub status: String,
    orchestrator: Arc<ServiceOrchestrator<R, L>>,
    pending: Option<Pending>,
}

impl<R, L> App<R, L>
where
    R: CommandRunner + 'static,
    L: ActivityLog + 'static,
{
    pub fn new(orchestrator: Arc<ServiceOrchestrator<R, L>>) -> Self {
        Self {
            devices: Vec::new(),
            selected_device: None,
            notice: None,
            status: "Press [s] to scan for devices".to_string(),
            orchestrator,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn previous_device(&mut self) {
        if !self.devices.is_empty() {
            self.selected_device = Some(match self.selected_device {
                Some(0) | None => self.devices.len() - 1,
                Some(i) => i - 1,
            });
        }
    }

    pub fn next_device(&mut self) {
        if !self.devices.is_empty() {
            self.selected_device = Some(match self.selected_device {
                Some(i) => (i + 1) % self.devices.len(),
                None => 0,
            });
        }
    }

    pub fn get_selected_device(&self) -> Option<&DeviceRecord> {
        self.selected_device.and_then(|i| self.devices.get(i))
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn start_scan(&mut self) {
        if self.is_busy() {
            return;
        }

        self.devices.clear();
        self.selected_device = None;
        self.status = "Scanning for devices...".to_string();

        let orchestrator = Arc::clone(&self.orchestrator);
        self.pending = Some(Pending::Scan(tokio::task::spawn_blocking(move || {
            orchestrator.scan()
        })));
    }

    pub fn start_connect(&mut self) {
        if self.is_busy() {
            return;
        }

        let Some(device) = self.get_selected_device().map(|d| d.as_str().to_string()) else {
            self.orchestrator
                .log()
                .action("No device selected for connection");
            self.notice = Some(Notice::new(NoticeKind::Warning, "No device selected"));
            return;
        };

        self.status = format!("Connecting to {}...", device);

        let orchestrator = Arc::clone(&self.orchestrator);
        self.pending = Some(Pending::Connect(tokio::task::spawn_blocking(move || {
            orchestrator.connect(&device)
        })));
    }

    /// Collects the in-flight operation once its worker has returned.
    pub async fn poll(&mut self) {
        let finished = match &self.pending {
            Some(Pending::Scan(handle)) => handle.is_finished(),
            Some(Pending::Connect(handle)) => handle.is_finished(),
            None => false,
        };
        if finished {
            self.settle().await;
        }
    }

    async fn settle(&mut self) {
        match self.pending.take() {
            Some(Pending::Scan(handle)) => self.finish_scan(handle.await),
            Some(Pending::Connect(handle)) => self.finish_connect(handle.await),
            None => {}
        }
    }

    fn finish_scan(&mut self, joined: std::result::Result<Result<Vec<DeviceRecord>>, JoinError>) {
        match joined {
            Ok(Ok(devices)) => {
                self.status = format!("{} device(s) found", devices.len());
                self.selected_device = if devices.is_empty() { None } else { Some(0) };
                self.devices = devices;
            }
            Ok(Err(e)) => {
                self.status = "Scan failed".to_string();
                self.notice = Some(Notice::new(
                    NoticeKind::Error,
                    format!("Failed to scan devices: {}", e),
                ));
            }
            Err(e) => self.worker_lost(e),
        }
    }

    fn finish_connect(&mut self, joined: std::result::Result<Result<ConnectOutcome>, JoinError>) {
        match joined {
            Ok(Ok(outcome)) => {
                self.status = format!("Connected to {}", outcome.device);
                self.notice = Some(
                    Notice::new(NoticeKind::Info, format!("Connected to {}", outcome.device))
                        .with_detail(&outcome.output),
                );
            }
            Ok(Err(e)) => {
                self.status = "Connection failed".to_string();
                self.notice = Some(Notice::new(
                    NoticeKind::Error,
                    format!("Failed to connect to device: {}", e),
                ));
            }
            Err(e) => self.worker_lost(e),
        }
    }

    fn worker_lost(&mut self, e: JoinError) {
        tracing::error!("Worker task failed: {}", e);
        self.status = "Operation aborted".to_string();
        self.notice = Some(Notice::new(NoticeKind::Error, format!("Operation aborted: {}", e)));
    }
}
