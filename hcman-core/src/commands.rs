//! Command lines understood by the base system's `service` and `hccontrol`.

use crate::config::CommandsConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    privilege_prefix: String,
    pub security_service: String,
    pub bluetooth_service: String,
    pub interface: String,
    pub hci_node: String,
}

impl CommandSet {
    pub fn from_config(config: &CommandsConfig) -> Self {
        Self {
            privilege_prefix: config.privilege_prefix.trim().to_string(),
            security_service: config.security_service.clone(),
            bluetooth_service: config.bluetooth_service.clone(),
            interface: config.interface.clone(),
            hci_node: config.hci_node.clone(),
        }
    }

    /// `service <name> status`, run unprivileged.
    pub fn status(&self, service: &str) -> String {
        format!("service {} status", service)
    }

    pub fn start_security_service(&self) -> String {
        self.privileged(format!("service {} onestart", self.security_service))
    }

    pub fn start_bluetooth_service(&self) -> String {
        self.privileged(format!(
            "service {} onestart {}",
            self.bluetooth_service, self.interface
        ))
    }

    pub fn inquiry(&self) -> String {
        self.privileged(format!("hccontrol -n {} inquiry", self.hci_node))
    }

    /// The device line is appended verbatim, so the shell splits it.
    pub fn create_connection(&self, device: &str) -> String {
        self.privileged(format!(
            "hccontrol -n {} create_connection {}",
            self.hci_node, device
        ))
    }

    fn privileged(&self, command: String) -> String {
        if self.privilege_prefix.is_empty() {
            command
        } else {
            format!("{} {}", self.privilege_prefix, command)
        }
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::from_config(&CommandsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strings_match_base_system_tools() {
        let commands = CommandSet::default();
        assert_eq!(commands.status("hcsecd"), "service hcsecd status");
        assert_eq!(commands.start_security_service(), "sudo service hcsecd onestart");
        assert_eq!(
            commands.start_bluetooth_service(),
            "sudo service bluetooth onestart ubt0"
        );
        assert_eq!(commands.inquiry(), "sudo hccontrol -n ubt0hci inquiry");
        assert_eq!(
            commands.create_connection("AA:BB:CC  DeviceOne"),
            "sudo hccontrol -n ubt0hci create_connection AA:BB:CC  DeviceOne"
        );
    }

    #[test]
    fn empty_prefix_runs_unprivileged() {
        let config = CommandsConfig {
            privilege_prefix: "  ".to_string(),
            ..Default::default()
        };
        let commands = CommandSet::from_config(&config);
        assert_eq!(commands.start_security_service(), "service hcsecd onestart");
        assert_eq!(commands.inquiry(), "hccontrol -n ubt0hci inquiry");
    }

    #[test]
    fn alternate_adapter() {
        let config = CommandsConfig {
            privilege_prefix: "doas".to_string(),
            interface: "ubt1".to_string(),
            hci_node: "ubt1hci".to_string(),
            ..Default::default()
        };
        let commands = CommandSet::from_config(&config);
        assert_eq!(
            commands.start_bluetooth_service(),
            "doas service bluetooth onestart ubt1"
        );
        assert_eq!(commands.inquiry(), "doas hccontrol -n ubt1hci inquiry");
    }
}
