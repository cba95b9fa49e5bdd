/*!
 * HCMAN Command Line
 * Scan for and connect to Bluetooth devices from the shell
 * Onyx Digital Intelligence Development LLC
 */

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use hcman_core::{ActivityLog, ManagerConfig, SystemOrchestrator};

#[derive(Parser)]
#[command(name = "hcman")]
#[command(about = "HCMAN Bluetooth Manager")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "/usr/local/etc/hcman.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Bluetooth services and list nearby devices
    Scan {
        /// Print the device list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Connect to a device line exactly as printed by `scan`
    Connect { device: String },
    /// Report whether a service is running
    Status {
        /// Service to query (defaults to the security service)
        service: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("hcman_core={},hcman={}", log_level, log_level))
        .with_writer(std::io::stderr)
        .init();

    let config = ManagerConfig::load(&cli.config)?;
    let orchestrator = SystemOrchestrator::from_config(&config)?;
    orchestrator.log().action("Bluetooth Manager started");
    info!("Activity log: {}", orchestrator.log().path().display());

    match cli.command {
        Commands::Scan { json } => scan(&orchestrator, json),
        Commands::Connect { device } => connect(&orchestrator, &device),
        Commands::Status { service } => status(&orchestrator, service),
    }
}

fn scan(orchestrator: &SystemOrchestrator, json: bool) -> Result<()> {
    let devices = orchestrator.scan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
    } else if devices.is_empty() {
        println!("No devices found");
    } else {
        for device in &devices {
            println!("{}", device);
        }
    }
    Ok(())
}

fn connect(orchestrator: &SystemOrchestrator, device: &str) -> Result<()> {
    if device.trim().is_empty() {
        orchestrator.log().action("No device selected for connection");
        anyhow::bail!("No device selected");
    }

    let outcome = orchestrator.connect(device)?;
    println!("Connected to {}", outcome.device);
    if !outcome.output.trim().is_empty() {
        println!("{}", outcome.output.trim_end());
    }
    Ok(())
}

fn status(orchestrator: &SystemOrchestrator, service: Option<String>) -> Result<()> {
    let service = service.unwrap_or_else(|| orchestrator.commands().security_service.clone());
    let running = orchestrator.service_active(&service)?;
    println!(
        "{} service is {}",
        service,
        if running { "running" } else { "not running" }
    );
    Ok(())
}
