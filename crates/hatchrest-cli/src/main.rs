//! Command line tool for the Hatch Rest integration
//!
//! `scan` lists nearby Hatch Rest devices; `watch` sets up a config entry
//! for one address and prints every state update until interrupted.

use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hatchrest_ble::{default_adapter, scan_for_devices, setup_entry, unload_entry};
use hatchrest_core::{ConfigEntry, CoordinatorConfig, EntryRegistry, RestEntity, StateUpdate};

const WATCH_ENTRY_ID: &str = "cli-watch";

#[derive(Parser)]
#[command(name = "hatchrest")]
#[command(about = "Poll and inspect Hatch Rest night lights over BLE")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for nearby Hatch Rest devices
    Scan {
        /// Scan duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: u64,
    },
    /// Poll one device and print every state update
    Watch {
        /// Hardware address of the device
        #[arg(short, long)]
        address: String,
        /// Seconds between poll cycles
        #[arg(long, default_value = "30")]
        interval: u64,
        /// Per-attempt refresh timeout in seconds
        #[arg(long, default_value = "10")]
        timeout: u64,
    },
}

/// CLI-specific error types
#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    HatchRest(#[from] hatchrest_core::HatchRestError),

    #[error(transparent)]
    Device(#[from] hatchrest_core::DeviceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Scan { duration } => scan(Duration::from_secs(duration)).await,
        Commands::Watch {
            address,
            interval,
            timeout,
        } => {
            watch(
                address,
                Duration::from_secs(interval),
                Duration::from_secs(timeout),
            )
            .await
        }
    };

    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn scan(duration: Duration) -> Result<(), CliError> {
    let adapter = default_adapter().await?;
    info!("scanning for Hatch Rest devices ({}s)", duration.as_secs());

    let devices = scan_for_devices(&adapter, duration).await?;
    if devices.is_empty() {
        println!("No Hatch Rest devices found");
        return Ok(());
    }

    for device in devices {
        match device.rssi {
            Some(rssi) => println!("{}  {}  {} dBm", device.address, device.name, rssi),
            None => println!("{}  {}", device.address, device.name),
        }
    }
    Ok(())
}

async fn watch(address: String, interval: Duration, timeout: Duration) -> Result<(), CliError> {
    let config = CoordinatorConfig::new()
        .with_update_interval(interval)
        .with_refresh_timeout(timeout);
    let entry = ConfigEntry::new(
        WATCH_ENTRY_ID,
        Some(address.to_uppercase()),
        address.clone(),
    );

    let mut registry = EntryRegistry::new();
    let coordinator = setup_entry(&mut registry, &entry, config).await?;

    let entity = RestEntity::new(coordinator.clone());
    println!("{}", serde_json::to_string_pretty(&entity.device_info()?)?);

    let subscription = coordinator.subscribe(print_update).await;

    info!("watching {address}; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    coordinator.unsubscribe(subscription).await;
    unload_entry(&mut registry, WATCH_ENTRY_ID).await?;
    Ok(())
}

fn print_update(update: &StateUpdate) {
    match (&update.state, &update.error) {
        (Some(state), None) => {
            if let Ok(json) = serde_json::to_string(state) {
                println!("{json}");
            }
        }
        (Some(state), Some(cause)) => {
            if let Ok(json) = serde_json::to_string(state) {
                println!("update failed ({cause}); last known: {json}");
            }
        }
        (None, Some(cause)) => println!("update failed ({cause}); no data yet"),
        (None, None) => println!("no data yet"),
    }
}
