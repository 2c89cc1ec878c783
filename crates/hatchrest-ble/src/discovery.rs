//! Adapter initialization and device discovery
//!
//! Discovery runs in central role only: scan, match the configured address
//! (or the advertised name prefix for open-ended scans), and hand the
//! peripheral to [`client::BleRestDevice`](crate::client::BleRestDevice).

use std::time::Duration;

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::stream::StreamExt;
use tracing::{debug, info};

use hatchrest_core::DeviceError;

use crate::protocol::{normalize_address, ADVERTISED_NAME_PREFIX};

// ----------------------------------------------------------------------------
// Adapter Setup
// ----------------------------------------------------------------------------

/// First available BLE adapter on this host.
pub async fn default_adapter() -> Result<Adapter, DeviceError> {
    let manager = Manager::new()
        .await
        .map_err(|e| DeviceError::AdapterNotAvailable {
            reason: e.to_string(),
        })?;

    let adapters = manager
        .adapters()
        .await
        .map_err(|e| DeviceError::AdapterNotAvailable {
            reason: e.to_string(),
        })?;

    adapters
        .into_iter()
        .next()
        .ok_or_else(|| DeviceError::AdapterNotAvailable {
            reason: "no adapters found".to_owned(),
        })
}

// ----------------------------------------------------------------------------
// Discovery
// ----------------------------------------------------------------------------

/// A Hatch Rest seen during an open-ended scan
#[derive(Debug, Clone)]
pub struct DiscoveredRest {
    pub name: String,
    pub address: String,
    pub rssi: Option<i16>,
}

/// Scan for the peripheral with the given hardware address.
///
/// Returns `None` when the scan window closes without a match; the caller
/// decides whether that is fatal (setup treats it as not-ready).
pub async fn find_by_address(
    adapter: &Adapter,
    address: &str,
    scan_window: Duration,
) -> Result<Option<Peripheral>, DeviceError> {
    let wanted = normalize_address(address);
    debug!(address = %wanted, "scanning for device");

    let mut events = adapter.events().await.map_err(|e| DeviceError::ScanFailed {
        reason: e.to_string(),
    })?;
    adapter
        .start_scan(ScanFilter::default())
        .await
        .map_err(|e| DeviceError::ScanFailed {
            reason: e.to_string(),
        })?;

    // The event stream only reports newly seen peripherals; check the
    // adapter cache first for a device discovered by an earlier scan.
    let mut found = cached_peripheral(adapter, &wanted).await?;

    if found.is_none() {
        let matched = tokio::time::timeout(scan_window, async {
            while let Some(event) = events.next().await {
                if let CentralEvent::DeviceDiscovered(id) = event {
                    if let Ok(peripheral) = adapter.peripheral(&id).await {
                        if normalize_address(&peripheral.address().to_string()) == wanted {
                            return Some(peripheral);
                        }
                    }
                }
            }
            None
        })
        .await;
        found = matched.unwrap_or(None);
    }

    if let Err(e) = adapter.stop_scan().await {
        debug!("failed to stop scan: {e}");
    }

    match &found {
        Some(_) => info!(address = %wanted, "device found"),
        None => debug!(address = %wanted, "scan window closed without a match"),
    }
    Ok(found)
}

/// List nearby peripherals advertising as a Hatch Rest.
pub async fn scan_for_devices(
    adapter: &Adapter,
    duration: Duration,
) -> Result<Vec<DiscoveredRest>, DeviceError> {
    adapter
        .start_scan(ScanFilter::default())
        .await
        .map_err(|e| DeviceError::ScanFailed {
            reason: e.to_string(),
        })?;

    tokio::time::sleep(duration).await;

    let peripherals = adapter
        .peripherals()
        .await
        .map_err(|e| DeviceError::ScanFailed {
            reason: e.to_string(),
        })?;

    let mut found = Vec::new();
    for peripheral in peripherals {
        if let Ok(Some(properties)) = peripheral.properties().await {
            if let Some(name) = properties.local_name {
                if name.starts_with(ADVERTISED_NAME_PREFIX) {
                    found.push(DiscoveredRest {
                        name,
                        address: peripheral.address().to_string(),
                        rssi: properties.rssi,
                    });
                }
            }
        }
    }

    if let Err(e) = adapter.stop_scan().await {
        debug!("failed to stop scan: {e}");
    }

    info!("scan finished, {} device(s) found", found.len());
    Ok(found)
}

async fn cached_peripheral(
    adapter: &Adapter,
    wanted: &str,
) -> Result<Option<Peripheral>, DeviceError> {
    let peripherals = adapter
        .peripherals()
        .await
        .map_err(|e| DeviceError::ScanFailed {
            reason: e.to_string(),
        })?;

    for peripheral in peripherals {
        if normalize_address(&peripheral.address().to_string()) == wanted {
            return Ok(Some(peripheral));
        }
    }
    Ok(None)
}
