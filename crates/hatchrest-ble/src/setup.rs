//! Config entry lifecycle
//!
//! `setup_entry` turns a stored address into a running coordinator and
//! registers it; `unload_entry` reverses both. A device that cannot be
//! found within the scan window yields a retryable not-ready error so the
//! embedding host can schedule another attempt.

use std::sync::Arc;

use tracing::{info, warn};

use hatchrest_core::{
    ConfigEntry, CoordinatorConfig, EntryRegistry, HatchRestError, RestCoordinator, Result,
};

use crate::client::BleRestDevice;
use crate::discovery::{default_adapter, find_by_address};

/// Discover, connect, and start polling the device for one config entry.
///
/// The coordinator is registered under `entry.entry_id` and returned so the
/// caller can attach entities right away.
pub async fn setup_entry(
    registry: &mut EntryRegistry,
    entry: &ConfigEntry,
    config: CoordinatorConfig,
) -> Result<Arc<RestCoordinator>> {
    let address = entry.address.to_uppercase();

    let adapter = default_adapter().await?;
    let peripheral = find_by_address(&adapter, &address, config.scan_window)
        .await?
        .ok_or_else(|| HatchRestError::DeviceNotReady {
            address: address.clone(),
        })?;

    let device = Arc::new(BleRestDevice::connect(peripheral, false).await?);
    let coordinator = Arc::new(RestCoordinator::new(
        entry.unique_id.clone(),
        device,
        config,
    ));

    if let Err(err) = coordinator.refresh_once().await {
        warn!("initial refresh failed, retrying on the next cycle: {err}");
    }
    coordinator.start().await;

    registry.insert(entry.entry_id.clone(), coordinator.clone());
    info!(entry_id = %entry.entry_id, %address, "config entry loaded");
    Ok(coordinator)
}

/// Stop polling and drop the coordinator for a config entry.
pub async fn unload_entry(registry: &mut EntryRegistry, entry_id: &str) -> Result<()> {
    let coordinator = registry.remove(entry_id)?;
    coordinator.stop().await;
    if let Err(err) = coordinator.device().disconnect().await {
        warn!("disconnect failed during unload: {err}");
    }
    info!(%entry_id, "config entry unloaded");
    Ok(())
}
