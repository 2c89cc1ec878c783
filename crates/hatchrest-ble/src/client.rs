//! Connected Hatch Rest device session

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::Peripheral;
use tracing::{debug, info};

use hatchrest_core::{DeviceError, RestDevice, RestState};

use crate::protocol::{parse_feedback, FEEDBACK_CHARACTERISTIC_UUID};

/// An open session to a physical Hatch Rest device.
///
/// Holds the peripheral plus the resolved feedback characteristic. Identity
/// metadata is cached at connect time; the accessors are synchronous.
pub struct BleRestDevice {
    peripheral: Peripheral,
    feedback: Characteristic,
    name: String,
    address: String,
}

impl BleRestDevice {
    /// Connect to a discovered peripheral and locate the state
    /// characteristic. With `scan_now`, the state is read once immediately
    /// to prove the session end to end.
    pub async fn connect(peripheral: Peripheral, scan_now: bool) -> Result<Self, DeviceError> {
        let address = peripheral.address().to_string();

        peripheral
            .connect()
            .await
            .map_err(|e| DeviceError::ConnectionFailed {
                address: address.clone(),
                reason: e.to_string(),
            })?;

        peripheral
            .discover_services()
            .await
            .map_err(|e| DeviceError::ConnectionFailed {
                address: address.clone(),
                reason: e.to_string(),
            })?;

        let feedback = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == FEEDBACK_CHARACTERISTIC_UUID)
            .ok_or_else(|| DeviceError::CharacteristicNotFound {
                characteristic: FEEDBACK_CHARACTERISTIC_UUID.to_string(),
            })?;

        let name = match peripheral.properties().await {
            Ok(Some(properties)) => properties.local_name.unwrap_or_else(|| address.clone()),
            _ => address.clone(),
        };

        let device = Self {
            peripheral,
            feedback,
            name,
            address,
        };

        if scan_now {
            let state = device.read_state().await?;
            debug!(?state, "initial state read");
        }

        info!(name = %device.name, address = %device.address, "connected to Hatch Rest");
        Ok(device)
    }

    async fn read_state(&self) -> Result<RestState, DeviceError> {
        let payload = self
            .peripheral
            .read(&self.feedback)
            .await
            .map_err(|e| DeviceError::ReadFailed {
                reason: e.to_string(),
            })?;
        parse_feedback(&payload)
    }
}

#[async_trait]
impl RestDevice for BleRestDevice {
    async fn refresh_data(&self) -> Result<RestState, DeviceError> {
        self.read_state().await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn disconnect(&self) -> Result<(), DeviceError> {
        self.peripheral
            .disconnect()
            .await
            .map_err(|e| DeviceError::ConnectionFailed {
                address: self.address.clone(),
                reason: e.to_string(),
            })?;
        debug!(address = %self.address, "disconnected");
        Ok(())
    }
}
