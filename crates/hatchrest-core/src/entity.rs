//! Base entity adapter for Hatch Rest devices
//!
//! Concrete entity kinds (a switch, a light) wrap [`RestEntity`] to share
//! one identity and one registry descriptor per device. The descriptor is
//! the join key the embedding host's device registry deduplicates on, so
//! building one without both identifiers is an error rather than a guess.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::coordinator::RestCoordinator;
use crate::device::RestDevice;
use crate::errors::{HatchRestError, Result};

/// Identifier namespace for this integration in the device registry
pub const DOMAIN: &str = "hatchrest";

// ----------------------------------------------------------------------------
// Registry Descriptor
// ----------------------------------------------------------------------------

/// Connection kinds understood by the device registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Bluetooth,
}

/// Registry descriptor for one physical device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, unique_id)` pairs identifying the device
    pub identifiers: BTreeSet<(String, String)>,
    /// `(kind, hardware address)` connection pairs
    pub connections: BTreeSet<(ConnectionKind, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

// ----------------------------------------------------------------------------
// Entity Adapter
// ----------------------------------------------------------------------------

/// Base adapter binding one subscriber's identity to a coordinator + device
pub struct RestEntity {
    coordinator: Arc<RestCoordinator>,
    device: Arc<dyn RestDevice>,
    unique_id: Option<String>,
}

impl RestEntity {
    pub fn new(coordinator: Arc<RestCoordinator>) -> Self {
        let device = coordinator.device();
        let unique_id = coordinator.unique_id().map(str::to_owned);
        Self {
            coordinator,
            device,
            unique_id,
        }
    }

    /// Unique id shared with the coordinator's config entry.
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// Coordinator backing this entity.
    pub fn coordinator(&self) -> &Arc<RestCoordinator> {
        &self.coordinator
    }

    /// Name the device reports.
    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    /// Registry descriptor for the device backing this entity.
    ///
    /// Fails with [`HatchRestError::MissingIdentity`] when either the
    /// hardware address or the unique id is absent; the registry cannot
    /// join a descriptor missing either key.
    pub fn device_info(&self) -> Result<DeviceInfo> {
        let address = self.device.address();
        let unique_id = self.unique_id.as_deref().unwrap_or_default();
        if address.is_empty() || unique_id.is_empty() {
            return Err(HatchRestError::MissingIdentity);
        }

        Ok(DeviceInfo {
            identifiers: BTreeSet::from([(DOMAIN.to_owned(), unique_id.to_owned())]),
            connections: BTreeSet::from([(ConnectionKind::Bluetooth, address.to_owned())]),
            name: self.device_name().to_owned(),
            manufacturer: "Hatch".to_owned(),
            model: "Rest".to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoordinatorConfig;
    use crate::errors::DeviceError;
    use crate::state::{RestState, Rgb, Sound};
    use async_trait::async_trait;

    struct FixedDevice {
        name: String,
        address: String,
    }

    #[async_trait]
    impl RestDevice for FixedDevice {
        async fn refresh_data(&self) -> std::result::Result<RestState, DeviceError> {
            Ok(RestState {
                power: false,
                volume: 0,
                brightness: 0,
                color: Rgb {
                    red: 0,
                    green: 0,
                    blue: 0,
                },
                sound: Sound::NoSound,
            })
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn address(&self) -> &str {
            &self.address
        }

        async fn disconnect(&self) -> std::result::Result<(), DeviceError> {
            Ok(())
        }
    }

    fn entity_for(unique_id: Option<&str>, address: &str) -> RestEntity {
        let device = Arc::new(FixedDevice {
            name: "Hatch Rest 1234".to_owned(),
            address: address.to_owned(),
        });
        let coordinator = Arc::new(RestCoordinator::new(
            unique_id.map(str::to_owned),
            device,
            CoordinatorConfig::default(),
        ));
        RestEntity::new(coordinator)
    }

    #[test]
    fn descriptor_carries_both_identity_tuples() {
        let entity = entity_for(Some("rest-1234"), "AA:BB:CC:DD:EE:FF");
        let info = entity.device_info().unwrap();

        assert!(info
            .identifiers
            .contains(&(DOMAIN.to_owned(), "rest-1234".to_owned())));
        assert!(info
            .connections
            .contains(&(ConnectionKind::Bluetooth, "AA:BB:CC:DD:EE:FF".to_owned())));
        assert_eq!(info.name, "Hatch Rest 1234");
        assert_eq!(info.manufacturer, "Hatch");
        assert_eq!(info.model, "Rest");
    }

    #[test]
    fn descriptor_requires_a_unique_id() {
        let entity = entity_for(None, "AA:BB:CC:DD:EE:FF");
        assert!(matches!(
            entity.device_info(),
            Err(HatchRestError::MissingIdentity)
        ));

        let entity = entity_for(Some(""), "AA:BB:CC:DD:EE:FF");
        assert!(matches!(
            entity.device_info(),
            Err(HatchRestError::MissingIdentity)
        ));
    }

    #[test]
    fn descriptor_requires_an_address() {
        let entity = entity_for(Some("rest-1234"), "");
        assert!(matches!(
            entity.device_info(),
            Err(HatchRestError::MissingIdentity)
        ));
    }

    #[test]
    fn device_name_passes_through() {
        let entity = entity_for(Some("rest-1234"), "AA:BB:CC:DD:EE:FF");
        assert_eq!(entity.device_name(), "Hatch Rest 1234");
    }
}
