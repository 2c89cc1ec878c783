//! Per-entry coordinator registry
//!
//! The embedding process owns one registry for its lifetime: a coordinator
//! is inserted when a config entry is set up and removed when the entry is
//! unloaded. There is no ambient global; callers pass the registry around.

use std::collections::HashMap;
use std::sync::Arc;

use crate::coordinator::RestCoordinator;
use crate::errors::{HatchRestError, Result};

/// Coordinators for the currently loaded config entries, keyed by entry id
#[derive(Default)]
pub struct EntryRegistry {
    entries: HashMap<String, Arc<RestCoordinator>>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a coordinator under a config entry id.
    pub fn insert(&mut self, entry_id: impl Into<String>, coordinator: Arc<RestCoordinator>) {
        self.entries.insert(entry_id.into(), coordinator);
    }

    /// Coordinator for an entry, if that entry is loaded.
    pub fn get(&self, entry_id: &str) -> Option<&Arc<RestCoordinator>> {
        self.entries.get(entry_id)
    }

    /// Remove and return the coordinator for an entry.
    pub fn remove(&mut self, entry_id: &str) -> Result<Arc<RestCoordinator>> {
        self.entries
            .remove(entry_id)
            .ok_or_else(|| HatchRestError::UnknownEntry {
                entry_id: entry_id.to_owned(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoordinatorConfig;
    use crate::device::RestDevice;
    use crate::errors::DeviceError;
    use crate::state::{RestState, Rgb, Sound};
    use async_trait::async_trait;

    struct NullDevice;

    #[async_trait]
    impl RestDevice for NullDevice {
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
            "Hatch Rest"
        }

        fn address(&self) -> &str {
            "AA:BB:CC:DD:EE:FF"
        }

        async fn disconnect(&self) -> std::result::Result<(), DeviceError> {
            Ok(())
        }
    }

    fn coordinator() -> Arc<RestCoordinator> {
        Arc::new(RestCoordinator::new(
            Some("rest-1234".to_owned()),
            Arc::new(NullDevice),
            CoordinatorConfig::default(),
        ))
    }

    #[test]
    fn insert_then_remove_round_trips() {
        let mut registry = EntryRegistry::new();
        assert!(registry.is_empty());

        registry.insert("entry-1", coordinator());
        assert_eq!(registry.len(), 1);
        assert!(registry.get("entry-1").is_some());

        registry.remove("entry-1").unwrap();
        assert!(registry.is_empty());
        assert!(registry.get("entry-1").is_none());
    }

    #[test]
    fn removing_an_unknown_entry_errors() {
        let mut registry = EntryRegistry::new();
        let err = registry.remove("entry-404").unwrap_err();
        assert!(matches!(
            err,
            HatchRestError::UnknownEntry { entry_id } if entry_id == "entry-404"
        ));
    }
}
