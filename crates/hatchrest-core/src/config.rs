//! Coordinator configuration and config entries

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Configuration for the polling coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Time between poll cycles
    pub update_interval: Duration,
    /// Maximum time a single refresh attempt may take
    pub refresh_timeout: Duration,
    /// How long setup scans for the configured address
    pub scan_window: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(30),
            refresh_timeout: Duration::from_secs(10),
            scan_window: Duration::from_secs(10),
        }
    }
}

impl CoordinatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time between poll cycles
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Set the per-attempt refresh timeout
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Set the discovery scan window used at setup
    pub fn with_scan_window(mut self, window: Duration) -> Self {
        self.scan_window = window;
        self
    }
}

// ----------------------------------------------------------------------------
// Config Entries
// ----------------------------------------------------------------------------

/// One configured device: the address to poll and the ids it is known by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Stable id of this entry within the embedding process
    pub entry_id: String,
    /// Unique id used in the device registry descriptor
    pub unique_id: Option<String>,
    /// Hardware address of the device
    pub address: String,
}

impl ConfigEntry {
    pub fn new(
        entry_id: impl Into<String>,
        unique_id: Option<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            unique_id,
            address: address.into(),
        }
    }
}
