//! Bluetooth Low Energy client for the Hatch Rest integration
//!
//! This crate provides the btleplug-backed implementation of the
//! `RestDevice` trait from `hatchrest-core`, plus the discovery and
//! config-entry lifecycle that binds a hardware address to a running
//! coordinator.
//!
//! ## Architecture
//!
//! - [`protocol`] - GATT constants and feedback payload parsing
//! - [`discovery`] - Adapter initialization and scanning by address
//! - [`client`] - The connected device session
//! - [`setup`] - Config entry setup and unload
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hatchrest_ble::setup_entry;
//! use hatchrest_core::{ConfigEntry, CoordinatorConfig, EntryRegistry};
//!
//! # async fn example() -> hatchrest_core::Result<()> {
//! let mut registry = EntryRegistry::new();
//! let entry = ConfigEntry::new(
//!     "entry-1",
//!     Some("rest-1234".to_owned()),
//!     "AA:BB:CC:DD:EE:FF",
//! );
//!
//! let coordinator = setup_entry(&mut registry, &entry, CoordinatorConfig::new()).await?;
//! println!("polling {:?}", coordinator.device().name());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod discovery;
pub mod protocol;
pub mod setup;

// Public API exports
pub use client::BleRestDevice;
pub use discovery::{default_adapter, find_by_address, scan_for_devices, DiscoveredRest};
pub use protocol::{
    parse_feedback, ADVERTISED_NAME_PREFIX, COMMAND_CHARACTERISTIC_UUID,
    FEEDBACK_CHARACTERISTIC_UUID,
};
pub use setup::{setup_entry, unload_entry};

// Re-export the device trait for convenience
pub use hatchrest_core::RestDevice;
