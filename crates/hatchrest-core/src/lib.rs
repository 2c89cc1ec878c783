//! Polling coordinator and entity model for Hatch Rest night lights
//!
//! This crate contains the device-independent half of the integration:
//!
//! - [`state`] - Typed device state and sound programs
//! - [`device`] - The device handle trait implemented by concrete clients
//! - [`config`] - Coordinator configuration and config entries
//! - [`coordinator`] - Fixed-interval polling with bounded refresh attempts
//! - [`entity`] - Base entity adapter and the device registry descriptor
//! - [`registry`] - Per-entry coordinator registry
//! - [`errors`] - Error taxonomy shared across the workspace
//!
//! Concrete transports live elsewhere; `hatchrest-ble` provides the
//! btleplug-backed [`device::RestDevice`] implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hatchrest_core::{CoordinatorConfig, RestCoordinator, RestDevice};
//!
//! # async fn example(device: Arc<dyn RestDevice>) {
//! let config = CoordinatorConfig::new();
//! let coordinator = Arc::new(RestCoordinator::new(
//!     Some("AA:BB:CC:DD:EE:FF".to_owned()),
//!     device,
//!     config,
//! ));
//!
//! let subscription = coordinator
//!     .subscribe(|update| println!("device state: {:?}", update.state))
//!     .await;
//!
//! coordinator.start().await;
//! // ... later ...
//! coordinator.unsubscribe(subscription).await;
//! coordinator.stop().await;
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod device;
pub mod entity;
pub mod errors;
pub mod registry;
pub mod state;

// Public API exports
pub use config::{ConfigEntry, CoordinatorConfig};
pub use coordinator::{
    RestCoordinator, StateUpdate, SubscriptionId, DEVICE_FAILURE_CAUSE, TIMEOUT_FAILURE_CAUSE,
};
pub use device::RestDevice;
pub use entity::{ConnectionKind, DeviceInfo, RestEntity, DOMAIN};
pub use errors::{DeviceError, HatchRestError, Result};
pub use registry::EntryRegistry;
pub use state::{Rgb, RestState, Sound};
