//! Error types for the Hatch Rest integration
//!
//! Two layers, unified the same way transport errors roll up elsewhere in
//! the workspace: [`DeviceError`] is what a device handle reports about the
//! hardware session, and [`HatchRestError`] is the single error type the
//! coordinator, entity, and lifecycle surfaces return.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Device Errors
// ----------------------------------------------------------------------------

/// Errors reported by a device handle while talking to the hardware
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("BLE adapter not available: {reason}")]
    AdapterNotAvailable { reason: String },

    #[error("Scan failed: {reason}")]
    ScanFailed { reason: String },

    #[error("Failed to connect to device {address}: {reason}")]
    ConnectionFailed { address: String, reason: String },

    #[error("Characteristic not found: {characteristic}")]
    CharacteristicNotFound { characteristic: String },

    #[error("Failed to read device state: {reason}")]
    ReadFailed { reason: String },

    #[error("Malformed state payload: {reason}")]
    MalformedPayload { reason: String },
}

// ----------------------------------------------------------------------------
// Unified Error Type
// ----------------------------------------------------------------------------

/// Errors for the Hatch Rest integration
#[derive(Debug, Error)]
pub enum HatchRestError {
    /// Setup could not locate the configured device; retry setup later
    #[error("Could not find Hatch Rest device with address {address}")]
    DeviceNotReady { address: String },

    /// A poll cycle failed; the previous snapshot remains the current one
    #[error("{cause}")]
    UpdateFailed { cause: String },

    /// A registry descriptor needs both a hardware address and a unique id
    #[error("Missing bluetooth address or unique id for Hatch Rest device")]
    MissingIdentity,

    /// No coordinator is registered under the given config entry id
    #[error("No config entry registered with id {entry_id}")]
    UnknownEntry { entry_id: String },

    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl HatchRestError {
    /// Whether the embedding host should schedule another setup attempt.
    ///
    /// Discovery misses and connection failures are transient (the device
    /// sleeps its radio between advertisements); everything else is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HatchRestError::DeviceNotReady { .. }
                | HatchRestError::Device(DeviceError::ConnectionFailed { .. })
        )
    }
}

/// Result type for Hatch Rest operations
pub type Result<T> = std::result::Result<T, HatchRestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_error_names_the_address() {
        let err = HatchRestError::DeviceNotReady {
            address: "AA:BB:CC:DD:EE:FF".to_owned(),
        };
        assert!(err.to_string().contains("AA:BB:CC:DD:EE:FF"));
        assert!(err.is_retryable());
    }

    #[test]
    fn connection_failure_is_retryable() {
        let err = HatchRestError::from(DeviceError::ConnectionFailed {
            address: "AA:BB:CC:DD:EE:FF".to_owned(),
            reason: "device went away".to_owned(),
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn identity_and_update_failures_are_not_retryable() {
        assert!(!HatchRestError::MissingIdentity.is_retryable());
        let err = HatchRestError::UpdateFailed {
            cause: "Failed getting data from device".to_owned(),
        };
        assert!(!err.is_retryable());
    }
}
