//! Device handle seam between the coordinator and a concrete client

use async_trait::async_trait;

use crate::errors::DeviceError;
use crate::state::RestState;

/// An open session to a physical Hatch Rest device.
///
/// The coordinator owns exactly one handle and is its only writer; entities
/// read identity metadata through the same handle. Implementations own the
/// transport underneath (`hatchrest-ble` provides the production one).
#[async_trait]
pub trait RestDevice: Send + Sync {
    /// Fetch the current state from the device.
    async fn refresh_data(&self) -> Result<RestState, DeviceError>;

    /// Name the device advertises.
    fn name(&self) -> &str;

    /// Hardware address. On macOS this is the platform peripheral id, since
    /// CoreBluetooth does not expose MAC addresses.
    fn address(&self) -> &str;

    /// Tear down the session.
    async fn disconnect(&self) -> Result<(), DeviceError>;
}
