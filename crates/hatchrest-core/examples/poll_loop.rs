//! Poll a simulated Hatch Rest and print every update.
//!
//! Run with: cargo run -p hatchrest-core --example poll_loop

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use hatchrest_core::{
    CoordinatorConfig, DeviceError, RestCoordinator, RestDevice, RestEntity, RestState, Rgb, Sound,
};

/// In-memory device that dims a little on every refresh
struct SimulatedRest {
    brightness: AtomicU8,
}

#[async_trait]
impl RestDevice for SimulatedRest {
    async fn refresh_data(&self) -> Result<RestState, DeviceError> {
        let brightness = self.brightness.fetch_sub(10, Ordering::SeqCst);
        Ok(RestState {
            power: true,
            volume: 40,
            brightness,
            color: Rgb {
                red: 255,
                green: 140,
                blue: 60,
            },
            sound: Sound::Rain,
        })
    }

    fn name(&self) -> &str {
        "Hatch Rest (simulated)"
    }

    fn address(&self) -> &str {
        "AA:BB:CC:DD:EE:FF"
    }

    async fn disconnect(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let device = Arc::new(SimulatedRest {
        brightness: AtomicU8::new(200),
    });
    let config = CoordinatorConfig::new().with_update_interval(Duration::from_secs(1));
    let coordinator = Arc::new(RestCoordinator::new(
        Some("rest-simulated".to_owned()),
        device,
        config,
    ));

    let entity = RestEntity::new(coordinator.clone());
    if let Ok(info) = entity.device_info() {
        println!("registered: {} ({} {})", info.name, info.manufacturer, info.model);
    }

    let subscription = coordinator
        .subscribe(|update| match &update.state {
            Some(state) => println!(
                "power={} brightness={} sound={:?}",
                state.power, state.brightness, state.sound
            ),
            None => println!("no data yet"),
        })
        .await;

    coordinator.refresh_once().await.ok();
    coordinator.start().await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    coordinator.unsubscribe(subscription).await;
    coordinator.stop().await;
}
