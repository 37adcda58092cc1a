//! Pixy block tracker firmware
//!
//! Demo binary for RP2040 boards with a CMUcam5 "Pixy" on I2C0
//! (GPIO4 = SDA, GPIO5 = SCL). Waits for the camera, then streams the
//! detected blocks over defmt.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use pixy_drivers::{parse_config, CameraConfig, Cmucam5};
use pixy_hal::HalI2c;

mod tasks;

/// Embedded camera configuration (compiled into firmware)
/// Edit pixy.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../pixy.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pixy firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Camera config: addr={=u8:#x}, {}Hz, init budget {}ms",
        config.address, config.frequency, config.init_timeout_ms
    );

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.frequency;

    // I2C0: SCL=GPIO5, SDA=GPIO4
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let camera = Cmucam5::with_config(HalI2c::new(i2c), Delay, config);

    info!("I2C initialized for camera communication");

    spawner.spawn(tasks::tracker_task(camera)).unwrap();

    info!("All tasks spawned");
}

/// Parse the embedded configuration
///
/// build.rs already rejects a malformed pixy.toml, so the fallback only
/// covers values the on-target parser is stricter about.
fn load_config() -> CameraConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("Invalid pixy.toml ({:?}), using defaults", e);
            CameraConfig::default()
        }
    }
}
