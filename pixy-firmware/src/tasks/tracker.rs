//! Block tracker task
//!
//! Brings the camera up, reports what it is, then polls the block list
//! once per tick.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker, Timer};

use pixy_drivers::{CameraError, Cmucam5};
use pixy_hal::HalI2c;

/// Concrete camera type wired up in `main`
pub type Camera = Cmucam5<HalI2c<I2c<'static, I2C0, Blocking>>, Delay>;

/// Poll period for block queries (the camera runs at 50 frames/s)
const POLL_PERIOD: Duration = Duration::from_millis(20);

/// Back-off before retrying a failed init
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Camera tracker task
#[embassy_executor::task]
pub async fn tracker_task(mut camera: Camera) {
    info!("Tracker task starting...");

    loop {
        match camera.init() {
            Ok(version) => {
                match version.firmware() {
                    Some((major, minor, build)) => {
                        info!("Pixy firmware {}.{}.{}", major, minor, build)
                    }
                    None => info!("Pixy version blob: {=[u8]:x}", version.as_bytes()),
                }
                break;
            }
            Err(CameraError::InitTimeout) => {
                warn!("Pixy not responding at {=u8:#x}, retrying", camera.address());
                Timer::after(RETRY_DELAY).await;
            }
            Err(e) => {
                error!("Pixy init failed: {:?}", e);
                Timer::after(RETRY_DELAY).await;
            }
        }
    }

    match camera.get_resolution() {
        Ok(res) => info!("Frame resolution: {}x{}", res.width, res.height),
        Err(e) => warn!("Failed to read resolution: {:?}", e),
    }

    let mut ticker = Ticker::every(POLL_PERIOD);
    let mut last_count = 0usize;

    loop {
        ticker.next().await;

        match camera.get_all_blocks() {
            Ok(blocks) => {
                if blocks.len() != last_count {
                    info!("{} block(s) in view", blocks.len());
                    last_count = blocks.len();
                }
                for block in &blocks {
                    debug!(
                        "  sig={} at ({}, {}) {}x{} age={}",
                        block.signature, block.x, block.y, block.width, block.height, block.age
                    );
                }
            }
            Err(e) => warn!("Block query failed: {:?}", e),
        }
    }
}
