//! # RC Stick
//!
//! Illustrative polling loop: opens a joystick device, prints its
//! capabilities, then logs the calibrated stick positions until the device
//! disappears.

use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use rc_stick::calibration::{Axis, Switch};
use rc_stick::error::StickError;
use rc_stick::joydev::ReadMode;
use rc_stick::stick::{Joystick, Poll};

/// Delay between polls when the device has nothing pending.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Number of updates between status log lines.
const LOG_INTERVAL_UPDATES: u64 = 100;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("RC Stick v{} starting...", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/input/js0".to_string());

    let mut stick = Joystick::open(&path, ReadMode::NonBlocking)?;

    let device = stick.info()?;
    info!(
        "name: {}, driver version: 0x{:x}, axes: {}, buttons: {}",
        device.name, device.version, device.axes, device.buttons
    );

    let mut updates: u64 = 0;

    loop {
        match stick.poll() {
            Ok(Poll::Updated) => {
                updates += 1;
                if updates % LOG_INTERVAL_UPDATES == 0 {
                    info!(
                        "throttle {:.2}  yaw {:.2}  pitch {:.2}  roll {:.2}  switches {}/{}",
                        stick.axis(Axis::Throttle),
                        stick.axis(Axis::Yaw),
                        stick.axis(Axis::Pitch),
                        stick.axis(Axis::Roll),
                        stick.switch_state(Switch::Left),
                        stick.switch_state(Switch::Right),
                    );
                }
            }
            Ok(Poll::NoData) => std::thread::sleep(IDLE_POLL_INTERVAL),
            Err(StickError::DeviceLost(e)) => {
                warn!(
                    "Device {} lost after {} updates: {}",
                    stick.device_path(),
                    updates,
                    e
                );
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
