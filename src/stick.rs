//! # Stick Session Module
//!
//! Owns an open joystick device and maintains the latest calibrated state of
//! the four control axes and two switches.
//!
//! ## Dispatch
//!
//! Each poll reads exactly one raw event and updates at most one field:
//!
//! - Axis events whose number matches a configured binding are normalized
//!   through that axis's calibration and stored.
//! - Button events whose number matches a configured switch store the raw
//!   value verbatim (switches are not clamped).
//! - Everything else (unknown numbers, unknown event kinds) is silently
//!   ignored. Devices report more controls than this driver cares about and
//!   that is fine.
//!
//! Startup-replay (INIT) events update state exactly like live events, so a
//! freshly opened session converges on the device's real position without
//! the sticks having to move.
//!
//! ## Lifecycle
//!
//! A session is either open or closed. It closes on explicit [`Joystick::close`],
//! on a fatal read error, or on drop. Closed is terminal: `poll` and `info`
//! report [`StickError::SessionClosed`], while the state accessors keep
//! returning the last-known values.
//!
//! ## Usage
//!
//! ```no_run
//! use rc_stick::calibration::Axis;
//! use rc_stick::joydev::ReadMode;
//! use rc_stick::stick::{Joystick, Poll};
//!
//! let mut stick = Joystick::open("/dev/input/js0", ReadMode::NonBlocking)?;
//! loop {
//!     match stick.poll()? {
//!         Poll::Updated => println!("throttle: {:.2}", stick.axis(Axis::Throttle)),
//!         Poll::NoData => break, // caller's loop decides when to retry
//!     }
//! }
//! # Ok::<(), rc_stick::error::StickError>(())
//! ```

use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::calibration::{Axis, Profile, Switch};
use crate::error::{Result, StickError};
use crate::joydev::{DeviceInfo, EventKind, JsDevice, JsEvent, ReadMode};

/// Outcome of a successful [`Joystick::poll`].
///
/// Fatal read failures are not a variant here; they surface as
/// [`StickError::DeviceLost`] and close the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// One event was read and dispatched.
    Updated,
    /// Non-blocking mode and nothing pending; state unchanged. Not an
    /// error; retry from the caller's loop.
    NoData,
}

/// Last-known calibrated state of the configured controls.
///
/// Axes default to 0.0 until their first event arrives; every stored axis
/// value is in `[0.0, 1.0]`. Switch values pass through raw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickState {
    axes: [f32; 4],
    switches: [i16; 2],
}

impl Default for StickState {
    fn default() -> Self {
        Self {
            axes: [0.0; 4],
            switches: [0; 2],
        }
    }
}

impl StickState {
    /// Returns the last-known normalized value of a logical axis.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> f32 {
        self.axes[axis as usize]
    }

    /// Returns the last-known raw value of a switch.
    #[must_use]
    pub fn switch_state(&self, switch: Switch) -> i16 {
        self.switches[switch as usize]
    }

    /// Dispatches one raw event against a profile, updating at most one
    /// field. Returns whether anything was stored.
    pub fn apply(&mut self, profile: &Profile, event: &JsEvent) -> bool {
        match event.kind() {
            EventKind::Axis => {
                if let Some(axis) = profile.axis_for(event.number) {
                    let value = profile.binding(axis).cal.normalize(i32::from(event.value));
                    trace!(
                        "axis {} raw {} -> {:?} = {:.3}",
                        event.number,
                        event.value,
                        axis,
                        value
                    );
                    self.axes[axis as usize] = value;
                    return true;
                }
                false
            }
            EventKind::Button => {
                if let Some(switch) = profile.switch_for(event.number) {
                    trace!(
                        "button {} value {} -> {:?}",
                        event.number,
                        event.value,
                        switch
                    );
                    self.switches[switch as usize] = event.value;
                    return true;
                }
                false
            }
            EventKind::Other => false,
        }
    }
}

/// A single-owner joystick session.
///
/// Not thread-safe; poll from one thread only. Closing from another thread
/// while a blocking read is outstanding is not supported; use
/// [`ReadMode::NonBlocking`] with your own timeout loop if you need
/// cancellation.
pub struct Joystick {
    device: Option<JsDevice>,
    profile: Profile,
    state: StickState,
    device_path: String,
}

impl Joystick {
    /// Opens a joystick session with the default calibration profile.
    ///
    /// # Errors
    ///
    /// Returns [`StickError::Open`] when the device node is missing,
    /// inaccessible, or not a joystick. No retry is attempted and no session
    /// is created.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self> {
        Self::open_with_profile(path, mode, Profile::default())
    }

    /// Opens a joystick session with an explicit calibration profile.
    ///
    /// # Errors
    ///
    /// Same as [`Joystick::open`].
    pub fn open_with_profile<P: AsRef<Path>>(
        path: P,
        mode: ReadMode,
        profile: Profile,
    ) -> Result<Self> {
        let device_path = path.as_ref().to_string_lossy().into_owned();
        let device = JsDevice::open(path.as_ref(), mode).map_err(|source| StickError::Open {
            path: device_path.clone(),
            source,
        })?;
        info!("Joystick session opened at {}", device_path);
        Ok(Self {
            device: Some(device),
            profile,
            state: StickState::default(),
            device_path,
        })
    }

    /// Reads and dispatches exactly one raw event.
    ///
    /// # Errors
    ///
    /// - [`StickError::SessionClosed`] if the session is already closed.
    /// - [`StickError::DeviceLost`] on any read failure other than "would
    ///   block"; the handle is released and the session becomes closed. The
    ///   caller must re-open to continue.
    pub fn poll(&mut self) -> Result<Poll> {
        let device = self.device.as_mut().ok_or(StickError::SessionClosed)?;
        match device.read_event() {
            Ok(Some(event)) => {
                self.state.apply(&self.profile, &event);
                Ok(Poll::Updated)
            }
            Ok(None) => Ok(Poll::NoData),
            Err(e) => {
                warn!("Joystick {} lost: {}", self.device_path, e);
                // Release the handle; the session is unusable from here on.
                self.device = None;
                Err(StickError::DeviceLost(e))
            }
        }
    }

    /// Returns the last-known normalized value of a logical axis.
    ///
    /// Safe on a closed session (returns the value from before the close).
    /// An axis that has never received an event reads 0.0.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> f32 {
        self.state.axis(axis)
    }

    /// Returns the last-known raw value of a switch.
    ///
    /// Safe on a closed session.
    #[must_use]
    pub fn switch_state(&self, switch: Switch) -> i16 {
        self.state.switch_state(switch)
    }

    /// Returns a snapshot of the full stored state.
    #[must_use]
    pub fn state(&self) -> StickState {
        self.state
    }

    /// Queries device metadata for diagnostics. Read-only; no state change.
    ///
    /// # Errors
    ///
    /// - [`StickError::SessionClosed`] if the session is closed.
    /// - [`StickError::Io`] if a capability ioctl fails.
    pub fn info(&self) -> Result<DeviceInfo> {
        let device = self.device.as_ref().ok_or(StickError::SessionClosed)?;
        Ok(device.info()?)
    }

    /// Returns the path this session was opened with.
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// True once the session has been closed (explicitly or by a fatal
    /// read).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.device.is_none()
    }

    /// Releases the device handle. Idempotent; a no-op when already closed.
    pub fn close(&mut self) {
        if self.device.take().is_some() {
            debug!("Joystick session at {} closed", self.device_path);
        }
    }
}
