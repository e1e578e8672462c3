//! # Linux Joydev Module
//!
//! Thin wrapper around the kernel joystick interface (`/dev/input/jsN`).
//!
//! The joydev interface delivers fixed-size binary event records and answers
//! capability queries via `ioctl`. See the
//! [kernel documentation](https://www.kernel.org/doc/html/latest/input/joydev/joystick-api.html)
//! for the protocol details.
//!
//! ## Event Records
//!
//! Each read yields one `struct js_event` (8 bytes):
//!
//! | Field  | Type | Description |
//! |--------|------|-------------|
//! | time   | u32  | Event timestamp in milliseconds |
//! | value  | i16  | Axis position or button state |
//! | type   | u8   | `JS_EVENT_AXIS` / `JS_EVENT_BUTTON`, OR'd with `JS_EVENT_INIT` during startup replay |
//! | number | u8   | Axis or button index |

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use nix::{ioctl_read, ioctl_read_buf};
use tracing::debug;

/// Button press/release event.
pub const JS_EVENT_BUTTON: u8 = 0x01;
/// Axis movement event.
pub const JS_EVENT_AXIS: u8 = 0x02;
/// Flag OR'd into the type while the kernel replays the device's current
/// state right after open.
pub const JS_EVENT_INIT: u8 = 0x80;

// JSIOCG* capability queries, ioctl group 'j'.
ioctl_read!(js_get_version, b'j', 0x01, u32);
ioctl_read!(js_get_axes, b'j', 0x11, u8);
ioctl_read!(js_get_buttons, b'j', 0x12, u8);
ioctl_read_buf!(js_get_name, b'j', 0x13, u8);

fn ioctl_err(errno: nix::errno::Errno) -> io::Error {
    io::Error::from_raw_os_error(errno as i32)
}

/// One raw joystick event, layout-compatible with the kernel `js_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct JsEvent {
    /// Event timestamp in milliseconds.
    pub time: u32,
    /// Axis position or button state.
    pub value: i16,
    /// Event type bits.
    pub type_: u8,
    /// Axis or button index.
    pub number: u8,
}

/// Classification of a [`JsEvent`] with the INIT flag stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Axis movement (or initial axis position).
    Axis,
    /// Button press/release (or initial button state).
    Button,
    /// Anything else; ignored by this driver.
    Other,
}

impl JsEvent {
    /// Size of the kernel event record in bytes.
    pub const SIZE: usize = 8;

    /// Decodes one event from the raw bytes read off the device.
    #[must_use]
    pub fn from_ne_bytes(buf: [u8; Self::SIZE]) -> Self {
        Self {
            time: u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: i16::from_ne_bytes([buf[4], buf[5]]),
            type_: buf[6],
            number: buf[7],
        }
    }

    /// Classifies the event, treating startup-replay (INIT) events the same
    /// as live ones.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self.type_ & !JS_EVENT_INIT {
            JS_EVENT_AXIS => EventKind::Axis,
            JS_EVENT_BUTTON => EventKind::Button,
            _ => EventKind::Other,
        }
    }

    /// True when this event is part of the kernel's startup state replay.
    #[must_use]
    pub fn is_init(&self) -> bool {
        self.type_ & JS_EVENT_INIT != 0
    }
}

/// Whether reads should wait for the next event or return immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// `read` blocks until an event is available.
    Blocking,
    /// `read` returns immediately; "no data" is reported as `Ok(None)`.
    NonBlocking,
}

/// Capability metadata reported by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Human-readable device name.
    pub name: String,
    /// Joydev driver protocol version.
    pub version: u32,
    /// Number of axes the device reports.
    pub axes: u8,
    /// Number of buttons the device reports.
    pub buttons: u8,
}

/// An open joydev device node.
///
/// Owns the file handle; dropping the device releases it.
pub struct JsDevice {
    file: File,
}

impl JsDevice {
    /// Opens a joystick device node read-only.
    ///
    /// A driver-version query doubles as a sanity check: regular files and
    /// non-joydev device nodes fail it with `ENOTTY`, so opening something
    /// that is not a joystick is reported here rather than on the first read.
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the node cannot be opened or does not
    /// answer the joydev version ioctl.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true);
        if mode == ReadMode::NonBlocking {
            options.custom_flags(libc::O_NONBLOCK);
        }
        let file = options.open(path.as_ref())?;
        let device = Self { file };
        let version = device.driver_version()?;
        debug!(
            "Opened joystick {} (driver version 0x{:x})",
            path.as_ref().display(),
            version
        );
        Ok(device)
    }

    /// Wraps an already-open descriptor, skipping the joydev sanity check.
    ///
    /// In-crate tests use this to feed synthetic event streams through the
    /// read path.
    #[cfg(test)]
    pub(crate) fn from_file(file: File) -> Self {
        Self { file }
    }

    /// Reads exactly one event record.
    ///
    /// Returns `Ok(None)` when the device is in non-blocking mode and no
    /// event is pending. Any other failure, including end-of-file and short
    /// reads, is an error; the caller should treat the device as lost.
    pub fn read_event(&mut self) -> io::Result<Option<JsEvent>> {
        let mut buf = [0u8; JsEvent::SIZE];
        match self.file.read(&mut buf) {
            Ok(n) if n == JsEvent::SIZE => Ok(Some(JsEvent::from_ne_bytes(buf))),
            Ok(0) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "joystick device closed",
            )),
            Ok(n) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("short joystick event read ({n} bytes)"),
            )),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Queries the joydev driver protocol version (`JSIOCGVERSION`).
    pub fn driver_version(&self) -> io::Result<u32> {
        let mut version: u32 = 0;
        unsafe { js_get_version(self.file.as_raw_fd(), &mut version) }.map_err(ioctl_err)?;
        Ok(version)
    }

    /// Queries the number of axes (`JSIOCGAXES`).
    pub fn num_axes(&self) -> io::Result<u8> {
        let mut axes: u8 = 0;
        unsafe { js_get_axes(self.file.as_raw_fd(), &mut axes) }.map_err(ioctl_err)?;
        Ok(axes)
    }

    /// Queries the number of buttons (`JSIOCGBUTTONS`).
    pub fn num_buttons(&self) -> io::Result<u8> {
        let mut buttons: u8 = 0;
        unsafe { js_get_buttons(self.file.as_raw_fd(), &mut buttons) }.map_err(ioctl_err)?;
        Ok(buttons)
    }

    /// Queries the human-readable device name (`JSIOCGNAME`).
    pub fn name(&self) -> io::Result<String> {
        let mut buf = [0u8; 128];
        unsafe { js_get_name(self.file.as_raw_fd(), &mut buf) }.map_err(ioctl_err)?;
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
    }

    /// Gathers all capability metadata in one call.
    pub fn info(&self) -> io::Result<DeviceInfo> {
        Ok(DeviceInfo {
            name: self.name()?,
            version: self.driver_version()?,
            axes: self.num_axes()?,
            buttons: self.num_buttons()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Event Decoding Tests ====================

    #[test]
    fn test_event_record_size_matches_kernel() {
        assert_eq!(std::mem::size_of::<JsEvent>(), JsEvent::SIZE);
        assert_eq!(JsEvent::SIZE, 8);
    }

    #[test]
    fn test_decode_axis_event() {
        let mut buf = [0u8; JsEvent::SIZE];
        buf[0..4].copy_from_slice(&1234u32.to_ne_bytes());
        buf[4..6].copy_from_slice(&(-22296i16).to_ne_bytes());
        buf[6] = JS_EVENT_AXIS;
        buf[7] = 2;

        let event = JsEvent::from_ne_bytes(buf);
        assert_eq!(event.time, 1234);
        assert_eq!(event.value, -22296);
        assert_eq!(event.type_, JS_EVENT_AXIS);
        assert_eq!(event.number, 2);
        assert_eq!(event.kind(), EventKind::Axis);
        assert!(!event.is_init());
    }

    #[test]
    fn test_decode_button_event() {
        let mut buf = [0u8; JsEvent::SIZE];
        buf[4..6].copy_from_slice(&1i16.to_ne_bytes());
        buf[6] = JS_EVENT_BUTTON;
        buf[7] = 1;

        let event = JsEvent::from_ne_bytes(buf);
        assert_eq!(event.kind(), EventKind::Button);
        assert_eq!(event.value, 1);
        assert_eq!(event.number, 1);
    }

    #[test]
    fn test_init_flag_stripped_by_kind() {
        let event = JsEvent {
            time: 0,
            value: 0,
            type_: JS_EVENT_AXIS | JS_EVENT_INIT,
            number: 0,
        };
        assert_eq!(event.kind(), EventKind::Axis);
        assert!(event.is_init());

        let event = JsEvent {
            time: 0,
            value: 1,
            type_: JS_EVENT_BUTTON | JS_EVENT_INIT,
            number: 1,
        };
        assert_eq!(event.kind(), EventKind::Button);
        assert!(event.is_init());
    }

    #[test]
    fn test_unknown_event_kind() {
        let event = JsEvent {
            time: 0,
            value: 0,
            type_: 0x04,
            number: 0,
        };
        assert_eq!(event.kind(), EventKind::Other);
    }

    // ==================== Open Tests ====================

    #[test]
    fn test_open_nonexistent_path() {
        let result = JsDevice::open("/dev/input/js-does-not-exist", ReadMode::NonBlocking);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_regular_file_is_not_a_joystick() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0u8; 16]).unwrap();
        temp_file.flush().unwrap();

        // Opens fine as a file but fails the JSIOCGVERSION sanity check
        let result = JsDevice::open(temp_file.path(), ReadMode::NonBlocking);
        assert!(result.is_err());
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_open_with_real_hardware() {
        // This test requires a joystick at /dev/input/js0
        let device = JsDevice::open("/dev/input/js0", ReadMode::NonBlocking)
            .expect("Should open connected joystick");

        let info = device.info().expect("Should query capabilities");
        assert!(!info.name.is_empty());
        assert!(info.axes > 0);
    }
}
