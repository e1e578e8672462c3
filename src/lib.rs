//! # RC Stick Library
//!
//! Read RC transmitter sticks from a Linux joystick device.
//!
//! This library opens a joydev node (`/dev/input/jsN`), normalizes raw axis
//! samples through per-axis calibration into [0.0, 1.0], and exposes the
//! latest position of four control axes (throttle, yaw, pitch, roll) and two
//! switches to a single-threaded caller.

pub mod calibration;
pub mod config;
pub mod error;
pub mod joydev;
pub mod stick;
