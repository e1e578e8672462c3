//! # Calibration Module
//!
//! Maps raw joystick axis samples into normalized [0.0, 1.0] values.
//!
//! ## Piecewise Linear Mapping
//!
//! Physical RC transmitter gimbals rarely travel symmetrically around their
//! resting center: the raw sample at full-left may have a different magnitude
//! (or even a different sign) than the sample at full-right. Each axis is
//! therefore calibrated with three raw samples (`min`, `mid`, `max`) and
//! mapped in two linear segments:
//!
//! - raw values below `mid` map into `[0.0, 0.5]`
//! - raw values at or above `mid` map into `[0.5, 1.0]`
//!
//! so that 0.5 always represents the physical center. The result is clamped
//! to `[0.0, 1.0]`, which also absorbs overshoot past the measured travel
//! limits.
//!
//! Inverted axes (`min > max`) work without special cases because the affine
//! map uses ratios, not ordering.
//!
//! ## Usage
//!
//! ```
//! use rc_stick::calibration::AxisCalibration;
//!
//! // Throttle on a Great Planes InterLink Elite
//! let cal = AxisCalibration::new(21620, 0, -22296);
//!
//! assert_eq!(cal.normalize(21620), 0.0);
//! assert_eq!(cal.normalize(0), 0.5);
//! assert_eq!(cal.normalize(-22296), 1.0);
//! ```

/// Affine transform from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Precondition: `in_min != in_max`. The calibration table guarantees this
/// for every real controller; violating it divides by zero and the result is
/// undefined.
#[must_use]
pub fn linear_map(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Saturates `value` to `[lo, hi]`. Assumes `lo <= hi`.
#[must_use]
pub fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    if value > hi {
        return hi;
    }
    if value < lo {
        return lo;
    }
    value
}

/// Per-axis calibration: the raw samples measured at the two travel limits
/// and at the resting center.
///
/// `min` maps to 0.0, `mid` to 0.5, `max` to 1.0. `min` and `max` may appear
/// in either numeric order (inverted raw direction is common).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisCalibration {
    /// Raw sample at the 0.0 end of travel.
    pub min: i32,
    /// Raw sample at the physical center.
    pub mid: i32,
    /// Raw sample at the 1.0 end of travel.
    pub max: i32,
}

impl AxisCalibration {
    /// Creates a calibration from three raw reference samples.
    ///
    /// Precondition: `min != mid` and `mid != max` (checked by the config
    /// layer when profiles are loaded, not here).
    #[must_use]
    pub const fn new(min: i32, mid: i32, max: i32) -> Self {
        Self { min, mid, max }
    }

    /// Normalizes a raw axis sample to `[0.0, 1.0]`.
    ///
    /// Samples on the `min` side of `mid` land in `[0.0, 0.5]`, samples at
    /// `mid` and beyond in `[0.5, 1.0]`, so `min` maps to exactly 0.0, `mid`
    /// to exactly 0.5 and `max` to exactly 1.0 regardless of raw direction.
    /// Overshoot past `min`/`max` is clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_stick::calibration::AxisCalibration;
    ///
    /// let cal = AxisCalibration::new(-20945, 0, 25336);
    /// assert_eq!(cal.normalize(0), 0.5);
    /// assert_eq!(cal.normalize(30000), 1.0); // clamped
    /// ```
    #[must_use]
    pub fn normalize(&self, raw: i32) -> f32 {
        // Segment selection must follow the axis's raw direction, otherwise
        // inverted axes (min > mid) would run their endpoints through the
        // opposite segment's slope.
        let min_side = if self.min < self.mid {
            raw < self.mid
        } else {
            raw > self.mid
        };
        let norm = if min_side {
            linear_map(raw as f32, self.min as f32, self.mid as f32, 0.0, 0.5)
        } else {
            linear_map(raw as f32, self.mid as f32, self.max as f32, 0.5, 1.0)
        };
        clamp(norm, 0.0, 1.0)
    }
}

/// Logical axes this driver cares about.
///
/// The discriminant doubles as the slot index in
/// [`StickState`](crate::stick::StickState).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Throttle = 0,
    Yaw = 1,
    Pitch = 2,
    Roll = 3,
}

impl Axis {
    /// All logical axes in slot order.
    pub const ALL: [Axis; 4] = [Axis::Throttle, Axis::Yaw, Axis::Pitch, Axis::Roll];
}

/// The two toggle switches this driver cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    Left = 0,
    Right = 1,
}

/// Binds a logical axis to a raw device axis number and its calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBinding {
    /// Raw axis number reported by the device for this control.
    pub number: u8,
    /// Calibration applied to samples from this axis.
    pub cal: AxisCalibration,
}

/// Calibration table for one controller model.
///
/// One [`AxisBinding`] per logical axis (indexed by [`Axis`]) plus the raw
/// button numbers of the two switches (indexed by [`Switch`]). Static data
/// for a given controller; swapping models means swapping the profile, not
/// the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Axis bindings in [`Axis`] slot order.
    pub axes: [AxisBinding; 4],
    /// Raw button numbers in [`Switch`] slot order.
    pub switches: [u8; 2],
}

impl Default for Profile {
    /// Calibration for the Great Planes InterLink Elite transmitter.
    fn default() -> Self {
        Self {
            axes: [
                AxisBinding {
                    number: 2,
                    cal: AxisCalibration::new(21620, 0, -22296),
                },
                AxisBinding {
                    number: 4,
                    cal: AxisCalibration::new(-20607, 0, 25336),
                },
                AxisBinding {
                    number: 1,
                    cal: AxisCalibration::new(21957, 0, -19594),
                },
                AxisBinding {
                    number: 0,
                    cal: AxisCalibration::new(-20945, 0, 25336),
                },
            ],
            switches: [0, 1],
        }
    }
}

impl Profile {
    /// Returns the binding for a logical axis.
    #[must_use]
    pub fn binding(&self, axis: Axis) -> &AxisBinding {
        &self.axes[axis as usize]
    }

    /// Finds the logical axis bound to a raw axis number, if any.
    #[must_use]
    pub fn axis_for(&self, number: u8) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&axis| self.axes[axis as usize].number == number)
    }

    /// Finds the switch bound to a raw button number, if any.
    #[must_use]
    pub fn switch_for(&self, number: u8) -> Option<Switch> {
        if self.switches[Switch::Left as usize] == number {
            Some(Switch::Left)
        } else if self.switches[Switch::Right as usize] == number {
            Some(Switch::Right)
        } else {
            None
        }
    }
}
