//! # Configuration Module
//!
//! Handles loading and validating calibration profiles from TOML files.
//!
//! Every field defaults to the Great Planes InterLink Elite table, so an
//! empty profile file (or no file at all) reproduces the built-in
//! calibration exactly. A profile for another controller model overrides
//! only what differs:
//!
//! ```toml
//! [axes.throttle]
//! number = 3
//! min = -32000
//! mid = 0
//! max = 32000
//!
//! [switches]
//! left = 4
//! right = 5
//! ```

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::calibration::{AxisBinding, AxisCalibration, Profile};
use crate::error::Result;

/// Calibration profile as it appears on disk.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    #[serde(default)]
    pub axes: AxesConfig,

    #[serde(default)]
    pub switches: SwitchConfig,
}

/// Per-axis calibration sections.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AxesConfig {
    #[serde(default = "default_throttle")]
    pub throttle: AxisConfig,

    #[serde(default = "default_yaw")]
    pub yaw: AxisConfig,

    #[serde(default = "default_pitch")]
    pub pitch: AxisConfig,

    #[serde(default = "default_roll")]
    pub roll: AxisConfig,
}

/// One axis: the raw device axis number and its three reference samples.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AxisConfig {
    pub number: u8,
    pub min: i32,
    pub mid: i32,
    pub max: i32,
}

/// Switch button numbers.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SwitchConfig {
    #[serde(default = "default_left_switch")]
    pub left: u8,

    #[serde(default = "default_right_switch")]
    pub right: u8,
}

// Default value functions (Great Planes InterLink Elite)
fn default_throttle() -> AxisConfig {
    AxisConfig { number: 2, min: 21620, mid: 0, max: -22296 }
}
fn default_yaw() -> AxisConfig {
    AxisConfig { number: 4, min: -20607, mid: 0, max: 25336 }
}
fn default_pitch() -> AxisConfig {
    AxisConfig { number: 1, min: 21957, mid: 0, max: -19594 }
}
fn default_roll() -> AxisConfig {
    AxisConfig { number: 0, min: -20945, mid: 0, max: 25336 }
}
fn default_left_switch() -> u8 { 0 }
fn default_right_switch() -> u8 { 1 }

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            throttle: default_throttle(),
            yaw: default_yaw(),
            pitch: default_pitch(),
            roll: default_roll(),
        }
    }
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            left: default_left_switch(),
            right: default_right_switch(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            axes: AxesConfig::default(),
            switches: SwitchConfig::default(),
        }
    }
}

impl ProfileConfig {
    /// Load a calibration profile from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rc_stick::config::ProfileConfig;
    ///
    /// let profile = ProfileConfig::load("profiles/interlink-elite.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Profile> {
        let contents = fs::read_to_string(path)?;
        let config: ProfileConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config.to_profile())
    }

    /// Converts the on-disk representation into the runtime table.
    #[must_use]
    pub fn to_profile(&self) -> Profile {
        let bind = |axis: &AxisConfig| AxisBinding {
            number: axis.number,
            cal: AxisCalibration::new(axis.min, axis.mid, axis.max),
        };
        Profile {
            axes: [
                bind(&self.axes.throttle),
                bind(&self.axes.yaw),
                bind(&self.axes.pitch),
                bind(&self.axes.roll),
            ],
            switches: [self.switches.left, self.switches.right],
        }
    }

    /// Validate profile values.
    ///
    /// The normalization formula divides by `mid - min` and `max - mid`, so
    /// degenerate rows are rejected here instead of being a runtime hazard.
    fn validate(&self) -> Result<()> {
        let named = [
            ("throttle", &self.axes.throttle),
            ("yaw", &self.axes.yaw),
            ("pitch", &self.axes.pitch),
            ("roll", &self.axes.roll),
        ];

        for (name, axis) in named {
            if axis.min == axis.mid || axis.mid == axis.max {
                return Err(crate::error::StickError::Config(toml::de::Error::custom(
                    format!("axis {} min, mid and max must be pairwise distinct around mid", name),
                )));
            }
        }

        for (i, (name_a, a)) in named.iter().enumerate() {
            for (name_b, b) in named.iter().skip(i + 1) {
                if a.number == b.number {
                    return Err(crate::error::StickError::Config(toml::de::Error::custom(
                        format!("axes {} and {} share raw axis number {}", name_a, name_b, a.number),
                    )));
                }
            }
        }

        if self.switches.left == self.switches.right {
            return Err(crate::error::StickError::Config(toml::de::Error::custom(
                "left and right switches cannot share a button number",
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProfileConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_matches_builtin_profile() {
        let config: ProfileConfig = toml::from_str("").unwrap();
        assert_eq!(config.to_profile(), Profile::default());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config: ProfileConfig = toml::from_str(
            r#"
[switches]
left = 4
right = 5
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        let profile = config.to_profile();
        assert_eq!(profile.switches, [4, 5]);
        assert_eq!(profile.axes, Profile::default().axes);
    }

    #[test]
    fn test_min_equal_to_mid_rejected() {
        let config: ProfileConfig = toml::from_str(
            r#"
[axes.throttle]
number = 2
min = 0
mid = 0
max = -22296
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mid_equal_to_max_rejected() {
        let config: ProfileConfig = toml::from_str(
            r#"
[axes.yaw]
number = 4
min = -20607
mid = 25336
max = 25336
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_axis_numbers_rejected() {
        let config: ProfileConfig = toml::from_str(
            r#"
[axes.yaw]
number = 2
min = -20607
mid = 0
max = 25336
"#,
        )
        .unwrap();
        // Throttle defaults to raw axis 2 as well
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_switch_numbers_rejected() {
        let config: ProfileConfig = toml::from_str(
            r#"
[switches]
left = 1
right = 1
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_profile_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[axes.throttle]
number = 3
min = -32000
mid = 100
max = 32000
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let profile = ProfileConfig::load(temp_file.path()).unwrap();
        assert_eq!(profile.axes[0].number, 3);
        assert_eq!(profile.axes[0].cal, AxisCalibration::new(-32000, 100, 32000));
        // Untouched rows keep the InterLink Elite defaults
        assert_eq!(profile.axes[1], Profile::default().axes[1]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProfileConfig::load("/nonexistent/profile.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not [ valid toml").unwrap();
        temp_file.flush().unwrap();

        assert!(ProfileConfig::load(temp_file.path()).is_err());
    }
}
