//! Data-driven generation parameters
//!
//! Loaded and persisted by the surrounding system; the generators only read
//! it. Mirrors the `sensor_trajectory` block of the survey configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters controlling sensor path generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Side length of the square survey area; paths live in [-size/2, size/2]
    pub size: f32,
    /// Minimum number of bend segments per path
    pub bend_occ_min: u32,
    /// Maximum number of bend segments per path
    pub bend_occ_max: u32,
    /// Minimum bend radius (whole units)
    pub bend_radius_min: u32,
    /// Maximum bend radius (whole units)
    pub bend_radius_max: u32,
    /// Deviation profile selector: 0 disables deviation, 1 = low, 2 = high
    pub deviation_param: i32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            size: 30.0,
            bend_occ_min: 2,
            bend_occ_max: 5,
            bend_radius_min: 5,
            bend_radius_max: 10,
            deviation_param: 0,
        }
    }
}

impl PathConfig {
    /// Half-width of the survey area; the boundary coordinate used for
    /// termination checks
    #[inline]
    pub fn edge(&self) -> f32 {
        self.size / 2.0
    }

    /// Check that the area and sampling ranges are usable before generation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size > 0.0) {
            return Err(ConfigError::NonPositiveSize(self.size));
        }
        if self.bend_occ_min > self.bend_occ_max {
            return Err(ConfigError::InvertedBendCount {
                min: self.bend_occ_min,
                max: self.bend_occ_max,
            });
        }
        if self.bend_radius_min == 0 || self.bend_radius_min > self.bend_radius_max {
            return Err(ConfigError::BadBendRadius {
                min: self.bend_radius_min,
                max: self.bend_radius_max,
            });
        }
        Ok(())
    }
}

/// Configuration validation failure
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveSize(f32),
    InvertedBendCount { min: u32, max: u32 },
    BadBendRadius { min: u32, max: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveSize(size) => {
                write!(f, "survey area size must be positive, got {size}")
            }
            ConfigError::InvertedBendCount { min, max } => {
                write!(f, "bend count range [{min}, {max}] is inverted")
            }
            ConfigError::BadBendRadius { min, max } => {
                write!(f, "bend radius range [{min}, {max}] must start at 1 or more and not be inverted")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
