//! Survey Path - procedural sensor trajectory generation
//!
//! Core modules:
//! - `config`: Data-driven generation parameters
//! - `path`: Randomized straight/bend trajectory over a bounded square area
//! - `deviation`: Pursuit-tracked deviation of a base path
//!
//! Generation is pure and deterministic: both generators take an injected
//! RNG (seed a [`rand_pcg::Pcg32`] for reproducible runs) and run to
//! completion with no I/O. Scene assembly, sensor simulation and export
//! live in downstream consumers.

pub mod config;
pub mod deviation;
pub mod path;

pub use config::{ConfigError, PathConfig};
pub use deviation::{DeviatedPath, DeviationError, DeviationParams, NoiseProfile, TrackingOutcome};
pub use path::SensorPath;

use std::f32::consts::PI;
use std::fmt;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.sin().atan2(angle.cos());
    // atan2 can land on -π exactly; fold it onto the +π side
    if wrapped == -PI { PI } else { wrapped }
}

/// Unit step in the horizontal plane for a given heading (radians)
#[inline]
pub fn heading_dir(heading: f32) -> Vec3 {
    Vec3::new(heading.cos(), heading.sin(), 0.0)
}

/// Result of a full survey generation pass: the base path plus, when the
/// configuration asks for one, a pursuit-tracked deviation of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRun {
    pub base: SensorPath,
    pub deviated: Option<DeviatedPath>,
}

impl SurveyRun {
    /// The point sequence downstream consumers should follow: the deviated
    /// path when one was generated, the base path otherwise
    pub fn points(&self) -> &[Vec3] {
        match &self.deviated {
            Some(dev) => dev.points(),
            None => self.base.points(),
        }
    }
}

/// Top-level error for survey generation
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyError {
    Config(ConfigError),
    Deviation(DeviationError),
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyError::Config(err) => write!(f, "invalid configuration: {err}"),
            SurveyError::Deviation(err) => write!(f, "deviation failed: {err}"),
        }
    }
}

impl std::error::Error for SurveyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurveyError::Config(err) => Some(err),
            SurveyError::Deviation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SurveyError {
    fn from(err: ConfigError) -> Self {
        SurveyError::Config(err)
    }
}

impl From<DeviationError> for SurveyError {
    fn from(err: DeviationError) -> Self {
        SurveyError::Deviation(err)
    }
}

/// Generate a sensor path per configuration, deviating it when
/// `deviation_param` selects a noise profile (0 leaves the base path as-is).
///
/// Fails before generating any deviation point when `deviation_param` is
/// outside the known profile set.
pub fn generate_survey(config: &PathConfig, rng: &mut impl Rng) -> Result<SurveyRun, SurveyError> {
    config.validate()?;

    let base = SensorPath::generate(config, rng);
    let deviated = if config.deviation_param > 0 {
        let profile = NoiseProfile::from_param(config.deviation_param)?;
        Some(DeviatedPath::generate(base.points(), profile, rng)?)
    } else {
        None
    };

    Ok(SurveyRun { base, deviated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_normalize_angle_identity_in_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(1.0) - 1.0).abs() < 1e-6);
        assert!((normalize_angle(-3.0) + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_wraps() {
        // 3π/2 wraps to -π/2
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        // -3π/2 wraps to π/2
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        // Several turns collapse to the same heading
        assert!((normalize_angle(5.0 * PI) - normalize_angle(PI)).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_angle_half_turn_is_positive() {
        let n = normalize_angle(PI);
        assert!(n > 0.0 && n <= PI);
    }

    #[test]
    fn test_heading_dir_is_unit_and_horizontal() {
        for heading in [0.0, 0.7, -2.3, PI] {
            let dir = heading_dir(heading);
            assert!((dir.length() - 1.0).abs() < 1e-6);
            assert_eq!(dir.z, 0.0);
        }
    }

    #[test]
    fn test_generate_survey_without_deviation() {
        let config = PathConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let run = generate_survey(&config, &mut rng).unwrap();
        assert!(run.deviated.is_none());
        assert_eq!(run.points().len(), run.base.points().len());
    }

    #[test]
    fn test_generate_survey_with_deviation() {
        let config = PathConfig {
            deviation_param: 1,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let run = generate_survey(&config, &mut rng).unwrap();
        let dev = run.deviated.as_ref().unwrap();
        assert!(dev.points().len() > 1);
        // points() reports the deviated sequence
        assert_eq!(run.points().len(), dev.points().len());
    }

    #[test]
    fn test_generate_survey_rejects_unknown_profile() {
        let config = PathConfig {
            deviation_param: 3,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let err = generate_survey(&config, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SurveyError::Deviation(DeviationError::InvalidNoiseParam(3))
        );
    }

    #[test]
    fn test_generate_survey_rejects_bad_config() {
        let config = PathConfig {
            size: -10.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(matches!(
            generate_survey(&config, &mut rng),
            Err(SurveyError::Config(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_normalize_angle_in_range(angle in -100.0f32..100.0) {
            let n = normalize_angle(angle);
            prop_assert!(n > -PI && n <= PI);
            // Same heading, different winding
            prop_assert!((n.sin() - angle.sin()).abs() < 1e-4);
            prop_assert!((n.cos() - angle.cos()).abs() < 1e-4);
        }

        #[test]
        fn prop_point_add_sub_round_trip(
            ax in -1e3f32..1e3, ay in -1e3f32..1e3, az in -1e3f32..1e3,
            bx in -1e3f32..1e3, by in -1e3f32..1e3, bz in -1e3f32..1e3,
        ) {
            let a = Vec3::new(ax, ay, az);
            let b = Vec3::new(bx, by, bz);
            prop_assert!(((a + b) - b).distance(a) < 1e-2);
        }
    }
}
