//! Pursuit-tracked deviation of a base path
//!
//! Re-traces a previously generated path the way a towed sensor actually
//! follows its planned line: every base waypoint gets uniform jitter, then a
//! damped pure-pursuit controller chases the jittered waypoints with a fixed
//! step length, turning toward each goal by a fraction of the angular error
//! per step instead of snapping onto it.

use std::fmt;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::heading_dir;

/// Default bound on pursuit steps. The tracking loop has no natural bound,
/// so runaway parameter combinations stop here instead of spinning forever.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Named deviation presets selected by the configuration's
/// `deviation_param` (1 = low, 2 = high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseProfile {
    Low,
    High,
}

impl NoiseProfile {
    /// Resolve a raw configuration selector into a profile
    pub fn from_param(param: i32) -> Result<Self, DeviationError> {
        match param {
            1 => Ok(NoiseProfile::Low),
            2 => Ok(NoiseProfile::High),
            other => Err(DeviationError::InvalidNoiseParam(other)),
        }
    }

    /// Numeric parameters for this profile
    pub fn params(self) -> DeviationParams {
        match self {
            NoiseProfile::Low => DeviationParams {
                noise_max: 0.5,
                step_len: 0.25,
                goal_threshold: 2.0,
                end_threshold: 1.0,
                error_threshold: 5.0,
                heading_weight: 0.2,
                max_steps: DEFAULT_MAX_STEPS,
            },
            NoiseProfile::High => DeviationParams {
                noise_max: 1.5,
                step_len: 0.25,
                goal_threshold: 2.0,
                end_threshold: 1.0,
                error_threshold: 10.0,
                heading_weight: 0.2,
                max_steps: DEFAULT_MAX_STEPS,
            },
        }
    }
}

/// Numeric knobs of the pursuit tracker.
///
/// Usually produced by [`NoiseProfile::params`]; public fields so callers
/// with unusual needs can run [`DeviatedPath::generate_with`] directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationParams {
    /// Per-axis uniform jitter applied to every base waypoint
    pub noise_max: f32,
    /// Distance advanced per pursuit step
    pub step_len: f32,
    /// Distance at which the tracker moves on to the next goal
    pub goal_threshold: f32,
    /// Distance to the final goal that counts as arrival
    pub end_threshold: f32,
    /// Distance from the current goal that aborts the trace
    pub error_threshold: f32,
    /// Fraction of the angular error folded into the heading per step
    pub heading_weight: f32,
    /// Hard cap on emitted pursuit steps
    pub max_steps: usize,
}

/// How a pursuit trace ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingOutcome {
    /// Arrived within `end_threshold` of the final goal
    Reached,
    /// Strayed past `error_threshold` from the current goal
    Diverged,
    /// Hit `max_steps` before arriving
    StepLimit,
}

/// A pursuit-tracked re-trace of a base path.
///
/// Built once by [`DeviatedPath::generate`] and read-only afterward. A
/// [`Diverged`](TrackingOutcome::Diverged) or
/// [`StepLimit`](TrackingOutcome::StepLimit) trace keeps the partial path;
/// neither is an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviatedPath {
    points: Vec<Vec3>,
    heading: f32,
    outcome: TrackingOutcome,
}

impl DeviatedPath {
    /// Trace `base` under a named noise profile.
    ///
    /// Requires at least two base waypoints.
    pub fn generate(
        base: &[Vec3],
        profile: NoiseProfile,
        rng: &mut impl Rng,
    ) -> Result<Self, DeviationError> {
        Self::generate_with(base, &profile.params(), rng)
    }

    /// Trace `base` under explicit parameters
    pub fn generate_with(
        base: &[Vec3],
        params: &DeviationParams,
        rng: &mut impl Rng,
    ) -> Result<Self, DeviationError> {
        if base.len() < 2 {
            return Err(DeviationError::BaseTooShort(base.len()));
        }

        // Jittered copy of the base waypoints; z carried through untouched
        let goals: Vec<Vec3> = base
            .iter()
            .map(|p| {
                Vec3::new(
                    p.x + rng.random_range(-params.noise_max..=params.noise_max),
                    p.y + rng.random_range(-params.noise_max..=params.noise_max),
                    p.z,
                )
            })
            .collect();

        let last_idx = goals.len() - 1;
        let mut points = vec![goals[0]];
        let mut heading = (goals[1].y - goals[0].y).atan2(goals[1].x - goals[0].x);
        let mut goal_idx = 1;
        let mut steps = 0;

        let outcome = loop {
            let goal = goals[goal_idx];
            let dist = points[points.len() - 1].distance(goal);

            if dist < params.goal_threshold {
                goal_idx = (goal_idx + 1).min(last_idx);

                if goal_idx == last_idx && dist < params.end_threshold {
                    break TrackingOutcome::Reached;
                }
                if goal_idx != last_idx {
                    continue;
                }
                // Advanced onto the final goal but not close enough yet:
                // keep steering toward the goal measured this iteration
            } else if dist > params.error_threshold {
                log::warn!(
                    "deviated path strayed {dist:.2} from goal {goal_idx} (limit {})",
                    params.error_threshold
                );
                break TrackingOutcome::Diverged;
            }

            if steps >= params.max_steps {
                log::warn!(
                    "deviated path hit the {} step cap before goal {goal_idx}",
                    params.max_steps
                );
                break TrackingOutcome::StepLimit;
            }
            steps += 1;

            // Goal bearing in the heading frame; fold a fraction of it into
            // the heading, then advance one fixed step
            let last = points[points.len() - 1];
            let diff = goal - last;
            let (sin_h, cos_h) = heading.sin_cos();
            let bearing =
                (diff.y * cos_h - diff.x * sin_h).atan2(diff.x * cos_h + diff.y * sin_h);
            heading += params.heading_weight * bearing;

            points.push(last + params.step_len * heading_dir(heading));
        };

        Ok(Self {
            points,
            heading,
            outcome,
        })
    }

    /// Ordered waypoints of the deviated path, never empty
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Final tracker heading in radians (accumulated, not renormalized)
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// How the trace ended
    pub fn outcome(&self) -> TrackingOutcome {
        self.outcome
    }

    /// Whether the trace arrived at the final goal
    pub fn reached(&self) -> bool {
        self.outcome == TrackingOutcome::Reached
    }
}

/// Deviation construction failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviationError {
    /// Selector outside the closed profile set
    InvalidNoiseParam(i32),
    /// Pursuit tracking needs at least two base waypoints
    BaseTooShort(usize),
}

impl fmt::Display for DeviationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviationError::InvalidNoiseParam(param) => {
                write!(f, "invalid noise parameter {param}, expected 1 or 2")
            }
            DeviationError::BaseTooShort(len) => {
                write!(f, "base path has {len} point(s), pursuit needs at least 2")
            }
        }
    }
}

impl std::error::Error for DeviationError {}
