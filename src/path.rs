//! Randomized trajectory generation
//!
//! A sensor path enters the survey area at a random boundary point, runs an
//! initial straight leg, then alternates circular bends with straight legs
//! and finishes with a long straight leg that carries it out the far side.
//! Generation stops the instant a point lands outside the area; the partial
//! path is kept and flagged as terminated.

use std::f32::consts::FRAC_PI_2;
use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PathConfig;
use crate::{heading_dir, normalize_angle};

/// Distance between consecutive points on straight legs
pub const STRAIGHT_STEP: f32 = 0.5;

/// Shortest and longest random straight-leg lengths (whole units)
pub const LEG_LEN_MIN: u32 = 5;
pub const LEG_LEN_MAX: u32 = 10;

/// A generated sensor trajectory.
///
/// Built once by [`SensorPath::generate`] and read-only afterward. `points`
/// is the ordered waypoint sequence; `bend_points` records the start/end of
/// every completed bend for diagnostics and plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorPath {
    points: Vec<Vec3>,
    bend_points: Vec<Vec3>,
    heading: f32,
    terminated: bool,
}

impl SensorPath {
    /// Generate a randomized path inside the configured survey area.
    ///
    /// Leaving the area is the normal way a path ends and is reported via
    /// [`terminated`](Self::terminated), never as an error.
    pub fn generate(config: &PathConfig, rng: &mut impl Rng) -> Self {
        let edge = config.edge();

        // Random entry point on one of the four boundary edges
        let start = if rng.random_bool(0.5) {
            Vec3::new(random_sign(rng) * edge, rng.random_range(-edge..=edge), 0.0)
        } else {
            Vec3::new(rng.random_range(-edge..=edge), random_sign(rng) * edge, 0.0)
        };

        // Entry heading points back across the area, toward the origin side
        let heading = normalize_angle(start.y.atan2(start.x) + PI);
        log::debug!(
            "path start ({:.2}, {:.2}), heading {:.1}°",
            start.x,
            start.y,
            heading.to_degrees()
        );

        let mut path = Self {
            points: vec![start],
            bend_points: Vec::new(),
            heading,
            terminated: false,
        };

        path.straight_segment(rng.random_range(LEG_LEN_MIN..=LEG_LEN_MAX) as f32, edge);

        let num_bends = rng.random_range(config.bend_occ_min..=config.bend_occ_max);
        log::debug!("path bends: {num_bends}");

        for bend in 0..num_bends {
            let radius = rng.random_range(config.bend_radius_min..=config.bend_radius_max) as f32;
            // One of ±10°, ±20°, ±30°, ±40°
            let angle = random_sign(rng) * (rng.random_range(1..=4) * 10) as f32;

            if !path.terminated {
                path.curve_segment(angle, radius, edge);
                log::debug!(
                    "bend {}: {angle}° radius {radius}, heading now {:.1}°",
                    bend + 1,
                    path.heading.to_degrees()
                );
            }
            if !path.terminated {
                path.straight_segment(rng.random_range(LEG_LEN_MIN..=LEG_LEN_MAX) as f32, edge);
            }
        }

        // Final leg is long enough to reach the far boundary from anywhere
        if !path.terminated {
            path.straight_segment(2.0 * edge, edge);
        }

        path
    }

    /// Ordered waypoints of the path, never empty
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Start/end pairs of every completed bend
    pub fn bend_points(&self) -> &[Vec3] {
        &self.bend_points
    }

    /// Current heading in radians, in (-π, π]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Whether the path left the survey area
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// Walk straight along the current heading in fixed-length steps until
    /// `distance` is covered or the path leaves the area.
    fn straight_segment(&mut self, distance: f32, edge: f32) {
        if self.terminated {
            return;
        }

        let start = self.last();
        while self.last().distance(start) < distance {
            let next = self.last() + STRAIGHT_STEP * heading_dir(self.heading);
            self.points.push(next);

            if next.x.abs() > edge || next.y.abs() > edge {
                self.terminated = true;
                return;
            }
        }
    }

    /// Sweep a circular bend of `angle_deg` total turn in 1° steps.
    ///
    /// The bend pivots around a point at `radius` to the side of the current
    /// heading; the 0° arm of the sweep fixes an offset so the arc leaves the
    /// last point with no discontinuity. Completed bends record their start
    /// and end in `bend_points` and fold the turn into the heading.
    fn curve_segment(&mut self, angle_deg: f32, radius: f32, edge: f32) {
        if self.terminated {
            return;
        }

        let start = self.last();
        let turn = angle_deg.signum();
        let steps = angle_deg.abs() as u32;

        let pivot_arm = self.heading - turn * FRAC_PI_2;
        let offset = radius * heading_dir(pivot_arm);

        for i in 1..=steps {
            let arm = radius * heading_dir(turn * (i as f32).to_radians() + pivot_arm);
            let next = start + arm - offset;
            self.points.push(next);

            if next.x.abs() > edge || next.y.abs() > edge {
                // Partial bend: keep the points, skip the bend record
                self.terminated = true;
                return;
            }
        }

        self.bend_points.push(start);
        self.bend_points.push(self.last());
        self.heading = normalize_angle(self.heading + angle_deg.to_radians());
    }
}

fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
