//! Playback of a sampled trajectory.
//!
//! The cursor is a fractional sample index. Each [`FlightPlayer::advance`]
//! moves it by `speed · step_scale` and interpolates between the neighbouring
//! samples. Reaching the last sample lands the flight.

use serde::{Deserialize, Serialize};

use super::catmull_rom::segment_direction;
use super::core::Point3;
use super::trajectory::Trajectory;

/// Progress (percent) at which a stopped flight counts as landed.
const LANDED_PROGRESS: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightOptions {
    /// Sample indices advanced per unit of speed.
    pub step_scale: f64,
}

impl Default for FlightOptions {
    fn default() -> Self {
        Self { step_scale: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlightState {
    Idle,
    Flying,
    Landed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightPose {
    pub position: Point3,
    /// Heading about the vertical axis, `atan2(dx, dz)`.
    pub yaw: f64,
    /// Climb angle, `atan2(dy, |(dx, dz)|)`.
    pub pitch: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightStatus {
    pub altitude: f64,
    /// Percent of the path covered.
    pub progress: f64,
    pub state: FlightState,
}

#[derive(Debug, Clone)]
pub struct FlightPlayer {
    trajectory: Trajectory,
    options: FlightOptions,
    cursor: f64,
    flying: bool,
    pose: Option<FlightPose>,
}

impl FlightPlayer {
    #[must_use]
    pub fn new(trajectory: Trajectory) -> Self {
        Self::with_options(trajectory, FlightOptions::default())
    }

    #[must_use]
    pub fn with_options(trajectory: Trajectory, options: FlightOptions) -> Self {
        let pose = trajectory.points().first().map(|&position| FlightPose { position, yaw: 0.0, pitch: 0.0 });
        Self { trajectory, options, cursor: 0.0, flying: false, pose }
    }

    #[must_use]
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.flying
    }

    #[must_use]
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    #[must_use]
    pub fn pose(&self) -> Option<FlightPose> {
        self.pose
    }

    /// Starts (or resumes) the flight. A path with fewer than two samples
    /// cannot fly.
    pub fn start(&mut self) {
        self.flying = self.trajectory.len() >= 2;
    }

    pub fn stop(&mut self) {
        self.flying = false;
    }

    /// Back to the first sample, not flying.
    pub fn reset(&mut self) {
        *self = Self::with_options(std::mem::take(&mut self.trajectory), self.options);
    }

    fn last_index(&self) -> f64 {
        self.trajectory.len().saturating_sub(1) as f64
    }

    /// Moves the cursor by `speed · step_scale` samples.
    ///
    /// Returns the new pose, or `None` when not flying or when this step
    /// reached the end of the path (the flight lands and the pose is kept).
    pub fn advance(&mut self, speed: f64) -> Option<FlightPose> {
        if !self.flying || self.trajectory.is_empty() {
            return None;
        }

        self.cursor += speed * self.options.step_scale;
        let last = self.last_index();
        if self.cursor >= last {
            self.cursor = last;
            self.flying = false;
            log::debug!("flight: landed after {:.1} units", self.trajectory.total_length());
            return None;
        }
        self.cursor = self.cursor.max(0.0);

        let points = self.trajectory.points();
        let index = self.cursor.floor() as usize;
        let t = self.cursor - index as f64;
        let p1 = points[index];
        let p2 = points[(index + 1).min(points.len() - 1)];
        let position = p1.lerp(p2, t);

        let (yaw, pitch) = segment_direction(p1, p2).map_or_else(
            || self.pose.map_or((0.0, 0.0), |pose| (pose.yaw, pose.pitch)),
            |dir| (dir.x.atan2(dir.z), dir.y.atan2(dir.horizontal_length())),
        );

        let pose = FlightPose { position, yaw, pitch };
        self.pose = Some(pose);
        Some(pose)
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        let last = self.last_index();
        if last > 0.0 { self.cursor / last * 100.0 } else { 0.0 }
    }

    #[must_use]
    pub fn status(&self) -> FlightStatus {
        if self.trajectory.is_empty() {
            return FlightStatus { altitude: 0.0, progress: 0.0, state: FlightState::Idle };
        }
        let progress = self.progress();
        let state = if self.flying {
            FlightState::Flying
        } else if progress >= LANDED_PROGRESS {
            FlightState::Landed
        } else {
            FlightState::Idle
        };
        FlightStatus {
            altitude: self.pose.map_or(0.0, |pose| pose.position.y),
            progress,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Trajectory {
        Trajectory::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
            Point3::new(0.0, 2.0, 2.0),
        ])
    }

    #[test]
    fn idle_until_started() {
        let mut player = FlightPlayer::new(ramp());
        assert!(player.advance(1.0).is_none());
        assert_eq!(player.status().state, FlightState::Idle);
    }

    #[test]
    fn advance_interpolates_and_orients() {
        let mut player = FlightPlayer::new(ramp());
        player.start();
        let pose = player.advance(1.0).unwrap();
        assert_eq!(player.cursor(), 0.5);
        assert_eq!(pose.position, Point3::new(0.0, 0.5, 0.5));
        assert!(pose.yaw.abs() < 1e-12);
        assert!((pose.pitch - std::f64::consts::FRAC_PI_4).abs() < 1e-12);

        let status = player.status();
        assert_eq!(status.state, FlightState::Flying);
        assert!((status.progress - 25.0).abs() < 1e-12);
        assert!((status.altitude - 0.5).abs() < 1e-12);
    }

    #[test]
    fn reaching_the_end_lands() {
        let mut player = FlightPlayer::new(ramp());
        player.start();
        assert!(player.advance(3.0).is_some());
        assert!(player.advance(3.0).is_none());
        assert!(!player.is_flying());
        let status = player.status();
        assert_eq!(status.state, FlightState::Landed);
        assert_eq!(status.progress, 100.0);

        player.reset();
        assert_eq!(player.cursor(), 0.0);
        assert_eq!(player.status().state, FlightState::Idle);
        assert_eq!(player.trajectory().len(), 3);
    }

    #[test]
    fn empty_trajectory_status() {
        let mut player = FlightPlayer::new(Trajectory::default());
        player.start();
        assert!(!player.is_flying());
        assert_eq!(
            player.status(),
            FlightStatus { altitude: 0.0, progress: 0.0, state: FlightState::Idle }
        );
    }
}
