use nalgebra::{Isometry2, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseVelocity {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl BaseVelocity {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Velocity which only rotates the base in place.
    pub fn rotation(theta: f64) -> Self {
        Self::new(0.0, 0.0, theta)
    }
}

/// Estimated pose of the robot together with its current velocity.
#[derive(Clone, Debug, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseVelocity {
    pub pose: Isometry2<f64>,
    pub velocity: BaseVelocity,
}

impl PoseVelocity {
    pub fn new(pose: Isometry2<f64>, velocity: BaseVelocity) -> Self {
        Self { pose, velocity }
    }

    pub fn from_pose(x: f64, y: f64, heading: f64) -> Self {
        Self::new(
            Isometry2::new(Vector2::new(x, y), heading),
            BaseVelocity::default(),
        )
    }

    /// Heading of the robot in radians, in `(-pi, pi]`.
    pub fn heading(&self) -> f64 {
        self.pose.rotation.angle()
    }
}

impl Default for PoseVelocity {
    fn default() -> Self {
        Self::new(Isometry2::identity(), BaseVelocity::default())
    }
}

/// Command for a navigator which pursues one target at a time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationParams {
    pub target: Isometry2<f64>,
    pub target_frame_id: String,
    pub target_allowed_distance: f64,
    /// If `true`, `target` is expressed relative to the current robot pose.
    pub target_is_relative: bool,
    /// `true` while more waypoints follow this target.
    pub target_is_intermediary_waypoint: bool,
    /// Desired speed in `[0, 1]`, relative to the nominal speed of the robot.
    pub target_desired_rel_speed: f64,
}

impl NavigationParams {
    /// Whether the single-target navigator may consider its target reached.
    ///
    /// Intermediary waypoints are never reached from the single-target
    /// navigator's point of view: the waypoints navigator decides that.
    ///
    /// ```
    /// use nav_interface::{Isometry2, NavigationParams};
    ///
    /// let mut params = NavigationParams {
    ///     target: Isometry2::identity(),
    ///     target_frame_id: "map".to_owned(),
    ///     target_allowed_distance: 0.5,
    ///     target_is_relative: false,
    ///     target_is_intermediary_waypoint: false,
    ///     target_desired_rel_speed: 1.0,
    /// };
    /// assert!(params.has_reached_target(0.2));
    /// assert!(!params.has_reached_target(0.7));
    /// params.target_is_intermediary_waypoint = true;
    /// assert!(!params.has_reached_target(0.2));
    /// ```
    pub fn has_reached_target(&self, target_dist: f64) -> bool {
        !self.target_is_intermediary_waypoint && target_dist < self.target_allowed_distance
    }
}

/// Notification emitted by the waypoints navigator.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointEvent {
    /// `reached` is `false` if the waypoint was skipped.
    Reached { index: usize, reached: bool },
    NewTarget { index: usize },
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_pose_velocity_heading() {
        let p = PoseVelocity::from_pose(1.0, 2.0, 3.0);
        assert_approx_eq!(p.heading(), 3.0);
        assert_approx_eq!(p.pose.translation.x, 1.0);
        assert_approx_eq!(p.pose.translation.y, 2.0);

        let wrapped = PoseVelocity::from_pose(0.0, 0.0, 3.0 * std::f64::consts::FRAC_PI_2);
        assert_approx_eq!(wrapped.heading(), -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_rotation_velocity() {
        let v = BaseVelocity::rotation(0.3);
        assert_eq!(v, BaseVelocity::new(0.0, 0.0, 0.3));
    }
}
