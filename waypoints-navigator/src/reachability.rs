use nalgebra::{Isometry2, Point2};
use tracing::trace;

use crate::{WaypointStatus, WaypointsNavigatorConfig};

/// Decides how far ahead of the active waypoint the robot may skip.
///
/// A waypoint is only adopted once it has been seen reachable on more than
/// `min_timesteps_confirm_skip_waypoints` steps, which filters out
/// single-step flickers of the robot-specific reachability check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachabilityFilter {
    /// `None` if the look-ahead distance is unlimited.
    pub max_distance: Option<f64>,
    pub min_timesteps_confirm: u32,
}

impl ReachabilityFilter {
    pub fn new(config: &WaypointsNavigatorConfig) -> Self {
        Self {
            max_distance: config
                .has_skip_distance_limit()
                .then_some(config.max_distance_to_allow_skip_waypoint),
            min_timesteps_confirm: config.min_timesteps_confirm_skip_waypoints,
        }
    }

    /// Scans the not yet reached waypoints from `start` and returns the most
    /// advanced one confirmed reachable, or `start` if there is none.
    ///
    /// `is_reachable` receives the waypoint in the frame of `robot_pose`.
    /// The scan never goes past the first waypoint which can not be skipped.
    pub fn most_advanced_reachable<F>(
        &self,
        waypoints: &mut [WaypointStatus],
        start: usize,
        robot_pose: &Isometry2<f64>,
        mut is_reachable: F,
    ) -> usize
    where
        F: FnMut(&Point2<f64>) -> bool,
    {
        let mut most_advanced = start;
        for (idx, wp) in waypoints.iter_mut().enumerate().skip(start) {
            if wp.reached {
                continue;
            }
            let local = robot_pose.inverse_transform_point(&wp.waypoint.target);
            let too_far = self
                .max_distance
                .is_some_and(|max| local.coords.norm() > max);

            if !too_far && is_reachable(&local) {
                wp.counter_seen_reachable += 1;
                trace!(
                    idx,
                    counter_seen_reachable = wp.counter_seen_reachable,
                    "waypoint seen reachable"
                );
                if wp.counter_seen_reachable > self.min_timesteps_confirm {
                    most_advanced = idx;
                }
            }

            if !wp.waypoint.allow_skip {
                break;
            }
        }
        most_advanced
    }
}
