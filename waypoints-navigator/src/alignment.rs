use std::f64::consts::{PI, TAU};

/// Whether the robot is rotating in place toward the heading of a waypoint.
///
/// While [`Aligning`](AlignmentState::Aligning), the single-target navigator
/// is not stepped so the alignment command stays in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentState {
    #[default]
    NotAligning,
    Aligning {
        waypoint_index: usize,
    },
}

impl AlignmentState {
    pub fn is_aligning(&self) -> bool {
        matches!(self, Self::Aligning { .. })
    }
}

/// Signed angle [rad] to rotate from `from` to reach `to`, in `(-pi, pi]`.
///
/// ```
/// use assert_approx_eq::assert_approx_eq;
/// use waypoints_navigator::angle_difference;
///
/// assert_approx_eq!(angle_difference(0.0, 1.0), 1.0);
/// assert_approx_eq!(angle_difference(3.0, -3.0), 2.0 * std::f64::consts::PI - 6.0);
/// ```
pub fn angle_difference(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}
