use auto_impl::auto_impl;

use crate::{error::Result, BaseVelocity, PoseVelocity};

/// Mobile base whose pose is known and which accepts velocity commands.
#[auto_impl(&, Box, Arc)]
pub trait RobotBase: Send + Sync {
    fn current_pose_and_velocity(&self) -> Result<PoseVelocity>;

    /// Halt any motion. `emergency` requests the fastest possible stop.
    fn stop(&self, emergency: bool) -> Result<()>;

    /// Velocity command rotating the robot in place by `angular_error` [rad].
    ///
    /// Returns `None` if the robot can not rotate in place.
    fn alignment_command(&self, angular_error: f64) -> Option<BaseVelocity>;

    fn send_velocity(&self, velocity: &BaseVelocity) -> Result<()>;
}
