use nav_interface::{
    BaseVelocity, NavigationParams, RobotBase, SingleTargetNavigator, WaypointEventListener,
};
use tracing::{debug, trace, warn};

use crate::Error;

/// Side effect decided by a navigation step.
///
/// Steps record commands while deciding and execute them once the decision
/// is committed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Stop { emergency: bool },
    SendVelocity(BaseVelocity),
    WaypointReached { index: usize, reached: bool },
    NewWaypointTarget { index: usize },
    Navigate(NavigationParams),
    NavigationStep,
}

impl Command {
    fn execute<R, N, L>(&self, robot: &R, navigator: &N, listener: &L) -> Result<(), Error>
    where
        R: RobotBase,
        N: SingleTargetNavigator,
        L: WaypointEventListener,
    {
        trace!(command = ?self, "execute");
        match self {
            Self::Stop { emergency } => robot.stop(*emergency)?,
            Self::SendVelocity(velocity) => robot.send_velocity(velocity)?,
            Self::WaypointReached { index, reached } => {
                listener.on_waypoint_reached(*index, *reached)
            }
            Self::NewWaypointTarget { index } => listener.on_new_waypoint_target(*index),
            Self::Navigate(params) => navigator.navigate(params)?,
            Self::NavigationStep => navigator.navigation_step()?,
        }
        Ok(())
    }
}

/// Executes `commands` in order while `is_current` holds.
///
/// `is_current` is checked before every command, so a navigation replaced or
/// canceled by one of the collaborators drops the rest of the commands. A
/// failing command does not prevent the following ones from running; the
/// first error is returned.
pub(crate) fn dispatch<R, N, L, F>(
    commands: &[Command],
    robot: &R,
    navigator: &N,
    listener: &L,
    is_current: F,
) -> Result<(), Error>
where
    R: RobotBase,
    N: SingleTargetNavigator,
    L: WaypointEventListener,
    F: Fn() -> bool,
{
    let mut first_error = None;
    for (i, command) in commands.iter().enumerate() {
        if !is_current() {
            debug!(
                "Navigation changed, dropping {} remaining commands",
                commands.len() - i
            );
            break;
        }
        if let Err(e) = command.execute(robot, navigator, listener) {
            warn!("Failed to execute {command:?}: {e}");
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}
