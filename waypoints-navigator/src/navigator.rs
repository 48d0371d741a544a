use std::{fmt, time::Duration};

use nalgebra::{Isometry2, Point2};
use nav_interface::{
    NavigationParams, PoseVelocity, RobotBase, SingleTargetNavigator, WaypointEventListener,
};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::{
    angle_difference,
    command::{dispatch, Command},
    segment_distance, AlignmentState, Error, NavigationStatusSequence, ReachabilityFilter,
    WaypointSequence, WaypointsNavigatorConfig,
};

const SLOW_APPROACH_REL_SPEED: f64 = 0.05;
const NOMINAL_REL_SPEED: f64 = 1.0;

#[derive(Debug, Clone, Default)]
struct NavigationRun {
    status: NavigationStatusSequence,
    alignment: AlignmentState,
}

#[derive(Debug, Default)]
struct SharedState {
    run: NavigationRun,
    /// Bumped every time the run is replaced or canceled.
    generation: u64,
    step_in_progress: bool,
    /// Set by a `cancel` during a step, forwarded once the step is done.
    cancel_pending: bool,
}

/// Drives a [`SingleTargetNavigator`] through a [`WaypointSequence`].
///
/// [`navigation_step`](Self::navigation_step) must be called periodically.
/// [`navigate_waypoints`](Self::navigate_waypoints),
/// [`waypoint_nav_status`](Self::waypoint_nav_status) and
/// [`cancel`](Self::cancel) may be called from other threads at any time,
/// and from the collaborators while they are called by a step.
///
/// The state lock is never held while a collaborator is called. A step works
/// on a copy of the run and commits it only if the run was not replaced or
/// canceled in the meantime.
pub struct WaypointsNavigator<R, N, L>
where
    R: RobotBase,
    N: SingleTargetNavigator,
    L: WaypointEventListener,
{
    robot: R,
    navigator: N,
    listener: L,
    config: WaypointsNavigatorConfig,
    filter: ReachabilityFilter,
    state: Mutex<SharedState>,
}

impl<R, N, L> WaypointsNavigator<R, N, L>
where
    R: RobotBase,
    N: SingleTargetNavigator,
    L: WaypointEventListener,
{
    pub fn new(robot: R, navigator: N, listener: L, config: WaypointsNavigatorConfig) -> Self {
        debug!("new WaypointsNavigator with {config:?}");
        if let Err(e) = config.validate() {
            warn!("{e}");
        }
        Self {
            robot,
            navigator,
            listener,
            filter: ReachabilityFilter::new(&config),
            config,
            state: Mutex::new(SharedState::default()),
        }
    }

    pub fn config(&self) -> &WaypointsNavigatorConfig {
        &self.config
    }

    /// Starts a new navigation, replacing the current one if any.
    pub fn navigate_waypoints(&self, sequence: &WaypointSequence) -> Result<(), Error> {
        sequence.validate()?;
        let mut state = self.state.lock();
        state.run = NavigationRun {
            status: NavigationStatusSequence::start(sequence),
            alignment: AlignmentState::NotAligning,
        };
        state.generation += 1;
        info!(
            "Start navigation through {} waypoints",
            sequence.waypoints.len()
        );
        Ok(())
    }

    /// Returns a copy of the current status.
    pub fn waypoint_nav_status(&self) -> NavigationStatusSequence {
        self.state.lock().run.status.clone()
    }

    pub fn is_navigating(&self) -> bool {
        self.state.lock().run.status.is_navigating()
    }

    pub fn alignment_state(&self) -> AlignmentState {
        self.state.lock().run.alignment
    }

    /// Clears the status and cancels the single-target navigator.
    ///
    /// If a step is in progress, the single-target navigator is canceled
    /// when that step is done, after the commands it already issued.
    pub fn cancel(&self) -> Result<(), Error> {
        let mut state = self.state.lock();
        state.run = NavigationRun::default();
        state.generation += 1;
        info!("Waypoint navigation canceled");
        if state.step_in_progress {
            state.cancel_pending = true;
            return Ok(());
        }
        drop(state);
        self.navigator.cancel()?;
        Ok(())
    }

    /// Whether a point in the robot frame can be reached from the current pose.
    pub fn is_relative_point_reachable(&self, point: &Point2<f64>) -> bool {
        self.navigator.is_relative_point_reachable(point)
    }

    /// Runs one control cycle.
    ///
    /// Does nothing if there is no navigation in progress, or if another step
    /// is in progress (including a step called by a collaborator from within
    /// a step). If the pose of the robot is unavailable, the status is left
    /// untouched and [`Error::PoseUnavailable`] is returned.
    pub fn navigation_step(&self) -> Result<(), Error> {
        let (generation, run) = {
            let mut state = self.state.lock();
            if !state.run.status.is_navigating() {
                return Ok(());
            }
            if state.step_in_progress {
                trace!("Navigation step already in progress");
                return Ok(());
            }
            state.step_in_progress = true;
            (state.generation, state.run.clone())
        };

        let result = self.step_run(generation, run);

        let cancel_pending = {
            let mut state = self.state.lock();
            state.step_in_progress = false;
            std::mem::take(&mut state.cancel_pending)
        };
        let cancel_result = if cancel_pending {
            self.navigator.cancel().map_err(Error::from)
        } else {
            Ok(())
        };
        result.and(cancel_result)
    }

    fn step_run(&self, generation: u64, mut run: NavigationRun) -> Result<(), Error> {
        let pose_vel = self
            .robot
            .current_pose_and_velocity()
            .map_err(Error::PoseUnavailable)?;

        let commands = self.decide(&mut run, &pose_vel);

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                debug!("Navigation changed during the step, discarding it");
                return Ok(());
            }
            state.run = run;
        }
        dispatch(
            &commands,
            &self.robot,
            &self.navigator,
            &self.listener,
            || self.state.lock().generation == generation,
        )
    }

    /// Calls [`navigation_step`](Self::navigation_step) every `period` until
    /// the navigation ends or is canceled.
    ///
    /// Step failures are logged and the step is retried on the next tick.
    pub async fn run(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if !self.is_navigating() {
                break;
            }
            match self.navigation_step() {
                Ok(()) => {}
                Err(Error::PoseUnavailable(e)) => warn!("Skipping navigation step: {e}"),
                Err(e) => warn!("Navigation step failed: {e}"),
            }
        }
        debug!("Waypoint navigation loop finished");
    }

    fn decide(&self, run: &mut NavigationRun, pose_vel: &PoseVelocity) -> Vec<Command> {
        let mut commands = vec![];
        let status = &mut run.status;
        let pose = pose_vel.pose;
        let prev_index = status.waypoint_index_current_goal;
        let was_aligning = run.alignment.is_aligning();
        let mut is_aligning = false;

        let current = Point2::from(pose.translation.vector);
        let last = status
            .last_robot_pose
            .map_or(current, |p| Point2::from(p.translation.vector));
        status.last_robot_pose = Some(pose);

        // 1) default policy: go through the waypoints one by one
        if let Some(index) = status.waypoint_index_current_goal {
            let n = status.waypoints.len();
            let wp = &mut status.waypoints[index];
            let dist_to_target = segment_distance(&last, &current, &wp.waypoint.target);
            if dist_to_target < wp.waypoint.allowed_distance || was_aligning {
                let consider_reached = match wp.waypoint.target_heading {
                    None => true,
                    Some(target_heading) => {
                        let ang_err = angle_difference(pose_vel.heading(), target_heading);
                        if ang_err.abs() <= self.config.waypoint_angle_tolerance_rad() {
                            true
                        } else if was_aligning {
                            is_aligning = true;
                            trace!(
                                "Waiting for the robot to get aligned: current_heading={:.02} deg target_heading={:.02} deg",
                                pose_vel.heading().to_degrees(),
                                target_heading.to_degrees()
                            );
                            false
                        } else {
                            is_aligning = true;
                            let align_cmd = self.robot.alignment_command(ang_err);
                            info!(
                                "Trying to align to heading: {:.02} deg. Relative heading: {:.02} deg. With motion cmd: {:?}",
                                target_heading.to_degrees(),
                                ang_err.to_degrees(),
                                align_cmd
                            );
                            commands.push(Command::Stop { emergency: false });
                            match align_cmd {
                                Some(cmd) => {
                                    commands.push(Command::SendVelocity(cmd));
                                    false
                                }
                                // this robot can not rotate in place
                                None => true,
                            }
                        }
                    }
                };

                if consider_reached {
                    is_aligning = false;
                    debug!(
                        "Waypoint {}/{} reached. segment-to-target dist: {:.03}, allowed_dist: {:.03}",
                        index + 1,
                        n,
                        dist_to_target,
                        wp.waypoint.allowed_distance
                    );
                    wp.mark_reached(false);
                    commands.push(Command::WaypointReached {
                        index,
                        reached: true,
                    });
                    if index + 1 < n {
                        status.waypoint_index_current_goal = Some(index + 1);
                    } else {
                        status.final_goal_reached = true;
                    }
                }
            }
        }

        // 2) skip ahead to a more advanced waypoint if it can be reached already
        if let Some(index) = status.waypoint_index_current_goal {
            if !status.final_goal_reached && status.waypoints[index].waypoint.allow_skip {
                let most_advanced = self.filter.most_advanced_reachable(
                    &mut status.waypoints,
                    index,
                    &pose,
                    |local| self.navigator.is_relative_point_reachable(local),
                );
                if most_advanced > index {
                    // the waypoint being aligned to, if any, is skipped as well
                    is_aligning = false;
                    status.waypoint_index_current_goal = Some(most_advanced);
                    for k in index..most_advanced {
                        debug!("Waypoint {}/{} skipped", k + 1, status.waypoints.len());
                        status.waypoints[k].mark_reached(true);
                        commands.push(Command::WaypointReached {
                            index: k,
                            reached: false,
                        });
                    }
                }
            }
        }

        // still not started: begin with the first waypoint
        let index = *status.waypoint_index_current_goal.get_or_insert(0);

        // 3) send a new single-target command only if the active waypoint changed
        if prev_index != Some(index) {
            let wp = &status.waypoints[index].waypoint;
            let is_final_wp = status.is_last_index(index);
            let params = NavigationParams {
                target: Isometry2::new(wp.target.coords, wp.target_heading.unwrap_or(0.0)),
                target_frame_id: wp.target_frame_id.clone(),
                target_allowed_distance: wp.allowed_distance,
                target_is_relative: false,
                target_is_intermediary_waypoint: !is_final_wp,
                target_desired_rel_speed: if is_final_wp || wp.target_heading.is_some() {
                    SLOW_APPROACH_REL_SPEED
                } else {
                    NOMINAL_REL_SPEED
                },
            };
            commands.push(Command::NewWaypointTarget { index });
            commands.push(Command::Navigate(params));
            debug!("Active waypoint changed. Current status:\n{status}");
        }

        // the single-target navigator runs after the waypoint events of this
        // step, and not at all while the alignment command is in effect
        if !is_aligning {
            commands.push(Command::NavigationStep);
        }

        run.alignment = if is_aligning {
            AlignmentState::Aligning {
                waypoint_index: index,
            }
        } else {
            AlignmentState::NotAligning
        };
        commands
    }
}

impl<R, N, L> fmt::Debug for WaypointsNavigator<R, N, L>
where
    R: RobotBase,
    N: SingleTargetNavigator,
    L: WaypointEventListener,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaypointsNavigator")
            .field("config", &self.config)
            .field("run", &self.state.lock().run)
            .finish_non_exhaustive()
    }
}
