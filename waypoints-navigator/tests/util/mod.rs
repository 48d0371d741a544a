use std::f64::consts::PI;

use nav_interface::{
    BaseVelocity, Error, NavigationParams, Point2, PoseVelocity, RobotBase,
    SingleTargetNavigator, WaypointEventListener,
};
use parking_lot::Mutex;

/// Call made on one of the collaborators, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Stop,
    Velocity(BaseVelocity),
    Reached(usize, bool),
    NewTarget(usize),
    Navigate(NavigationParams),
    Step,
    Cancel,
    /// Sent by the single-target navigator once its target is reached.
    NavigationEnded,
}

#[derive(Debug)]
struct SimState {
    pose: PoseVelocity,
    target: Option<NavigationParams>,
    ended: bool,
}

/// Kinematic robot with a trivial single-target navigator.
///
/// Every single-target step moves the robot by at most `linear_step` toward
/// the current target. Every call of `rotate` applies the last velocity
/// command as a rotation of `angular_step * theta.signum()`.
#[derive(Debug)]
pub struct SimRobot {
    state: Mutex<SimState>,
    pub calls: Mutex<Vec<Call>>,
    pub linear_step: f64,
    pub angular_step: f64,
    pub can_rotate_in_place: bool,
    /// Reachability radius, in the robot frame.
    pub reachable_radius: f64,
}

impl SimRobot {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            state: Mutex::new(SimState {
                pose: PoseVelocity::from_pose(x, y, heading),
                target: None,
                ended: false,
            }),
            calls: Mutex::new(vec![]),
            linear_step: 0.5,
            angular_step: PI / 8.0,
            can_rotate_in_place: true,
            reachable_radius: 0.0,
        }
    }

    pub fn teleport(&self, x: f64, y: f64, heading: f64) {
        self.state.lock().pose = PoseVelocity::from_pose(x, y, heading);
    }

    pub fn pose(&self) -> PoseVelocity {
        self.state.lock().pose
    }

    /// Applies the current angular velocity for one control cycle.
    pub fn rotate(&self) {
        let mut state = self.state.lock();
        let theta = state.pose.velocity.theta;
        if theta != 0.0 {
            let (x, y) = (state.pose.pose.translation.x, state.pose.pose.translation.y);
            let heading = state.pose.heading() + self.angular_step * theta.signum();
            let velocity = state.pose.velocity;
            state.pose = PoseVelocity::from_pose(x, y, heading);
            state.pose.velocity = velocity;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| f(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl RobotBase for SimRobot {
    fn current_pose_and_velocity(&self) -> Result<PoseVelocity, Error> {
        Ok(self.state.lock().pose)
    }

    fn stop(&self, _emergency: bool) -> Result<(), Error> {
        self.state.lock().pose.velocity = BaseVelocity::default();
        self.record(Call::Stop);
        Ok(())
    }

    fn alignment_command(&self, angular_error: f64) -> Option<BaseVelocity> {
        self.can_rotate_in_place
            .then(|| BaseVelocity::rotation(angular_error.clamp(-1.0, 1.0)))
    }

    fn send_velocity(&self, velocity: &BaseVelocity) -> Result<(), Error> {
        self.state.lock().pose.velocity = *velocity;
        self.record(Call::Velocity(*velocity));
        Ok(())
    }
}

impl SingleTargetNavigator for SimRobot {
    fn navigate(&self, params: &NavigationParams) -> Result<(), Error> {
        let mut state = self.state.lock();
        state.target = Some(params.clone());
        state.ended = false;
        drop(state);
        self.record(Call::Navigate(params.clone()));
        Ok(())
    }

    fn navigation_step(&self) -> Result<(), Error> {
        self.record(Call::Step);
        let mut state = self.state.lock();
        let Some(target) = state.target.clone() else {
            return Ok(());
        };
        let current = Point2::from(state.pose.pose.translation.vector);
        let goal = Point2::from(target.target.translation.vector);
        let diff = goal - current;
        let dist = diff.norm();
        if target.has_reached_target(dist) {
            if !state.ended {
                state.ended = true;
                drop(state);
                self.record(Call::NavigationEnded);
            }
            return Ok(());
        }
        let next = if dist <= self.linear_step {
            goal
        } else {
            current + diff * (self.linear_step / dist)
        };
        let heading = state.pose.heading();
        state.pose = PoseVelocity::from_pose(next.x, next.y, heading);
        Ok(())
    }

    fn cancel(&self) -> Result<(), Error> {
        self.state.lock().target = None;
        self.record(Call::Cancel);
        Ok(())
    }

    fn is_relative_point_reachable(&self, point: &Point2<f64>) -> bool {
        point.coords.norm() <= self.reachable_radius
    }
}

impl WaypointEventListener for SimRobot {
    fn on_waypoint_reached(&self, index: usize, reached: bool) {
        self.record(Call::Reached(index, reached));
    }

    fn on_new_waypoint_target(&self, index: usize) {
        self.record(Call::NewTarget(index));
    }
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
