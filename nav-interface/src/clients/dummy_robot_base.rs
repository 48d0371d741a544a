use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::{error::Error, traits::RobotBase, BaseVelocity, PoseVelocity};

const DEFAULT_MAX_ALIGNMENT_VELOCITY: f64 = 1.0;

/// Dummy RobotBase for debug or tests.
#[derive(Debug)]
pub struct DummyRobotBase {
    pub current_pose: Mutex<PoseVelocity>,
    pub sent_velocities: Mutex<Vec<BaseVelocity>>,
    pub max_alignment_velocity: f64,
    pose_unavailable: AtomicBool,
    alignment_supported: AtomicBool,
    stop_count: AtomicUsize,
}

impl DummyRobotBase {
    pub fn new() -> Self {
        Self {
            current_pose: Mutex::new(PoseVelocity::default()),
            sent_velocities: Mutex::new(vec![]),
            max_alignment_velocity: DEFAULT_MAX_ALIGNMENT_VELOCITY,
            pose_unavailable: AtomicBool::new(false),
            alignment_supported: AtomicBool::new(true),
            stop_count: AtomicUsize::new(0),
        }
    }

    pub fn set_pose(&self, x: f64, y: f64, heading: f64) {
        *self.current_pose.lock() = PoseVelocity::from_pose(x, y, heading);
    }

    /// Makes `current_pose_and_velocity` fail until called again with `false`.
    pub fn set_pose_unavailable(&self, unavailable: bool) {
        self.pose_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_alignment_supported(&self, supported: bool) {
        self.alignment_supported.store(supported, Ordering::SeqCst);
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }

    pub fn last_sent_velocity(&self) -> Option<BaseVelocity> {
        self.sent_velocities.lock().last().copied()
    }
}

impl Default for DummyRobotBase {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotBase for DummyRobotBase {
    fn current_pose_and_velocity(&self) -> Result<PoseVelocity, Error> {
        if self.pose_unavailable.load(Ordering::SeqCst) {
            return Err(Error::Connection {
                message: "DummyRobotBase: pose is unavailable".to_owned(),
            });
        }
        Ok(*self.current_pose.lock())
    }

    fn stop(&self, _emergency: bool) -> Result<(), Error> {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        self.current_pose.lock().velocity = BaseVelocity::default();
        Ok(())
    }

    fn alignment_command(&self, angular_error: f64) -> Option<BaseVelocity> {
        if !self.alignment_supported.load(Ordering::SeqCst) {
            return None;
        }
        Some(BaseVelocity::rotation(angular_error.clamp(
            -self.max_alignment_velocity,
            self.max_alignment_velocity,
        )))
    }

    fn send_velocity(&self, velocity: &BaseVelocity) -> Result<(), Error> {
        self.sent_velocities.lock().push(*velocity);
        self.current_pose.lock().velocity = *velocity;
        Ok(())
    }
}
