use std::fmt;

use chrono::{DateTime, Utc};
use nalgebra::{Isometry2, Point2};
use serde::{Deserialize, Serialize};

use crate::Error;

const DEFAULT_TARGET_FRAME_ID: &str = "map";

fn default_allow_skip() -> bool {
    true
}

fn default_target_frame_id() -> String {
    DEFAULT_TARGET_FRAME_ID.to_owned()
}

/// A single target of a waypoint sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub target: Point2<f64>,
    /// Heading [rad] the robot must have at the target. `None` means any.
    #[serde(default)]
    pub target_heading: Option<f64>,
    /// The target counts as reached once the robot comes closer than this [m].
    pub allowed_distance: f64,
    /// Whether the navigator may jump past this waypoint without reaching it.
    #[serde(default = "default_allow_skip")]
    pub allow_skip: bool,
    #[serde(default = "default_target_frame_id")]
    pub target_frame_id: String,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, allowed_distance: f64, allow_skip: bool) -> Self {
        Self {
            target: Point2::new(x, y),
            target_heading: None,
            allowed_distance,
            allow_skip,
            target_frame_id: default_target_frame_id(),
        }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.target_heading = Some(heading);
        self
    }

    pub fn with_frame_id(mut self, frame_id: impl Into<String>) -> Self {
        self.target_frame_id = frame_id.into();
        self
    }

    pub fn is_valid(&self) -> bool {
        self.target.coords.iter().all(|v| v.is_finite())
            && self.target_heading.map_or(true, f64::is_finite)
            && self.allowed_distance.is_finite()
            && self.allowed_distance > 0.0
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target=({:.03},{:.03}) ", self.target.x, self.target.y)?;
        match self.target_heading {
            Some(heading) => write!(f, "heading={:.02}deg ", heading.to_degrees())?,
            None => write!(f, "heading=any ")?,
        }
        write!(
            f,
            "allowed_dist={:.03} allow_skip={} frame_id={}",
            self.allowed_distance, self.allow_skip, self.target_frame_id
        )
    }
}

/// Ordered list of waypoints submitted as one navigation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointSequence {
    pub waypoints: Vec<Waypoint>,
}

impl WaypointSequence {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Rejects empty sequences and sequences containing an invalid waypoint.
    pub fn validate(&self) -> Result<(), Error> {
        if self.waypoints.is_empty() {
            return Err(Error::InvalidArgument(
                "List of waypoints is empty".to_owned(),
            ));
        }
        if let Some((i, wp)) = self
            .waypoints
            .iter()
            .enumerate()
            .find(|(_, wp)| !wp.is_valid())
        {
            return Err(Error::InvalidArgument(format!(
                "Waypoint #{i} is invalid: {wp}"
            )));
        }
        Ok(())
    }
}

impl From<Vec<Waypoint>> for WaypointSequence {
    fn from(waypoints: Vec<Waypoint>) -> Self {
        Self::new(waypoints)
    }
}

/// A submitted waypoint together with its progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointStatus {
    #[serde(flatten)]
    pub waypoint: Waypoint,
    pub reached: bool,
    /// Only meaningful if `reached`: `true` if it was skipped rather than visited.
    pub skipped: bool,
    pub timestamp_reach: Option<DateTime<Utc>>,
    /// Number of steps this waypoint was seen reachable while a skip candidate.
    pub counter_seen_reachable: u32,
}

impl WaypointStatus {
    pub(crate) fn mark_reached(&mut self, skipped: bool) {
        self.reached = true;
        self.skipped = skipped;
        self.timestamp_reach = Some(Utc::now());
    }
}

impl From<Waypoint> for WaypointStatus {
    fn from(waypoint: Waypoint) -> Self {
        Self {
            waypoint,
            reached: false,
            skipped: false,
            timestamp_reach: None,
            counter_seen_reachable: 0,
        }
    }
}

impl fmt::Display for WaypointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} reached={} skipped={} counter_seen_reachable={}",
            self.waypoint, self.reached, self.skipped, self.counter_seen_reachable
        )
    }
}

/// Progress of a whole waypoint navigation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationStatusSequence {
    pub waypoints: Vec<WaypointStatus>,
    /// Index of the waypoint being pursued. `None` until the first step.
    pub waypoint_index_current_goal: Option<usize>,
    pub final_goal_reached: bool,
    /// Robot pose seen on the previous step.
    pub last_robot_pose: Option<Isometry2<f64>>,
    pub timestamp_nav_started: Option<DateTime<Utc>>,
}

impl NavigationStatusSequence {
    pub(crate) fn start(sequence: &WaypointSequence) -> Self {
        Self {
            waypoints: sequence
                .waypoints
                .iter()
                .cloned()
                .map(WaypointStatus::from)
                .collect(),
            timestamp_nav_started: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// `true` while there are waypoints left to reach.
    pub fn is_navigating(&self) -> bool {
        !self.waypoints.is_empty() && !self.final_goal_reached
    }

    pub fn active_waypoint(&self) -> Option<&WaypointStatus> {
        self.waypoint_index_current_goal
            .and_then(|i| self.waypoints.get(i))
    }

    pub fn is_last_index(&self, index: usize) -> bool {
        index + 1 == self.waypoints.len()
    }
}

impl fmt::Display for NavigationStatusSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Waypoint navigation status:")?;
        match self.waypoint_index_current_goal {
            Some(i) => writeln!(f, " waypoint_index_current_goal: {i}")?,
            None => writeln!(f, " waypoint_index_current_goal: (not started)")?,
        }
        writeln!(f, " final_goal_reached: {}", self.final_goal_reached)?;
        for (i, wp) in self.waypoints.iter().enumerate() {
            writeln!(f, " #{i:03}: {wp}")?;
        }
        Ok(())
    }
}

/// Minimum distance from the segment `a`-`b` to `point`.
pub fn segment_distance(a: &Point2<f64>, b: &Point2<f64>, point: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= f64::EPSILON {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (point - (a + ab * t)).norm()
}
