//! Waypoints navigator.
//!
//! [`WaypointsNavigator`] takes an ordered list of [`Waypoint`]s and feeds
//! them one at a time to a [`SingleTargetNavigator`](nav_interface::SingleTargetNavigator),
//! deciding on every [`navigation_step`](WaypointsNavigator::navigation_step)
//! whether the active waypoint was reached, whether the robot must first
//! rotate to the waypoint heading, and whether it may skip ahead to a
//! waypoint further down the list.

mod alignment;
mod command;
mod config;
mod error;
mod navigator;
mod reachability;
mod waypoint;

pub use crate::{
    alignment::*, config::*, error::*, navigator::*, reachability::*, waypoint::*,
};
