use auto_impl::auto_impl;
use nalgebra::Point2;

use crate::{error::Result, NavigationParams};

/// Reactive navigator driving the robot toward one target at a time.
#[auto_impl(&, Box, Arc)]
pub trait SingleTargetNavigator: Send + Sync {
    /// Begin, or redirect, the pursuit of `params.target`.
    fn navigate(&self, params: &NavigationParams) -> Result<()>;

    /// Run one control cycle. Velocity commands are sent from here.
    fn navigation_step(&self) -> Result<()>;

    fn cancel(&self) -> Result<()>;

    /// Robot-specific feasibility check for a point in the robot frame.
    fn is_relative_point_reachable(&self, point: &Point2<f64>) -> bool;
}
