use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::Point2;
use parking_lot::Mutex;

use crate::{error::Error, traits::SingleTargetNavigator, NavigationParams};

/// Dummy SingleTargetNavigator for debug or tests.
///
/// Points are reachable if they lie within `reachable_radius` of the robot,
/// or always if it is `None`.
#[derive(Debug, Default)]
pub struct DummySingleTargetNavigator {
    pub navigations: Mutex<Vec<NavigationParams>>,
    pub reachable_radius: Option<f64>,
    step_count: AtomicUsize,
    cancel_count: AtomicUsize,
}

impl DummySingleTargetNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reachable_radius(radius: f64) -> Self {
        Self {
            reachable_radius: Some(radius),
            ..Self::default()
        }
    }

    pub fn current_params(&self) -> Option<NavigationParams> {
        self.navigations.lock().last().cloned()
    }

    pub fn step_count(&self) -> usize {
        self.step_count.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }
}

impl SingleTargetNavigator for DummySingleTargetNavigator {
    fn navigate(&self, params: &NavigationParams) -> Result<(), Error> {
        self.navigations.lock().push(params.to_owned());
        Ok(())
    }

    fn navigation_step(&self) -> Result<(), Error> {
        self.step_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&self) -> Result<(), Error> {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_relative_point_reachable(&self, point: &Point2<f64>) -> bool {
        match self.reachable_radius {
            Some(radius) => point.coords.norm() <= radius,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Isometry2;

    use super::*;

    #[test]
    fn test_record_navigate() {
        let nav = DummySingleTargetNavigator::new();
        assert!(nav.current_params().is_none());
        let params = NavigationParams {
            target: Isometry2::translation(1.0, 2.0),
            target_frame_id: "map".to_owned(),
            target_allowed_distance: 0.2,
            target_is_relative: false,
            target_is_intermediary_waypoint: true,
            target_desired_rel_speed: 1.0,
        };
        nav.navigate(&params).unwrap();
        assert_eq!(nav.current_params(), Some(params));

        nav.navigation_step().unwrap();
        nav.navigation_step().unwrap();
        nav.cancel().unwrap();
        assert_eq!(nav.step_count(), 2);
        assert_eq!(nav.cancel_count(), 1);
    }

    #[test]
    fn test_reachable_radius() {
        let nav = DummySingleTargetNavigator::new();
        assert!(nav.is_relative_point_reachable(&Point2::new(100.0, 0.0)));

        let nav = DummySingleTargetNavigator::with_reachable_radius(2.0);
        assert!(nav.is_relative_point_reachable(&Point2::new(1.0, 1.0)));
        assert!(!nav.is_relative_point_reachable(&Point2::new(2.0, 1.0)));
    }
}
