use std::sync::Arc;

use assert_approx_eq::assert_approx_eq;
use nav_interface::{
    ChannelEventListener, DummyRobotBase, DummySingleTargetNavigator, Isometry2,
    NavigationParams, Point2, RobotBase, SingleTargetNavigator, WaypointEvent,
    WaypointEventListener,
};

fn params(x: f64, y: f64, intermediary: bool) -> NavigationParams {
    NavigationParams {
        target: Isometry2::translation(x, y),
        target_frame_id: "map".to_owned(),
        target_allowed_distance: 0.3,
        target_is_relative: false,
        target_is_intermediary_waypoint: intermediary,
        target_desired_rel_speed: 1.0,
    }
}

#[test]
fn test_trait_objects() {
    let base: Box<dyn RobotBase> = Box::new(DummyRobotBase::new());
    base.stop(true).unwrap();
    let pose = base.current_pose_and_velocity().unwrap();
    assert_approx_eq!(pose.heading(), 0.0);

    let nav = Arc::new(DummySingleTargetNavigator::with_reachable_radius(1.0));
    let shared: Arc<dyn SingleTargetNavigator> = nav.clone();
    shared.navigate(&params(1.0, 0.0, true)).unwrap();
    shared.navigation_step().unwrap();
    assert!(!shared.is_relative_point_reachable(&Point2::new(0.0, 1.5)));
    assert_eq!(nav.step_count(), 1);
    assert_eq!(nav.current_params().unwrap(), params(1.0, 0.0, true));

    let (listener, rx) = ChannelEventListener::new();
    let by_ref: &dyn WaypointEventListener = &listener;
    by_ref.on_new_waypoint_target(2);
    assert_eq!(rx.recv().unwrap(), WaypointEvent::NewTarget { index: 2 });
}

#[test]
fn test_has_reached_target() {
    let last = params(0.0, 0.0, false);
    assert!(last.has_reached_target(0.29));
    assert!(!last.has_reached_target(0.3));
    let intermediary = params(0.0, 0.0, true);
    assert!(!intermediary.has_reached_target(0.0));
}

#[test]
fn test_listener_across_threads() {
    let (listener, rx) = ChannelEventListener::new();
    let handles = (0..4)
        .map(|i| {
            let listener = listener.clone();
            std::thread::spawn(move || listener.on_waypoint_reached(i, true))
        })
        .collect::<Vec<_>>();
    for h in handles {
        h.join().unwrap();
    }
    drop(listener);
    let mut indices = rx
        .iter()
        .map(|e| match e {
            WaypointEvent::Reached { index, .. } => index,
            WaypointEvent::NewTarget { index } => index,
        })
        .collect::<Vec<_>>();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}
