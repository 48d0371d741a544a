use auto_impl::auto_impl;

#[auto_impl(&, Box, Arc)]
pub trait WaypointEventListener: Send + Sync {
    /// `reached` is `false` when the waypoint was skipped.
    fn on_waypoint_reached(&self, index: usize, reached: bool);

    fn on_new_waypoint_target(&self, index: usize);
}
