use tracing::debug;

use crate::{traits::WaypointEventListener, WaypointEvent};

/// Forwards waypoint events to a [`flume`] channel.
///
/// Events are silently dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelEventListener {
    sender: flume::Sender<WaypointEvent>,
}

impl ChannelEventListener {
    pub fn new() -> (Self, flume::Receiver<WaypointEvent>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, event: WaypointEvent) {
        if self.sender.send(event).is_err() {
            debug!("event receiver is disconnected: {event:?}");
        }
    }
}

impl WaypointEventListener for ChannelEventListener {
    fn on_waypoint_reached(&self, index: usize, reached: bool) {
        self.send(WaypointEvent::Reached { index, reached });
    }

    fn on_new_waypoint_target(&self, index: usize) {
        self.send(WaypointEvent::NewTarget { index });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_events() {
        let (listener, rx) = ChannelEventListener::new();
        listener.on_new_waypoint_target(0);
        listener.on_waypoint_reached(0, false);
        listener.on_waypoint_reached(1, true);
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                WaypointEvent::NewTarget { index: 0 },
                WaypointEvent::Reached {
                    index: 0,
                    reached: false
                },
                WaypointEvent::Reached {
                    index: 1,
                    reached: true
                },
            ]
        );
    }

    #[test]
    fn test_disconnected_receiver() {
        let (listener, rx) = ChannelEventListener::new();
        drop(rx);
        listener.on_new_waypoint_target(3);
    }
}
