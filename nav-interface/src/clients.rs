mod channel_event_listener;
mod dummy_robot_base;
mod dummy_single_target_navigator;

pub use channel_event_listener::*;
pub use dummy_robot_base::*;
pub use dummy_single_target_navigator::*;
