mod event_listener;
mod robot_base;
mod single_target_navigator;

pub use event_listener::*;
pub use robot_base::*;
pub use single_target_navigator::*;
