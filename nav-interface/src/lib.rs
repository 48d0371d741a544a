mod clients;
mod error;
mod traits;
mod types;

pub use clients::*;
pub use error::*;
pub use traits::*;
pub use types::*;

// re-export
pub use nalgebra::{Isometry2, Point2, Vector2};
