//! Movement projection: turns "go 100 units" into one speed per turn

mod goal;
mod projection;

pub use goal::{Axis, MovementGoal, MovementLimits};
pub use projection::{distance_until_stop, new_target_speed};
