//! Ball simulation module
//!
//! All physics lives here. This module is pure and single-threaded:
//! - Fixed timestep only
//! - Paths and obstacles are read, never modified
//! - Obstacles resolve in authored order
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod motion;
pub mod state;
pub mod tick;

pub use collision::{Penetration, Side, rect_penetration, resolve_obstacles};
pub use geometry::{Nearest, Proximity, Ramp, Segment, Surface, classify};
pub use motion::{MotionOutcome, MotionParams, roll_speed};
pub use state::{Ball, BallPose, Obstacle, Path, Portal, Rect, SimState, TeleportCooldown};
pub use tick::{TickOutcome, tick};
