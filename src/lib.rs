//! Slope Roller - a ball rolling along drawn paths
//!
//! Core modules:
//! - `sim`: Per-tick simulation (path following, free fall, obstacle collisions)
//! - `simulation`: Run/stop/reset lifecycle around the tick
//! - `scene`: Authored paths and obstacles
//! - `settings`: Numeric parameters and canvas bounds

pub mod logging;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod simulation;

pub use scene::Scene;
pub use settings::{Canvas, Settings};
pub use simulation::Simulation;

use glam::Vec2;

/// Simulation tuning constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Gravity in pixels/s² (9.8 scaled to screen units)
    pub const GRAVITY: f32 = 9.8 * 60.0;
    /// Gravity scale while airborne (free fall is tuned much softer)
    pub const AIRBORNE_GRAVITY_SCALE: f32 = 0.1;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;

    /// Canvas floor: vertical restitution and horizontal friction per contact
    pub const FLOOR_RESTITUTION: f32 = 0.6;
    pub const FLOOR_FRICTION: f32 = 0.8;
    /// Side walls: horizontal restitution
    pub const WALL_RESTITUTION: f32 = 0.8;
    /// Airborne ball resting on the floor halts below this speed (per axis)
    pub const AIRBORNE_REST_SPEED: f32 = 0.5;

    /// Default ramp: per-tick velocity decay once the ball reaches the floor
    pub const RAMP_FLOOR_DECAY: f32 = 0.98;
    /// Default ramp: halt below this speed
    pub const RAMP_REST_SPEED: f32 = 0.1;
    /// Default ramp start offset, as a fraction of canvas size
    pub const RAMP_MARGIN: f32 = 0.1;
    /// Default ramp height, as a fraction of canvas height
    pub const RAMP_EXTENT: f32 = 0.8;

    /// Scalar path velocity multiplier when hitting a block
    pub const BLOCK_IMPACT_DAMPING: f32 = 0.5;
    /// Bounce walls return more than they receive
    pub const BOUNCE_BOOST: f32 = 1.2;
    /// Seconds before a used teleport pair can fire again
    pub const TELEPORT_COOLDOWN_SECS: f32 = 1.0;

    /// Obstacle defaults for editing
    pub const OBSTACLE_SIZE: f32 = 40.0;
    pub const TELEPORT_RADIUS: f32 = 20.0;
    /// Eraser reach for obstacles and path points
    pub const ERASE_OBSTACLE_RADIUS: f32 = 20.0;
    pub const ERASE_PATH_RADIUS: f32 = 10.0;
}

/// Unit vector pointing along `angle` (radians from +x, y down)
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a vector from horizontal (radians, y down)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
