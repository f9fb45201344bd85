//! Simulation state and authored data types
//!
//! The ball is the only moving body. Paths and obstacles are read-only
//! inputs owned by the scene.

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use crate::consts::*;

/// The rolling ball
///
/// Exactly one velocity representation is live at a time, selected by
/// `on_path`: the scalar `velocity` while following a path, `vel` while
/// airborne. The other one is kept at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Signed speed along `direction` (path-following only)
    pub velocity: f32,
    /// Free-fall velocity (airborne only)
    pub vel: Vec2,
    /// Visual spin in radians, unbounded
    pub rotation: f32,
    pub radius: f32,
    /// Result of the most recent path classification
    pub on_path: bool,
    /// Unit travel direction of the last path segment followed
    pub direction: Vec2,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            velocity: 0.0,
            vel: Vec2::ZERO,
            rotation: 0.0,
            radius,
            on_path: true,
            direction: Vec2::X,
        }
    }

    /// Put the ball at rest at `pos`
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.velocity = 0.0;
        self.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.on_path = true;
        self.direction = Vec2::X;
    }

    /// Switch to free fall, carrying the path speed over as a velocity vector
    pub fn leave_path(&mut self) {
        if !self.on_path {
            return;
        }
        self.vel = self.direction * self.velocity;
        self.velocity = 0.0;
        self.on_path = false;
    }

    /// Switch to path following along `direction`, keeping the velocity
    /// component that lies along it
    pub fn land_on_path(&mut self, direction: Vec2) {
        if self.on_path {
            return;
        }
        self.velocity = self.vel.dot(direction);
        self.vel = Vec2::ZERO;
        self.direction = direction;
        self.on_path = true;
    }

    pub fn pose(&self) -> BallPose {
        BallPose {
            position: self.pos,
            radius: self.radius,
            rotation: self.rotation,
            on_path: self.on_path,
        }
    }
}

/// What a renderer needs to draw the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallPose {
    pub position: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub on_path: bool,
}

/// An authored polyline the ball can roll along
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    pub points: Vec<Vec2>,
}

impl Path {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Paths with fewer than two points have no segments and are ignored
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    pub fn first(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    /// Consecutive point pairs in drawing order
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }
}

/// Axis-aligned rectangle given by its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Point test against the rectangle grown by `margin` on every side
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        let min = self.min() - Vec2::splat(margin);
        let max = self.max() + Vec2::splat(margin);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// A circular portal linked to the other portal sharing its id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub center: Vec2,
    pub radius: f32,
    pub teleport_id: u32,
}

/// User-placed obstacles (immovable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Obstacle {
    /// Solid block: stops the ball along the impact axis
    Block(Rect),
    /// Booster wall: reflects and amplifies
    Bounce(Rect),
    /// One end of a teleport pair
    Teleport(Portal),
}

impl Obstacle {
    pub fn block(center: Vec2, width: f32, height: f32) -> Self {
        Obstacle::Block(Rect::new(center, width, height))
    }

    pub fn bounce(center: Vec2, width: f32, height: f32) -> Self {
        Obstacle::Bounce(Rect::new(center, width, height))
    }

    pub fn teleport(center: Vec2, radius: f32, teleport_id: u32) -> Self {
        Obstacle::Teleport(Portal {
            center,
            radius,
            teleport_id,
        })
    }

    pub fn teleport_id(&self) -> Option<u32> {
        match self {
            Obstacle::Teleport(portal) => Some(portal.teleport_id),
            _ => None,
        }
    }
}

/// Remembers the teleport pair used last so the ball is not bounced
/// straight back through the partner
#[derive(Debug, Clone)]
pub struct TeleportCooldown {
    active: Option<(u32, Instant)>,
    duration: Duration,
}

impl Default for TeleportCooldown {
    fn default() -> Self {
        Self::new(Duration::from_secs_f32(TELEPORT_COOLDOWN_SECS))
    }
}

impl TeleportCooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            active: None,
            duration,
        }
    }

    /// Id of the pair currently cooling down
    pub fn active_id(&self) -> Option<u32> {
        self.active.map(|(id, _)| id)
    }

    /// Whether a teleport with this id must be ignored
    pub fn blocks(&self, teleport_id: u32) -> bool {
        self.active_id() == Some(teleport_id)
    }

    /// Record a use of `teleport_id` at `now`
    pub fn arm(&mut self, teleport_id: u32, now: Instant) {
        self.active = Some((teleport_id, now));
    }

    /// Forget the active id once the cooldown window has passed
    pub fn expire(&mut self, now: Instant) {
        if let Some((id, since)) = self.active {
            if now.saturating_duration_since(since) >= self.duration {
                log::debug!("Teleport {} cooled down", id);
                self.active = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Everything that changes while the simulation runs
#[derive(Debug, Clone)]
pub struct SimState {
    pub ball: Ball,
    pub cooldown: TeleportCooldown,
    /// Ticks since the last reset
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(ball_radius: f32, cooldown: Duration) -> Self {
        Self {
            ball: Ball::new(ball_radius),
            cooldown: TeleportCooldown::new(cooldown),
            time_ticks: 0,
        }
    }

    /// Put the ball at rest on `start` and forget transient state
    pub fn reset(&mut self, start: Vec2) {
        self.ball.place(start);
        self.cooldown.clear();
        self.time_ticks = 0;
    }
}
