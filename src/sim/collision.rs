//! Collision detection and response for obstacles
//!
//! Blocks and bounce walls are axis-aligned rectangles tested against the
//! ball's bounding square; the side with the least overlap is the one the
//! ball is pushed back out through. Teleports are circles.

use std::time::Instant;

use glam::Vec2;

use super::state::{Ball, Obstacle, Portal, Rect, TeleportCooldown};
use crate::consts::*;

/// Rectangle side the ball is pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Whether resolution along this side acts on the x axis
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Overlap between the ball and a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Side with the smallest overlap
    pub side: Side,
    /// Overlap along that side
    pub depth: f32,
}

/// Check the ball's extents against a rectangle
///
/// Returns the minimum-overlap side, or `None` if they do not overlap.
/// Equal overlaps resolve in left, right, top, bottom order.
pub fn rect_penetration(pos: Vec2, radius: f32, rect: &Rect) -> Option<Penetration> {
    let min = rect.min();
    let max = rect.max();

    let overlapping = pos.x + radius > min.x
        && pos.x - radius < max.x
        && pos.y + radius > min.y
        && pos.y - radius < max.y;
    if !overlapping {
        return None;
    }

    let candidates = [
        (Side::Left, (pos.x + radius) - min.x),
        (Side::Right, max.x - (pos.x - radius)),
        (Side::Top, (pos.y + radius) - min.y),
        (Side::Bottom, max.y - (pos.y - radius)),
    ];

    let (side, depth) = candidates
        .into_iter()
        .reduce(|best, c| if c.1 < best.1 { c } else { best })?;

    Some(Penetration { side, depth })
}

/// Move the ball so it just touches `side` of the rectangle
fn push_out(ball: &mut Ball, rect: &Rect, side: Side) {
    let min = rect.min();
    let max = rect.max();
    match side {
        Side::Left => ball.pos.x = min.x - ball.radius,
        Side::Right => ball.pos.x = max.x + ball.radius,
        Side::Top => ball.pos.y = min.y - ball.radius,
        Side::Bottom => ball.pos.y = max.y + ball.radius,
    }
}

/// Solid block: stop the ball along the impact axis and bleed path speed
pub fn resolve_block(ball: &mut Ball, rect: &Rect) -> bool {
    let Some(hit) = rect_penetration(ball.pos, ball.radius, rect) else {
        return false;
    };

    push_out(ball, rect, hit.side);
    if hit.side.is_horizontal() {
        ball.vel.x = 0.0;
    } else {
        ball.vel.y = 0.0;
    }
    ball.velocity *= BLOCK_IMPACT_DAMPING;

    true
}

/// Bounce wall: reflect the impact axis with a boost
///
/// A rolling ball is knocked off its path first so the reflection acts on
/// its real motion; it lands again on the next tick if still touching.
pub fn resolve_bounce(ball: &mut Ball, rect: &Rect) -> bool {
    let Some(hit) = rect_penetration(ball.pos, ball.radius, rect) else {
        return false;
    };

    if ball.on_path {
        ball.leave_path();
    }
    if hit.side.is_horizontal() {
        ball.vel.x = -ball.vel.x * BOUNCE_BOOST;
    } else {
        ball.vel.y = -ball.vel.y * BOUNCE_BOOST;
    }
    push_out(ball, rect, hit.side);

    true
}

/// Teleport: jump to the partner portal unless this pair is cooling down
///
/// The partner is the first other teleport in `obstacles` with the same id.
pub fn resolve_teleport(
    ball: &mut Ball,
    index: usize,
    portal: &Portal,
    obstacles: &[Obstacle],
    cooldown: &mut TeleportCooldown,
    now: Instant,
) -> bool {
    if (ball.pos - portal.center).length() >= ball.radius + portal.radius {
        return false;
    }
    if cooldown.blocks(portal.teleport_id) {
        return false;
    }

    let partner = obstacles
        .iter()
        .enumerate()
        .find_map(|(i, obstacle)| match obstacle {
            Obstacle::Teleport(other) if i != index && other.teleport_id == portal.teleport_id => {
                Some(*other)
            }
            _ => None,
        });

    let Some(partner) = partner else {
        return false;
    };

    log::debug!(
        "Teleport {}: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
        portal.teleport_id,
        portal.center.x,
        portal.center.y,
        partner.center.x,
        partner.center.y
    );
    ball.pos = partner.center;
    cooldown.arm(portal.teleport_id, now);

    true
}

/// Resolve every obstacle against the ball in authored order
///
/// Returns how many obstacles the ball interacted with.
pub fn resolve_obstacles(
    ball: &mut Ball,
    obstacles: &[Obstacle],
    cooldown: &mut TeleportCooldown,
    now: Instant,
) -> usize {
    let mut contacts = 0;

    for (index, obstacle) in obstacles.iter().enumerate() {
        let hit = match obstacle {
            Obstacle::Block(rect) => resolve_block(ball, rect),
            Obstacle::Bounce(rect) => resolve_bounce(ball, rect),
            Obstacle::Teleport(portal) => {
                resolve_teleport(ball, index, portal, obstacles, cooldown, now)
            }
        };
        if hit {
            contacts += 1;
        }
    }

    contacts
}
