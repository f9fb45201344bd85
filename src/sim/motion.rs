//! Ball motion integration
//!
//! Each step the ball is classified against the path geometry. On a path it
//! rolls along the nearest segment under gravity and friction; off a path it
//! falls freely and rebounds off the canvas floor and side walls.

use glam::Vec2;

use super::geometry::{Proximity, Ramp, Segment, Surface, classify};
use super::state::Ball;
use crate::consts::*;
use crate::settings::Canvas;

/// Per-step physical parameters
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    pub gravity: f32,
    pub friction: f32,
    pub dt: f32,
    pub canvas: Canvas,
}

/// What an integration step changed beyond the ball itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionOutcome {
    /// The ball came to rest; the driver should stop
    pub halted: bool,
}

/// Path speed after one step along the unit vector `direction`
///
/// Gravity pulls along the downhill component of `direction`, whichever way
/// the segment was drawn. Friction scales with the normal force and acts
/// against the resulting motion: it can stop the ball, never reverse it.
pub fn roll_speed(velocity: f32, direction: Vec2, gravity: f32, friction: f32, dt: f32) -> f32 {
    let pulled = velocity + gravity * direction.y * dt;
    let drag = friction.max(0.0) * gravity * direction.x.abs() * dt;

    if pulled > drag {
        pulled - drag
    } else if pulled < -drag {
        pulled + drag
    } else {
        0.0
    }
}

/// Advance the ball by one step
pub fn step(ball: &mut Ball, surface: &Surface, params: &MotionParams) -> MotionOutcome {
    let proximity = classify(ball.pos, ball.radius, surface);
    sync_mode(ball, &proximity, surface);

    let halted = if ball.on_path {
        match surface {
            Surface::Ramp(ramp) => roll_ramp(ball, ramp, params),
            Surface::Paths(_) => {
                if let Some(nearest) = proximity.nearest {
                    roll_segment(ball, nearest.segment, params);
                }
                false
            }
        }
    } else {
        fall(ball, params)
    };

    // No hysteresis: whatever the geometry says now is next step's mode
    let proximity = classify(ball.pos, ball.radius, surface);
    sync_mode(ball, &proximity, surface);

    MotionOutcome { halted }
}

/// Switch between path following and free fall to match the classification
fn sync_mode(ball: &mut Ball, proximity: &Proximity, surface: &Surface) {
    match (proximity.on_geometry, ball.on_path) {
        (true, false) => {
            let direction = match (surface, proximity.nearest) {
                (Surface::Ramp(ramp), _) => ramp.direction(),
                (Surface::Paths(_), Some(nearest)) => nearest.segment.direction(),
                (Surface::Paths(_), None) => return,
            };
            log::debug!("Ball landed on path at ({:.1}, {:.1})", ball.pos.x, ball.pos.y);
            ball.land_on_path(direction);
        }
        (false, true) => {
            log::debug!("Ball left path at ({:.1}, {:.1})", ball.pos.x, ball.pos.y);
            ball.leave_path();
        }
        _ => {}
    }
}

/// Roll along `direction` for one step, spinning the ball to match
fn advance(ball: &mut Ball, direction: Vec2, params: &MotionParams) {
    ball.direction = direction;
    ball.velocity = roll_speed(
        ball.velocity,
        direction,
        params.gravity,
        params.friction,
        params.dt,
    );
    let distance = ball.velocity * params.dt;
    ball.pos += direction * distance;
    ball.rotation += distance / ball.radius;
}

/// Roll along a drawn segment
fn roll_segment(ball: &mut Ball, segment: Segment, params: &MotionParams) {
    advance(ball, segment.direction(), params);
}

/// Roll down the default ramp; returns true once the ball rests on its floor
fn roll_ramp(ball: &mut Ball, ramp: &Ramp, params: &MotionParams) -> bool {
    advance(ball, ramp.direction(), params);

    let rest_y = ramp.floor_y - ball.radius;
    let mut halted = false;

    if ball.pos.y >= rest_y {
        ball.pos.y = rest_y;
        ball.velocity *= RAMP_FLOOR_DECAY;

        if ball.velocity.abs() < RAMP_REST_SPEED {
            ball.velocity = 0.0;
            halted = true;
            log::debug!("Ball came to rest on ramp floor at x={:.1}", ball.pos.x);
        }
    }

    // Past the bottom of the incline the ball keeps rolling along the floor
    if ball.pos.x >= ramp.end.x {
        ball.pos.y = rest_y;
    }

    halted
}

/// Free fall with floor and wall rebounds; returns true once the ball rests
fn fall(ball: &mut Ball, params: &MotionParams) -> bool {
    let dt = params.dt;
    let r = ball.radius;
    let Canvas { width, height } = params.canvas;

    ball.vel.y += params.gravity * dt * AIRBORNE_GRAVITY_SCALE;
    ball.pos += ball.vel * dt;

    let mut halted = false;

    if ball.pos.y >= height - r {
        ball.pos.y = height - r;
        ball.vel.y = -ball.vel.y * FLOOR_RESTITUTION;
        ball.vel.x *= FLOOR_FRICTION;

        if ball.vel.y.abs() < AIRBORNE_REST_SPEED && ball.vel.x.abs() < AIRBORNE_REST_SPEED {
            ball.vel = Vec2::ZERO;
            halted = true;
            log::debug!("Ball came to rest on the floor at x={:.1}", ball.pos.x);
        }
    }

    if ball.pos.x <= r {
        ball.pos.x = r;
        ball.vel.x = -ball.vel.x * WALL_RESTITUTION;
    } else if ball.pos.x >= width - r {
        ball.pos.x = width - r;
        ball.vel.x = -ball.vel.x * WALL_RESTITUTION;
    }

    ball.rotation += (ball.vel.x / r) * dt;

    halted
}
