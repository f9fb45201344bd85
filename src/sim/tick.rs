//! Fixed timestep simulation tick
//!
//! One call advances the ball by one frame: expire the teleport cooldown,
//! integrate motion against the path geometry, then resolve obstacles.

use std::time::Instant;

use super::collision::resolve_obstacles;
use super::geometry::Surface;
use super::motion;
use super::state::SimState;
use crate::scene::Scene;
use crate::settings::Settings;

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The ball came to rest and the run should stop
    pub halted: bool,
    /// Number of obstacles the ball interacted with
    pub contacts: usize,
}

/// Advance the simulation by one fixed timestep
///
/// `now` is only used for the teleport cooldown, which runs on wall-clock
/// time rather than ticks.
pub fn tick(state: &mut SimState, scene: &Scene, settings: &Settings, now: Instant) -> TickOutcome {
    state.time_ticks += 1;
    state.cooldown.expire(now);

    let surface = Surface::new(&scene.paths, settings.ramp());
    let motion = motion::step(&mut state.ball, &surface, &settings.motion_params());

    let contacts = resolve_obstacles(&mut state.ball, &scene.obstacles, &mut state.cooldown, now);

    TickOutcome {
        halted: motion.halted,
        contacts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::motion::roll_speed;
    use crate::sim::state::{Obstacle, Path};
    use glam::Vec2;
    use std::time::Duration;

    fn state_at(settings: &Settings, pos: Vec2) -> SimState {
        let mut state = SimState::new(settings.ball_radius, settings.teleport_cooldown());
        state.reset(pos);
        state
    }

    #[test]
    fn test_ramp_motion_matches_closed_form() {
        let settings = Settings::default();
        let ramp = settings.ramp();
        let mut state = state_at(&settings, ramp.start);
        let scene = Scene::new();
        let now = Instant::now();

        let dt = settings.dt;
        let a = roll_speed(0.0, ramp.direction(), GRAVITY, settings.friction, dt) / dt;
        let ticks = 40;
        for _ in 0..ticks {
            let outcome = tick(&mut state, &scene, &settings, now);
            assert!(!outcome.halted);
            assert!(state.ball.on_path);
        }

        // v_n = n·a·dt, s_n = a·dt²·n(n+1)/2 for semi-implicit Euler
        let n = ticks as f32;
        let expected_v = n * a * dt;
        let expected_s = a * dt * dt * n * (n + 1.0) / 2.0;
        let expected_pos = ramp.start + ramp.direction() * expected_s;

        assert!((state.ball.velocity - expected_v).abs() < 1e-2);
        assert!(
            (state.ball.pos - expected_pos).length() < 1e-2,
            "pos {:?} expected {:?}",
            state.ball.pos,
            expected_pos
        );
        assert!((state.ball.rotation - expected_s / BALL_RADIUS).abs() < 1e-3);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_rolling_into_block_stops_on_its_face() {
        let settings = Settings {
            friction: 0.0,
            ..Default::default()
        };
        let mut scene = Scene::new();
        scene.add_path(Path::new(vec![Vec2::new(0.0, 300.0), Vec2::new(600.0, 300.0)]));
        // Face at x = 200
        scene.obstacles.push(Obstacle::block(Vec2::new(220.0, 300.0), 40.0, 40.0));

        let mut state = state_at(&settings, Vec2::new(175.0, 300.0));
        state.ball.velocity = 600.0;

        let outcome = tick(&mut state, &scene, &settings, Instant::now());

        assert_eq!(outcome.contacts, 1);
        assert_eq!(state.ball.pos.x, 180.0);
        assert!((state.ball.velocity - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_rolling_into_bounce_wall_rebounds() {
        let settings = Settings {
            friction: 0.0,
            ..Default::default()
        };
        let mut scene = Scene::new();
        scene.add_path(Path::new(vec![Vec2::new(0.0, 300.0), Vec2::new(600.0, 300.0)]));
        scene.obstacles.push(Obstacle::bounce(Vec2::new(220.0, 300.0), 40.0, 40.0));

        let mut state = state_at(&settings, Vec2::new(175.0, 300.0));
        state.ball.velocity = 600.0;
        let now = Instant::now();

        let outcome = tick(&mut state, &scene, &settings, now);
        assert_eq!(outcome.contacts, 1);
        assert_eq!(state.ball.pos.x, 180.0);
        assert!((state.ball.vel.x + 600.0 * BOUNCE_BOOST).abs() < 1e-3);

        // Lands back on the path heading away from the wall, faster than before
        let outcome = tick(&mut state, &scene, &settings, now);
        assert_eq!(outcome.contacts, 0);
        assert!(state.ball.on_path);
        assert!((state.ball.velocity + 600.0 * BOUNCE_BOOST).abs() < 1e-3);
        assert!((state.ball.pos.x - 168.0).abs() < 1e-3);
    }

    #[test]
    fn test_cooldown_expires_by_wall_clock() {
        let settings = Settings::default();
        let mut scene = Scene::new();
        scene.add_path(Path::new(vec![Vec2::new(0.0, 300.0), Vec2::new(600.0, 300.0)]));
        scene.obstacles.push(Obstacle::teleport(Vec2::new(100.0, 300.0), 20.0, 1));
        scene.obstacles.push(Obstacle::teleport(Vec2::new(400.0, 300.0), 20.0, 1));

        let mut state = state_at(&settings, Vec2::new(100.0, 300.0));
        let start = Instant::now();

        tick(&mut state, &scene, &settings, start);
        assert!((state.ball.pos.x - 400.0).abs() < 1e-3);
        assert_eq!(state.cooldown.active_id(), Some(1));

        // Many ticks inside one second: stays on the far portal
        for i in 1..30 {
            tick(&mut state, &scene, &settings, start + Duration::from_millis(i * 10));
        }
        assert!((state.ball.pos.x - 400.0).abs() < 5.0);
        assert_eq!(state.cooldown.active_id(), Some(1));

        tick(&mut state, &scene, &settings, start + Duration::from_millis(1100));
        assert!((state.ball.pos.x - 100.0).abs() < 1e-3);
    }
}
