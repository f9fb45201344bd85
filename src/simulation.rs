//! Simulation driver
//!
//! Owns the scene, settings and ball state, and runs one tick per display
//! frame while started. Editing and parameter changes go through here so
//! they can be refused or applied at the right moment.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::consts::SIM_DT;
use crate::scene::Scene;
use crate::settings::{Canvas, Settings};
use crate::sim::state::{Ball, BallPose, SimState};
use crate::sim::tick::tick;

/// Errors from driver operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("the scene cannot be edited while the simulation is running")]
    Busy,
}

/// Result of a headless run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunSummary {
    /// Frames actually simulated
    pub frames: u32,
    /// The ball came to rest before the frame budget ran out
    pub halted: bool,
    pub pose: BallPose,
}

/// A ball, the geometry it rolls on, and the run/stop state
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    scene: Scene,
    state: SimState,
    running: bool,
}

impl Simulation {
    /// Create a stopped simulation with the ball at its start point
    pub fn new(settings: Settings, scene: Scene) -> Self {
        let state = SimState::new(settings.ball_radius, settings.teleport_cooldown());
        let mut sim = Self {
            settings,
            scene,
            state,
            running: false,
        };
        sim.reset();
        sim
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ball(&self) -> &Ball {
        &self.state.ball
    }

    /// Ticks since the last reset
    pub fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }

    pub fn is_simulating(&self) -> bool {
        self.running
    }

    /// Current pose, for drawing while stopped
    pub fn pose(&self) -> BallPose {
        self.state.ball.pose()
    }

    /// Toggle between running and paused; returns the new state
    pub fn start(&mut self) -> bool {
        self.running = !self.running;
        if self.running {
            log::info!("Simulation started");
        } else {
            log::info!("Simulation paused after {} ticks", self.state.time_ticks);
        }
        self.running
    }

    /// Pause without touching the ball
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Simulation stopped after {} ticks", self.state.time_ticks);
        }
        self.running = false;
    }

    /// Stop and put the ball back at rest on the start point
    pub fn reset(&mut self) {
        self.running = false;
        self.state = SimState::new(self.settings.ball_radius, self.settings.teleport_cooldown());

        let start = self.scene.start_point(self.settings.ramp());
        self.state.reset(start);
        log::info!("Ball reset to ({:.1}, {:.1})", start.x, start.y);
    }

    /// Advance one frame if running
    ///
    /// Returns the new pose, or `None` when stopped. A tick that brings the
    /// ball to rest stops the simulation.
    pub fn frame(&mut self, now: Instant) -> Option<BallPose> {
        if !self.running {
            return None;
        }

        let outcome = tick(&mut self.state, &self.scene, &self.settings, now);
        if outcome.halted {
            self.running = false;
            log::info!(
                "Ball came to rest after {} ticks at ({:.1}, {:.1})",
                self.state.time_ticks,
                self.state.ball.pos.x,
                self.state.ball.pos.y
            );
        }

        Some(self.state.ball.pose())
    }

    /// Apply an edit to the scene; refused while running
    ///
    /// The ball stays where it is; the next reset uses the new geometry.
    pub fn edit_scene<R>(&mut self, edit: impl FnOnce(&mut Scene) -> R) -> Result<R, SimError> {
        if self.running {
            return Err(SimError::Busy);
        }
        Ok(edit(&mut self.scene))
    }

    /// Replace the whole scene; refused while running
    pub fn load_scene(&mut self, scene: Scene) -> Result<(), SimError> {
        self.edit_scene(|current| *current = scene)?;
        self.reset();
        Ok(())
    }

    /// Change the default ramp angle (degrees)
    pub fn set_slope_angle(&mut self, degrees: f32) {
        self.settings.slope_angle_deg = degrees;
        self.reinit_if_idle();
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.settings.friction = friction;
        self.reinit_if_idle();
    }

    /// The canvas changed size
    pub fn resize(&mut self, canvas: Canvas) {
        self.settings.canvas = canvas;
        self.reinit_if_idle();
    }

    fn reinit_if_idle(&mut self) {
        if !self.running {
            self.reset();
        }
    }

    /// Run without a display until the ball rests or `max_frames` pass
    ///
    /// Frame times are synthesized one `dt` apart from `start`, so runs are
    /// reproducible. The run also ends if that clock would overflow.
    pub fn run_headless(&mut self, max_frames: u32, start: Instant, trace: bool) -> RunSummary {
        let step = Duration::try_from_secs_f32(self.settings.dt)
            .unwrap_or(Duration::from_secs_f32(SIM_DT));
        self.running = true;

        let mut frames = 0;
        while frames < max_frames && self.running {
            let Some(now) = step
                .checked_mul(frames)
                .and_then(|offset| start.checked_add(offset))
            else {
                log::warn!(
                    "Frame clock overflowed after {} frames (dt = {}s); stopping",
                    frames,
                    self.settings.dt
                );
                break;
            };
            frames += 1;
            if let Some(pose) = self.frame(now) {
                if trace {
                    log::info!(
                        "frame {:>5}: pos=({:8.2}, {:8.2}) rot={:7.2} on_path={}",
                        frames,
                        pose.position.x,
                        pose.position.y,
                        pose.rotation,
                        pose.on_path
                    );
                }
            }
        }

        let halted = !self.running;
        self.running = false;

        RunSummary {
            frames,
            halted,
            pose: self.pose(),
        }
    }
}
