//! Simulation settings
//!
//! The numeric inputs the control panel feeds the engine: slope angle,
//! friction and canvas size. Persisted as JSON.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geometry::Ramp;
use crate::sim::motion::MotionParams;

/// Errors reading or writing a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Drawing area the ball lives in (pixels, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Simulation parameters
///
/// Values are taken as given; range checking belongs to whatever UI
/// produces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Incline of the default ramp in degrees
    pub slope_angle_deg: f32,
    /// Rolling friction coefficient (0.0 - 1.0)
    pub friction: f32,
    pub canvas: Canvas,
    pub ball_radius: f32,
    /// Seconds advanced per tick
    pub dt: f32,
    /// How long a used teleport pair stays disabled
    pub teleport_cooldown_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slope_angle_deg: 30.0,
            friction: 0.05,
            canvas: Canvas::default(),
            ball_radius: BALL_RADIUS,
            dt: SIM_DT,
            teleport_cooldown_secs: TELEPORT_COOLDOWN_SECS,
        }
    }
}

impl Settings {
    /// Set friction from the percent slider (0 - 100)
    pub fn set_friction_percent(&mut self, percent: u32) {
        self.friction = percent as f32 / 100.0;
    }

    /// Default ramp for the current angle and canvas
    pub fn ramp(&self) -> Ramp {
        Ramp::new(self.slope_angle_deg, self.canvas)
    }

    pub fn motion_params(&self) -> MotionParams {
        MotionParams {
            gravity: GRAVITY,
            friction: self.friction,
            dt: self.dt,
            canvas: self.canvas,
        }
    }

    /// Cooldown as a duration; unusable values fall back to the default
    pub fn teleport_cooldown(&self) -> Duration {
        Duration::try_from_secs_f32(self.teleport_cooldown_secs.max(0.0))
            .unwrap_or(Duration::from_secs_f32(TELEPORT_COOLDOWN_SECS))
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }
}
