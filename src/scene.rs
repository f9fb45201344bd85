//! Authored scene: drawn paths and placed obstacles
//!
//! The simulation only reads a scene. Editing happens here, between runs.

use std::path::{Path as FsPath, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geometry::{Ramp, Surface};
use crate::sim::state::{Obstacle, Path};

/// Errors reading or writing a scene file
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to access scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Obstacle types the editor can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Block,
    Bounce,
    Teleport,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Block => "block",
            ObstacleKind::Bounce => "bounce",
            ObstacleKind::Teleport => "teleport",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "block" => Some(ObstacleKind::Block),
            "bounce" => Some(ObstacleKind::Bounce),
            "teleport" | "portal" => Some(ObstacleKind::Teleport),
            _ => None,
        }
    }
}

/// A path being drawn with the pointer
#[derive(Debug, Clone, Default)]
pub struct PathStroke {
    points: Vec<Vec2>,
}

impl PathStroke {
    /// Start a stroke at the pointer-down position
    pub fn begin(point: Vec2) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn extend(&mut self, point: Vec2) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Finished path, or `None` if the stroke never left its first point
    pub fn finish(self) -> Option<Path> {
        if self.points.len() > 1 {
            Some(Path::new(self.points))
        } else {
            None
        }
    }
}

/// All authored geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Drawn polylines (empty means the default ramp is used)
    pub paths: Vec<Path>,
    /// Obstacles in placement order
    pub obstacles: Vec<Obstacle>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.obstacles.is_empty()
    }

    /// Add a finished path; degenerate paths are dropped
    pub fn add_path(&mut self, path: Path) -> bool {
        if path.is_degenerate() {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Place an obstacle of `kind` centered on `at` with default dimensions
    pub fn add_obstacle(&mut self, kind: ObstacleKind, at: Vec2) -> Obstacle {
        let obstacle = match kind {
            ObstacleKind::Block => Obstacle::block(at, OBSTACLE_SIZE, OBSTACLE_SIZE),
            ObstacleKind::Bounce => Obstacle::bounce(at, OBSTACLE_SIZE, OBSTACLE_SIZE),
            ObstacleKind::Teleport => {
                Obstacle::teleport(at, TELEPORT_RADIUS, self.next_teleport_id())
            }
        };
        self.obstacles.push(obstacle);
        obstacle
    }

    /// Id for the next teleport placed
    ///
    /// The newest id is reused until it has two members, so teleports
    /// placed one after another pair up.
    pub fn next_teleport_id(&self) -> u32 {
        let ids = || self.obstacles.iter().filter_map(Obstacle::teleport_id);
        match ids().max() {
            None => 1,
            Some(max) if ids().filter(|&id| id == max).count() < 2 => max,
            Some(max) => max + 1,
        }
    }

    /// Teleport ids that do not have exactly one partner
    pub fn unpaired_teleports(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .obstacles
            .iter()
            .filter_map(Obstacle::teleport_id)
            .collect();
        ids.sort_unstable();

        ids.chunk_by(|a, b| a == b)
            .filter(|group| group.len() != 2)
            .map(|group| group[0])
            .collect()
    }

    /// Erase obstacles and path points under the eraser at `point`
    pub fn erase_at(&mut self, point: Vec2) {
        self.obstacles.retain(|obstacle| match obstacle {
            Obstacle::Teleport(portal) => (portal.center - point).length() > ERASE_OBSTACLE_RADIUS,
            Obstacle::Block(rect) | Obstacle::Bounce(rect) => {
                !rect.contains_with_margin(point, ERASE_OBSTACLE_RADIUS)
            }
        });

        for path in &mut self.paths {
            path.points.retain(|p| (*p - point).length() >= ERASE_PATH_RADIUS);
        }
        self.paths.retain(|path| !path.is_degenerate());
    }

    /// Where the ball starts: the first path's first point, else the ramp top
    pub fn start_point(&self, ramp: Ramp) -> Vec2 {
        Surface::new(&self.paths, ramp).start_point()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.paths.clear();
        self.obstacles.clear();
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a scene from a JSON file
    pub fn load_from(path: impl AsRef<FsPath>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_json(&json)?;

        log::info!(
            "Loaded scene from {}: {} paths, {} obstacles",
            path.display(),
            scene.paths.len(),
            scene.obstacles.len()
        );
        for id in scene.unpaired_teleports() {
            log::warn!("Teleport id {} does not form a pair", id);
        }

        Ok(scene)
    }

    /// Save the scene as pretty JSON
    pub fn save_to(&self, path: impl AsRef<FsPath>) -> Result<(), SceneError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Scene saved to {}", path.display());
        Ok(())
    }
}
