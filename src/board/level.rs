//! Level data: the board-load payload
//!
//! Levels are stored as TOML (or JSON) files. Tiles are a flat row-major
//! list, `index = x + y * width`, so the height is implied by the tile count.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::config::config;
use crate::core::error::{BoardError, Result};
use crate::core::types::TileCoord;

fn default_move_cost() -> u32 {
    config().default_move_cost
}

/// Serialized form of a single tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    #[serde(default)]
    pub height: i32,
    #[serde(default = "default_move_cost")]
    pub move_cost: u32,
}

impl TileData {
    pub fn new(height: i32, move_cost: u32) -> Self {
        Self { height, move_cost }
    }
}

/// Stats for a unit spawned at level start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    pub health: u32,
    pub movement: u32,
    #[serde(default)]
    pub class_name: String,
}

/// One team's starting roster; `units[i]` spawns at `spawn_points[i]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamData {
    #[serde(default)]
    pub units: Vec<UnitData>,
    #[serde(default)]
    pub spawn_points: Vec<TileCoord>,
}

/// Everything needed to build a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub width: usize,
    pub tiles: Vec<TileData>,
    pub teams: Vec<TeamData>,
}

impl LevelData {
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.tiles.len() / self.width
        }
    }

    /// Tile data at `(x, y)`, if the coordinate is on the board
    pub fn tile(&self, x: usize, y: usize) -> Option<&TileData> {
        if x >= self.width {
            return None;
        }
        self.tiles.get(x + y * self.width)
    }

    /// Check the payload's shape before a board is built from it
    pub fn validate(&self) -> Result<()> {
        let limits = config();

        if self.width == 0 {
            return Err(BoardError::InvalidLevel("width must be positive".into()));
        }
        if self.tiles.is_empty() || self.tiles.len() % self.width != 0 {
            return Err(BoardError::InvalidLevel(format!(
                "tile count {} is not a positive multiple of width {}",
                self.tiles.len(),
                self.width
            )));
        }
        if self.width > limits.max_board_width || self.height() > limits.max_board_height {
            return Err(BoardError::InvalidLevel(format!(
                "board {}x{} exceeds the {}x{} limit",
                self.width,
                self.height(),
                limits.max_board_width,
                limits.max_board_height
            )));
        }
        if self.teams.is_empty() {
            return Err(BoardError::InvalidLevel("a level needs at least one team".into()));
        }
        for (team, data) in self.teams.iter().enumerate() {
            if data.units.len() != data.spawn_points.len() {
                return Err(BoardError::InvalidLevel(format!(
                    "team {} has {} units but {} spawn points",
                    team,
                    data.units.len(),
                    data.spawn_points.len()
                )));
            }
            for spawn in &data.spawn_points {
                let on_board = usize::try_from(spawn.x)
                    .ok()
                    .zip(usize::try_from(spawn.y).ok())
                    .and_then(|(x, y)| self.tile(x, y))
                    .is_some();
                if !on_board {
                    return Err(BoardError::InvalidLevel(format!(
                        "team {} spawn point {} is off the board",
                        team, spawn
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let level: LevelData = toml::from_str(content)?;
        level.validate()?;
        Ok(level)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let level: LevelData = serde_json::from_str(content)?;
        level.validate()?;
        Ok(level)
    }
}

/// Load a level file, choosing the format from its extension
///
/// `.json` files are parsed as JSON, anything else as TOML.
pub fn load_level(path: impl AsRef<Path>) -> Result<LevelData> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let level = if is_json {
        LevelData::from_json_str(&contents)?
    } else {
        LevelData::from_toml_str(&contents)?
    };

    tracing::info!(
        "Loaded level '{}' ({}x{}, {} teams) from {:?}",
        level.name,
        level.width,
        level.height(),
        level.teams.len(),
        path
    );
    Ok(level)
}
