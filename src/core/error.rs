use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Team {team} is not in the team range (0..{teams})")]
    TeamOutOfRange { team: usize, teams: usize },

    #[error("Tile ({x}, {y}) is not on the board")]
    OutOfBounds { x: i32, y: i32 },

    #[error("Tile ({x}, {y}) is already occupied")]
    TileOccupied { x: i32, y: i32 },

    #[error("Unit is not registered with the board: {0:?}")]
    UnitNotRegistered(UnitId),

    #[error("Unit is already registered with the board: {0:?}")]
    AlreadyRegistered(UnitId),

    #[error("Unit {unit:?} tried to move away from tile ({x}, {y}) it was not on")]
    NotOnRecordedTile { unit: UnitId, x: i32, y: i32 },

    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    #[error("Negative amount: {0}")]
    InvalidAmount(i32),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Errors raised when a caller breaks the board's placement invariants
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BoardError::TeamOutOfRange { .. }
                | BoardError::OutOfBounds { .. }
                | BoardError::TileOccupied { .. }
                | BoardError::UnitNotRegistered(_)
                | BoardError::AlreadyRegistered(_)
                | BoardError::NotOnRecordedTile { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
