//! Units that occupy board tiles
//!
//! A unit's position is only written by the board's placement operations,
//! which keeps it in agreement with the tile that names it as occupant.

use serde::{Deserialize, Serialize};

use crate::core::error::{BoardError, Result};
use crate::core::types::{TeamIndex, TileCoord, UnitId};

/// A unit that can be placed on a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub team: TeamIndex,
    /// Free-form class label carried over from the level data
    pub class_name: String,

    // Position (None until placed)
    position: Option<TileCoord>,

    // Movement
    max_movement: u32,
    current_movement: u32,

    // Health
    max_health: u32,
    health: u32,
}

impl Unit {
    pub fn new(team: TeamIndex, max_movement: u32, max_health: u32) -> Self {
        Self {
            id: UnitId::new(),
            team,
            class_name: String::new(),
            position: None,
            max_movement,
            current_movement: max_movement,
            max_health,
            health: max_health,
        }
    }

    /// Builder: start the unit on a tile (validated when added to a board)
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Some(TileCoord::new(x, y));
        self
    }

    /// Builder: attach a class label
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn position(&self) -> Option<TileCoord> {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Option<TileCoord>) {
        self.position = position;
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    pub fn max_movement(&self) -> u32 {
        self.max_movement
    }

    pub fn current_movement(&self) -> u32 {
        self.current_movement
    }

    /// Set remaining movement, clamped to `0..=max_movement`
    pub fn set_current_movement(&mut self, movement: i64) {
        self.current_movement = movement.clamp(0, self.max_movement as i64) as u32;
    }

    pub fn reduce_movement(&mut self, amount: u32) {
        self.set_current_movement(self.current_movement as i64 - amount as i64);
    }

    /// Restore the full movement budget (start of the unit's next turn)
    pub fn reset_movement(&mut self) {
        self.current_movement = self.max_movement;
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Apply damage, returning whether the unit died
    ///
    /// The board does not react to deaths; the caller is expected to
    /// `remove_unit` a unit once this returns true.
    pub fn take_damage(&mut self, amount: i32) -> Result<bool> {
        if amount < 0 {
            return Err(BoardError::InvalidAmount(amount));
        }
        self.health = self.health.saturating_sub(amount as u32);
        Ok(self.is_dead())
    }

    pub fn heal(&mut self, amount: i32) -> Result<()> {
        if amount < 0 {
            return Err(BoardError::InvalidAmount(amount));
        }
        self.health = self.health.saturating_add(amount as u32).min(self.max_health);
        Ok(())
    }
}
