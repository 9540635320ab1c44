//! Engine configuration with documented constants

/// Configuration for board construction and terrain conventions
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Move cost at or above which a tile counts as impassable
    ///
    /// Searches never special-case this value. A cost this high is simply
    /// never affordable with a normal movement budget, so the threshold
    /// only matters for display and level authoring checks.
    pub impassable_cost: u32,

    /// Move cost of every tile on a board built with `Board::open`
    pub default_move_cost: u32,

    /// Largest board width a level may declare
    pub max_board_width: usize,

    /// Largest board height a level may declare
    pub max_board_height: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            impassable_cost: 100,
            default_move_cost: 1,
            max_board_width: 256,
            max_board_height: 256,
        }
    }
}

impl EngineConfig {
    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.default_move_cost >= self.impassable_cost {
            return Err(format!(
                "default_move_cost ({}) should be < impassable_cost ({})",
                self.default_move_cost, self.impassable_cost
            ));
        }

        if self.max_board_width == 0 || self.max_board_height == 0 {
            return Err("Board size limits must be positive".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

use crate::core::error::{BoardError, Result};

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if the config is inconsistent or was already set.
pub fn set_config(config: EngineConfig) -> Result<()> {
    config.validate().map_err(BoardError::InvalidConfig)?;
    CONFIG
        .set(config)
        .map_err(|_| BoardError::InvalidConfig("engine config is already set".into()))
}
