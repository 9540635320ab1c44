//! Board system - hex grid, unit placement, and movement/targeting searches
//!
//! The board owns tiles and units; the searches only read it. Callers pick
//! destinations from search results (which report only empty tiles as
//! endable) before asking the board to move a unit.

pub mod grid;
pub mod hex;
pub mod level;
pub mod pathfinding;
pub mod step;
pub mod units;

// Re-exports for convenient access
pub use grid::{Board, Tile};
pub use hex::{adjacent_tiles, distance, in_bounds};
pub use level::{load_level, LevelData, TeamData, TileData, UnitData};
pub use pathfinding::{
    movable_tiles, nearest_target, nearest_tile_at_distance, reachable_tiles, selectable_tiles,
};
pub use step::PathingStep;
pub use units::Unit;
