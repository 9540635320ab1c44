//! The board: tile grid plus the per-team unit registry
//!
//! Placement is two-sided. A tile names its occupant and the occupant records
//! its tile, and every placement operation updates both or neither.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::board::hex;
use crate::board::level::LevelData;
use crate::board::units::Unit;
use crate::core::config::config;
use crate::core::error::{BoardError, Result};
use crate::core::types::{TeamIndex, TileCoord, UnitId};

/// A single tile on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    height: i32,
    move_cost: u32,
    occupant: Option<UnitId>,
}

impl Tile {
    pub fn new(height: i32, move_cost: u32) -> Self {
        Self {
            height,
            move_cost,
            occupant: None,
        }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn move_cost(&self) -> u32 {
        self.move_cost
    }

    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Whether the cost is at or above the configured impassable threshold
    pub fn is_impassable(&self) -> bool {
        self.move_cost >= config().impassable_cost
    }
}

/// A fixed-size hex board and the units placed on it
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    teams: Vec<Vec<UnitId>>,
    units: AHashMap<UnitId, Unit>,
}

impl Board {
    /// Create an empty board from a row-major tile list
    pub fn new(width: usize, tiles: Vec<Tile>, team_count: usize) -> Result<Self> {
        if width == 0 || tiles.is_empty() || tiles.len() % width != 0 {
            return Err(BoardError::InvalidLevel(format!(
                "tile count {} is not a positive multiple of width {}",
                tiles.len(),
                width
            )));
        }

        Ok(Self {
            width,
            height: tiles.len() / width,
            tiles,
            teams: vec![Vec::new(); team_count],
            units: AHashMap::new(),
        })
    }

    /// Create an open board where every tile has the default move cost
    pub fn open(width: usize, height: usize, team_count: usize) -> Result<Self> {
        let tiles = vec![Tile::new(0, config().default_move_cost); width * height];
        Self::new(width, tiles, team_count)
    }

    /// Build the board described by a level and spawn its starting units
    pub fn from_level(level: &LevelData) -> Result<Self> {
        level.validate()?;

        let tiles = level
            .tiles
            .iter()
            .map(|t| Tile::new(t.height, t.move_cost))
            .collect();
        let mut board = Self::new(level.width, tiles, level.teams.len())?;

        for (team, data) in level.teams.iter().enumerate() {
            for (unit_data, spawn) in data.units.iter().zip(&data.spawn_points) {
                let unit = Unit::new(team, unit_data.movement, unit_data.health)
                    .at(spawn.x, spawn.y)
                    .with_class(unit_data.class_name.clone());
                board.add_unit(unit)?;
            }
        }

        if board.units.is_empty() {
            tracing::warn!("Level '{}' spawned no units", level.name);
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn in_bounds(&self, coord: TileCoord) -> bool {
        hex::in_bounds(coord, self.width, self.height)
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| coord.x as usize + coord.y as usize * self.width)
    }

    /// Get the tile at a coordinate
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).map(|i| &self.tiles[i])
    }

    fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        let i = self.index(coord)?;
        Some(&mut self.tiles[i])
    }

    /// The unit standing on a tile, if any
    pub fn unit_at(&self, coord: TileCoord) -> Option<&Unit> {
        self.tile(coord)
            .and_then(Tile::occupant)
            .and_then(|id| self.units.get(&id))
    }

    /// Team of the unit standing on a tile, if any
    pub fn occupant_team(&self, coord: TileCoord) -> Option<TeamIndex> {
        self.unit_at(coord).map(|u| u.team)
    }

    /// All in-bounds tiles adjacent to `(x, y)`
    pub fn adjacent_tiles(&self, x: i32, y: i32) -> Vec<TileCoord> {
        hex::adjacent_tiles(TileCoord::new(x, y), self.width, self.height)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Mutable access for stat changes; position stays under board control
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Units registered on a team, in registration order
    pub fn units(&self, team: TeamIndex) -> Option<&[UnitId]> {
        self.teams.get(team).map(Vec::as_slice)
    }

    fn is_registered(&self, id: UnitId) -> bool {
        self.units
            .get(&id)
            .and_then(|unit| self.teams.get(unit.team))
            .is_some_and(|roster| roster.contains(&id))
    }

    /// Register a unit, placing it on its recorded tile if it has one
    pub fn add_unit(&mut self, unit: Unit) -> Result<UnitId> {
        if unit.team >= self.teams.len() {
            return Err(BoardError::TeamOutOfRange {
                team: unit.team,
                teams: self.teams.len(),
            });
        }
        if self.units.contains_key(&unit.id) {
            return Err(BoardError::AlreadyRegistered(unit.id));
        }

        if let Some(pos) = unit.position() {
            let tile = self
                .tile_mut(pos)
                .ok_or(BoardError::OutOfBounds { x: pos.x, y: pos.y })?;
            if tile.is_occupied() {
                return Err(BoardError::TileOccupied { x: pos.x, y: pos.y });
            }
            tile.occupant = Some(unit.id);
        }

        let id = unit.id;
        self.teams[unit.team].push(id);
        self.units.insert(id, unit);
        Ok(id)
    }

    /// Unregister a unit (typically once it has died) and hand it back
    pub fn remove_unit(&mut self, id: UnitId) -> Result<Unit> {
        if !self.is_registered(id) {
            return Err(BoardError::UnitNotRegistered(id));
        }

        let unit = self
            .units
            .remove(&id)
            .ok_or(BoardError::UnitNotRegistered(id))?;
        if let Some(pos) = unit.position() {
            if let Some(tile) = self.tile_mut(pos) {
                if tile.occupant == Some(id) {
                    tile.occupant = None;
                }
            }
        }
        self.teams[unit.team].retain(|other| *other != id);
        Ok(unit)
    }

    /// Move a registered unit to an empty tile
    ///
    /// Every check runs before anything is written, so a failed move leaves
    /// the board untouched.
    pub fn move_unit(&mut self, id: UnitId, x: i32, y: i32) -> Result<()> {
        if !self.is_registered(id) {
            return Err(BoardError::UnitNotRegistered(id));
        }

        let dest = TileCoord::new(x, y);
        let dest_index = self.index(dest).ok_or(BoardError::OutOfBounds { x, y })?;
        if self.tiles[dest_index].is_occupied() {
            return Err(BoardError::TileOccupied { x, y });
        }

        let from_index = match self.units.get(&id).and_then(Unit::position) {
            Some(from) => {
                let index = self
                    .index(from)
                    .filter(|&i| self.tiles[i].occupant == Some(id))
                    .ok_or(BoardError::NotOnRecordedTile {
                        unit: id,
                        x: from.x,
                        y: from.y,
                    })?;
                Some(index)
            }
            None => None,
        };
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(BoardError::UnitNotRegistered(id))?;

        // All lookups are resolved; the writes below cannot fail
        if let Some(index) = from_index {
            self.tiles[index].occupant = None;
        }
        self.tiles[dest_index].occupant = Some(id);
        unit.set_position(Some(dest));
        Ok(())
    }

    /// Restore full movement to every unit on a team
    pub fn refresh_team_movement(&mut self, team: TeamIndex) -> Result<()> {
        let roster = self.teams.get(team).ok_or(BoardError::TeamOutOfRange {
            team,
            teams: self.teams.len(),
        })?;
        for id in roster {
            if let Some(unit) = self.units.get_mut(id) {
                unit.reset_movement();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::level::{TeamData, TileData, UnitData};

    fn c(x: i32, y: i32) -> TileCoord {
        TileCoord::new(x, y)
    }

    #[test]
    fn test_open_board_dimensions() {
        let board = Board::open(4, 3, 2).unwrap();
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 3);
        assert_eq!(board.team_count(), 2);
        assert_eq!(board.tile(c(3, 2)).map(Tile::move_cost), Some(1));
        assert!(board.tile(c(4, 0)).is_none());
    }

    #[test]
    fn test_ragged_board_rejected() {
        let tiles = vec![Tile::new(0, 1); 5];
        assert!(Board::new(2, tiles, 1).is_err());
    }

    #[test]
    fn test_impassable_tile() {
        assert!(Tile::new(0, 100).is_impassable());
        assert!(!Tile::new(0, 99).is_impassable());
    }

    #[test]
    fn test_add_unit_places_on_tile() {
        let mut board = Board::open(3, 3, 2).unwrap();
        let id = board.add_unit(Unit::new(1, 3, 10).at(1, 2)).unwrap();

        assert_eq!(board.tile(c(1, 2)).and_then(Tile::occupant), Some(id));
        assert_eq!(board.unit_at(c(1, 2)).map(|u| u.id), Some(id));
        assert_eq!(board.occupant_team(c(1, 2)), Some(1));
        assert_eq!(board.units(1), Some(&[id][..]));
    }

    #[test]
    fn test_add_unplaced_unit_registers_only() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let id = board.add_unit(Unit::new(0, 3, 10)).unwrap();
        assert_eq!(board.units(0).map(<[UnitId]>::len), Some(1));
        assert!(board.unit(id).is_some_and(|u| !u.is_placed()));
    }

    #[test]
    fn test_add_unit_bad_team() {
        let mut board = Board::open(3, 3, 2).unwrap();
        let err = board.add_unit(Unit::new(2, 3, 10).at(0, 0)).unwrap_err();
        assert!(matches!(err, BoardError::TeamOutOfRange { team: 2, teams: 2 }));
        assert!(err.is_structural());
        assert!(board.tile(c(0, 0)).is_some_and(|t| !t.is_occupied()));
    }

    #[test]
    fn test_add_unit_out_of_bounds() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let err = board.add_unit(Unit::new(0, 3, 10).at(3, 0)).unwrap_err();
        assert!(matches!(err, BoardError::OutOfBounds { x: 3, y: 0 }));
        assert_eq!(board.units(0).map(<[UnitId]>::len), Some(0));
    }

    #[test]
    fn test_add_unit_on_occupied_tile() {
        let mut board = Board::open(3, 3, 2).unwrap();
        board.add_unit(Unit::new(0, 3, 10).at(1, 1)).unwrap();
        let err = board.add_unit(Unit::new(1, 3, 10).at(1, 1)).unwrap_err();
        assert!(matches!(err, BoardError::TileOccupied { x: 1, y: 1 }));
        assert_eq!(board.units(1).map(<[UnitId]>::len), Some(0));
    }

    #[test]
    fn test_add_same_unit_twice_rejected() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let unit = Unit::new(0, 3, 10);
        let id = board.add_unit(unit.clone().at(0, 0)).unwrap();

        let err = board.add_unit(unit.at(2, 2)).unwrap_err();
        assert!(matches!(err, BoardError::AlreadyRegistered(other) if other == id));
        assert!(err.is_structural());
        assert!(board.unit_at(c(2, 2)).is_none());
        assert_eq!(board.units(0), Some(&[id][..]));
        assert_eq!(board.unit(id).and_then(Unit::position), Some(c(0, 0)));

        // Removal leaves no stale occupant behind
        board.remove_unit(id).unwrap();
        assert!(board.tile(c(0, 0)).is_some_and(|t| !t.is_occupied()));
        assert!(board.tile(c(2, 2)).is_some_and(|t| !t.is_occupied()));
    }

    #[test]
    fn test_remove_unit_clears_tile_and_roster() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let id = board.add_unit(Unit::new(0, 3, 10).at(2, 2)).unwrap();

        let unit = board.remove_unit(id).unwrap();
        assert_eq!(unit.id, id);
        assert!(board.unit_at(c(2, 2)).is_none());
        assert_eq!(board.units(0).map(<[UnitId]>::len), Some(0));

        assert!(matches!(
            board.remove_unit(id),
            Err(BoardError::UnitNotRegistered(_))
        ));
    }

    #[test]
    fn test_move_unit_updates_both_sides() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let id = board.add_unit(Unit::new(0, 3, 10).at(0, 0)).unwrap();

        board.move_unit(id, 2, 1).unwrap();

        assert!(board.unit_at(c(0, 0)).is_none());
        assert_eq!(board.tile(c(2, 1)).and_then(Tile::occupant), Some(id));
        assert_eq!(board.unit(id).and_then(Unit::position), Some(c(2, 1)));
    }

    #[test]
    fn test_move_places_unplaced_unit() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let id = board.add_unit(Unit::new(0, 3, 10)).unwrap();
        board.move_unit(id, 1, 1).unwrap();
        assert_eq!(board.unit_at(c(1, 1)).map(|u| u.id), Some(id));
    }

    #[test]
    fn test_move_into_occupied_tile_fails_cleanly() {
        let mut board = Board::open(3, 3, 2).unwrap();
        let a = board.add_unit(Unit::new(0, 3, 10).at(0, 0)).unwrap();
        let b = board.add_unit(Unit::new(1, 3, 10).at(1, 0)).unwrap();

        let err = board.move_unit(a, 1, 0).unwrap_err();
        assert!(matches!(err, BoardError::TileOccupied { x: 1, y: 0 }));
        assert_eq!(board.unit_at(c(0, 0)).map(|u| u.id), Some(a));
        assert_eq!(board.unit_at(c(1, 0)).map(|u| u.id), Some(b));
        assert_eq!(board.unit(a).and_then(Unit::position), Some(c(0, 0)));
    }

    #[test]
    fn test_move_out_of_bounds_fails() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let id = board.add_unit(Unit::new(0, 3, 10).at(0, 0)).unwrap();
        assert!(matches!(
            board.move_unit(id, -1, 0),
            Err(BoardError::OutOfBounds { x: -1, y: 0 })
        ));
        assert_eq!(board.unit_at(c(0, 0)).map(|u| u.id), Some(id));
    }

    #[test]
    fn test_move_unregistered_unit_fails() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let stray = Unit::new(0, 3, 10).at(0, 0);
        let err = board.move_unit(stray.id, 1, 1).unwrap_err();
        assert!(matches!(err, BoardError::UnitNotRegistered(_)));
        assert!(board.unit_at(c(1, 1)).is_none());
    }

    #[test]
    fn test_move_from_wrong_tile_fails() {
        let mut board = Board::open(3, 3, 1).unwrap();
        let id = board.add_unit(Unit::new(0, 3, 10).at(0, 0)).unwrap();
        // Break the back-reference to simulate a corrupted placement
        if let Some(tile) = board.tile_mut(c(0, 0)) {
            tile.occupant = None;
        }

        let err = board.move_unit(id, 1, 1).unwrap_err();
        assert!(matches!(err, BoardError::NotOnRecordedTile { x: 0, y: 0, .. }));
        assert!(board.unit_at(c(1, 1)).is_none());
    }

    #[test]
    fn test_refresh_team_movement() {
        let mut board = Board::open(3, 3, 2).unwrap();
        let id = board.add_unit(Unit::new(0, 4, 10).at(0, 0)).unwrap();
        if let Some(unit) = board.unit_mut(id) {
            unit.reduce_movement(3);
        }
        board.refresh_team_movement(0).unwrap();
        assert_eq!(board.unit(id).map(Unit::current_movement), Some(4));
        assert!(board.refresh_team_movement(5).is_err());
    }

    #[test]
    fn test_from_level_spawns_units() {
        let level = LevelData {
            name: "duel".into(),
            width: 3,
            tiles: vec![TileData::new(0, 1); 3],
            teams: vec![
                TeamData {
                    units: vec![UnitData {
                        health: 50,
                        movement: 2,
                        class_name: "Warlock".into(),
                    }],
                    spawn_points: vec![c(0, 0)],
                },
                TeamData {
                    units: vec![UnitData {
                        health: 25,
                        movement: 5,
                        class_name: "Goblin".into(),
                    }],
                    spawn_points: vec![c(2, 0)],
                },
            ],
        };

        let board = Board::from_level(&level).unwrap();
        let goblin = board.unit_at(c(2, 0)).unwrap();
        assert_eq!(goblin.team, 1);
        assert_eq!(goblin.class_name, "Goblin");
        assert_eq!(goblin.max_movement(), 5);
        assert_eq!(board.unit_at(c(0, 0)).map(Unit::health), Some(50));
    }

    #[test]
    fn test_from_level_rejects_shared_spawn() {
        let unit = UnitData {
            health: 10,
            movement: 2,
            class_name: String::new(),
        };
        let level = LevelData {
            name: String::new(),
            width: 2,
            tiles: vec![TileData::new(0, 1); 2],
            teams: vec![TeamData {
                units: vec![unit.clone(), unit],
                spawn_points: vec![c(1, 0), c(1, 0)],
            }],
        };
        assert!(matches!(
            Board::from_level(&level),
            Err(BoardError::TileOccupied { x: 1, y: 0 })
        ));
    }
}
