//! Movement and targeting searches over a board
//!
//! All three searches share one traversal: a frontier ordered by descending
//! remaining movement (first-come among equals), deduplicated by tile, where a
//! tile is settled the first time it is popped. Results are `PathingStep`
//! chains that callers walk back to recover the route.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use crate::board::grid::Board;
use crate::board::hex::distance;
use crate::board::step::PathingStep;
use crate::board::units::Unit;
use crate::core::types::{TeamIndex, TileCoord};

/// Frontier entry; the heap pops the highest remaining movement first
struct Open {
    step: Rc<PathingStep>,
    seq: u64,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earlier insertions win ties, matching a stable sorted list
        self.step
            .m
            .cmp(&other.step.m)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shared best-first traversal state for one search
struct Traversal<'a> {
    board: &'a Board,
    frontier: BinaryHeap<Open>,
    /// Best remaining movement queued so far, per tile
    best: Vec<Option<i32>>,
    visited: Vec<bool>,
    visited_count: usize,
    seq: u64,
}

impl<'a> Traversal<'a> {
    fn new(board: &'a Board, root: Rc<PathingStep>) -> Self {
        let tiles = board.width() * board.height();
        let mut traversal = Self {
            board,
            frontier: BinaryHeap::new(),
            best: vec![None; tiles],
            visited: vec![false; tiles],
            visited_count: 0,
            seq: 0,
        };
        traversal.offer(root);
        traversal
    }

    fn index(&self, coord: TileCoord) -> usize {
        coord.x as usize + coord.y as usize * self.board.width()
    }

    fn is_visited(&self, coord: TileCoord) -> bool {
        self.visited[self.index(coord)]
    }

    /// Queue a candidate unless the tile already has an equal or better path
    fn offer(&mut self, step: Rc<PathingStep>) {
        let idx = self.index(step.coord());
        if self.visited[idx] || self.best[idx].is_some_and(|m| m >= step.m) {
            return;
        }
        self.best[idx] = Some(step.m);
        self.frontier.push(Open { step, seq: self.seq });
        self.seq += 1;
    }

    /// Settle and return the next best step, skipping superseded entries
    fn pop(&mut self) -> Option<Rc<PathingStep>> {
        while let Some(Open { step, .. }) = self.frontier.pop() {
            let idx = self.index(step.coord());
            if self.visited[idx] || self.best[idx] != Some(step.m) {
                continue;
            }
            self.visited[idx] = true;
            self.visited_count += 1;
            return Some(step);
        }
        None
    }

    /// In-bounds neighbours of a step that have not been settled yet
    fn unvisited_neighbours(&self, step: &PathingStep) -> Vec<TileCoord> {
        let mut tiles = self.board.adjacent_tiles(step.x, step.y);
        tiles.retain(|c| !self.is_visited(*c));
        tiles
    }
}

/// Whether `coord` holds a unit that `team` may not move through
///
/// `None` is the wildcard: nobody blocks.
fn blocks(board: &Board, coord: TileCoord, team: Option<TeamIndex>) -> bool {
    match team {
        Some(team) => board.occupant_team(coord).is_some_and(|other| other != team),
        None => false,
    }
}

fn enter_cost(board: &Board, coord: TileCoord) -> i32 {
    board
        .tile(coord)
        .map_or(i32::MAX, |t| i32::try_from(t.move_cost()).unwrap_or(i32::MAX))
}

fn is_free(board: &Board, coord: TileCoord) -> bool {
    board.tile(coord).is_some_and(|t| !t.is_occupied())
}

/// Every tile reachable from `origin` with `movement` points
///
/// With `team_filter = Some(team)`, tiles holding units of other teams can be
/// reached (they are reported, never endable) but not moved through. With
/// `flat_cost`, every step costs 1 regardless of terrain, which gives plain
/// hex range. Steps come back in the order they were settled, so the origin
/// is first unless `exclude_origin` drops it.
pub fn reachable_tiles(
    board: &Board,
    origin: TileCoord,
    movement: u32,
    team_filter: Option<TeamIndex>,
    exclude_origin: bool,
    flat_cost: bool,
) -> Vec<Rc<PathingStep>> {
    if !board.in_bounds(origin) {
        return Vec::new();
    }

    let budget = i32::try_from(movement).unwrap_or(i32::MAX);
    let mut search = Traversal::new(board, PathingStep::root(origin, budget));
    let mut reachable = Vec::new();

    while let Some(step) = search.pop() {
        if !step.is_root() && blocks(board, step.coord(), team_filter) {
            reachable.push(step);
            continue;
        }

        for next in search.unvisited_neighbours(&step) {
            let cost = if flat_cost { 1 } else { enter_cost(board, next) };
            let remaining = step.m.saturating_sub(cost);
            if remaining >= 0 {
                search.offer(PathingStep::extend(&step, next, remaining, is_free(board, next)));
            }
        }
        reachable.push(step);
    }

    if exclude_origin {
        reachable.remove(0);
    }

    tracing::debug!(
        "Reachable search from {} (movement {}): {} tiles",
        origin,
        movement,
        reachable.len()
    );
    reachable
}

/// Tiles a unit can move to this turn, enemies blocking
pub fn movable_tiles(board: &Board, unit: &Unit) -> Vec<Rc<PathingStep>> {
    match unit.position() {
        Some(pos) => reachable_tiles(
            board,
            pos,
            unit.current_movement(),
            Some(unit.team),
            true,
            false,
        ),
        None => Vec::new(),
    }
}

/// Tiles within `range` hexes of `origin`, origin included, ignoring terrain and units
pub fn selectable_tiles(board: &Board, origin: TileCoord, range: u32) -> Vec<Rc<PathingStep>> {
    reachable_tiles(board, origin, range, None, false, true)
}

/// Path to the nearest unit of `target_team`
///
/// The returned step sits on the target's tile; its predecessor is the tile
/// next to the target. Movement is unbounded here: steps past the unit's
/// budget carry negative `m`, which tells callers how far short this turn
/// falls. Units of teams other than `pass_through` block the way (`None`
/// lets everything through).
///
/// A path whose last tile before the target is endable (or is the unit's own
/// tile) is returned as soon as it is found. Otherwise the candidate whose
/// approach needs the fewest unaffordable, unendable trailing steps is kept,
/// the first found winning ties.
pub fn nearest_target(
    board: &Board,
    unit: &Unit,
    target_team: TeamIndex,
    pass_through: Option<TeamIndex>,
) -> Option<Rc<PathingStep>> {
    let origin = unit.position().filter(|pos| board.in_bounds(*pos))?;
    let budget = i32::try_from(unit.current_movement()).unwrap_or(i32::MAX);
    let mut search = Traversal::new(board, PathingStep::root(origin, budget));
    let mut fallback: Option<Rc<PathingStep>> = None;

    while let Some(step) = search.pop() {
        for next in search.unvisited_neighbours(&step) {
            let remaining = step.m.saturating_sub(enter_cost(board, next));
            let candidate = PathingStep::extend(&step, next, remaining, is_free(board, next));

            if board.occupant_team(next) == Some(target_team) {
                if step.endable || step.is_root() {
                    tracing::debug!(
                        "Nearest target from {}: {} after {} tiles",
                        origin,
                        next,
                        search.visited_count
                    );
                    return Some(candidate);
                }

                let better = match &fallback {
                    None => true,
                    Some(best) => {
                        let best_count = best.prev.as_ref().map_or(0, |p| p.steps_until_endable());
                        step.steps_until_endable() < best_count
                    }
                };
                if better {
                    fallback = Some(Rc::clone(&candidate));
                }
            }

            if blocks(board, next, pass_through) {
                continue;
            }
            search.offer(candidate);
        }
    }

    tracing::debug!(
        "Nearest target from {}: fallback {:?} after {} tiles",
        origin,
        fallback.as_ref().map(|s| s.coord()),
        search.visited_count
    );
    fallback
}

/// First reachable, endable tile exactly `target_distance` hexes from `target`
///
/// Tiles are tried in frontier order, so the result is the qualifying tile
/// left with the most movement, not necessarily the one fewest steps away.
pub fn nearest_tile_at_distance(
    board: &Board,
    unit: &Unit,
    pass_through: Option<TeamIndex>,
    target_distance: u32,
    target: TileCoord,
) -> Option<Rc<PathingStep>> {
    let origin = unit.position().filter(|pos| board.in_bounds(*pos))?;
    let budget = i32::try_from(unit.current_movement()).unwrap_or(i32::MAX);
    let mut search = Traversal::new(board, PathingStep::root(origin, budget));

    while let Some(step) = search.pop() {
        if step.endable && distance(target, step.coord()) == target_distance {
            tracing::debug!(
                "Tile at distance {} from {}: {} after {} tiles",
                target_distance,
                target,
                step.coord(),
                search.visited_count
            );
            return Some(step);
        }

        for next in search.unvisited_neighbours(&step) {
            let remaining = step.m.saturating_sub(enter_cost(board, next));
            if remaining < 0 || blocks(board, next, pass_through) {
                continue;
            }
            search.offer(PathingStep::extend(&step, next, remaining, is_free(board, next)));
        }
    }

    tracing::debug!(
        "No tile at distance {} from {} reachable from {}",
        target_distance,
        target,
        origin
    );
    None
}
