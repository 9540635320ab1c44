//! Search results: immutable chains of steps from a destination back to its origin

use std::rc::Rc;

use crate::core::types::TileCoord;

/// One tile along a searched path
///
/// Steps link backwards through `prev`; the root (the searching unit's own
/// tile) has no predecessor. Each search builds its own chains, so a step
/// never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathingStep {
    pub x: i32,
    pub y: i32,
    /// Movement left after entering this tile; negative when the path
    /// needs more than the current turn's budget
    pub m: i32,
    pub prev: Option<Rc<PathingStep>>,
    /// True if the tile was unoccupied when the search ran
    pub endable: bool,
}

impl PathingStep {
    pub fn root(coord: TileCoord, movement: i32) -> Rc<Self> {
        Rc::new(Self {
            x: coord.x,
            y: coord.y,
            m: movement,
            prev: None,
            endable: false,
        })
    }

    pub fn extend(prev: &Rc<Self>, coord: TileCoord, m: i32, endable: bool) -> Rc<Self> {
        Rc::new(Self {
            x: coord.x,
            y: coord.y,
            m,
            prev: Some(Rc::clone(prev)),
            endable,
        })
    }

    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }

    pub fn is_root(&self) -> bool {
        self.prev.is_none()
    }

    /// Walk the chain from this step back to the root
    pub fn iter(&self) -> Steps<'_> {
        Steps { next: Some(self) }
    }

    /// Number of moves from the root to this step
    pub fn len(&self) -> usize {
        self.iter().count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Tiles from the origin to this step, origin first
    pub fn path(&self) -> Vec<TileCoord> {
        let mut path: Vec<TileCoord> = self.iter().map(PathingStep::coord).collect();
        path.reverse();
        path
    }

    /// Count of trailing steps that are neither endable nor affordable
    ///
    /// Starting at this step, walks back while the step cannot be stopped on
    /// and needs movement beyond the current budget.
    pub fn steps_until_endable(&self) -> usize {
        self.iter()
            .take_while(|step| !step.endable && step.m < 0)
            .count()
    }

    /// Last step of the chain the unit can actually stop on this turn
    ///
    /// Skips this step itself, which for a nearest-target result is the
    /// target's tile. Returns `None` when no earlier step is both endable and
    /// within budget (the unit cannot make progress this turn).
    pub fn furthest_endable(&self) -> Option<&PathingStep> {
        self.iter()
            .skip(1)
            .find(|step| step.m >= 0 && step.endable)
    }
}

/// Iterator over a step chain, destination first
pub struct Steps<'a> {
    next: Option<&'a PathingStep>,
}

impl<'a> Iterator for Steps<'a> {
    type Item = &'a PathingStep;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.prev.as_deref();
        Some(current)
    }
}
