//! Authoritative wall and door state keyed by canonical edges.

use std::collections::BTreeMap;

use flash_point_core::{
    Barrier, CellCoord, DoorState, Edge, EdgeError, GridSize, SetupError, WallState,
};

/// Ledger that owns every barrier placed between adjacent cells.
///
/// Edges are canonicalised by [`Edge`], so each barrier is stored once and
/// lookups succeed regardless of the order the two cells are given in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BarrierLedger {
    grid: GridSize,
    edges: BTreeMap<Edge, Barrier>,
}

impl BarrierLedger {
    /// Creates an empty ledger for the provided board.
    pub(crate) fn new(grid: GridSize) -> Self {
        Self {
            grid,
            edges: BTreeMap::new(),
        }
    }

    /// Records a barrier laid out at setup.
    ///
    /// Repeating an identical placement is accepted; giving an edge a
    /// different barrier is rejected.
    pub(crate) fn insert(
        &mut self,
        a: CellCoord,
        b: CellCoord,
        barrier: Barrier,
    ) -> Result<(), SetupError> {
        let edge = self.edge(a, b)?;
        match self.edges.get(&edge) {
            Some(existing) if *existing != barrier => {
                Err(SetupError::ConflictingBarrier { edge })
            }
            Some(_) => Ok(()),
            None => {
                let _ = self.edges.insert(edge, barrier);
                Ok(())
            }
        }
    }

    /// Validates the pair against the board and canonicalises it.
    pub(crate) fn edge(&self, a: CellCoord, b: CellCoord) -> Result<Edge, EdgeError> {
        Edge::within(a, b, self.grid)
    }

    /// Barrier sitting on the edge, if any.
    pub(crate) fn barrier(&self, edge: Edge) -> Option<Barrier> {
        self.edges.get(&edge).copied()
    }

    pub(crate) fn wall_between(
        &self,
        a: CellCoord,
        b: CellCoord,
    ) -> Result<Option<WallState>, EdgeError> {
        let edge = self.edge(a, b)?;
        Ok(match self.barrier(edge) {
            Some(Barrier::Wall(state)) => Some(state),
            _ => None,
        })
    }

    pub(crate) fn door_between(
        &self,
        a: CellCoord,
        b: CellCoord,
    ) -> Result<Option<DoorState>, EdgeError> {
        let edge = self.edge(a, b)?;
        Ok(match self.barrier(edge) {
            Some(Barrier::Door(state)) => Some(state),
            _ => None,
        })
    }

    /// Reports whether an explosion crossing the edge would be stopped.
    ///
    /// Intact walls stop it by breaking; every door stops it by being
    /// destroyed, whether it stood open or closed.
    pub(crate) fn is_blocked(&self, a: CellCoord, b: CellCoord) -> Result<bool, EdgeError> {
        let edge = self.edge(a, b)?;
        Ok(blocks_explosion(self.barrier(edge)))
    }

    /// Transitions an intact wall to broken. Returns whether anything changed.
    pub(crate) fn break_wall(&mut self, edge: Edge) -> bool {
        match self.edges.get_mut(&edge) {
            Some(barrier) if *barrier == Barrier::Wall(WallState::Intact) => {
                *barrier = Barrier::Wall(WallState::Broken);
                true
            }
            _ => false,
        }
    }

    /// Removes a door from the ledger. Returns whether a door was removed.
    pub(crate) fn destroy_door(&mut self, edge: Edge) -> bool {
        if matches!(self.edges.get(&edge), Some(Barrier::Door(_))) {
            let _ = self.edges.remove(&edge);
            true
        } else {
            false
        }
    }

    /// Opens or closes an existing door. Returns whether a door was found.
    pub(crate) fn set_door(&mut self, edge: Edge, state: DoorState) -> bool {
        match self.edges.get_mut(&edge) {
            Some(barrier) if matches!(barrier, Barrier::Door(_)) => {
                *barrier = Barrier::Door(state);
                true
            }
            _ => false,
        }
    }

    /// Iterates over every barrier in canonical edge order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Edge, Barrier)> + '_ {
        self.edges.iter().map(|(edge, barrier)| (*edge, *barrier))
    }
}

/// Whether the barrier intercepts an explosion instead of letting it through.
pub(crate) fn blocks_explosion(barrier: Option<Barrier>) -> bool {
    matches!(
        barrier,
        Some(Barrier::Wall(WallState::Intact)) | Some(Barrier::Door(_))
    )
}
