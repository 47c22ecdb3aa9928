//! Dense per-cell hazard state and the sparse point-of-interest registry.

use std::collections::BTreeMap;

use flash_point_core::{CellCoord, GridSize, Hazard, PoiKind};

/// Outcome of setting a cell on fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ignition {
    /// Whether the cell changed state.
    pub(crate) ignited: bool,
    /// Whether a victim marker was consumed by the flames.
    pub(crate) victim_lost: bool,
}

/// Hazard field covering every cell of the board.
///
/// Hazards only ever escalate `Clear -> Smoke -> Fire`; no operation here
/// lowers a cell's hazard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HazardField {
    grid: GridSize,
    cells: Vec<Hazard>,
    pois: BTreeMap<CellCoord, PoiKind>,
}

impl HazardField {
    /// Creates a field with every cell clear and no points of interest.
    pub(crate) fn new(grid: GridSize) -> Self {
        Self {
            grid,
            cells: vec![Hazard::Clear; grid.cell_count()],
            pois: BTreeMap::new(),
        }
    }

    /// Hazard held by the cell. Cells outside the board read as clear.
    pub(crate) fn hazard_at(&self, cell: CellCoord) -> Hazard {
        self.grid
            .index_of(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or_default()
    }

    /// Fills a clear cell with smoke. Returns whether the cell changed.
    ///
    /// Smoke and fire cells are left untouched; fire must be routed through
    /// explosion handling instead.
    pub(crate) fn set_smoke(&mut self, cell: CellCoord) -> bool {
        match self.slot_mut(cell) {
            Some(slot) if *slot == Hazard::Clear => {
                *slot = Hazard::Smoke;
                true
            }
            _ => false,
        }
    }

    /// Sets the cell on fire, consuming any victim marker it holds.
    ///
    /// False alarms survive the fire; only victims are lost.
    pub(crate) fn ignite(&mut self, cell: CellCoord) -> Ignition {
        let ignited = match self.slot_mut(cell) {
            Some(slot) if *slot != Hazard::Fire => {
                *slot = Hazard::Fire;
                true
            }
            _ => false,
        };
        let victim_lost = ignited && self.pois.get(&cell) == Some(&PoiKind::Victim);
        if victim_lost {
            let _ = self.pois.remove(&cell);
        }
        Ignition {
            ignited,
            victim_lost,
        }
    }

    pub(crate) fn poi_at(&self, cell: CellCoord) -> Option<PoiKind> {
        self.pois.get(&cell).copied()
    }

    /// Places a marker at setup. Returns `false` when the cell already holds one.
    pub(crate) fn place_poi(&mut self, cell: CellCoord, kind: PoiKind) -> bool {
        if self.pois.contains_key(&cell) {
            return false;
        }
        let _ = self.pois.insert(cell, kind);
        true
    }

    pub(crate) fn remove_poi(&mut self, cell: CellCoord) -> Option<PoiKind> {
        self.pois.remove(&cell)
    }

    /// Iterates over the remaining markers in cell order.
    pub(crate) fn pois(&self) -> impl Iterator<Item = (CellCoord, PoiKind)> + '_ {
        self.pois.iter().map(|(cell, kind)| (*cell, *kind))
    }

    /// Dense row-major hazard slice.
    pub(crate) fn cells(&self) -> &[Hazard] {
        &self.cells
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Hazard> {
        let index = self.grid.index_of(cell)?;
        self.cells.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> HazardField {
        HazardField::new(GridSize::new(3, 3))
    }

    #[test]
    fn cells_start_clear() {
        let field = field();
        assert!(field.cells().iter().all(|hazard| *hazard == Hazard::Clear));
        assert_eq!(field.hazard_at(CellCoord::new(9, 9)), Hazard::Clear);
    }

    #[test]
    fn smoke_never_overrides_fire() {
        let mut field = field();
        let cell = CellCoord::new(1, 1);
        assert!(field.set_smoke(cell));
        assert!(!field.set_smoke(cell));
        assert!(field.ignite(cell).ignited);
        assert!(!field.set_smoke(cell));
        assert_eq!(field.hazard_at(cell), Hazard::Fire);
    }

    #[test]
    fn igniting_a_victim_loses_it() {
        let mut field = field();
        let cell = CellCoord::new(0, 2);
        assert!(field.place_poi(cell, PoiKind::Victim));
        assert!(field.set_smoke(cell));
        let outcome = field.ignite(cell);
        assert_eq!(
            outcome,
            Ignition {
                ignited: true,
                victim_lost: true,
            }
        );
        assert_eq!(field.poi_at(cell), None);
    }

    #[test]
    fn igniting_a_false_alarm_keeps_it() {
        let mut field = field();
        let cell = CellCoord::new(2, 0);
        assert!(field.place_poi(cell, PoiKind::FalseAlarm));
        assert!(!field.ignite(cell).victim_lost);
        assert_eq!(field.poi_at(cell), Some(PoiKind::FalseAlarm));
    }

    #[test]
    fn reigniting_is_a_no_op() {
        let mut field = field();
        let cell = CellCoord::new(1, 0);
        assert!(field.ignite(cell).ignited);
        assert!(field.place_poi(cell, PoiKind::Victim));
        assert_eq!(
            field.ignite(cell),
            Ignition {
                ignited: false,
                victim_lost: false,
            }
        );
        assert_eq!(field.poi_at(cell), Some(PoiKind::Victim));
    }

    #[test]
    fn markers_are_unique_per_cell() {
        let mut field = field();
        let cell = CellCoord::new(1, 2);
        assert!(field.place_poi(cell, PoiKind::Victim));
        assert!(!field.place_poi(cell, PoiKind::FalseAlarm));
        assert_eq!(field.remove_poi(cell), Some(PoiKind::Victim));
        assert_eq!(field.remove_poi(cell), None);
        assert_eq!(field.pois().count(), 0);
    }
}
