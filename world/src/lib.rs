#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Flash Point hazard engine.
//!
//! The world owns the barrier ledger, the hazard field with its points of
//! interest, and the game state tracker. It is built once from a
//! [`Scenario`], mutated exclusively through [`apply`], and observed through
//! the [`query`] module.

mod barriers;
mod hazards;
mod propagation;
mod tracker;

use flash_point_core::{
    Command, Event, GridSize, PoiKind, PoiSeed, Rejection, Rules, Scenario, SetupError, Terminal,
    VictoryRule,
};
use rand::Rng;
use tracing::{debug, info};

use barriers::BarrierLedger;
use hazards::HazardField;
use tracker::Tracker;

/// Represents the authoritative Flash Point world state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    grid: GridSize,
    barriers: BarrierLedger,
    hazards: HazardField,
    tracker: Tracker,
}

impl World {
    /// Builds the board described by the scenario.
    ///
    /// Points of interest seeded as [`PoiSeed::Hidden`] are resolved into
    /// victims or false alarms with a fair coin flip drawn from `rng`, in the
    /// order they are listed. The whole scenario is validated before the world
    /// is returned; no turn can run against a malformed board.
    pub fn new<R: Rng + ?Sized>(scenario: &Scenario, rng: &mut R) -> Result<Self, SetupError> {
        let grid = scenario.grid();
        if grid.is_empty() {
            return Err(SetupError::EmptyGrid);
        }
        validate_rules(&scenario.rules)?;

        let mut hazards = HazardField::new(grid);
        for &cell in &scenario.fires {
            if !grid.contains(cell) {
                return Err(SetupError::FireOutOfBounds { cell });
            }
            let _ = hazards.ignite(cell);
        }

        let mut barriers = BarrierLedger::new(grid);
        for placement in &scenario.barriers {
            barriers.insert(placement.from, placement.to, placement.barrier)?;
        }

        let mut total_victims = 0_u32;
        for placement in &scenario.pois {
            let cell = placement.cell;
            if !grid.contains(cell) {
                return Err(SetupError::PoiOutOfBounds { cell });
            }
            let kind = match placement.seed {
                PoiSeed::Victim => PoiKind::Victim,
                PoiSeed::FalseAlarm => PoiKind::FalseAlarm,
                PoiSeed::Hidden if rng.gen_bool(0.5) => PoiKind::Victim,
                PoiSeed::Hidden => PoiKind::FalseAlarm,
            };
            if !hazards.place_poi(cell, kind) {
                return Err(SetupError::DuplicatePoi { cell });
            }
            if kind == PoiKind::Victim {
                total_victims += 1;
            }
        }
        if scenario.rules.victory == VictoryRule::AllVictims && total_victims == 0 {
            return Err(SetupError::InvalidRules {
                reason: "rescuing every victim needs at least one victim on the board",
            });
        }

        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            fires = scenario.fires.len(),
            barriers = scenario.barriers.len(),
            pois = scenario.pois.len(),
            total_victims,
            "world ready"
        );

        Ok(Self {
            grid,
            barriers,
            hazards,
            tracker: Tracker::new(scenario.rules, total_victims),
        })
    }

    /// Latches a newly reached verdict and announces it.
    fn conclude(&mut self, out_events: &mut Vec<Event>) -> Option<Terminal> {
        let terminal = self.tracker.latch()?;
        info!(?terminal, counters = ?self.tracker.counters(), "simulation ended");
        out_events.push(Event::SimulationEnded { terminal });
        Some(terminal)
    }
}

fn validate_rules(rules: &Rules) -> Result<(), SetupError> {
    if rules.collapse_threshold == 0 {
        return Err(SetupError::InvalidRules {
            reason: "collapse threshold must be at least one",
        });
    }
    if rules.max_lost_victims == 0 {
        return Err(SetupError::InvalidRules {
            reason: "tolerated victim losses must be at least one",
        });
    }
    if rules.victory == VictoryRule::Fixed(0) {
        return Err(SetupError::InvalidRules {
            reason: "victory target must be at least one rescue",
        });
    }
    if rules.cascade_limit == Some(0) {
        return Err(SetupError::InvalidRules {
            reason: "cascade limit must allow at least one cell",
        });
    }
    Ok(())
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once a terminal verdict has been reached every command is rejected with
/// [`Rejection::SimulationOver`] and the world is left untouched.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if !world.tracker.running() {
        reject(command, Rejection::SimulationOver, out_events);
        return;
    }

    match command {
        Command::PlaceHazard { cell } => {
            if !world.grid.contains(cell) {
                reject(command, Rejection::OutOfBounds, out_events);
                return;
            }
            propagation::place_hazard(world, cell, out_events);
        }
        Command::RescueVictim { cell } => {
            if world.hazards.poi_at(cell) != Some(PoiKind::Victim) {
                reject(command, Rejection::NoVictim, out_events);
                return;
            }
            let _ = world.hazards.remove_poi(cell);
            world.tracker.record_rescue();
            info!(
                %cell,
                rescued = world.tracker.counters().rescued_victims,
                "victim rescued"
            );
            out_events.push(Event::VictimRescued { cell });
        }
        Command::RevealFalseAlarm { cell } => {
            if world.hazards.poi_at(cell) != Some(PoiKind::FalseAlarm) {
                reject(command, Rejection::NoFalseAlarm, out_events);
                return;
            }
            let _ = world.hazards.remove_poi(cell);
            out_events.push(Event::FalseAlarmRevealed { cell });
        }
        Command::SetDoor { from, to, state } => {
            let edge = match world.barriers.edge(from, to) {
                Ok(edge) => edge,
                Err(error) => {
                    reject(command, Rejection::InvalidEdge(error), out_events);
                    return;
                }
            };
            if !world.barriers.set_door(edge, state) {
                reject(command, Rejection::NoDoor, out_events);
                return;
            }
            out_events.push(Event::DoorChanged { edge, state });
        }
    }

    let _ = world.conclude(out_events);
}

fn reject(command: Command, reason: Rejection, out_events: &mut Vec<Event>) {
    debug!(?command, ?reason, "command rejected");
    out_events.push(Event::CommandRejected { command, reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use flash_point_core::{
        Barrier, CellCoord, Counters, DoorState, Edge, EdgeError, GridSize, Hazard, PoiKind,
        Rules, Terminal, WallState,
    };

    use super::World;

    /// Dimensions of the board.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.grid
    }

    /// Rules the world was built with.
    #[must_use]
    pub fn rules(world: &World) -> Rules {
        world.tracker.rules()
    }

    /// Hazard held by the cell; cells outside the board read as clear.
    #[must_use]
    pub fn hazard_at(world: &World, cell: CellCoord) -> Hazard {
        world.hazards.hazard_at(cell)
    }

    /// Cells currently holding the provided hazard, in row-major order.
    #[must_use]
    pub fn cells_with(world: &World, hazard: Hazard) -> Vec<CellCoord> {
        world
            .grid
            .cells()
            .zip(world.hazards.cells())
            .filter(|(_, held)| **held == hazard)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Wall separating two adjacent cells, if any. Order of the cells does not matter.
    pub fn wall_between(
        world: &World,
        a: CellCoord,
        b: CellCoord,
    ) -> Result<Option<WallState>, EdgeError> {
        world.barriers.wall_between(a, b)
    }

    /// Door separating two adjacent cells, if it has not been destroyed.
    pub fn door_between(
        world: &World,
        a: CellCoord,
        b: CellCoord,
    ) -> Result<Option<DoorState>, EdgeError> {
        world.barriers.door_between(a, b)
    }

    /// Reports whether an explosion crossing the edge would be stopped by a barrier.
    pub fn is_blocked(world: &World, a: CellCoord, b: CellCoord) -> Result<bool, EdgeError> {
        world.barriers.is_blocked(a, b)
    }

    /// Every barrier on the board in canonical edge order.
    #[must_use]
    pub fn barriers(world: &World) -> Vec<(Edge, Barrier)> {
        world.barriers.iter().collect()
    }

    /// Point of interest at the cell, if any.
    #[must_use]
    pub fn poi_at(world: &World, cell: CellCoord) -> Option<PoiKind> {
        world.hazards.poi_at(cell)
    }

    /// Every unresolved point of interest in cell order.
    #[must_use]
    pub fn pois(world: &World) -> Vec<(CellCoord, PoiKind)> {
        world.hazards.pois().collect()
    }

    /// Damage and victim counters.
    #[must_use]
    pub fn counters(world: &World) -> Counters {
        world.tracker.counters()
    }

    /// Verdict that ended the simulation, if one was reached.
    #[must_use]
    pub fn terminal(world: &World) -> Option<Terminal> {
        world.tracker.terminal()
    }

    /// Reports whether the world still accepts commands.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.tracker.running()
    }

    /// Captures the complete observable state of the world.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            grid: world.grid,
            hazards: world.hazards.cells().to_vec(),
            barriers: barriers(world),
            pois: pois(world),
            counters: counters(world),
            terminal: terminal(world),
        }
    }

    /// Comparable capture of every hazard, barrier, marker and counter.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct WorldSnapshot {
        /// Dimensions of the board.
        pub grid: GridSize,
        /// Row-major hazard per cell.
        pub hazards: Vec<Hazard>,
        /// Barriers in canonical edge order.
        pub barriers: Vec<(Edge, Barrier)>,
        /// Unresolved points of interest in cell order.
        pub pois: Vec<(CellCoord, PoiKind)>,
        /// Damage and victim counters.
        pub counters: Counters,
        /// Verdict that ended the simulation, if any.
        pub terminal: Option<Terminal>,
    }
}
