#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Flash Point hazard engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing every
//! hazard, barrier and counter change the command caused. The value types used
//! as keys everywhere (cells, edges) and the setup description ([`Scenario`])
//! also live here so that every crate agrees on their meaning.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Damage markers that collapse the structure unless configured otherwise.
pub const DEFAULT_COLLAPSE_THRESHOLD: u32 = 24;

/// Victims that may be lost before the game is over unless configured otherwise.
pub const DEFAULT_MAX_LOST_VICTIMS: u32 = 4;

/// Rescued victims required for victory unless configured otherwise.
pub const DEFAULT_VICTIMS_TO_WIN: u32 = 7;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Places a hazard at the cell, cascading into explosions when it already burns.
    PlaceHazard {
        /// Cell receiving the smoke, fire or explosion.
        cell: CellCoord,
    },
    /// Carries the victim out of the building, resolving its point of interest.
    RescueVictim {
        /// Cell holding the victim marker.
        cell: CellCoord,
    },
    /// Reveals a false alarm and removes its point of interest.
    RevealFalseAlarm {
        /// Cell holding the false alarm marker.
        cell: CellCoord,
    },
    /// Opens or closes the door separating two adjacent cells.
    SetDoor {
        /// One side of the door.
        from: CellCoord,
        /// The other side of the door.
        to: CellCoord,
        /// State the door should take.
        state: DoorState,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A clear cell filled with smoke.
    SmokePlaced {
        /// Cell that now holds smoke.
        cell: CellCoord,
    },
    /// A smoke cell caught fire.
    FireIgnited {
        /// Cell that now burns.
        cell: CellCoord,
    },
    /// Hazard landed on a burning cell and exploded into its neighbours.
    Explosion {
        /// Cell at the centre of the explosion.
        cell: CellCoord,
    },
    /// An explosion broke an intact wall.
    WallBroken {
        /// Edge carrying the wall.
        edge: Edge,
    },
    /// An explosion blew a door off its hinges.
    DoorDestroyed {
        /// Edge that carried the door.
        edge: Edge,
    },
    /// A victim was caught by fire and lost.
    VictimLost {
        /// Cell where the victim was lost.
        cell: CellCoord,
    },
    /// Structural damage accumulated after an explosion.
    DamageMarked {
        /// Damage markers placed so far.
        total: u32,
    },
    /// The cascade resolved as many cells as the rules allow and was cut short.
    CascadeTruncated {
        /// Cell the cascade started from.
        origin: CellCoord,
        /// Number of cells resolved before the cut.
        resolved: u32,
    },
    /// A victim was carried to safety.
    VictimRescued {
        /// Cell the victim was taken from.
        cell: CellCoord,
    },
    /// A point of interest turned out to be a false alarm.
    FalseAlarmRevealed {
        /// Cell that held the false alarm.
        cell: CellCoord,
    },
    /// A door was opened or closed.
    DoorChanged {
        /// Edge carrying the door.
        edge: Edge,
        /// State the door now holds.
        state: DoorState,
    },
    /// A terminal condition fired and the simulation stopped running.
    SimulationEnded {
        /// Verdict that ended the simulation.
        terminal: Terminal,
    },
    /// The world refused to execute a command.
    CommandRejected {
        /// Command that was refused.
        command: Command,
        /// Specific reason the command failed.
        reason: Rejection,
    },
}

/// Reasons a command may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// A terminal condition already fired; the world no longer mutates.
    SimulationOver,
    /// The command referenced a cell outside the grid.
    OutOfBounds,
    /// The command referenced a pair of cells that do not share an edge.
    InvalidEdge(EdgeError),
    /// No victim marker sits at the requested cell.
    NoVictim,
    /// No false alarm marker sits at the requested cell.
    NoFalseAlarm,
    /// No door separates the requested cells.
    NoDoor,
}

/// Location of a single grid cell expressed as column (x) and row (y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates, saturating at `u32::MAX`.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .saturating_add(self.row().abs_diff(other.row()))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal directions between grid-adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which explosions visit the neighbours of a burning cell.
    pub const PROPAGATION_ORDER: [Direction; 4] = [
        Direction::South,
        Direction::North,
        Direction::East,
        Direction::West,
    ];

    /// Cell reached by stepping once in this direction, if it has non-negative coordinates.
    #[must_use]
    pub fn step_from(self, cell: CellCoord) -> Option<CellCoord> {
        match self {
            Self::North => cell
                .row()
                .checked_sub(1)
                .map(|row| CellCoord::new(cell.column(), row)),
            Self::East => cell
                .column()
                .checked_add(1)
                .map(|column| CellCoord::new(column, cell.row())),
            Self::South => cell
                .row()
                .checked_add(1)
                .map(|row| CellCoord::new(cell.column(), row)),
            Self::West => cell
                .column()
                .checked_sub(1)
                .map(|column| CellCoord::new(column, cell.row())),
        }
    }
}

/// Dimensions of the bounded rectangular board. Pure geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a grid description with the provided dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns (width).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows (height).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the grid contains no cells at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the cell lies within the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Row-major dense index of the cell, or `None` when out of bounds.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Cell stored at the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| CellCoord::new(column, row))
        })
    }

    /// In-bounds cells sharing an edge with `cell`, in [`Direction::PROPAGATION_ORDER`].
    ///
    /// A cell outside the board has no neighbours.
    pub fn neighbors(self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let origin_inside = self.contains(cell);
        Direction::PROPAGATION_ORDER
            .into_iter()
            .filter(move |_| origin_inside)
            .filter_map(move |direction| direction.step_from(cell))
            .filter(move |neighbor| self.contains(*neighbor))
    }

    /// Neighbours of `cell` paired with the edge that separates them.
    pub fn incident_edges(self, cell: CellCoord) -> impl Iterator<Item = (CellCoord, Edge)> {
        self.neighbors(cell).filter_map(move |neighbor| {
            Edge::between(cell, neighbor)
                .ok()
                .map(|edge| (neighbor, edge))
        })
    }
}

/// Unordered pair of grid-adjacent cells.
///
/// The pair is stored in canonical order so two edges built from the same
/// cells compare equal whichever way round they were given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(CellCoord, CellCoord)", into = "(CellCoord, CellCoord)")]
pub struct Edge {
    low: CellCoord,
    high: CellCoord,
}

impl Edge {
    /// Builds the edge separating two adjacent cells.
    pub fn between(a: CellCoord, b: CellCoord) -> Result<Self, EdgeError> {
        if a.manhattan_distance(b) != 1 {
            return Err(EdgeError::NotAdjacent { first: a, second: b });
        }
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    /// Builds the edge and additionally checks both cells against the grid bounds.
    pub fn within(a: CellCoord, b: CellCoord, grid: GridSize) -> Result<Self, EdgeError> {
        for cell in [a, b] {
            if !grid.contains(cell) {
                return Err(EdgeError::OutOfBounds {
                    cell,
                    columns: grid.columns(),
                    rows: grid.rows(),
                });
            }
        }
        Self::between(a, b)
    }

    /// The two cells joined by the edge, lower cell first.
    #[must_use]
    pub const fn cells(&self) -> (CellCoord, CellCoord) {
        (self.low, self.high)
    }
}

impl TryFrom<(CellCoord, CellCoord)> for Edge {
    type Error = EdgeError;

    fn try_from((a, b): (CellCoord, CellCoord)) -> Result<Self, Self::Error> {
        Self::between(a, b)
    }
}

impl From<Edge> for (CellCoord, CellCoord) {
    fn from(edge: Edge) -> Self {
        edge.cells()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Condition of a wall segment. A broken wall never mends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallState {
    /// The wall stops explosions.
    Intact,
    /// The wall was blown open and no longer stops anything.
    Broken,
}

/// Condition of a door that is still on its hinges.
///
/// Destroyed doors are removed from the ledger rather than tracked as a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    /// The door is shut.
    Closed,
    /// The door stands open.
    Open,
}

/// Barrier attached to an edge. Walls and doors never share an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Barrier {
    /// A wall segment.
    Wall(WallState),
    /// A door.
    Door(DoorState),
}

/// Hazard held by a cell. Ordered by severity.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    /// Nothing burns here.
    #[default]
    Clear,
    /// The cell is filled with smoke.
    Smoke,
    /// The cell is on fire.
    Fire,
}

/// Resolved identity of a point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiKind {
    /// Someone waiting to be rescued.
    Victim,
    /// Nobody is there.
    FalseAlarm,
}

/// Counters accumulated by the game state tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Counters {
    /// Structural damage placed by explosions.
    pub damage_markers: u32,
    /// Victims carried to safety.
    pub rescued_victims: u32,
    /// Victims caught by fire.
    pub lost_victims: u32,
    /// Victims present on the board at setup.
    pub total_victims: u32,
}

/// End states that stop the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminal {
    /// Damage reached the collapse threshold.
    Collapse,
    /// Too many victims were lost.
    TooManyLost,
    /// Enough victims were rescued.
    Victory,
}

/// How the number of rescues required for victory is decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryRule {
    /// A fixed rescue count, independent of how many victims were placed.
    Fixed(u32),
    /// Every victim placed at setup must be rescued.
    AllVictims,
}

impl VictoryRule {
    /// Rescues required for victory given the victims placed at setup.
    #[must_use]
    pub const fn target(self, total_victims: u32) -> u32 {
        match self {
            Self::Fixed(count) => count,
            Self::AllVictims => total_victims,
        }
    }
}

/// Thresholds governing terminal conditions and cascade bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Damage markers at which the structure collapses.
    pub collapse_threshold: u32,
    /// Lost victims at which the game is over.
    pub max_lost_victims: u32,
    /// Rescue target that wins the game.
    pub victory: VictoryRule,
    /// Maximum number of cells a single cascade may resolve, if bounded.
    pub cascade_limit: Option<u32>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            collapse_threshold: DEFAULT_COLLAPSE_THRESHOLD,
            max_lost_victims: DEFAULT_MAX_LOST_VICTIMS,
            victory: VictoryRule::Fixed(DEFAULT_VICTIMS_TO_WIN),
            cascade_limit: None,
        }
    }
}

impl Rules {
    /// Replaces the collapse threshold.
    #[must_use]
    pub const fn with_collapse_threshold(mut self, threshold: u32) -> Self {
        self.collapse_threshold = threshold;
        self
    }

    /// Replaces the number of tolerated victim losses.
    #[must_use]
    pub const fn with_max_lost_victims(mut self, max_lost: u32) -> Self {
        self.max_lost_victims = max_lost;
        self
    }

    /// Replaces the victory rule.
    #[must_use]
    pub const fn with_victory(mut self, victory: VictoryRule) -> Self {
        self.victory = victory;
        self
    }

    /// Bounds the number of cells resolved by a single cascade.
    #[must_use]
    pub const fn with_cascade_limit(mut self, limit: Option<u32>) -> Self {
        self.cascade_limit = limit;
        self
    }
}

/// Identity assigned to a point of interest when the board is set up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiSeed {
    /// Always a victim.
    Victim,
    /// Always a false alarm.
    FalseAlarm,
    /// Decided by a fair coin flip drawn from the setup random source.
    Hidden,
}

/// Point of interest placed at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoiPlacement {
    /// Cell holding the marker.
    pub cell: CellCoord,
    /// How the marker's identity is decided.
    pub seed: PoiSeed,
}

/// Wall or door placed at setup between two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarrierPlacement {
    /// One side of the barrier.
    pub from: CellCoord,
    /// The other side of the barrier.
    pub to: CellCoord,
    /// Barrier and its initial state.
    pub barrier: Barrier,
}

/// Complete description of a board before the first turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Number of columns on the board.
    pub columns: u32,
    /// Number of rows on the board.
    pub rows: u32,
    /// Cells already burning when the game starts.
    #[serde(default)]
    pub fires: Vec<CellCoord>,
    /// Points of interest placed on the board.
    #[serde(default)]
    pub pois: Vec<PoiPlacement>,
    /// Walls and doors laid out between cells.
    #[serde(default)]
    pub barriers: Vec<BarrierPlacement>,
    /// Terminal thresholds and cascade bounds.
    #[serde(default)]
    pub rules: Rules,
}

impl Scenario {
    /// Creates an empty, open board with default rules.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            fires: Vec::new(),
            pois: Vec::new(),
            barriers: Vec::new(),
            rules: Rules::default(),
        }
    }

    /// Reference layout of the rescue board game's training house.
    ///
    /// Victim or false alarm identities are hidden and resolved by coin flip
    /// when the world is built.
    #[must_use]
    pub fn flash_point() -> Self {
        let fires = [
            (2, 2),
            (2, 3),
            (3, 2),
            (3, 3),
            (3, 4),
            (3, 5),
            (4, 4),
            (5, 6),
            (5, 7),
            (6, 6),
        ];
        let mut scenario = Self::new(8, 10);
        for (column, row) in fires {
            scenario = scenario.with_fire(CellCoord::new(column, row));
        }
        for (column, row) in [(2, 4), (5, 8), (5, 1)] {
            scenario = scenario.with_poi(CellCoord::new(column, row), PoiSeed::Hidden);
        }
        let walls = [((3, 3), (3, 4)), ((4, 5), (5, 5)), ((5, 5), (5, 6))];
        for ((a_column, a_row), (b_column, b_row)) in walls {
            scenario = scenario.with_barrier(
                CellCoord::new(a_column, a_row),
                CellCoord::new(b_column, b_row),
                Barrier::Wall(WallState::Intact),
            );
        }
        let doors = [((1, 2), (1, 3)), ((4, 2), (5, 2))];
        for ((a_column, a_row), (b_column, b_row)) in doors {
            scenario = scenario.with_barrier(
                CellCoord::new(a_column, a_row),
                CellCoord::new(b_column, b_row),
                Barrier::Door(DoorState::Closed),
            );
        }
        scenario
    }

    /// Grid dimensions described by the scenario.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        GridSize::new(self.columns, self.rows)
    }

    /// Adds a burning cell.
    #[must_use]
    pub fn with_fire(mut self, cell: CellCoord) -> Self {
        self.fires.push(cell);
        self
    }

    /// Adds a point of interest.
    #[must_use]
    pub fn with_poi(mut self, cell: CellCoord, seed: PoiSeed) -> Self {
        self.pois.push(PoiPlacement { cell, seed });
        self
    }

    /// Adds a wall or door between two cells.
    #[must_use]
    pub fn with_barrier(mut self, from: CellCoord, to: CellCoord, barrier: Barrier) -> Self {
        self.barriers.push(BarrierPlacement { from, to, barrier });
        self
    }

    /// Replaces the rules.
    #[must_use]
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }
}

/// Edge queries or mutations that reference cells which cannot share an edge.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum EdgeError {
    /// The two cells are not orthogonal neighbours.
    #[error("cells {first} and {second} are not grid-adjacent")]
    NotAdjacent {
        /// First cell of the pair.
        first: CellCoord,
        /// Second cell of the pair.
        second: CellCoord,
    },
    /// A cell of the pair lies outside the board.
    #[error("cell {cell} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Offending cell.
        cell: CellCoord,
        /// Columns on the board.
        columns: u32,
        /// Rows on the board.
        rows: u32,
    },
}

/// Malformed initial configuration, rejected before any turn runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// The board has no cells.
    #[error("grid must have at least one column and one row")]
    EmptyGrid,
    /// An initial fire lies outside the board.
    #[error("initial fire at {cell} lies outside the grid")]
    FireOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A point of interest lies outside the board.
    #[error("point of interest at {cell} lies outside the grid")]
    PoiOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// Two points of interest share a cell.
    #[error("more than one point of interest placed at {cell}")]
    DuplicatePoi {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A barrier does not sit between two adjacent in-bounds cells.
    #[error("invalid barrier placement: {0}")]
    InvalidBarrier(#[from] EdgeError),
    /// An edge was given two different barriers.
    #[error("edge {edge} was given conflicting barriers")]
    ConflictingBarrier {
        /// Offending edge.
        edge: Edge,
    },
    /// The rules would end the game before it starts.
    #[error("invalid rules: {reason}")]
    InvalidRules {
        /// Description of the offending threshold.
        reason: &'static str,
    },
}
