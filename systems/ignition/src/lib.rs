#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ignition system that picks the cell receiving the hazard of each turn.

use flash_point_core::{CellCoord, Command, GridSize};
use rand::Rng;

const DIE_FACES: u32 = 6;

/// Strategy used to choose the ignition cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IgnitionRoll {
    /// Sums two six-sided dice and wraps the total over the row-major cell index.
    #[default]
    TwoDice,
    /// Draws any cell of the board with equal probability.
    UniformCell,
}

/// Configuration parameters required to construct the ignition system.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    roll: IgnitionRoll,
}

impl Config {
    /// Creates a new configuration using the provided roll strategy.
    #[must_use]
    pub const fn new(roll: IgnitionRoll) -> Self {
        Self { roll }
    }
}

/// Pure system that turns random draws into hazard placement commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ignition {
    roll: IgnitionRoll,
}

impl Ignition {
    /// Creates a new ignition system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { roll: config.roll }
    }

    /// Roll strategy the system was configured with.
    #[must_use]
    pub const fn roll_strategy(&self) -> IgnitionRoll {
        self.roll
    }

    /// Draws the next ignition cell. Returns `None` for an empty board.
    pub fn roll<R: Rng + ?Sized>(&self, grid: GridSize, rng: &mut R) -> Option<CellCoord> {
        let cell_count = grid.cell_count();
        if cell_count == 0 {
            return None;
        }

        let index = match self.roll {
            IgnitionRoll::TwoDice => {
                let total = rng.gen_range(1..=DIE_FACES) + rng.gen_range(1..=DIE_FACES);
                total as usize % cell_count
            }
            IgnitionRoll::UniformCell => rng.gen_range(0..cell_count),
        };
        grid.cell_at(index)
    }

    /// Emits the hazard placement command for this turn.
    pub fn handle<R: Rng + ?Sized>(&self, grid: GridSize, rng: &mut R, out: &mut Vec<Command>) {
        if let Some(cell) = self.roll(grid, rng) {
            out.push(Command::PlaceHazard { cell });
        }
    }
}
