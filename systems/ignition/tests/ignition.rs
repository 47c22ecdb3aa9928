use std::collections::BTreeSet;

use flash_point_core::{CellCoord, Command, GridSize};
use flash_point_system_ignition::{Config, Ignition, IgnitionRoll};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rolls(roll: IgnitionRoll, grid: GridSize, seed: u64, count: usize) -> Vec<CellCoord> {
    let ignition = Ignition::new(Config::new(roll));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| ignition.roll(grid, &mut rng).expect("board is not empty"))
        .collect()
}

#[test]
fn two_dice_reach_only_indices_two_to_twelve() {
    let grid = GridSize::new(8, 10);
    let reached: BTreeSet<usize> = rolls(IgnitionRoll::TwoDice, grid, 0xd1ce, 2_000)
        .into_iter()
        .map(|cell| grid.index_of(cell).expect("rolled cell is on the board"))
        .collect();

    assert_eq!(reached, (2..=12).collect::<BTreeSet<_>>());
    assert_eq!(grid.cell_at(10), Some(CellCoord::new(2, 1)));
}

#[test]
fn two_dice_wrap_around_small_boards() {
    let grid = GridSize::new(3, 2);
    let reached: BTreeSet<CellCoord> = rolls(IgnitionRoll::TwoDice, grid, 7, 2_000)
        .into_iter()
        .collect();

    assert_eq!(reached, grid.cells().collect::<BTreeSet<_>>());
}

#[test]
fn uniform_roll_covers_the_whole_board() {
    let grid = GridSize::new(4, 5);
    let reached: BTreeSet<CellCoord> = rolls(IgnitionRoll::UniformCell, grid, 11, 2_000)
        .into_iter()
        .collect();

    assert_eq!(reached.len(), grid.cell_count());
    assert!(reached.iter().all(|cell| grid.contains(*cell)));
}

#[test]
fn same_seed_rolls_same_cells() {
    let grid = GridSize::new(8, 10);
    for roll in [IgnitionRoll::TwoDice, IgnitionRoll::UniformCell] {
        assert_eq!(rolls(roll, grid, 42, 64), rolls(roll, grid, 42, 64));
    }
}

#[test]
fn handle_emits_one_placement_per_call() {
    let ignition = Ignition::new(Config::new(IgnitionRoll::TwoDice));
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut commands = Vec::new();

    ignition.handle(GridSize::new(8, 10), &mut rng, &mut commands);

    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], Command::PlaceHazard { .. }));
}
