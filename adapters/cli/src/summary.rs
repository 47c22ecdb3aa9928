//! Plain-text rendering of the board and the final tally.

use flash_point_core::{CellCoord, Hazard, PoiKind, Terminal};
use flash_point_world::{query, World};

/// Renders the board row by row: `.` clear, `s` smoke, `F` fire.
///
/// Cells holding a point of interest show `V` for a victim or `?` for a false
/// alarm in place of their hazard glyph.
pub(crate) fn render_board(world: &World) -> String {
    let grid = query::grid(world);
    (0..grid.rows())
        .map(|row| {
            (0..grid.columns())
                .map(|column| glyph(world, CellCoord::new(column, row)))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the counters and verdict after `turns` turns.
pub(crate) fn render_tally(world: &World, turns: u32) -> String {
    let counters = query::counters(world);
    let verdict = match query::terminal(world) {
        Some(Terminal::Collapse) => "the building collapsed",
        Some(Terminal::TooManyLost) => "too many victims were lost",
        Some(Terminal::Victory) => "the firefighters won",
        None => "no verdict yet",
    };
    format!(
        "turns: {turns}\ndamage: {}/{}\nrescued: {}\nlost: {}/{}\nverdict: {verdict}",
        counters.damage_markers,
        query::rules(world).collapse_threshold,
        counters.rescued_victims,
        counters.lost_victims,
        query::rules(world).max_lost_victims,
    )
}

fn glyph(world: &World, cell: CellCoord) -> char {
    match (query::poi_at(world, cell), query::hazard_at(world, cell)) {
        (Some(PoiKind::Victim), _) => 'V',
        (Some(PoiKind::FalseAlarm), _) => '?',
        (None, Hazard::Clear) => '.',
        (None, Hazard::Smoke) => 's',
        (None, Hazard::Fire) => 'F',
    }
}
