//! Smoke, fire and explosion propagation.
//!
//! A hazard placed on a clear cell leaves smoke, on a smoky cell starts a
//! fire, and on a burning cell explodes. Explosions break intact walls and
//! destroy doors on the way out, and push the hazard through every open edge
//! into the neighbouring cells, where the same rules apply again. Chain
//! reactions are resolved with an explicit worklist; each cell is resolved at
//! most once per cascade so adjacent fires cannot feed each other forever.
//!
//! An explosion only places its damage marker and checks for a verdict once
//! every neighbour it reached has been resolved. A verdict drops the work still
//! pending at that point.

use std::collections::BTreeSet;

use flash_point_core::{Barrier, CellCoord, Event, Hazard, WallState};
use tracing::{debug, info, warn};

use crate::{barriers::blocks_explosion, World};

/// Unit of work on the cascade worklist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Apply the hazard rules to the cell.
    Resolve(CellCoord),
    /// Close the explosion of the cell once its neighbours are resolved.
    Finish(CellCoord),
}

/// Pending work of a single cascade.
#[derive(Debug)]
struct Cascade {
    origin: CellCoord,
    pending: Vec<Step>,
    visited: BTreeSet<CellCoord>,
    resolved: u32,
    limit: Option<u32>,
    truncated: bool,
}

impl Cascade {
    fn new(origin: CellCoord, limit: Option<u32>) -> Self {
        let mut cascade = Self {
            origin,
            pending: Vec::new(),
            visited: BTreeSet::new(),
            resolved: 0,
            limit,
            truncated: false,
        };
        cascade.enqueue(origin);
        cascade
    }

    /// Queues a cell unless this cascade already reached it.
    fn enqueue(&mut self, cell: CellCoord) {
        if self.visited.insert(cell) {
            self.pending.push(Step::Resolve(cell));
        }
    }

    /// Queues the closing step of an explosion beneath anything queued after it.
    fn defer_finish(&mut self, cell: CellCoord) {
        self.pending.push(Step::Finish(cell));
    }

    /// Pops the next step. Once the limit is reached, unresolved cells are
    /// dropped but explosions already under way still finish.
    fn next(&mut self) -> Option<Step> {
        if let Some(Step::Resolve(_)) = self.pending.last() {
            if self.limit.is_some_and(|limit| self.resolved >= limit) {
                self.truncated = true;
                self.pending.retain(|step| matches!(step, Step::Finish(_)));
            } else {
                self.resolved = self.resolved.saturating_add(1);
            }
        }
        self.pending.pop()
    }

    fn halt(&mut self) {
        self.pending.clear();
    }
}

/// Places a hazard at `origin` and resolves the whole cascade it causes.
pub(crate) fn place_hazard(world: &mut World, origin: CellCoord, out_events: &mut Vec<Event>) {
    let mut cascade = Cascade::new(origin, world.tracker.rules().cascade_limit);

    while let Some(step) = cascade.next() {
        match step {
            Step::Resolve(cell) => match world.hazards.hazard_at(cell) {
                Hazard::Fire => explode(world, cell, &mut cascade, out_events),
                Hazard::Smoke => ignite(world, cell, out_events),
                Hazard::Clear => {
                    if world.hazards.set_smoke(cell) {
                        debug!(%cell, "smoke placed");
                        out_events.push(Event::SmokePlaced { cell });
                    }
                }
            },
            Step::Finish(cell) => {
                let total = world.tracker.add_damage();
                info!(%cell, damage = total, "explosion");
                out_events.push(Event::DamageMarked { total });
                if world.conclude(out_events).is_some() {
                    cascade.halt();
                }
            }
        }
    }

    if cascade.truncated {
        warn!(
            origin = %cascade.origin,
            resolved = cascade.resolved,
            "cascade reached its limit and was cut short"
        );
        out_events.push(Event::CascadeTruncated {
            origin: cascade.origin,
            resolved: cascade.resolved,
        });
    }
}

fn ignite(world: &mut World, cell: CellCoord, out_events: &mut Vec<Event>) {
    let ignition = world.hazards.ignite(cell);
    if !ignition.ignited {
        return;
    }
    debug!(%cell, "smoke ignited");
    out_events.push(Event::FireIgnited { cell });

    if ignition.victim_lost {
        world.tracker.record_loss();
        warn!(
            %cell,
            lost = world.tracker.counters().lost_victims,
            "victim lost to fire"
        );
        out_events.push(Event::VictimLost { cell });
    }
}

fn explode(
    world: &mut World,
    cell: CellCoord,
    cascade: &mut Cascade,
    out_events: &mut Vec<Event>,
) {
    out_events.push(Event::Explosion { cell });

    let grid = world.grid;
    let mut open = Vec::with_capacity(4);
    for (neighbor, edge) in grid.incident_edges(cell) {
        let barrier = world.barriers.barrier(edge);
        if !blocks_explosion(barrier) {
            open.push(neighbor);
            continue;
        }

        match barrier {
            Some(Barrier::Wall(WallState::Intact)) => {
                if world.barriers.break_wall(edge) {
                    debug!(%edge, "wall broken");
                    out_events.push(Event::WallBroken { edge });
                }
            }
            Some(Barrier::Door(_)) => {
                if world.barriers.destroy_door(edge) {
                    debug!(%edge, "door destroyed");
                    out_events.push(Event::DoorDestroyed { edge });
                }
            }
            _ => {}
        }
    }

    cascade.defer_finish(cell);
    // Reversed so the first direction in propagation order is resolved first.
    for neighbor in open.into_iter().rev() {
        cascade.enqueue(neighbor);
    }
}
