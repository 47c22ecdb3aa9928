#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn driver that sequences ignition, the agent layer and terminal checks.

use flash_point_core::{CellCoord, Command, Event, Terminal};
use flash_point_system_ignition::Ignition;
use flash_point_world::{self as world, query, World};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

/// Seam through which an external scheduler acts once the hazard has been placed.
///
/// Agents observe the world read-only together with the events of the current
/// turn and answer with commands; the driver applies them in order.
pub trait AgentLayer {
    /// Emits the commands the agents want to perform this turn.
    fn act(&mut self, world: &World, events: &[Event], out: &mut Vec<Command>);
}

/// Agent layer that never acts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Idle;

impl AgentLayer for Idle {
    fn act(&mut self, _world: &World, _events: &[Event], _out: &mut Vec<Command>) {}
}

/// Summary of one simulated turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TurnReport {
    /// One-based number of the turn.
    pub turn: u32,
    /// Cell that received the hazard, if the board had any cells.
    pub ignition: Option<CellCoord>,
    /// Every event emitted during the turn, in order.
    pub events: Vec<Event>,
    /// Verdict reached by the end of the turn, if any.
    pub terminal: Option<Terminal>,
}

/// Errors raised by the turn driver.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    /// The world already reached a verdict and accepts no further turns.
    #[error("simulation already ended with {0:?}")]
    SimulationOver(Terminal),
}

/// Drives the world one turn at a time.
#[derive(Debug)]
pub struct TurnDriver {
    ignition: Ignition,
    turn: u32,
}

impl TurnDriver {
    /// Creates a driver that places hazards with the provided ignition system.
    #[must_use]
    pub const fn new(ignition: Ignition) -> Self {
        Self { ignition, turn: 0 }
    }

    /// Number of turns completed so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Runs one turn: a single hazard placement followed by the agent layer.
    ///
    /// Agents are skipped once the hazard phase ends the simulation.
    pub fn advance<R, A>(
        &mut self,
        world: &mut World,
        rng: &mut R,
        agents: &mut A,
    ) -> Result<TurnReport, TurnError>
    where
        R: Rng + ?Sized,
        A: AgentLayer + ?Sized,
    {
        if let Some(terminal) = query::terminal(world) {
            return Err(TurnError::SimulationOver(terminal));
        }
        self.turn = self.turn.saturating_add(1);

        let mut commands = Vec::new();
        self.ignition.handle(query::grid(world), rng, &mut commands);
        let ignition = commands.iter().find_map(|command| match command {
            Command::PlaceHazard { cell } => Some(*cell),
            _ => None,
        });
        debug!(turn = self.turn, ?ignition, "hazard rolled");

        let mut events = Vec::new();
        apply_all(world, commands, &mut events);

        if query::is_running(world) {
            let mut agent_commands = Vec::new();
            agents.act(world, &events, &mut agent_commands);
            apply_all(world, agent_commands, &mut events);
        }

        let terminal = query::terminal(world);
        let counters = query::counters(world);
        info!(
            turn = self.turn,
            damage = counters.damage_markers,
            lost = counters.lost_victims,
            rescued = counters.rescued_victims,
            "turn complete"
        );

        Ok(TurnReport {
            turn: self.turn,
            ignition,
            events,
            terminal,
        })
    }
}

fn apply_all(world: &mut World, commands: Vec<Command>, events: &mut Vec<Event>) {
    for command in commands {
        world::apply(world, command, events);
    }
}
