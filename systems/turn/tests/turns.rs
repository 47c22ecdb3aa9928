use flash_point_core::{
    CellCoord, Command, Event, PoiKind, PoiSeed, Rejection, Rules, Scenario, Terminal, VictoryRule,
};
use flash_point_system_ignition::{Config, Ignition, IgnitionRoll};
use flash_point_system_turn::{AgentLayer, Idle, TurnDriver, TurnError};
use flash_point_world::{query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Rescues the first victim it sees each turn.
#[derive(Default)]
struct Rescuer {
    calls: u32,
}

impl AgentLayer for Rescuer {
    fn act(&mut self, world: &World, _events: &[Event], out: &mut Vec<Command>) {
        self.calls += 1;
        if let Some((cell, _)) = query::pois(world)
            .into_iter()
            .find(|(_, kind)| *kind == PoiKind::Victim)
        {
            out.push(Command::RescueVictim { cell });
        }
    }
}

fn driver(roll: IgnitionRoll) -> TurnDriver {
    TurnDriver::new(Ignition::new(Config::new(roll)))
}

#[test]
fn each_turn_places_exactly_one_hazard() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let scenario = Scenario::new(4, 4).with_rules(Rules::default().with_collapse_threshold(500));
    let mut world = World::new(&scenario, &mut rng).expect("valid");
    let mut driver = driver(IgnitionRoll::UniformCell);

    for _ in 0..10 {
        let before = query::snapshot(&world);
        let report = driver
            .advance(&mut world, &mut rng, &mut Idle)
            .expect("running");
        let ignited = report.ignition.expect("board has cells");
        let after = query::snapshot(&world);

        let grid = query::grid(&world);
        let index = grid.index_of(ignited).expect("ignition is on the board");
        if before.hazards[index] != after.hazards[index] {
            assert!(after.hazards[index] > before.hazards[index]);
        }
        let rejected = report
            .events
            .iter()
            .any(|event| matches!(event, Event::CommandRejected { .. }));
        assert!(!rejected);
    }
    assert_eq!(driver.turn(), 10);
}

#[test]
fn agents_act_after_the_hazard_phase() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let scenario = Scenario::new(8, 10)
        .with_poi(CellCoord::new(7, 9), PoiSeed::Victim)
        .with_rules(Rules::default().with_victory(VictoryRule::AllVictims));
    let mut world = World::new(&scenario, &mut rng).expect("valid");
    let mut driver = driver(IgnitionRoll::TwoDice);
    let mut rescuer = Rescuer::default();

    let report = driver
        .advance(&mut world, &mut rng, &mut rescuer)
        .expect("running");

    assert_eq!(rescuer.calls, 1);
    assert_eq!(report.terminal, Some(Terminal::Victory));
    assert_eq!(
        report.events.last(),
        Some(&Event::SimulationEnded {
            terminal: Terminal::Victory,
        })
    );
    assert_eq!(query::counters(&world).rescued_victims, 1);
    assert_eq!(
        driver.advance(&mut world, &mut rng, &mut rescuer),
        Err(TurnError::SimulationOver(Terminal::Victory))
    );
    assert_eq!(rescuer.calls, 1);
}

#[test]
fn agents_are_skipped_when_the_hazard_ends_the_game() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let scenario = Scenario::new(1, 1)
        .with_fire(CellCoord::new(0, 0))
        .with_rules(Rules::default().with_collapse_threshold(1));
    let mut world = World::new(&scenario, &mut rng).expect("valid");
    let mut rescuer = Rescuer::default();

    let report = driver(IgnitionRoll::TwoDice)
        .advance(&mut world, &mut rng, &mut rescuer)
        .expect("running");

    assert_eq!(report.terminal, Some(Terminal::Collapse));
    assert_eq!(rescuer.calls, 0);
}

#[test]
fn rejected_agent_commands_are_reported() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut world = World::new(&Scenario::new(8, 10), &mut rng).expect("valid");

    struct Clumsy;
    impl AgentLayer for Clumsy {
        fn act(&mut self, _world: &World, _events: &[Event], out: &mut Vec<Command>) {
            out.push(Command::RescueVictim {
                cell: CellCoord::new(7, 9),
            });
        }
    }

    let report = driver(IgnitionRoll::TwoDice)
        .advance(&mut world, &mut rng, &mut Clumsy)
        .expect("running");

    assert_eq!(
        report.events.last(),
        Some(&Event::CommandRejected {
            command: Command::RescueVictim {
                cell: CellCoord::new(7, 9),
            },
            reason: Rejection::NoVictim,
        })
    );
}

#[test]
fn reference_board_eventually_reaches_a_verdict() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xf1a5);
    let mut world = World::new(&Scenario::flash_point(), &mut rng).expect("valid");
    let mut driver = driver(IgnitionRoll::UniformCell);

    let mut verdict = None;
    for _ in 0..10_000 {
        match driver.advance(&mut world, &mut rng, &mut Idle) {
            Ok(report) => {
                if report.terminal.is_some() {
                    verdict = report.terminal;
                    break;
                }
            }
            Err(error) => panic!("unexpected turn error: {error}"),
        }
    }

    assert!(matches!(
        verdict,
        Some(Terminal::Collapse | Terminal::TooManyLost)
    ));
    assert_eq!(query::terminal(&world), verdict);
}
