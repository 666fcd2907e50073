mod common;

use common::{CorridorSearch, sim_motion};
use mouse_motion::{
    geometry::TurnTable,
    motion_control::drive::Drive,
    movement::SafePathSmoother,
    run_sequence::RunSequence,
    search::Search,
    sequence::SequenceOutcome,
    sim::wrap_heading,
    solve::Solver,
    walls::WallSensors,
};

const FORCE: f32 = 0.3;

#[test]
fn explore_a_corridor_and_come_back() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    motion.set_starting_position();
    let mut solver = Solver::new(CorridorSearch::new(3));

    let outcome = solver.explore(&mut motion, FORCE);

    assert_eq!(outcome, SequenceOutcome::Completed);
    assert_eq!(solver.search().search_position(), 0);
    // Every visited cell has its walls recorded once, plus the goal on arrival
    assert!(solver.search().visited.iter().all(|v| *v));

    let platform = motion.platform();
    // Three cells out, then one back with the turn and two more
    assert_eq!(platform.counters.led_toggles, 6);
    assert!(platform.is_braked());
    assert!(!platform.collision_detected());
    // Two turns back in opposite directions
    assert!(wrap_heading(platform.heading()).abs() < 0.1, "heading {}", platform.heading());
}

#[test]
fn collision_aborts_the_exploration() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    motion.set_starting_position();
    motion.platform_mut().collide_at(200_000);
    let mut solver = Solver::new(CorridorSearch::new(3));

    let outcome = solver.explore(&mut motion, FORCE);

    assert_eq!(outcome, SequenceOutcome::Collision);
    assert_eq!(solver.search().search_position(), 2);
    assert!(!motion.platform().is_braked());
}

#[test]
fn corridor_run_sequence_and_runs() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    motion.set_starting_position();
    let mut solver = Solver::new(CorridorSearch::new(3));

    solver.set_run_sequence();
    // The corridor goal has a single cell, so the goal area ends right after it
    assert_eq!(solver.run_sequence().as_str(), "BFFFFS");
    assert_eq!(solver.run_sequence().reversed().as_str(), "BFFFFS");

    assert_eq!(solver.run(&mut motion, &SafePathSmoother, FORCE), SequenceOutcome::Completed);
    assert_eq!(solver.run_back(&mut motion, &SafePathSmoother, FORCE), SequenceOutcome::Completed);
    assert_eq!(motion.platform().counters.success_cues, 2);
}

#[test]
fn loaded_sequence_is_run() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    motion.set_starting_position();
    let mut solver = Solver::new(CorridorSearch::new(3));
    *solver.run_sequence_mut() = RunSequence::try_from("BFRFS").unwrap();

    assert_eq!(solver.run(&mut motion, &SafePathSmoother, FORCE), SequenceOutcome::Completed);
    assert_eq!(motion.platform().counters.success_cues, 1);
}
