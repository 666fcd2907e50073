mod common;

use core::f32::consts::{FRAC_PI_2, PI};

use common::sim_motion;
use mouse_motion::{
    config::{CELL_DIMENSION, MotionProfileConfig},
    geometry::TurnTable,
    maneuver::{DiagonalMove, ManeuverKind, ManeuverState, StraightMove},
    motion_control::{
        drive::{Drive, Encoder},
        timer::Clock,
    },
    sim::wrap_heading,
    walls::WallSensors,
};

#[test]
fn straight_move_stops_on_target() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.target_straight(0, 0.5, 0.0);

    let position = motion.platform().average_micrometers();
    assert!((position - 500_000).abs() < 2_000, "stopped at {} um", position);
    assert_eq!(motion.platform().ideal_linear_speed(), 0.0);
    assert!(!motion.is_maneuver_in_progress());
    assert_eq!(
        motion.debug().maneuvers,
        vec![ManeuverKind::Straight {
            distance: 0.5,
            end_speed: 0.0
        }]
    );
}

#[test]
fn straight_move_never_exceeds_the_profile() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    let max_speed = motion.config().max_linear_speed;

    motion.target_straight(0, 0.8, 0.0);

    let samples = &motion.debug().samples;
    assert!(samples.iter().all(|s| s.ideal_linear_speed <= max_speed));
    assert!(samples.iter().any(|s| s.ideal_linear_speed == max_speed));
    assert!(samples.windows(2).all(|w| w[0].ticks < w[1].ticks));
}

#[test]
fn straight_move_reaches_the_end_speed() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.target_straight(0, 0.3, 0.2);

    let position = motion.platform().average_micrometers();
    assert!(position >= 300_000);
    assert!(position < 302_000);
    let speed = motion.platform().ideal_linear_speed();
    assert!((speed - 0.2).abs() < 0.02, "ended at {} m/s", speed);
}

#[test]
fn backward_move() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.target_straight(0, -0.1, 0.0);

    let position = motion.platform().average_micrometers();
    assert!((position + 100_000).abs() < 2_000, "stopped at {} um", position);
}

#[test]
fn zero_length_move_keeps_going_forward() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.target_straight(0, 0.0, 0.2);

    assert!(!motion.is_maneuver_in_progress());
    assert_eq!(motion.platform().target_linear_speed(), 0.2);
    assert_eq!(motion.platform().average_micrometers(), 0);
    assert!(motion.debug().samples.iter().all(|s| s.ideal_linear_speed >= 0.0));
}

#[test]
fn diagonal_move_drops_the_correction_after_the_control_distance() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    let control_target = 100_000;

    motion.start(DiagonalMove::new(0, 0.3, 0.1, 0.2));
    let mut corrected_before = false;
    let mut released_after = false;
    loop {
        let state = motion.drive_tick();
        let position = motion.platform().average_micrometers();
        let diagonal = motion.platform().walls_control.diagonal;
        if position <= control_target {
            assert!(diagonal, "correction off at {} um", position);
            corrected_before = true;
        } else {
            assert!(!diagonal, "correction still on at {} um", position);
            released_after = true;
        }
        if state == ManeuverState::Finished {
            break;
        }
        motion.platform_mut().wait_tick();
    }

    assert!(corrected_before && released_after);
    // Never ends early, even once the end speed is reached
    let position = motion.platform().average_micrometers();
    assert!(position >= 300_000, "ended at {} um", position);
    assert!(position < 302_000, "ended at {} um", position);
}

#[test]
fn diagonal_move_through_motion_control() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.target_straight_diagonal(0, 0.2, 0.05, 0.3);

    assert!(motion.platform().average_micrometers() >= 200_000);
    assert!(!motion.platform().walls_control.diagonal);
    assert_eq!(
        motion.debug().maneuvers,
        vec![ManeuverKind::Diagonal {
            distance: 0.2,
            control_distance: 0.05,
            end_speed: 0.3
        }]
    );
}

#[test]
fn steppable_maneuver() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.start(StraightMove::new(0, 0.05, 0.0));
    assert!(motion.is_maneuver_in_progress());
    let mut ticks = 0;
    while motion.drive_tick() == ManeuverState::Working {
        motion.platform_mut().wait_tick();
        ticks += 1;
    }
    assert!(ticks > 0);
    assert!(!motion.is_maneuver_in_progress());
    assert_eq!(motion.drive_tick(), ManeuverState::Finished);
}

#[test]
fn inplace_turn_reaches_the_angle() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.inplace_turn(FRAC_PI_2, 0.3);

    let heading = motion.platform().heading() as f32;
    assert!(((heading - FRAC_PI_2) / FRAC_PI_2).abs() < 0.02, "heading {}", heading);
    assert_eq!(motion.platform().ideal_angular_speed(), 0.0);
    assert_eq!(motion.platform().average_micrometers(), 0);
}

#[test]
fn turn_without_force_finishes_at_once() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.inplace_turn(FRAC_PI_2, 0.0);
    motion.inplace_turn(-FRAC_PI_2, -0.1);

    assert!(!motion.is_maneuver_in_progress());
    assert_eq!(motion.platform().heading(), 0.0);
    assert_eq!(motion.platform().ticks(), 0);
    assert!(motion.debug().samples.iter().all(|s| s.ideal_angular_speed == 0.0));
}

#[test]
fn turn_back_alternates_direction() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.turn_back(0.3);
    let first = motion.platform().heading();
    motion.turn_back(0.3);
    let second = motion.platform().heading();

    assert!((first.abs() - PI as f64).abs() < 0.05);
    assert!(wrap_heading(second).abs() < 0.1, "heading {}", second);
}

#[test]
fn move_side_turns_into_the_next_cell() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    motion.set_starting_position();

    motion.move_right(0.3);

    let heading = motion.platform().heading() as f32;
    assert!(((heading + FRAC_PI_2) / FRAC_PI_2).abs() < 0.03, "heading {}", heading);
    assert_eq!(motion.platform().counters.led_toggles, 1);
    assert_eq!(motion.current_cell_shift(), 0.0);
}

#[test]
fn keep_front_wall_distance_without_wall_does_nothing() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());

    motion.keep_front_wall_distance(CELL_DIMENSION / 2.0);

    assert_eq!(motion.platform().average_micrometers(), 0);
    assert_eq!(motion.platform().ticks(), 0);
    assert_eq!(motion.platform().counters.full_resets, 0);
}

#[test]
fn keep_front_wall_distance_converges() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    motion.platform_mut().add_wall_at_boundary(1);
    let config = *motion.config();

    motion.keep_front_wall_distance(CELL_DIMENSION / 2.0);

    let distance = motion.sensors().front_wall_distance();
    assert!((distance - CELL_DIMENSION / 2.0).abs() < 0.0015, "at {} m", distance);
    assert_eq!(*motion.config(), config);
    assert_eq!(
        motion.platform().linear_ramp(),
        (config.linear_acceleration, config.linear_deceleration)
    );
    assert!(!motion.platform().walls_control.front);
    assert_eq!(motion.platform().counters.full_resets, 1);
}

#[test]
fn invalid_profiles_are_rejected() {
    let sensors = WallSensors::new();
    let mut motion = sim_motion(&sensors, TurnTable::default());
    let config = *motion.config();

    motion.set_linear_acceleration(-1.0);
    motion.set_max_linear_speed(0.0);
    assert_eq!(*motion.config(), config);

    motion.set_config(MotionProfileConfig::from_force(0.5, true));
    assert_eq!(motion.platform().linear_ramp(), (10.0, 10.0));
}
