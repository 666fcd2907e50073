//! Movement sequence interpreter.
//!
//! [`SequenceInterpreter`] is a pure transition function over a movement
//! list: it accumulates straight distances and yields the [`Action`]s the
//! mouse has to perform. [`MotionControl::execute_smooth_path`] executes
//! those actions and checks for collisions after every symbol.

use log::{error, info};
use thiserror::Error;

use crate::{
    config::{CELL_DIAGONAL, CELL_DIMENSION, MOUSE_START_SHIFT},
    geometry::TurnGeometry,
    motion_control::{MotionControl, Platform, debug::DebugOut},
    movement::{Movement, PathLanguage, PathSmoother, SmoothedPath},
};

/// How the execution of a sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed,
    Collision,
    Fault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceFault {
    #[error("unexpected {movement:?} at index {index}")]
    Unexpected { index: usize, movement: Movement },
    #[error("movement list ended without an end marker")]
    MissingEnd,
}

/// Straight segment leading into a turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeadIn {
    Straight,
    Diagonal { control_distance: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Symbol folded into the pending distance, nothing to move yet
    Accumulate,
    /// Travel `distance` meters, reaching `speed` at its end, then turn
    Turn {
        turn: Movement,
        lead_in: LeadIn,
        distance: f32,
        speed: f32,
    },
    /// Travel `distance` meters and stop, then back into the start position
    Stop { distance: f32 },
    End,
    Fault(SequenceFault),
}

pub struct SequenceInterpreter<'p> {
    path: &'p [Movement],
    index: usize,
    distance: f32,
}

impl<'p> SequenceInterpreter<'p> {
    pub fn new(path: &'p [Movement]) -> Self {
        Self {
            path,
            index: 0,
            distance: 0.0,
        }
    }

    /// Straight distance accumulated and not traveled yet, in meters
    pub fn pending_distance(&self) -> f32 {
        self.distance
    }

    /// Index of the next symbol to interpret
    pub fn position(&self) -> usize {
        self.index
    }

    /// Consume the next symbol, a run of straight symbols counts as one
    pub fn next_action<G: TurnGeometry + ?Sized>(&mut self, geometry: &G, force: f32) -> Action {
        let index = self.index;
        let Some(&movement) = self.path.get(index) else {
            return Action::Fault(SequenceFault::MissingEnd);
        };
        self.index += 1;

        match movement {
            Movement::Start if index == 0 => {
                self.distance = -MOUSE_START_SHIFT;
                Action::Accumulate
            }
            Movement::Start => Action::Fault(SequenceFault::Unexpected { index, movement }),
            Movement::Front | Movement::Diagonal => {
                let mut many = 1;
                while self.path.get(self.index) == Some(&movement) {
                    many += 1;
                    self.index += 1;
                }
                let unit = if movement == Movement::Front {
                    CELL_DIMENSION
                } else {
                    CELL_DIAGONAL
                };
                self.distance += many as f32 * unit;
                Action::Accumulate
            }
            Movement::Stop => {
                self.distance -= CELL_DIMENSION / 2.0;
                Action::Stop {
                    distance: self.distance,
                }
            }
            Movement::End => Action::End,
            turn => {
                self.distance += geometry.move_turn_before(turn);
                let lead_in = if turn.enters_from_diagonal() {
                    LeadIn::Diagonal {
                        control_distance: self.distance - 2.0 * CELL_DIAGONAL,
                    }
                } else {
                    LeadIn::Straight
                };
                let action = Action::Turn {
                    turn,
                    lead_in,
                    distance: self.distance,
                    speed: geometry.move_turn_linear_speed(turn, force),
                };
                self.distance = geometry.move_turn_after(turn);
                action
            }
        }
    }
}

impl<P: Platform, G: TurnGeometry, D: DebugOut> MotionControl<'_, P, G, D> {
    fn execute_action(&mut self, action: Action, force: f32) {
        match action {
            Action::Turn {
                turn,
                lead_in: LeadIn::Straight,
                distance,
                speed,
            } => {
                let platform = self.platform_mut();
                platform.side_sensors_close_control(true);
                platform.side_sensors_far_control(false);
                self.parametric_move_front(distance, speed);
                self.speed_turn(turn, force);
            }
            Action::Turn {
                turn,
                lead_in: LeadIn::Diagonal { control_distance },
                distance,
                speed,
            } => {
                let platform = self.platform_mut();
                platform.side_sensors_close_control(false);
                platform.side_sensors_far_control(false);
                self.parametric_move_diagonal(distance, control_distance, speed);
                self.speed_turn(turn, force);
            }
            Action::Stop { distance } => {
                let platform = self.platform_mut();
                platform.side_sensors_close_control(true);
                platform.side_sensors_far_control(false);
                self.parametric_move_front(distance, 0.0);
                self.turn_to_start_position(force);
                self.platform_mut().speaker_play_success();
            }
            Action::Accumulate | Action::End | Action::Fault(_) => {}
        }
    }

    /// Execute a smoothed path, stopping at its end marker, its stop symbol,
    /// or the first collision
    pub fn execute_smooth_path(&mut self, path: &SmoothedPath, force: f32) -> SequenceOutcome {
        self.execute_movements(path.as_slice(), force)
    }

    /// Execute a raw movement list, which must contain an end marker
    pub fn execute_movements(&mut self, movements: &[Movement], force: f32) -> SequenceOutcome {
        info!("Executing {} movements", movements.len());
        let mut interpreter = SequenceInterpreter::new(movements);
        loop {
            let action = interpreter.next_action(self.geometry(), force);
            match action {
                Action::End => return SequenceOutcome::Completed,
                Action::Fault(fault) => {
                    error!("Unable to process movements: {}", fault);
                    self.platform_mut().speaker_play_error();
                    return SequenceOutcome::Fault;
                }
                _ => self.execute_action(action, force),
            }

            if self.collision_detected() {
                error!("Collision detected at movement {}", interpreter.position());
                return SequenceOutcome::Collision;
            }
            if matches!(action, Action::Stop { .. }) {
                return SequenceOutcome::Completed;
            }
        }
    }

    /// Smooth a run sequence and execute the resulting path
    pub fn execute_movement_sequence<S: PathSmoother + ?Sized>(
        &mut self,
        sequence: &str,
        smoother: &S,
        force: f32,
        language: PathLanguage,
    ) -> SequenceOutcome {
        let mut path = SmoothedPath::new();
        if let Err(err) = smoother.make_smooth_path(sequence, &mut path, language) {
            error!("Unable to smooth {}: {}", sequence, err);
            self.platform_mut().speaker_play_error();
            return SequenceOutcome::Fault;
        }
        self.execute_smooth_path(&path, force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{TurnParameters, TurnTable};

    fn geometry() -> TurnTable {
        let mut table = TurnTable::default();
        table.set(Movement::Left90, TurnParameters::new(0.03, 0.025, 0.09));
        table
    }

    #[test]
    fn straight_runs_collapse_into_one_distance() {
        let table = geometry();
        let path = [
            Movement::Front,
            Movement::Front,
            Movement::Front,
            Movement::Left90,
            Movement::End,
        ];
        let mut interpreter = SequenceInterpreter::new(&path);

        assert_eq!(interpreter.next_action(&table, 0.3), Action::Accumulate);
        assert_eq!(interpreter.position(), 3);

        let Action::Turn {
            turn,
            lead_in,
            distance,
            speed,
        } = interpreter.next_action(&table, 0.3)
        else {
            panic!("expected a turn");
        };
        assert_eq!(turn, Movement::Left90);
        assert_eq!(lead_in, LeadIn::Straight);
        assert_eq!(distance, 3.0 * CELL_DIMENSION + 0.03);
        assert_eq!(speed, table.move_turn_linear_speed(Movement::Left90, 0.3));
        assert_eq!(interpreter.pending_distance(), 0.025);
        assert_eq!(interpreter.next_action(&table, 0.3), Action::End);
    }

    #[test]
    fn start_two_fronts_and_stop() {
        let table = geometry();
        let path = [
            Movement::Start,
            Movement::Front,
            Movement::Front,
            Movement::Stop,
            Movement::End,
        ];
        let mut interpreter = SequenceInterpreter::new(&path);

        assert_eq!(interpreter.next_action(&table, 0.3), Action::Accumulate);
        assert_eq!(interpreter.pending_distance(), -MOUSE_START_SHIFT);
        assert_eq!(interpreter.next_action(&table, 0.3), Action::Accumulate);
        assert!((interpreter.pending_distance() - (2.0 * CELL_DIMENSION - MOUSE_START_SHIFT)).abs() < 1e-6);

        let Action::Stop { distance } = interpreter.next_action(&table, 0.3) else {
            panic!("expected a stop");
        };
        let expected = 2.0 * CELL_DIMENSION - MOUSE_START_SHIFT - CELL_DIMENSION / 2.0;
        assert!((distance - expected).abs() < 1e-6);
    }

    #[test]
    fn diagonal_lead_in_has_a_control_distance() {
        let table = geometry();
        let path = [
            Movement::LeftTo45,
            Movement::Diagonal,
            Movement::Diagonal,
            Movement::RightFrom45,
            Movement::End,
        ];
        let mut interpreter = SequenceInterpreter::new(&path);

        assert!(matches!(
            interpreter.next_action(&table, 0.3),
            Action::Turn {
                lead_in: LeadIn::Straight,
                ..
            }
        ));
        let after = table.move_turn_after(Movement::LeftTo45);
        assert_eq!(interpreter.pending_distance(), after);
        assert_eq!(interpreter.next_action(&table, 0.3), Action::Accumulate);

        let Action::Turn { lead_in, distance, .. } = interpreter.next_action(&table, 0.3) else {
            panic!("expected a turn");
        };
        let expected = after + 2.0 * CELL_DIAGONAL + table.move_turn_before(Movement::RightFrom45);
        assert!((distance - expected).abs() < 1e-6);
        let LeadIn::Diagonal { control_distance } = lead_in else {
            panic!("expected a diagonal lead-in");
        };
        assert!((control_distance - (distance - 2.0 * CELL_DIAGONAL)).abs() < 1e-6);
    }

    #[test]
    fn start_must_come_first() {
        let table = geometry();
        let path = [Movement::Front, Movement::Start, Movement::End];
        let mut interpreter = SequenceInterpreter::new(&path);

        assert_eq!(interpreter.next_action(&table, 0.3), Action::Accumulate);
        assert_eq!(
            interpreter.next_action(&table, 0.3),
            Action::Fault(SequenceFault::Unexpected {
                index: 1,
                movement: Movement::Start
            })
        );
    }

    #[test]
    fn missing_end_is_a_fault() {
        let table = geometry();
        let path = [Movement::Front];
        let mut interpreter = SequenceInterpreter::new(&path);

        assert_eq!(interpreter.next_action(&table, 0.3), Action::Accumulate);
        assert_eq!(
            interpreter.next_action(&table, 0.3),
            Action::Fault(SequenceFault::MissingEnd)
        );
    }
}
