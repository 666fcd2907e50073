//! Per-turn geometry: how far to travel before and after each turn, and at
//! which linear speed to take it.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::{config::MOUSE_MASS, movement::Movement};

pub trait TurnGeometry {
    /// Straight distance to travel before starting the turn, in meters
    fn move_turn_before(&self, turn: Movement) -> f32;

    /// Straight distance to travel after the turn, in meters
    fn move_turn_after(&self, turn: Movement) -> f32;

    /// Linear speed at which the turn is taken with the given force, in m/s
    fn move_turn_linear_speed(&self, turn: Movement, force: f32) -> f32;
}

impl<T: TurnGeometry + ?Sized> TurnGeometry for &T {
    fn move_turn_before(&self, turn: Movement) -> f32 {
        (**self).move_turn_before(turn)
    }

    fn move_turn_after(&self, turn: Movement) -> f32 {
        (**self).move_turn_after(turn)
    }

    fn move_turn_linear_speed(&self, turn: Movement, force: f32) -> f32 {
        (**self).move_turn_linear_speed(turn, force)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnParameters {
    pub before: f32,
    pub after: f32,
    // Radius of the equivalent constant-curvature arc, in meters
    pub radius: f32,
}

impl TurnParameters {
    pub const fn new(before: f32, after: f32, radius: f32) -> Self {
        Self { before, after, radius }
    }
}

/// Turns in table order
pub const TURNS: [Movement; 16] = [
    Movement::Left,
    Movement::Right,
    Movement::Left90,
    Movement::Right90,
    Movement::Left180,
    Movement::Right180,
    Movement::LeftTo45,
    Movement::RightTo45,
    Movement::LeftTo135,
    Movement::RightTo135,
    Movement::LeftFrom45,
    Movement::RightFrom45,
    Movement::LeftFrom135,
    Movement::RightFrom135,
    Movement::LeftDiagonal,
    Movement::RightDiagonal,
];

fn turn_index(turn: Movement) -> Option<usize> {
    TURNS.iter().position(|t| *t == turn)
}

/// Lookup table of [`TurnParameters`], one entry per turn movement.
///
/// The linear speed is the one that keeps the centripetal force within the
/// given force on the equivalent arc.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnTable {
    entries: [TurnParameters; TURNS.len()],
}

impl Default for TurnTable {
    fn default() -> Self {
        let search = TurnParameters::new(0.05, 0.05, 0.04);
        let ninety = TurnParameters::new(0.03, 0.03, 0.09);
        let half = TurnParameters::new(0.04, 0.04, 0.08);
        let to45 = TurnParameters::new(0.04, 0.05, 0.10);
        let to135 = TurnParameters::new(0.06, 0.03, 0.07);
        let from45 = TurnParameters::new(0.05, 0.04, 0.10);
        let from135 = TurnParameters::new(0.03, 0.06, 0.07);
        let diagonal = TurnParameters::new(0.03, 0.03, 0.06);
        Self {
            entries: [
                search, search, ninety, ninety, half, half, to45, to45, to135, to135, from45, from45, from135,
                from135, diagonal, diagonal,
            ],
        }
    }
}

impl TurnTable {
    pub fn get(&self, turn: Movement) -> Option<&TurnParameters> {
        turn_index(turn).map(|i| &self.entries[i])
    }

    /// Replace the parameters of a turn. Returns false if `turn` is not a turn.
    pub fn set(&mut self, turn: Movement, parameters: TurnParameters) -> bool {
        match turn_index(turn) {
            Some(i) => {
                self.entries[i] = parameters;
                true
            }
            None => false,
        }
    }
}

impl TurnGeometry for TurnTable {
    fn move_turn_before(&self, turn: Movement) -> f32 {
        self.get(turn).map_or(0.0, |p| p.before)
    }

    fn move_turn_after(&self, turn: Movement) -> f32 {
        self.get(turn).map_or(0.0, |p| p.after)
    }

    fn move_turn_linear_speed(&self, turn: Movement, force: f32) -> f32 {
        self.get(turn)
            .map_or(0.0, |p| (force * p.radius / MOUSE_MASS).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_turn_has_an_entry() {
        let table = TurnTable::default();
        for turn in TURNS {
            assert!(turn.is_turn());
            assert!(table.get(turn).is_some());
        }
        assert!(table.get(Movement::Front).is_none());
        assert_eq!(table.move_turn_before(Movement::Stop), 0.0);
    }

    #[test]
    fn turn_speed_grows_with_force() {
        let table = TurnTable::default();
        let slow = table.move_turn_linear_speed(Movement::Left90, 0.1);
        let fast = table.move_turn_linear_speed(Movement::Left90, 0.4);
        assert!((fast - 2.0 * slow).abs() < 1e-5);
    }

    #[test]
    fn set_only_accepts_turns() {
        let mut table = TurnTable::default();
        let parameters = TurnParameters::new(0.01, 0.02, 0.03);
        assert!(table.set(Movement::RightTo135, parameters));
        assert_eq!(table.get(Movement::RightTo135), Some(&parameters));
        assert!(!table.set(Movement::Diagonal, parameters));
    }
}
