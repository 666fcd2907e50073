//! Blocking motion primitives expressed as steppable state machines.
//!
//! A maneuver is advanced with [`Maneuver::tick`] once per control tick until
//! it reports [`ManeuverState::Finished`]. Only one maneuver is ever in
//! flight.

pub mod straight;
pub mod turn;

pub use straight::{DiagonalMove, StraightMove};
pub use turn::{InplaceTurn, TurnProfile};

use crate::{config::MotionProfileConfig, motion_control::Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverState {
    Working,
    Finished,
}

/// Summary of a maneuver, as reported to debug outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManeuverKind {
    Straight {
        distance: f32,
        end_speed: f32,
    },
    Diagonal {
        distance: f32,
        control_distance: f32,
        end_speed: f32,
    },
    Turn {
        radians: f32,
        force: f32,
    },
}

#[enum_dispatch::enum_dispatch(ActiveManeuver)]
pub trait Maneuver {
    fn kind(&self) -> ManeuverKind;

    /// Advance the maneuver by one polling iteration
    fn tick(&mut self, platform: &mut dyn Platform, config: &MotionProfileConfig) -> ManeuverState;
}

#[enum_dispatch::enum_dispatch]
#[derive(Debug, Clone)]
pub enum ActiveManeuver {
    StraightMove,
    DiagonalMove,
    InplaceTurn,
}
