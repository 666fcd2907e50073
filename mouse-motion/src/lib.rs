#![cfg_attr(not(test), no_std)]

//! Motion profile engine and movement sequence interpreter of a micromouse.
//!
//! The hardware is reached through the traits of [`motion_control`]: the
//! speed control loop ([`motion_control::drive::Drive`]), the wheel encoders,
//! the control clock and the feedback cues. [`sim::SimulatedMouse`] implements
//! all of them for host runs and tests.

pub mod cell;
pub mod config;
pub mod geometry;
pub mod maneuver;
pub mod motion_control;
pub mod movement;
pub mod moves;
pub mod run_sequence;
pub mod search;
pub mod sequence;
pub mod sim;
pub mod solve;
pub mod storage;
pub mod trajectory;
pub mod utils;
pub mod walls;

mod align;

pub use motion_control::{MotionControl, Platform};
