//! Movement symbols and smoothed paths.

use core::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use heapless::Vec;
use log::warn;
use thiserror::Error;

use crate::config::MAX_SMOOTH_PATH_LEN;

/// One symbol of a smoothed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    /// Leave the starting cell, tail against the back wall
    Start,
    /// One cell straight ahead
    Front,
    /// One diagonal step
    Diagonal,
    /// Search turns, taken at search speed between two cells
    Left,
    Right,
    Left90,
    Right90,
    Left180,
    Right180,
    /// From a straight into a diagonal
    LeftTo45,
    RightTo45,
    LeftTo135,
    RightTo135,
    /// From a diagonal into a straight
    LeftFrom45,
    RightFrom45,
    LeftFrom135,
    RightFrom135,
    /// Diagonal to diagonal
    LeftDiagonal,
    RightDiagonal,
    /// Stop in the middle of the current cell
    Stop,
    End,
}

impl Movement {
    /// Nominal signed angle of a turn, positive means left
    pub fn turn_angle(self) -> Option<f32> {
        let angle = match self {
            Movement::Left | Movement::Left90 | Movement::LeftDiagonal => FRAC_PI_2,
            Movement::Right | Movement::Right90 | Movement::RightDiagonal => -FRAC_PI_2,
            Movement::Left180 => PI,
            Movement::Right180 => -PI,
            Movement::LeftTo45 | Movement::LeftFrom45 => FRAC_PI_4,
            Movement::RightTo45 | Movement::RightFrom45 => -FRAC_PI_4,
            Movement::LeftTo135 | Movement::LeftFrom135 => 3.0 * FRAC_PI_4,
            Movement::RightTo135 | Movement::RightFrom135 => -3.0 * FRAC_PI_4,
            Movement::Start | Movement::Front | Movement::Diagonal | Movement::Stop | Movement::End => {
                return None;
            }
        };
        Some(angle)
    }

    pub fn is_turn(self) -> bool {
        self.turn_angle().is_some()
    }

    pub fn is_straight_run(self) -> bool {
        matches!(self, Movement::Front | Movement::Diagonal)
    }

    /// Turns entered while traveling along a diagonal
    pub fn enters_from_diagonal(self) -> bool {
        matches!(
            self,
            Movement::LeftFrom45
                | Movement::RightFrom45
                | Movement::LeftFrom135
                | Movement::RightFrom135
                | Movement::LeftDiagonal
                | Movement::RightDiagonal
        )
    }
}

/// Path dialect a run sequence is smoothed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathLanguage {
    /// Cell by cell moves with search turns only
    #[default]
    Safe,
    /// Smooth turns and diagonals
    Diagonals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("smoothed path is full")]
    Full,
    #[error("unknown step {0:?} in run sequence")]
    UnknownStep(char),
}

/// Movement list that always ends with [`Movement::End`]
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedPath {
    movements: Vec<Movement, MAX_SMOOTH_PATH_LEN>,
}

impl Default for SmoothedPath {
    fn default() -> Self {
        Self::new()
    }
}

impl SmoothedPath {
    pub fn new() -> Self {
        let mut movements = Vec::new();
        movements.push(Movement::End).ok();
        Self { movements }
    }

    /// Append a movement before the end marker. Pushing the end marker is a no-op.
    pub fn push(&mut self, movement: Movement) -> Result<(), PathError> {
        if movement == Movement::End {
            return Ok(());
        }
        if self.movements.is_full() {
            return Err(PathError::Full);
        }
        self.movements.pop();
        self.movements.push(movement).ok();
        self.movements.push(Movement::End).ok();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.movements.clear();
        self.movements.push(Movement::End).ok();
    }

    pub fn as_slice(&self) -> &[Movement] {
        &self.movements
    }

    /// Number of movements, end marker included
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// True when the path holds nothing but the end marker
    pub fn is_empty(&self) -> bool {
        self.movements.len() == 1
    }
}

impl TryFrom<&[Movement]> for SmoothedPath {
    type Error = PathError;

    /// Build a path from the movements up to the first end marker
    fn try_from(movements: &[Movement]) -> Result<Self, Self::Error> {
        let mut path = SmoothedPath::new();
        for movement in movements.iter().copied().take_while(|m| *m != Movement::End) {
            path.push(movement)?;
        }
        Ok(path)
    }
}

/// Turns a run sequence of steps (`B`, `F`, `L`, `R`, `S`) into movements
pub trait PathSmoother {
    fn make_smooth_path(&self, sequence: &str, path: &mut SmoothedPath, language: PathLanguage) -> Result<(), PathError>;
}

/// Cell by cell translation of a run sequence.
///
/// Every language is rendered with search turns only, which the mouse can
/// always follow at search speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafePathSmoother;

impl PathSmoother for SafePathSmoother {
    fn make_smooth_path(&self, sequence: &str, path: &mut SmoothedPath, language: PathLanguage) -> Result<(), PathError> {
        if language != PathLanguage::Safe {
            warn!("{:?} path language not supported, using safe moves", language);
        }
        path.clear();
        for step in sequence.chars() {
            let movement = match step {
                'B' => Movement::Start,
                'F' => Movement::Front,
                'L' => Movement::Left,
                'R' => Movement::Right,
                'S' => Movement::Stop,
                other => return Err(PathError::UnknownStep(other)),
            };
            path.push(movement)?;
        }
        Ok(())
    }
}
