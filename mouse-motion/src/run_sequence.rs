//! Compact step sequences of a known maze path.
//!
//! `B` leaves the starting cell, `F`, `L` and `R` move one cell front, left
//! or right, and `S` stops. A sequence read backwards, with the turns
//! mirrored and `B` and `S` swapped, brings the mouse back home.

use core::fmt;

use heapless::String;
use thiserror::Error;

use crate::config::RUN_SEQUENCE_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunSequenceError {
    #[error("run sequence is full")]
    Full,
    #[error("invalid step {0:?}")]
    InvalidStep(char),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSequence {
    steps: String<RUN_SEQUENCE_LEN>,
}

fn reversed_step(step: char) -> char {
    match step {
        'L' => 'R',
        'R' => 'L',
        'B' => 'S',
        'S' => 'B',
        other => other,
    }
}

impl RunSequence {
    pub const fn new() -> Self {
        Self { steps: String::new() }
    }

    pub fn as_str(&self) -> &str {
        self.steps.as_str()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn push(&mut self, step: char) -> Result<(), RunSequenceError> {
        if !matches!(step, 'B' | 'F' | 'L' | 'R' | 'S') {
            return Err(RunSequenceError::InvalidStep(step));
        }
        self.steps.push(step).map_err(|_| RunSequenceError::Full)
    }

    /// The sequence leading back from the end to the start
    pub fn reversed(&self) -> RunSequence {
        let mut reversed = RunSequence::new();
        for step in self.steps.chars().rev() {
            // Same length and alphabet as `self`
            reversed.steps.push(reversed_step(step)).ok();
        }
        reversed
    }
}

impl TryFrom<&str> for RunSequence {
    type Error = RunSequenceError;

    fn try_from(steps: &str) -> Result<Self, Self::Error> {
        let mut sequence = RunSequence::new();
        for step in steps.chars() {
            sequence.push(step)?;
        }
        Ok(sequence)
    }
}

impl fmt::Display for RunSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
