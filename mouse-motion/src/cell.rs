use crate::{
    config::{CELL_DIMENSION, MICROMETERS_PER_METER, MOUSE_START_SHIFT, SHIFT_AFTER_180_DEG_TURN},
    utils::meters_to_micrometers,
    walls::SensorSnapshot,
};

/// Longitudinal position of the mouse inside the current cell.
///
/// Keeps the encoder position at which the current cell started. Maneuvers
/// use it to compute absolute targets relative to the cell boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellTracker {
    cell_start_micrometers: i32,
}

impl CellTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder position of the start of the current cell
    pub fn cell_start(&self) -> i32 {
        self.cell_start_micrometers
    }

    /// Place the mouse with its tail touching the back wall of the starting cell
    pub fn set_starting_position(&mut self, encoder_micrometers: i32) {
        self.cell_start_micrometers = encoder_micrometers - meters_to_micrometers(MOUSE_START_SHIFT);
    }

    /// Mark the beginning of a new cell, right after entering it.
    ///
    /// A detected front wall is used as ground truth: the cell start is moved
    /// so that the wall sits exactly one cell ahead, cancelling encoder drift.
    pub fn entered_next_cell(&mut self, encoder_micrometers: i32, sensors: &SensorSnapshot) {
        self.cell_start_micrometers = encoder_micrometers;
        if sensors.front_wall_detection() {
            let correction = meters_to_micrometers(sensors.front_wall_distance() - CELL_DIMENSION);
            self.cell_start_micrometers += correction;
        }
    }

    /// Re-anchor the cell after a 180 degree turn performed in the middle of it
    pub fn turned_back(&mut self, encoder_micrometers: i32) {
        self.cell_start_micrometers =
            encoder_micrometers - meters_to_micrometers(CELL_DIMENSION / 2.0 + SHIFT_AFTER_180_DEG_TURN);
    }

    /// Distance travelled since the start of the current cell, in meters
    pub fn current_cell_shift(&self, encoder_micrometers: i32) -> f32 {
        (encoder_micrometers - self.cell_start_micrometers) as f32 / MICROMETERS_PER_METER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensors(front: f32) -> SensorSnapshot {
        SensorSnapshot {
            side_left: 0.08,
            side_right: 0.08,
            front_left: front,
            front_right: front,
        }
    }

    #[test]
    fn entering_without_front_wall_uses_the_encoder() {
        let mut cell = CellTracker::new();
        cell.entered_next_cell(500_000, &sensors(10.0));
        assert_eq!(cell.cell_start(), 500_000);
        assert!((cell.current_cell_shift(590_000) - 0.09).abs() < 1e-6);
    }

    #[test]
    fn front_wall_reanchors_the_cell() {
        let mut cell = CellTracker::new();
        // The wall is 1 cm closer than expected: the cell really started 1 cm earlier
        cell.entered_next_cell(500_000, &sensors(CELL_DIMENSION - 0.01));
        assert!((cell.cell_start() - 490_000).abs() <= 1);
    }

    #[test]
    fn starting_position_accounts_for_the_tail() {
        let mut cell = CellTracker::new();
        cell.set_starting_position(0);
        assert!((cell.current_cell_shift(0) - MOUSE_START_SHIFT).abs() < 1e-6);
    }

    #[test]
    fn turned_back_shift() {
        let mut cell = CellTracker::new();
        cell.turned_back(1_000_000);
        let expected = CELL_DIMENSION / 2.0 + SHIFT_AFTER_180_DEG_TURN;
        assert!((cell.current_cell_shift(1_000_000) - expected).abs() < 1e-5);
    }
}
