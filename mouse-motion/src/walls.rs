//! Distance sensors fusion.
//!
//! Raw emitter-on/emitter-off readings are converted into calibrated distances
//! from the center of the mouse, stored in atomics so the sampling interrupt
//! can publish them while the maneuvers read them. Readers work on a
//! [`SensorSnapshot`], one load per sensor, and accept that two sensors of the
//! same snapshot may come from consecutive sampling periods.

use core::sync::atomic::Ordering;

use log::info;
#[allow(unused_imports)]
use num_traits::float::Float;
use portable_atomic::AtomicF32;

use crate::{
    config::*,
    motion_control::timer::Clock,
};

/// Left, front and right walls presence at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallsAround {
    pub left: bool,
    pub front: bool,
    pub right: bool,
}

/// Calibrated distances published by the sampling routine
pub struct WallSensors {
    distance: [AtomicF32; NUM_SENSOR],
    calibration: [AtomicF32; NUM_SENSOR],
}

impl Default for WallSensors {
    fn default() -> Self {
        Self::new()
    }
}

fn sensors_raw_log(on: u16, off: u16) -> f32 {
    if on > off { ((on - off) as f32).ln() } else { 0.0 }
}

impl WallSensors {
    pub const fn new() -> Self {
        Self {
            distance: [const { AtomicF32::new(0.0) }; NUM_SENSOR],
            calibration: [const { AtomicF32::new(0.0) }; NUM_SENSOR],
        }
    }

    /// Calculate and publish the distance from each sensor.
    ///
    /// `on` and `off` are the raw readings with the emitters on and off,
    /// indexed by sensor id.
    pub fn update_distances(&self, on: &[u16; NUM_SENSOR], off: &[u16; NUM_SENSOR]) {
        for i in 0..NUM_SENSOR {
            let mut distance =
                SENSORS_CALIBRATION_A[i] / sensors_raw_log(on[i], off[i]) - SENSORS_CALIBRATION_B[i];
            if i == SENSOR_SIDE_LEFT_ID || i == SENSOR_SIDE_RIGHT_ID {
                distance -= self.calibration[i].load(Ordering::Acquire);
            }
            self.distance[i].store(distance.max(0.0), Ordering::Release);
        }
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            side_left: self.distance[SENSOR_SIDE_LEFT_ID].load(Ordering::Acquire),
            side_right: self.distance[SENSOR_SIDE_RIGHT_ID].load(Ordering::Acquire),
            front_left: self.distance[SENSOR_FRONT_LEFT_ID].load(Ordering::Acquire),
            front_right: self.distance[SENSOR_FRONT_RIGHT_ID].load(Ordering::Acquire),
        }
    }

    /// Current side calibration offsets as (left, right)
    pub fn side_calibration(&self) -> (f32, f32) {
        (
            self.calibration[SENSOR_SIDE_LEFT_ID].load(Ordering::Acquire),
            self.calibration[SENSOR_SIDE_RIGHT_ID].load(Ordering::Acquire),
        )
    }

    /// Calibrate the side sensors with the mouse centered in a corridor.
    ///
    /// The deviation of the averaged readings from the mid-corridor distance
    /// is added to the offsets, so repeated calibrations accumulate.
    pub fn calibrate_side_sensors<C: Clock + ?Sized>(&self, clock: &mut C) {
        let mut left = 0.0;
        let mut right = 0.0;

        for _ in 0..SIDE_CALIBRATION_READINGS {
            let snapshot = self.snapshot();
            left += snapshot.side_left;
            right += snapshot.side_right;
            clock.sleep_ticks(SENSORS_SAMPLING_TICKS);
        }

        let left_deviation = left / SIDE_CALIBRATION_READINGS as f32 - MIDDLE_MAZE_DISTANCE;
        let right_deviation = right / SIDE_CALIBRATION_READINGS as f32 - MIDDLE_MAZE_DISTANCE;
        self.calibration[SENSOR_SIDE_LEFT_ID].fetch_add(left_deviation, Ordering::AcqRel);
        self.calibration[SENSOR_SIDE_RIGHT_ID].fetch_add(right_deviation, Ordering::AcqRel);

        info!(
            "Side sensors calibrated: left {} m right {} m",
            left_deviation, right_deviation
        );
    }
}

/// Distances from the center of the mouse, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    pub side_left: f32,
    pub side_right: f32,
    pub front_left: f32,
    pub front_right: f32,
}

impl SensorSnapshot {
    /// Lateral displacement from the middle of the corridor.
    ///
    /// Positive when the mouse is closer to the left wall. Zero when both
    /// sides read the mid-corridor distance or when no single side can be
    /// trusted.
    pub fn side_sensors_error(&self) -> f32 {
        let left_error = self.side_left - MIDDLE_MAZE_DISTANCE;
        let right_error = self.side_right - MIDDLE_MAZE_DISTANCE;

        if left_error.abs() < SIDE_SENSORS_ERROR_DEAD_BAND && right_error.abs() < SIDE_SENSORS_ERROR_DEAD_BAND {
            return 0.0;
        }
        if left_error > 0.0 && right_error < 0.0 {
            return right_error;
        }
        if right_error > 0.0 && left_error < 0.0 {
            return -left_error;
        }
        // One wall is missing, trust the other one only if it is close enough
        if left_error > SIDE_SENSORS_ERROR_MARGIN && right_error < SIDE_SENSORS_ERROR_MARGIN {
            return right_error;
        }
        if right_error > SIDE_SENSORS_ERROR_MARGIN && left_error < SIDE_SENSORS_ERROR_MARGIN {
            return -left_error;
        }
        0.0
    }

    /// Difference between both front sensors, zero when square to the front wall
    pub fn front_sensors_error(&self) -> f32 {
        self.front_left - self.front_right
    }

    pub fn front_wall_distance(&self) -> f32 {
        (self.front_left + self.front_right) / 2.0
    }

    pub fn left_wall_detection(&self) -> bool {
        self.side_left < SIDE_WALL_DETECTION
    }

    pub fn right_wall_detection(&self) -> bool {
        self.side_right < SIDE_WALL_DETECTION
    }

    pub fn front_wall_detection(&self) -> bool {
        self.front_left < FRONT_WALL_DETECTION && self.front_right < FRONT_WALL_DETECTION
    }

    pub fn walls_around(&self) -> WallsAround {
        WallsAround {
            left: self.left_wall_detection(),
            front: self.front_wall_detection(),
            right: self.right_wall_detection(),
        }
    }
}

/// Raw emitter-on reading that makes a sensor report `distance`, with no ambient light
pub fn raw_reading_for_distance(sensor: usize, distance: f32) -> u16 {
    let log = SENSORS_CALIBRATION_A[sensor] / (distance + SENSORS_CALIBRATION_B[sensor]);
    log.exp().round().clamp(1.0, u16::MAX as f32) as u16
}
