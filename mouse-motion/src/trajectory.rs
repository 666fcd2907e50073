//! Speed-change planning for the linear profile.
//!
//! The control loop ramps the ideal linear speed with a constant acceleration
//! when speeding up and a constant deceleration when slowing down. These
//! functions answer how far and how long such a ramp takes, so straight
//! maneuvers know when to start braking.

use crate::config::{MICROMETERS_PER_METER, MotionProfileConfig, SYSTICK_FREQUENCY_HZ};

#[allow(unused_imports)]
use num_traits::float::Float;

/// Ramp rate used to go from `from` to `to`, always positive
fn ramp_rate(config: &MotionProfileConfig, from: f32, to: f32) -> f32 {
    if to.abs() < from.abs() {
        config.linear_deceleration
    } else {
        config.linear_acceleration
    }
}

/// Required distance, in meters, to go from the current ideal speed to `speed`.
///
/// The result is signed with the direction of travel.
pub fn required_distance_to_speed(config: &MotionProfileConfig, current_speed: f32, speed: f32) -> f32 {
    let acceleration = ramp_rate(config, current_speed, speed);
    let distance = (speed * speed - current_speed * current_speed).abs() / (2.0 * acceleration);

    if current_speed < 0.0 || (current_speed == 0.0 && speed < 0.0) {
        -distance
    } else {
        distance
    }
}

/// Same as [`required_distance_to_speed`] but in encoder micrometers
pub fn required_micrometers_to_speed(config: &MotionProfileConfig, current_speed: f32, speed: f32) -> i32 {
    (required_distance_to_speed(config, current_speed, speed) * MICROMETERS_PER_METER) as i32
}

/// Required time, in seconds, to go from the current target speed to `speed`
pub fn required_time_to_speed(config: &MotionProfileConfig, target_speed: f32, speed: f32) -> f32 {
    let acceleration = ramp_rate(config, target_speed, speed);

    (speed - target_speed).abs() / acceleration
}

/// Same as [`required_time_to_speed`] but in control ticks
pub fn required_ticks_to_speed(config: &MotionProfileConfig, target_speed: f32, speed: f32) -> u32 {
    (required_time_to_speed(config, target_speed, speed) * SYSTICK_FREQUENCY_HZ as f32) as u32
}
