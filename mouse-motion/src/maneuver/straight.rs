use log::debug;

use crate::{
    config::MotionProfileConfig,
    maneuver::{Maneuver, ManeuverKind, ManeuverState},
    motion_control::Platform,
    trajectory::required_micrometers_to_speed,
    utils::meters_to_micrometers,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Start,
    // Cruising at the maximum speed until the braking point
    Approach,
    // Target speed set to the end speed
    Finish,
}

/// Reach a target position at a target speed.
///
/// Cruises at the configured maximum speed and switches the target speed to
/// the end speed as soon as the remaining distance is what the profile needs
/// to reach it. With a zero end speed the maneuver ends once the ideal speed
/// is zero, otherwise once the target position is passed.
#[derive(Debug, Clone)]
pub struct StraightMove {
    start: i32,
    distance: f32,
    speed: f32,
    target: i32,
    forward: bool,
    phase: Phase,
}

impl StraightMove {
    /// `start` in micrometers, `distance` in meters from `start`, `speed` in m/s
    pub fn new(start: i32, distance: f32, speed: f32) -> Self {
        Self {
            start,
            distance,
            speed,
            target: start + meters_to_micrometers(distance),
            forward: distance >= 0.0,
            phase: Phase::Start,
        }
    }

    /// Absolute encoder position the maneuver aims at
    pub fn target(&self) -> i32 {
        self.target
    }

    fn braking_point(&self, platform: &dyn Platform, config: &MotionProfileConfig) -> i32 {
        self.target - required_micrometers_to_speed(config, platform.ideal_linear_speed(), self.speed)
    }
}

impl Maneuver for StraightMove {
    fn kind(&self) -> ManeuverKind {
        ManeuverKind::Straight {
            distance: self.distance,
            end_speed: self.speed,
        }
    }

    fn tick(&mut self, platform: &mut dyn Platform, config: &MotionProfileConfig) -> ManeuverState {
        if self.phase == Phase::Start {
            debug!(
                "Straight from {} um to {} um ending at {} m/s",
                self.start, self.target, self.speed
            );
            platform.set_ideal_angular_speed(0.0);
            if self.forward {
                platform.set_target_linear_speed(config.max_linear_speed);
            } else {
                platform.set_target_linear_speed(-config.max_linear_speed);
            }
            self.phase = Phase::Approach;
        }

        if self.phase == Phase::Approach {
            let position = platform.average_micrometers();
            let braking_point = self.braking_point(platform, config);
            let approaching = if self.forward {
                position < braking_point
            } else {
                position > braking_point
            };
            if approaching {
                return ManeuverState::Working;
            }
            platform.set_target_linear_speed(self.speed);
            self.phase = Phase::Finish;
        }

        let done = if self.speed == 0.0 {
            platform.ideal_linear_speed() == 0.0
        } else if self.forward {
            platform.average_micrometers() >= self.target
        } else {
            platform.average_micrometers() <= self.target
        };

        if done {
            ManeuverState::Finished
        } else {
            ManeuverState::Working
        }
    }
}

/// Forward move along a diagonal.
///
/// Diagonal sensor corrections are enabled at the start and turned off once
/// the control distance is passed. Always runs up to the target position.
#[derive(Debug, Clone)]
pub struct DiagonalMove {
    distance: f32,
    control_distance: f32,
    speed: f32,
    target: i32,
    control_target: i32,
    phase: Phase,
}

impl DiagonalMove {
    pub fn new(start: i32, distance: f32, control_distance: f32, speed: f32) -> Self {
        Self {
            distance,
            control_distance,
            speed,
            target: start + meters_to_micrometers(distance),
            control_target: start + meters_to_micrometers(control_distance),
            phase: Phase::Start,
        }
    }
}

impl Maneuver for DiagonalMove {
    fn kind(&self) -> ManeuverKind {
        ManeuverKind::Diagonal {
            distance: self.distance,
            control_distance: self.control_distance,
            end_speed: self.speed,
        }
    }

    fn tick(&mut self, platform: &mut dyn Platform, config: &MotionProfileConfig) -> ManeuverState {
        if self.phase == Phase::Start {
            platform.set_ideal_angular_speed(0.0);
            platform.diagonal_sensors_control(true);
            platform.set_target_linear_speed(config.max_linear_speed);
            self.phase = Phase::Approach;
        }

        let position = platform.average_micrometers();
        if position > self.control_target {
            platform.diagonal_sensors_control(false);
        }

        if self.phase == Phase::Approach {
            let braking_point =
                self.target - required_micrometers_to_speed(config, platform.ideal_linear_speed(), self.speed);
            if position < braking_point {
                return ManeuverState::Working;
            }
            platform.set_target_linear_speed(self.speed);
            self.phase = Phase::Finish;
        }

        if position < self.target {
            ManeuverState::Working
        } else {
            ManeuverState::Finished
        }
    }
}
