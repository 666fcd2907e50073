use core::f32::consts::PI;

use log::{debug, error};
#[allow(unused_imports)]
use num_traits::float::Float;

use crate::{
    config::{MOUSE_MAX_ANGULAR_VELOCITY, MOUSE_MOMENT_OF_INERTIA, MOUSE_WHEELS_SEPARATION, MotionProfileConfig},
    maneuver::{Maneuver, ManeuverKind, ManeuverState},
    motion_control::{
        Platform,
        timer::{Instant, elapsed_seconds},
    },
    utils::sign,
};

/// Jerk-limited angular velocity profile of a turn.
///
/// Half-sine ramp up, constant cruise, half-sine ramp down. The angular
/// acceleration is continuous and peaks at the value derived from the force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnProfile {
    // Signed peak angular velocity, in rad/s
    max_angular_velocity: f32,
    // Duration of each ramp, in seconds
    transition: f32,
    // Duration of the constant velocity phase, in seconds
    arc: f32,
}

impl TurnProfile {
    /// Profile for turning `radians` (positive means left) with at most `force` on the tires
    ///
    /// A non-positive force or a non-finite angle gives an empty profile.
    pub fn new(radians: f32, force: f32, config: &MotionProfileConfig) -> Self {
        let turn_sign = sign(radians);
        let radians = radians.abs();

        let angular_acceleration =
            force * MOUSE_WHEELS_SEPARATION / MOUSE_MOMENT_OF_INERTIA * config.angular_acceleration_scale;
        if !radians.is_finite() || !angular_acceleration.is_finite() || angular_acceleration <= 0.0 {
            error!("Invalid turn of {} rad with {} N", radians, force);
            return Self::empty();
        }
        let mut max_angular_velocity = (radians / 2.0 * angular_acceleration).sqrt();
        if max_angular_velocity > MOUSE_MAX_ANGULAR_VELOCITY {
            max_angular_velocity = MOUSE_MAX_ANGULAR_VELOCITY;
        }

        // Both ramps together sweep `2 * transition_angle`
        let ramps = max_angular_velocity / angular_acceleration * PI;
        let transition_angle = ramps * max_angular_velocity / PI;
        let arc = if max_angular_velocity > 0.0 {
            ((radians - 2.0 * transition_angle) / max_angular_velocity).max(0.0)
        } else {
            0.0
        };

        Self {
            max_angular_velocity: turn_sign * max_angular_velocity,
            transition: ramps / 2.0,
            arc,
        }
    }

    fn empty() -> Self {
        Self {
            max_angular_velocity: 0.0,
            transition: 0.0,
            arc: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        2.0 * self.transition + self.arc
    }

    pub fn max_angular_velocity(&self) -> f32 {
        self.max_angular_velocity
    }

    /// Angular velocity `time` seconds after the turn started
    pub fn angular_velocity(&self, time: f32) -> f32 {
        if time < 0.0 || time >= self.duration() {
            return 0.0;
        }

        if time < self.transition {
            let factor = time / self.transition;
            self.max_angular_velocity * (factor * PI / 2.0).sin()
        } else if time < self.transition + self.arc {
            self.max_angular_velocity
        } else {
            let factor = (self.duration() - time) / self.transition;
            self.max_angular_velocity * (factor * PI / 2.0).sin()
        }
    }
}

/// In-place (or, while moving, arc) turn following a [`TurnProfile`].
///
/// The linear target speed is frozen at the ideal speed when the turn starts
/// and wall corrections are disabled until the profile expires.
#[derive(Debug, Clone)]
pub struct InplaceTurn {
    radians: f32,
    force: f32,
    profile: TurnProfile,
    start: Option<Instant>,
}

impl InplaceTurn {
    pub fn new(radians: f32, force: f32, config: &MotionProfileConfig) -> Self {
        Self {
            radians,
            force,
            profile: TurnProfile::new(radians, force, config),
            start: None,
        }
    }

    pub fn profile(&self) -> &TurnProfile {
        &self.profile
    }
}

impl Maneuver for InplaceTurn {
    fn kind(&self) -> ManeuverKind {
        ManeuverKind::Turn {
            radians: self.radians,
            force: self.force,
        }
    }

    fn tick(&mut self, platform: &mut dyn Platform, _config: &MotionProfileConfig) -> ManeuverState {
        let now = platform.now();
        let start = match self.start {
            Some(start) => start,
            None => {
                debug!(
                    "Turn of {} rad lasting {} s",
                    self.radians,
                    self.profile.duration()
                );
                let ideal = platform.ideal_linear_speed();
                platform.set_target_linear_speed(ideal);
                platform.disable_walls_control();
                self.start = Some(now);
                now
            }
        };

        let time = elapsed_seconds(start, now);
        if time >= self.profile.duration() {
            platform.set_ideal_angular_speed(0.0);
            return ManeuverState::Finished;
        }

        platform.set_ideal_angular_speed(self.profile.angular_velocity(time));
        ManeuverState::Working
    }
}
