/// Speed control loop running in the background at the control tick rate.
///
/// The loop owns the PID controllers and the motor driver. The core only sets
/// setpoints, toggles wall corrections and reads back the profile-tracked
/// speeds.
pub trait Drive {
    /// Linear speed the ideal speed ramps towards, in m/s
    fn set_target_linear_speed(&mut self, speed: f32);

    fn target_linear_speed(&self) -> f32;

    /// Profile-tracked linear speed, in m/s
    fn ideal_linear_speed(&self) -> f32;

    /// Angular speed followed directly by the angular loop, in rad/s
    fn set_ideal_angular_speed(&mut self, speed: f32);

    fn ideal_angular_speed(&self) -> f32;

    fn measured_linear_speed(&self) -> f32;

    fn measured_angular_speed(&self) -> f32;

    /// Limits the ideal linear speed ramps with, in m/s²
    fn set_linear_ramp(&mut self, acceleration: f32, deceleration: f32);

    fn side_sensors_close_control(&mut self, enabled: bool);

    fn side_sensors_far_control(&mut self, enabled: bool);

    fn front_sensors_control(&mut self, enabled: bool);

    fn diagonal_sensors_control(&mut self, enabled: bool);

    fn disable_walls_control(&mut self) {
        self.side_sensors_close_control(false);
        self.side_sensors_far_control(false);
        self.front_sensors_control(false);
        self.diagonal_sensors_control(false);
    }

    fn collision_detected(&self) -> bool;

    fn reset_control_errors(&mut self);

    fn reset_control_all(&mut self);

    fn enable_motor_control(&mut self);

    fn disable_motor_control(&mut self);

    /// Short-circuit both motors
    fn drive_break(&mut self);
}

pub trait Encoder {
    /// Average distance travelled by both wheels since power on, in micrometers
    fn average_micrometers(&self) -> i32;
}
