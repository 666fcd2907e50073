//! Kinematic simulation of the mouse, for host runs and tests.
//!
//! The speed loop is modeled as perfect tracking: the ideal linear speed
//! ramps towards the target with the configured limits and the wheels follow
//! it exactly. The maze is reduced to the corridor the mouse starts in:
//! transverse walls at fixed positions along it, and constant side distances.
//! Each tick publishes raw sensor readings through [`WallSensors`], the same
//! way the sampling interrupt does on hardware.

use core::f64::consts::PI;

use heapless::Vec;
use log::{debug, warn};
#[allow(unused_imports)]
use num_traits::float::Float;

use crate::{
    config::{
        CELL_DIMENSION, MICROMETERS_PER_METER, MIDDLE_MAZE_DISTANCE, MOUSE_HEAD, MOUSE_START_SHIFT, NUM_SENSOR,
        SENSOR_FRONT_LEFT_ID, SENSOR_FRONT_RIGHT_ID, SENSOR_SIDE_LEFT_ID, SENSOR_SIDE_RIGHT_ID, SYSTICK_FREQUENCY_HZ,
    },
    motion_control::{
        drive::{Drive, Encoder},
        feedback::Feedback,
        timer::{Clock, Instant},
    },
    walls::{WallSensors, raw_reading_for_distance},
};

const MAX_TRANSVERSE_WALLS: usize = 32;
// Cosine of the largest heading error at which the front sensors still see a transverse wall
const FACING_COS: f64 = 0.99;

/// Wall corrections currently enabled by the core
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallsControl {
    pub side_close: bool,
    pub side_far: bool,
    pub front: bool,
    pub diagonal: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimCounters {
    pub success_cues: u32,
    pub error_cues: u32,
    pub led_toggles: u32,
    pub error_resets: u32,
    pub full_resets: u32,
}

pub struct SimulatedMouse<'a> {
    sensors: &'a WallSensors,
    ticks: u32,
    micrometers: f64,
    // Position along the starting corridor and heading, 0 facing out of the start cell
    x: f64,
    heading: f64,
    target_linear_speed: f32,
    ideal_linear_speed: f32,
    ideal_angular_speed: f32,
    acceleration: f32,
    deceleration: f32,
    transverse_walls: Vec<f64, MAX_TRANSVERSE_WALLS>,
    side_distances: (f32, f32),
    collision_at: Option<i32>,
    collided: bool,
    motor_control: bool,
    braked: bool,
    pub walls_control: WallsControl,
    pub counters: SimCounters,
}

impl<'a> SimulatedMouse<'a> {
    /// Mouse in the starting position, in a corridor with no walls ahead
    pub fn new(sensors: &'a WallSensors) -> Self {
        let mouse = Self {
            sensors,
            ticks: 0,
            micrometers: 0.0,
            x: 0.0,
            heading: 0.0,
            target_linear_speed: 0.0,
            ideal_linear_speed: 0.0,
            ideal_angular_speed: 0.0,
            acceleration: 1.0,
            deceleration: 1.0,
            transverse_walls: Vec::new(),
            side_distances: (MIDDLE_MAZE_DISTANCE, MIDDLE_MAZE_DISTANCE),
            collision_at: None,
            collided: false,
            motor_control: true,
            braked: false,
            walls_control: WallsControl::default(),
            counters: SimCounters::default(),
        };
        mouse.publish_sensors();
        mouse
    }

    /// Place a wall across the corridor at the given cell boundary, counted
    /// from the back wall of the starting cell
    pub fn add_wall_at_boundary(&mut self, boundary: u32) -> bool {
        let x = boundary as f64 * CELL_DIMENSION as f64 - MOUSE_START_SHIFT as f64;
        self.add_transverse_wall(x)
    }

    /// Place a wall across the corridor, `x` meters from the starting position
    pub fn add_transverse_wall(&mut self, x: f64) -> bool {
        let added = self.transverse_walls.push(x).is_ok();
        if !added {
            warn!("No room for a wall at {} m", x);
        }
        self.publish_sensors();
        added
    }

    /// Distances to the left and right corridor walls, `f32::INFINITY` for none
    pub fn set_side_distances(&mut self, left: f32, right: f32) {
        self.side_distances = (left, right);
        self.publish_sensors();
    }

    /// Raise the collision flag once the encoder reaches `micrometers`
    pub fn collide_at(&mut self, micrometers: i32) {
        self.collision_at = Some(micrometers);
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    /// Accumulated heading in radians, positive to the left
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_braked(&self) -> bool {
        self.braked
    }

    pub fn motor_control_enabled(&self) -> bool {
        self.motor_control
    }

    pub fn linear_ramp(&self) -> (f32, f32) {
        (self.acceleration, self.deceleration)
    }

    fn front_distance(&self) -> f32 {
        let facing = self.heading.cos();
        let distance = if facing > FACING_COS {
            self.transverse_walls
                .iter()
                .filter(|wall| **wall > self.x)
                .map(|wall| wall - self.x)
                .fold(f64::INFINITY, f64::min)
        } else if facing < -FACING_COS {
            self.transverse_walls
                .iter()
                .filter(|wall| **wall < self.x)
                .map(|wall| self.x - wall)
                .fold(f64::INFINITY, f64::min)
        } else {
            f64::INFINITY
        };
        distance as f32
    }

    fn publish_sensors(&self) {
        let front = self.front_distance();
        let mut distances = [0.0; NUM_SENSOR];
        distances[SENSOR_SIDE_LEFT_ID] = self.side_distances.0;
        distances[SENSOR_SIDE_RIGHT_ID] = self.side_distances.1;
        distances[SENSOR_FRONT_LEFT_ID] = front;
        distances[SENSOR_FRONT_RIGHT_ID] = front;

        let on = core::array::from_fn(|i| raw_reading_for_distance(i, distances[i]));
        self.sensors.update_distances(&on, &[0; NUM_SENSOR]);
    }

    fn ramp_linear_speed(&mut self, dt: f32) {
        if self.ideal_linear_speed < self.target_linear_speed {
            self.ideal_linear_speed = (self.ideal_linear_speed + self.acceleration * dt).min(self.target_linear_speed);
        } else if self.ideal_linear_speed > self.target_linear_speed {
            self.ideal_linear_speed = (self.ideal_linear_speed - self.deceleration * dt).max(self.target_linear_speed);
        }
    }
}

impl Clock for SimulatedMouse<'_> {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.ticks)
    }

    fn wait_tick(&mut self) {
        let dt = 1.0 / SYSTICK_FREQUENCY_HZ as f32;
        self.ticks = self.ticks.wrapping_add(1);

        if self.motor_control && !self.braked {
            self.ramp_linear_speed(dt);
            let linear = self.ideal_linear_speed as f64;
            let dt = dt as f64;
            self.micrometers += linear * dt * MICROMETERS_PER_METER as f64;
            self.x += linear * self.heading.cos() * dt;
            self.heading += self.ideal_angular_speed as f64 * dt;
        }

        if !self.collided {
            let position = self.average_micrometers();
            let hit_wall = self.front_distance() < MOUSE_HEAD;
            if hit_wall || self.collision_at.is_some_and(|at| position >= at) {
                debug!("Collision at {} um, tick {}", position, self.ticks);
                self.collided = true;
            }
        }

        self.publish_sensors();
    }
}

impl Drive for SimulatedMouse<'_> {
    fn set_target_linear_speed(&mut self, speed: f32) {
        self.braked = false;
        self.target_linear_speed = speed;
    }

    fn target_linear_speed(&self) -> f32 {
        self.target_linear_speed
    }

    fn ideal_linear_speed(&self) -> f32 {
        self.ideal_linear_speed
    }

    fn set_ideal_angular_speed(&mut self, speed: f32) {
        self.ideal_angular_speed = speed;
    }

    fn ideal_angular_speed(&self) -> f32 {
        self.ideal_angular_speed
    }

    fn measured_linear_speed(&self) -> f32 {
        self.ideal_linear_speed
    }

    fn measured_angular_speed(&self) -> f32 {
        self.ideal_angular_speed
    }

    fn set_linear_ramp(&mut self, acceleration: f32, deceleration: f32) {
        self.acceleration = acceleration;
        self.deceleration = deceleration;
    }

    fn side_sensors_close_control(&mut self, enabled: bool) {
        self.walls_control.side_close = enabled;
    }

    fn side_sensors_far_control(&mut self, enabled: bool) {
        self.walls_control.side_far = enabled;
    }

    fn front_sensors_control(&mut self, enabled: bool) {
        self.walls_control.front = enabled;
    }

    fn diagonal_sensors_control(&mut self, enabled: bool) {
        self.walls_control.diagonal = enabled;
    }

    fn collision_detected(&self) -> bool {
        self.collided
    }

    fn reset_control_errors(&mut self) {
        self.counters.error_resets += 1;
    }

    fn reset_control_all(&mut self) {
        self.counters.full_resets += 1;
        self.target_linear_speed = 0.0;
        self.ideal_linear_speed = 0.0;
        self.ideal_angular_speed = 0.0;
    }

    fn enable_motor_control(&mut self) {
        self.motor_control = true;
    }

    fn disable_motor_control(&mut self) {
        self.motor_control = false;
    }

    fn drive_break(&mut self) {
        self.braked = true;
    }
}

impl Encoder for SimulatedMouse<'_> {
    fn average_micrometers(&self) -> i32 {
        self.micrometers.round() as i32
    }
}

impl Feedback for SimulatedMouse<'_> {
    fn speaker_play_success(&mut self) {
        self.counters.success_cues += 1;
    }

    fn speaker_play_error(&mut self) {
        self.counters.error_cues += 1;
    }

    fn led_left_toggle(&mut self) {
        self.counters.led_toggles += 1;
    }
}

/// Heading wrapped to (-pi, pi]
pub fn wrap_heading(heading: f64) -> f64 {
    let mut wrapped = heading % (2.0 * PI);
    if wrapped > PI {
        wrapped -= 2.0 * PI;
    } else if wrapped <= -PI {
        wrapped += 2.0 * PI;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_speed_ramps_to_the_target() {
        let sensors = WallSensors::new();
        let mut mouse = SimulatedMouse::new(&sensors);
        mouse.set_linear_ramp(2.0, 4.0);
        mouse.set_target_linear_speed(0.5);

        mouse.sleep_ticks(100);
        assert!((mouse.ideal_linear_speed() - 0.2).abs() < 1e-4);
        mouse.sleep_ticks(200);
        assert_eq!(mouse.ideal_linear_speed(), 0.5);

        mouse.set_target_linear_speed(0.0);
        mouse.sleep_ticks(200);
        assert_eq!(mouse.ideal_linear_speed(), 0.0);
    }

    #[test]
    fn front_wall_is_seen_only_when_facing_it() {
        let sensors = WallSensors::new();
        let mut mouse = SimulatedMouse::new(&sensors);
        mouse.add_wall_at_boundary(1);

        let expected = CELL_DIMENSION - MOUSE_START_SHIFT;
        assert!((sensors.snapshot().front_wall_distance() - expected).abs() < 0.001);

        mouse.set_ideal_angular_speed(core::f32::consts::FRAC_PI_2);
        mouse.sleep_ticks(1000);
        assert!(!sensors.snapshot().front_wall_detection());
    }

    #[test]
    fn scripted_collision() {
        let sensors = WallSensors::new();
        let mut mouse = SimulatedMouse::new(&sensors);
        mouse.collide_at(1_000);
        mouse.set_linear_ramp(10.0, 10.0);
        mouse.set_target_linear_speed(1.0);

        mouse.sleep_ticks(10);
        assert!(!mouse.collision_detected());
        mouse.sleep_ticks(100);
        assert!(mouse.collision_detected());
    }

    #[test]
    fn heading_wraps() {
        assert!((wrap_heading(2.0 * PI + 0.1) - 0.1).abs() < 1e-9);
        assert!((wrap_heading(-PI - 0.1) - (PI - 0.1)).abs() < 1e-9);
    }
}
