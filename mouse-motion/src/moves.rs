//! Cell level moves used while searching the maze.
//!
//! All of them are blocking and start from, or end at, cell boundaries
//! tracked by [`crate::cell::CellTracker`].

use core::f32::consts::PI;

use log::debug;

use crate::{
    config::{CELL_DIMENSION, MOUSE_HEAD, MOUSE_START_SHIFT, WALL_WIDTH},
    geometry::TurnGeometry,
    motion_control::{MotionControl, Platform, debug::DebugOut},
    movement::Movement,
    search::StepDirection,
};

impl<P: Platform, G: TurnGeometry, D: DebugOut> MotionControl<'_, P, G, D> {
    fn front_and_close_controls(&mut self) {
        let platform = self.platform_mut();
        platform.front_sensors_control(true);
        platform.side_sensors_close_control(true);
        platform.side_sensors_far_control(false);
    }

    /// Stop at the end of the current cell
    pub fn stop_end(&mut self) {
        self.front_and_close_controls();
        let start = self.cell.cell_start();
        self.target_straight(start, CELL_DIMENSION, 0.0);
        self.platform_mut().disable_walls_control();
        self.platform_mut().reset_control_errors();
        self.entered_next_cell();
    }

    /// Stop with the head touching the front wall
    pub fn stop_head_front_wall(&mut self) {
        let distance = CELL_DIMENSION - WALL_WIDTH / 2.0 - MOUSE_HEAD;
        self.front_and_close_controls();
        let start = self.cell.cell_start();
        self.target_straight(start, distance, 0.0);
        self.platform_mut().disable_walls_control();
        self.platform_mut().reset_control_errors();
    }

    /// Stop in the middle of the current cell
    pub fn stop_middle(&mut self) {
        let distance = CELL_DIMENSION / 2.0;
        self.front_and_close_controls();
        let start = self.cell.cell_start();
        self.target_straight(start, distance, 0.0);
        self.platform_mut().disable_walls_control();
        self.platform_mut().reset_control_errors();
    }

    /// Turn 180 degrees in the middle of the cell.
    ///
    /// With a wall ahead the mouse first aligns to it. The direction
    /// alternates between calls so the accumulated heading error cancels out.
    pub fn turn_back(&mut self, force: f32) {
        if self.sensors().front_wall_distance() < CELL_DIMENSION {
            self.keep_front_wall_distance(CELL_DIMENSION / 2.0);
        }
        self.platform_mut().disable_walls_control();

        let radians = if self.turn_back_left { PI } else { -PI };
        self.turn_back_left = !self.turn_back_left;
        self.inplace_turn(radians, force);
        self.turned_back();
    }

    /// Turn back and move backward until the tail sits at the starting shift
    pub fn turn_to_start_position(&mut self, force: f32) {
        let saved = self.scale_linear_ramps(0.25);
        self.turn_back(force);
        let distance = MOUSE_START_SHIFT - self.current_cell_shift();
        debug!("Backing {} m into the start position", distance);
        let position = self.platform().average_micrometers();
        self.target_straight(position, distance, 0.0);
        self.set_config(saved);

        let platform = self.platform_mut();
        platform.disable_walls_control();
        platform.reset_control_all();
        platform.enable_motor_control();
        platform.drive_break();
    }

    /// Move one cell straight ahead without stopping
    pub fn move_front(&mut self) {
        self.front_and_close_controls();
        let start = self.cell.cell_start();
        let speed = self.config().max_linear_speed;
        self.target_straight(start, CELL_DIMENSION, speed);
        self.entered_next_cell();
    }

    pub fn parametric_move_front(&mut self, distance: f32, end_linear_speed: f32) {
        let position = self.platform().average_micrometers();
        self.target_straight(position, distance, end_linear_speed);
    }

    pub fn parametric_move_diagonal(&mut self, distance: f32, control_distance: f32, end_linear_speed: f32) {
        let position = self.platform().average_micrometers();
        self.target_straight_diagonal(position, distance, control_distance, end_linear_speed);
    }

    /// Search turn into the side cell, ending at its boundary
    pub fn move_side(&mut self, turn: Movement, force: f32) {
        let before = self.geometry().move_turn_before(turn);
        let after = self.geometry().move_turn_after(turn);
        let speed = self.geometry().move_turn_linear_speed(turn, force);

        self.front_and_close_controls();
        self.platform_mut().side_sensors_far_control(true);
        let start = self.cell.cell_start();
        self.target_straight(start, before, speed);

        self.platform_mut().disable_walls_control();
        self.speed_turn(turn, force);

        self.front_and_close_controls();
        self.platform_mut().side_sensors_far_control(true);
        let position = self.platform().average_micrometers();
        let max_speed = self.config().max_linear_speed;
        self.target_straight(position, after, max_speed);
        self.entered_next_cell();
    }

    pub fn move_left(&mut self, force: f32) {
        self.move_side(Movement::Left, force);
    }

    pub fn move_right(&mut self, force: f32) {
        self.move_side(Movement::Right, force);
    }

    /// Stop, turn around and leave the cell the way the mouse came in
    pub fn move_back(&mut self, force: f32) {
        self.stop_middle();
        self.turn_back(force);
        self.move_front();
    }

    /// Execute one search step
    pub fn move_step(&mut self, direction: StepDirection, force: f32) {
        match direction {
            StepDirection::Left => self.move_left(force),
            StepDirection::Right => self.move_right(force),
            StepDirection::Front => self.move_front(),
            StepDirection::Back => self.move_back(force),
            StepDirection::Stay => self.stop_middle(),
        }
    }
}
