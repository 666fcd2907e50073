pub mod debug;
pub mod drive;
pub mod feedback;
pub mod timer;

use log::{debug, error, info, warn};

use crate::{
    cell::CellTracker,
    config::MotionProfileConfig,
    geometry::TurnGeometry,
    maneuver::{ActiveManeuver, DiagonalMove, InplaceTurn, Maneuver, ManeuverState, StraightMove},
    motion_control::{
        debug::{DebugOut, DummyDebugOut, MotionSample},
        drive::{Drive, Encoder},
        feedback::Feedback,
        timer::Clock,
    },
    movement::Movement,
    trajectory,
    walls::{SensorSnapshot, WallSensors, WallsAround},
};

/// Everything the core needs from the robot
pub trait Platform: Drive + Encoder + Clock + Feedback {}

impl<T: Drive + Encoder + Clock + Feedback> Platform for T {}

/// Owner of the motion state of the mouse.
///
/// Holds the motion profile configuration, the cell tracker and the maneuver
/// in flight. Configuration changes go through this owner only, and never
/// while a maneuver is in progress.
pub struct MotionControl<'a, P: Platform, G: TurnGeometry, D: DebugOut = DummyDebugOut> {
    platform: P,
    sensors: &'a WallSensors,
    geometry: G,
    debug: D,
    config: MotionProfileConfig,
    pub(crate) cell: CellTracker,
    active: Option<ActiveManeuver>,
    pub(crate) turn_back_left: bool,
}

impl<'a, P: Platform, G: TurnGeometry> MotionControl<'a, P, G, DummyDebugOut> {
    /// Initialises the MotionControl with the default motion profile
    pub fn new(platform: P, sensors: &'a WallSensors, geometry: G) -> Self {
        Self::new_with_debug(platform, sensors, geometry, DummyDebugOut::new())
    }
}

impl<'a, P: Platform, G: TurnGeometry, D: DebugOut> MotionControl<'a, P, G, D> {
    pub fn new_with_debug(mut platform: P, sensors: &'a WallSensors, geometry: G, debug: D) -> Self {
        info!("Motion Control Init");

        let config = MotionProfileConfig::default();
        platform.set_linear_ramp(config.linear_acceleration, config.linear_deceleration);

        Self {
            platform,
            sensors,
            geometry,
            debug,
            config,
            cell: CellTracker::new(),
            active: None,
            turn_back_left: true,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn debug(&self) -> &D {
        &self.debug
    }

    pub fn debug_mut(&mut self) -> &mut D {
        &mut self.debug
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn sensors(&self) -> SensorSnapshot {
        self.sensors.snapshot()
    }

    pub fn read_walls(&self) -> WallsAround {
        self.sensors.snapshot().walls_around()
    }

    pub fn collision_detected(&self) -> bool {
        self.platform.collision_detected()
    }

    pub fn cell(&self) -> &CellTracker {
        &self.cell
    }

    // ---- Configuration ----

    pub fn config(&self) -> &MotionProfileConfig {
        &self.config
    }

    /// Replace the whole motion profile. Invalid profiles are rejected.
    pub fn set_config(&mut self, config: MotionProfileConfig) {
        if self.active.is_some() {
            error!("Motion profile cannot change during a maneuver");
            return;
        }
        if !config.is_valid() {
            return;
        }
        self.config = config;
        self.platform
            .set_linear_ramp(config.linear_acceleration, config.linear_deceleration);
    }

    pub fn set_linear_acceleration(&mut self, acceleration: f32) {
        self.set_config(MotionProfileConfig {
            linear_acceleration: acceleration,
            ..self.config
        });
    }

    pub fn set_linear_deceleration(&mut self, deceleration: f32) {
        self.set_config(MotionProfileConfig {
            linear_deceleration: deceleration,
            ..self.config
        });
    }

    pub fn set_max_linear_speed(&mut self, speed: f32) {
        self.set_config(MotionProfileConfig {
            max_linear_speed: speed,
            ..self.config
        });
    }

    pub fn set_angular_acceleration_scale(&mut self, scale: f32) {
        self.set_config(MotionProfileConfig {
            angular_acceleration_scale: scale,
            ..self.config
        });
    }

    /// Scale both linear ramps, returning the profile to restore afterwards
    pub(crate) fn scale_linear_ramps(&mut self, factor: f32) -> MotionProfileConfig {
        let saved = self.config;
        self.set_config(MotionProfileConfig {
            linear_acceleration: saved.linear_acceleration * factor,
            linear_deceleration: saved.linear_deceleration * factor,
            ..saved
        });
        saved
    }

    // ---- Maneuver scheduling ----

    pub fn is_maneuver_in_progress(&self) -> bool {
        self.active.is_some()
    }

    /// Start a maneuver, to be advanced with [`MotionControl::drive_tick`]
    pub fn start(&mut self, maneuver: impl Into<ActiveManeuver>) {
        let maneuver = maneuver.into();
        if let Some(previous) = &self.active {
            warn!("Dropping unfinished maneuver {:?}", previous.kind());
        }
        debug!("Starting {:?}", maneuver.kind());
        self.debug.new_maneuver(maneuver.kind());
        self.active = Some(maneuver);
    }

    /// Advance the maneuver in flight by one polling iteration
    pub fn drive_tick(&mut self) -> ManeuverState {
        let Some(maneuver) = self.active.as_mut() else {
            return ManeuverState::Finished;
        };

        let state = maneuver.tick(&mut self.platform, &self.config);

        self.debug.new_sample(MotionSample {
            ticks: self.platform.now().ticks(),
            position: self.platform.average_micrometers(),
            ideal_linear_speed: self.platform.ideal_linear_speed(),
            ideal_angular_speed: self.platform.ideal_angular_speed(),
        });

        if state == ManeuverState::Finished {
            self.active = None;
        }
        state
    }

    /// Run a maneuver to completion, waiting one tick between iterations
    pub fn run(&mut self, maneuver: impl Into<ActiveManeuver>) {
        self.start(maneuver);
        while self.drive_tick() == ManeuverState::Working {
            self.platform.wait_tick();
        }
    }

    // ---- Trajectory planning on the live speeds ----

    pub fn required_micrometers_to_speed(&self, speed: f32) -> i32 {
        trajectory::required_micrometers_to_speed(&self.config, self.platform.ideal_linear_speed(), speed)
    }

    pub fn required_time_to_speed(&self, speed: f32) -> f32 {
        trajectory::required_time_to_speed(&self.config, self.platform.target_linear_speed(), speed)
    }

    pub fn required_ticks_to_speed(&self, speed: f32) -> u32 {
        trajectory::required_ticks_to_speed(&self.config, self.platform.target_linear_speed(), speed)
    }

    // ---- Primitives ----

    /// Reach `distance` meters after the `start` encoder position at `speed` m/s
    pub fn target_straight(&mut self, start: i32, distance: f32, speed: f32) {
        self.run(StraightMove::new(start, distance, speed));
    }

    pub fn target_straight_diagonal(&mut self, start: i32, distance: f32, control_distance: f32, speed: f32) {
        self.run(DiagonalMove::new(start, distance, control_distance, speed));
    }

    /// Execute an in-place turn. Positive `radians` means left.
    pub fn inplace_turn(&mut self, radians: f32, force: f32) {
        let turn = InplaceTurn::new(radians, force, &self.config);
        self.run(turn);
    }

    /// Execute the turn of a turn movement at the current linear speed
    pub fn speed_turn(&mut self, turn: Movement, force: f32) {
        match turn.turn_angle() {
            Some(radians) => self.inplace_turn(radians, force),
            None => error!("{:?} is not a turn", turn),
        }
    }

    // ---- Cell tracking ----

    /// Initialize the mouse position, assuming the tail is touching a wall
    pub fn set_starting_position(&mut self) {
        let position = self.platform.average_micrometers();
        self.cell.set_starting_position(position);
    }

    /// Traveled distance since the start of the cell, in meters
    pub fn current_cell_shift(&self) -> f32 {
        self.cell.current_cell_shift(self.platform.average_micrometers())
    }

    pub(crate) fn entered_next_cell(&mut self) {
        let position = self.platform.average_micrometers();
        self.cell.entered_next_cell(position, &self.sensors.snapshot());
        self.platform.led_left_toggle();
    }

    pub(crate) fn turned_back(&mut self) {
        let position = self.platform.average_micrometers();
        self.cell.turned_back(position);
    }

    /// Calibrate the side sensors, the mouse must be centered in a corridor
    pub fn calibrate_side_sensors(&mut self) {
        self.sensors.calibrate_side_sensors(&mut self.platform);
    }
}
