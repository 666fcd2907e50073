use log::error;

// ---- Maze ----
// Side of a square maze cell, wall to wall, in meters
pub const CELL_DIMENSION: f32 = 0.18;
// Distance between two consecutive diagonal cell crossings
pub const CELL_DIAGONAL: f32 = CELL_DIMENSION * core::f32::consts::FRAC_1_SQRT_2;
pub const WALL_WIDTH: f32 = 0.012;
pub const MAZE_SIZE: usize = 16;
pub const MAZE_AREA: usize = MAZE_SIZE * MAZE_SIZE;

// ---- Mouse geometry and dynamics ----
// Distance from the center of the mouse to the tail
pub const MOUSE_TAIL: f32 = 0.032;
// Distance from the center of the mouse to the head
pub const MOUSE_HEAD: f32 = 0.046;
// How far the center of the mouse is from the cell boundary when the tail
// touches the back wall of the starting cell
pub const MOUSE_START_SHIFT: f32 = MOUSE_TAIL + WALL_WIDTH / 2.0;
pub const MOUSE_MASS: f32 = 0.1;
pub const MOUSE_WHEELS_SEPARATION: f32 = 0.0785;
pub const MOUSE_MOMENT_OF_INERTIA: f32 = 0.000_12;
// In rad/s
pub const MOUSE_MAX_ANGULAR_VELOCITY: f32 = 12.0;
// Longitudinal drift of the center of the mouse after a 180 degree turn
pub const SHIFT_AFTER_180_DEG_TURN: f32 = 0.010;

// ---- Speeds in m/s ----
pub const SEARCH_LINEAR_SPEED: f32 = 0.6;
pub const RUN_LINEAR_SPEED: f32 = 2.0;

// ---- Control clock ----
pub const SYSTICK_FREQUENCY_HZ: u32 = 1000;
pub const MICROMETERS_PER_METER: f32 = 1_000_000.0;

// ---- Distance sensors ----
pub const NUM_SENSOR: usize = 4;
pub const SENSOR_SIDE_LEFT_ID: usize = 0;
pub const SENSOR_SIDE_RIGHT_ID: usize = 1;
pub const SENSOR_FRONT_LEFT_ID: usize = 2;
pub const SENSOR_FRONT_RIGHT_ID: usize = 3;
// distance = a / ln(on - off) - b, per sensor (side left, side right, front left, front right)
pub const SENSORS_CALIBRATION_A: [f32; NUM_SENSOR] = [2.806, 2.603, 2.723, 2.870];
pub const SENSORS_CALIBRATION_B: [f32; NUM_SENSOR] = [0.287, 0.278, 0.309, 0.331];
// Distance from a side sensor to the wall when the mouse is centered in the corridor
pub const MIDDLE_MAZE_DISTANCE: f32 = (CELL_DIMENSION - WALL_WIDTH) / 2.0;
pub const SIDE_WALL_DETECTION: f32 = CELL_DIMENSION * 0.90;
pub const FRONT_WALL_DETECTION: f32 = CELL_DIMENSION * 1.5;
// Both side errors under this value mean the mouse is centered
pub const SIDE_SENSORS_ERROR_DEAD_BAND: f32 = 0.002;
// A side error larger than this usually means the wall is missing
pub const SIDE_SENSORS_ERROR_MARGIN: f32 = 0.05;
pub const SIDE_CALIBRATION_READINGS: u32 = 20;
pub const SENSORS_SAMPLING_TICKS: u32 = 2;

// ---- Front wall alignment ----
pub const KEEP_FRONT_DISTANCE_TOLERANCE: f32 = 0.001;
pub const KEEP_FRONT_READINGS: u32 = 20;

// ---- Paths ----
pub const MAX_SMOOTH_PATH_LEN: usize = 1024;
pub const RUN_SEQUENCE_LEN: usize = MAZE_AREA + 3;

// ---- Persistent storage ----
pub const FLASH_EEPROM_ADDRESS_MAZE: u32 = 0x0807_F800;
pub const EEPROM_NUM_BYTES_ERASED_CHECKED: usize = 4;
pub const EEPROM_BYTE_ERASED_VALUE: u8 = 255;

/// Linear and angular limits the maneuvers are planned with.
///
/// Owned by [`crate::motion_control::MotionControl`] and only changed between
/// maneuvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfileConfig {
    // In m/s²
    pub linear_acceleration: f32,
    // In m/s², positive
    pub linear_deceleration: f32,
    // In m/s
    pub max_linear_speed: f32,
    // Multiplies the angular acceleration derived from the turn force
    pub angular_acceleration_scale: f32,
}

impl Default for MotionProfileConfig {
    fn default() -> Self {
        Self::from_force(0.25, false)
    }
}

impl MotionProfileConfig {
    /// Derive the linear profile from the maximum force applied on the tires
    pub fn from_force(force: f32, run: bool) -> Self {
        let acceleration = 2.0 * force / MOUSE_MASS;
        Self {
            linear_acceleration: acceleration,
            linear_deceleration: acceleration,
            max_linear_speed: if run {
                RUN_LINEAR_SPEED
            } else {
                SEARCH_LINEAR_SPEED
            },
            angular_acceleration_scale: 1.0,
        }
    }

    /// Whether every limit is usable for planning
    pub fn is_valid(&self) -> bool {
        let valid = self.linear_acceleration > 0.0
            && self.linear_deceleration > 0.0
            && self.max_linear_speed > 0.0
            && self.angular_acceleration_scale > 0.0;

        if !valid {
            error!("Invalid motion profile {:?}", self);
        }

        valid
    }
}
