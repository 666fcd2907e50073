use log::{debug, info};
#[allow(unused_imports)]
use num_traits::float::Float;

use crate::{
    config::{KEEP_FRONT_DISTANCE_TOLERANCE, KEEP_FRONT_READINGS, SENSORS_SAMPLING_TICKS},
    geometry::TurnGeometry,
    motion_control::{MotionControl, Platform, debug::DebugOut},
    walls::SensorSnapshot,
};

impl<P: Platform, G: TurnGeometry, D: DebugOut> MotionControl<'_, P, G, D> {
    fn average_readings(&mut self, reading: impl Fn(&SensorSnapshot) -> f32) -> f32 {
        let mut sum = 0.0;
        for _ in 0..KEEP_FRONT_READINGS {
            sum += reading(&self.sensors());
            self.platform_mut().sleep_ticks(SENSORS_SAMPLING_TICKS);
        }
        sum / KEEP_FRONT_READINGS as f32
    }

    /// Block until the averaged front sensors error is within `error`
    pub fn wait_front_perpendicular(&mut self, error: f32) {
        loop {
            let average = self.average_readings(SensorSnapshot::front_sensors_error);
            if average.abs() < error {
                break;
            }
        }
    }

    /// Hold the mouse at `distance` meters from the front wall.
    ///
    /// Uses the front sensors to square up against the wall, then corrects
    /// the distance with straight moves at half the configured ramps until
    /// the averaged reading is within tolerance. Does nothing without a front
    /// wall.
    pub fn keep_front_wall_distance(&mut self, distance: f32) {
        if !self.sensors().front_wall_detection() {
            return;
        }
        info!("Keeping {} m from the front wall", distance);

        let saved = self.scale_linear_ramps(0.5);
        loop {
            let platform = self.platform_mut();
            platform.front_sensors_control(true);
            platform.side_sensors_close_control(false);
            platform.side_sensors_far_control(false);

            self.wait_front_perpendicular(KEEP_FRONT_DISTANCE_TOLERANCE);
            let diff = self.average_readings(SensorSnapshot::front_wall_distance) - distance;
            if diff.abs() < KEEP_FRONT_DISTANCE_TOLERANCE {
                break;
            }
            debug!("Front wall distance off by {} m", diff);
            let position = self.platform().average_micrometers();
            self.target_straight(position, diff, 0.0);
        }
        self.set_config(saved);

        let platform = self.platform_mut();
        platform.disable_walls_control();
        platform.reset_control_all();
    }
}
