use crate::maneuver::ManeuverKind;

/// State of the mouse after one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub ticks: u32,
    // Encoder average in micrometers
    pub position: i32,
    pub ideal_linear_speed: f32,
    pub ideal_angular_speed: f32,
}

pub trait DebugOut {
    fn new_maneuver(&mut self, maneuver: ManeuverKind);

    fn new_sample(&mut self, sample: MotionSample);
}

pub struct DummyDebugOut {}

impl DummyDebugOut {
    pub fn new() -> Self {
        Self {}
    }
}

impl DebugOut for DummyDebugOut {
    fn new_maneuver(&mut self, _maneuver: ManeuverKind) {}

    fn new_sample(&mut self, _sample: MotionSample) {}
}
