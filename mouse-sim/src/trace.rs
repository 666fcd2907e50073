use std::io::Write;

use log::error;
use mouse_motion::{
    maneuver::ManeuverKind,
    motion_control::debug::{DebugOut, MotionSample},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum TraceEvent {
    Straight {
        distance: f32,
        end_speed: f32,
    },
    Diagonal {
        distance: f32,
        control_distance: f32,
        end_speed: f32,
    },
    Turn {
        radians: f32,
        force: f32,
    },
    Sample {
        ticks: u32,
        position: i32,
        linear_speed: f32,
        angular_speed: f32,
    },
}

impl From<ManeuverKind> for TraceEvent {
    fn from(maneuver: ManeuverKind) -> Self {
        match maneuver {
            ManeuverKind::Straight { distance, end_speed } => TraceEvent::Straight { distance, end_speed },
            ManeuverKind::Diagonal {
                distance,
                control_distance,
                end_speed,
            } => TraceEvent::Diagonal {
                distance,
                control_distance,
                end_speed,
            },
            ManeuverKind::Turn { radians, force } => TraceEvent::Turn { radians, force },
        }
    }
}

/// Writes one JSON object per line for every maneuver and sample
pub struct JsonLinesDebug<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> JsonLinesDebug<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    fn write(&mut self, event: TraceEvent) {
        if self.failed {
            return;
        }
        let result = serde_json::to_writer(&mut self.out, &event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(err) = result {
            error!("Trace disabled: {}", err);
            self.failed = true;
        }
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DebugOut for JsonLinesDebug<W> {
    fn new_maneuver(&mut self, maneuver: ManeuverKind) {
        self.write(maneuver.into());
    }

    fn new_sample(&mut self, sample: MotionSample) {
        self.write(TraceEvent::Sample {
            ticks: sample.ticks,
            position: sample.position,
            linear_speed: sample.ideal_linear_speed,
            angular_speed: sample.ideal_angular_speed,
        });
    }
}
