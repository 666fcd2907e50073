mod config;
mod trace;

use std::{
    env,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use log::info;
use mouse_motion::{
    MotionControl,
    config::{MICROMETERS_PER_METER, MotionProfileConfig, SYSTICK_FREQUENCY_HZ},
    geometry::TurnGeometry,
    motion_control::{debug::DebugOut, drive::Encoder},
    movement::{PathSmoother, SafePathSmoother, SmoothedPath},
    sequence::SequenceOutcome,
    sim::{SimulatedMouse, wrap_heading},
    walls::WallSensors,
};
use serde::Serialize;

use crate::{config::SimConfig, trace::JsonLinesDebug};

type DynError = Box<dyn std::error::Error>;

const DEFAULT_CONFIG: &str = "robot.toml";

#[derive(Debug, Serialize)]
struct RunSummary {
    outcome: String,
    ticks: u32,
    seconds: f32,
    position_m: f32,
    heading_rad: f64,
    success_cues: u32,
    error_cues: u32,
    cells_entered: u32,
}

fn main() {
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("{}", e);
        std::process::exit(-1);
    }
}

fn try_main() -> Result<(), DynError> {
    let task = env::args().nth(1);
    let config_path = env::args()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    match task.as_deref() {
        Some("run") => run(&config_path)?,
        Some("plan") => plan(&config_path)?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "
Available Tasks:
run [config]: execute the configured sequence in the simulated corridor
plan [config]: print the smoothed path of the configured sequence
"
    )
}

fn plan(config_path: &Path) -> Result<(), DynError> {
    let config = SimConfig::load(config_path)?;
    let mut path = SmoothedPath::new();
    SafePathSmoother.make_smooth_path(&config.sequence, &mut path, config.language.into())?;
    for movement in path.as_slice() {
        println!("{:?}", movement);
    }
    Ok(())
}

fn run(config_path: &Path) -> Result<(), DynError> {
    let config = SimConfig::load(config_path)?;
    let profile = config.motion_profile()?;
    let geometry = config.turn_table()?;

    let sensors = WallSensors::new();
    let mut mouse = SimulatedMouse::new(&sensors);
    for boundary in &config.maze.walls_at {
        if !mouse.add_wall_at_boundary(*boundary) {
            Err(format!("Too many walls, dropped the one at {}", boundary))?;
        }
    }
    mouse.set_side_distances(
        config.maze.side_left.unwrap_or(f32::INFINITY),
        config.maze.side_right.unwrap_or(f32::INFINITY),
    );
    if let Some(at) = config.maze.collide_at {
        mouse.collide_at(at);
    }

    let (outcome, summary) = match &config.trace {
        Some(trace_path) => {
            let file = File::create(trace_path).map_err(|e| format!("Unable to create {}: {}", trace_path, e))?;
            let debug = JsonLinesDebug::new(BufWriter::new(file));
            let mut motion = MotionControl::new_with_debug(mouse, &sensors, geometry, debug);
            let result = execute(&mut motion, &config, profile);
            motion.debug_mut().flush()?;
            result
        }
        None => {
            let mut motion = MotionControl::new(mouse, &sensors, geometry);
            execute(&mut motion, &config, profile)
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if outcome != SequenceOutcome::Completed {
        Err(format!("Sequence ended with {:?}", outcome))?;
    }
    Ok(())
}

fn execute<G: TurnGeometry, D: DebugOut>(
    motion: &mut MotionControl<'_, SimulatedMouse<'_>, G, D>,
    config: &SimConfig,
    profile: MotionProfileConfig,
) -> (SequenceOutcome, RunSummary) {
    motion.set_config(profile);
    motion.set_starting_position();
    info!("Running {} with {} N", config.sequence, config.force);

    let outcome = motion.execute_movement_sequence(
        &config.sequence,
        &SafePathSmoother,
        config.force,
        config.language.into(),
    );
    (outcome, summarize(outcome, motion.platform()))
}

fn summarize(outcome: SequenceOutcome, sim: &SimulatedMouse<'_>) -> RunSummary {
    RunSummary {
        outcome: format!("{:?}", outcome),
        ticks: sim.ticks(),
        seconds: sim.ticks() as f32 / SYSTICK_FREQUENCY_HZ as f32,
        position_m: sim.average_micrometers() as f32 / MICROMETERS_PER_METER,
        heading_rad: wrap_heading(sim.heading()),
        success_cues: sim.counters.success_cues,
        error_cues: sim.counters.error_cues,
        cells_entered: sim.counters.led_toggles,
    }
}
