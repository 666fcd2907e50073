#![allow(dead_code)]

use mouse_motion::{
    MotionControl,
    geometry::TurnTable,
    maneuver::ManeuverKind,
    motion_control::debug::{DebugOut, MotionSample},
    search::{Search, StepDirection},
    sim::SimulatedMouse,
    walls::{WallSensors, WallsAround},
};

#[derive(Debug, Default)]
pub struct RecordingDebug {
    pub maneuvers: Vec<ManeuverKind>,
    pub samples: Vec<MotionSample>,
}

impl DebugOut for RecordingDebug {
    fn new_maneuver(&mut self, maneuver: ManeuverKind) {
        self.maneuvers.push(maneuver);
    }

    fn new_sample(&mut self, sample: MotionSample) {
        self.samples.push(sample);
    }
}

pub type SimMotion<'a> = MotionControl<'a, SimulatedMouse<'a>, TurnTable, RecordingDebug>;

pub fn sim_motion<'a>(sensors: &'a WallSensors, geometry: TurnTable) -> SimMotion<'a> {
    let _ = env_logger::builder().is_test(true).try_init();
    MotionControl::new_with_debug(SimulatedMouse::new(sensors), sensors, geometry, RecordingDebug::default())
}

/// Search over a single corridor of cells `0..cells`, the goal at its end
pub struct CorridorSearch {
    pub position: u8,
    pub facing_forward: bool,
    pub target: u8,
    pub goal: u8,
    pub visited: Vec<bool>,
    pub wall_updates: u32,
}

impl CorridorSearch {
    pub fn new(goal: u8) -> Self {
        Self {
            position: 0,
            facing_forward: true,
            target: goal,
            goal,
            visited: vec![false; goal as usize + 1],
            wall_updates: 0,
        }
    }

    fn advance(&mut self) {
        if self.facing_forward {
            self.position += 1;
        } else {
            self.position -= 1;
        }
    }
}

impl Search for CorridorSearch {
    fn initialize_maze_walls(&mut self) {
        self.visited.iter_mut().for_each(|v| *v = false);
    }

    fn set_search_initial_state(&mut self) {
        self.position = 0;
        self.facing_forward = true;
        self.target = self.goal;
    }

    fn set_target_goal(&mut self) {
        self.target = self.goal;
    }

    fn set_target_cell(&mut self, cell: u8) {
        self.target = cell;
    }

    fn set_distances(&mut self) {}

    fn update_walls(&mut self, _walls: WallsAround) {
        self.visited[self.position as usize] = true;
        self.wall_updates += 1;
    }

    fn current_cell_is_visited(&self) -> bool {
        self.visited[self.position as usize]
    }

    fn current_walls_around(&self) -> WallsAround {
        WallsAround {
            left: true,
            front: false,
            right: true,
        }
    }

    fn best_neighbor_step(&self, _walls: WallsAround) -> StepDirection {
        if self.target == self.position {
            StepDirection::Stay
        } else if (self.target > self.position) == self.facing_forward {
            StepDirection::Front
        } else {
            StepDirection::Back
        }
    }

    fn move_search_position(&mut self, step: StepDirection) {
        match step {
            StepDirection::Front => self.advance(),
            StepDirection::Back => {
                self.facing_forward = !self.facing_forward;
                self.advance();
            }
            StepDirection::Left | StepDirection::Right | StepDirection::Stay => {}
        }
    }

    fn search_distance(&self) -> u8 {
        self.target.abs_diff(self.position)
    }

    fn search_position(&self) -> u8 {
        self.position
    }

    fn find_unexplored_interesting_cell(&self) -> u8 {
        0
    }
}
