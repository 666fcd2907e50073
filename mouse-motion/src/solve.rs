//! Maze exploration and speed runs.

use log::{error, info, warn};

use crate::{
    geometry::TurnGeometry,
    motion_control::{MotionControl, Platform, debug::DebugOut},
    movement::{PathLanguage, PathSmoother},
    run_sequence::{RunSequence, RunSequenceError},
    search::{Search, StepDirection},
    sequence::SequenceOutcome,
};

pub struct Solver<S: Search> {
    search: S,
    run_sequence: RunSequence,
}

impl<S: Search> Solver<S> {
    pub fn new(search: S) -> Self {
        Self {
            search,
            run_sequence: RunSequence::new(),
        }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut S {
        &mut self.search
    }

    pub fn run_sequence(&self) -> &RunSequence {
        &self.run_sequence
    }

    /// Used to load a saved sequence
    pub fn run_sequence_mut(&mut self) -> &mut RunSequence {
        &mut self.run_sequence
    }

    /// Move from the current position to the search target.
    ///
    /// Returns false if a collision stopped the mouse.
    fn go_to_target<P: Platform, G: TurnGeometry, D: DebugOut>(
        &mut self,
        motion: &mut MotionControl<'_, P, G, D>,
        force: f32,
    ) -> bool {
        self.search.set_distances();
        loop {
            let walls = if self.search.current_cell_is_visited() {
                self.search.current_walls_around()
            } else {
                let walls = motion.read_walls();
                self.search.update_walls(walls);
                self.search.set_distances();
                walls
            };

            let step = self.search.best_neighbor_step(walls);
            self.search.move_search_position(step);
            motion.move_step(step, force);
            if motion.collision_detected() {
                error!("Collision while moving to cell {}", self.search.search_position());
                return false;
            }
            if self.search.search_distance() == 0 {
                break;
            }
        }

        let walls = motion.read_walls();
        self.search.update_walls(walls);
        true
    }

    /// Explore the maze, going back and forth until an optimal path is
    /// known, then stop in the starting position.
    pub fn explore<P: Platform, G: TurnGeometry, D: DebugOut>(
        &mut self,
        motion: &mut MotionControl<'_, P, G, D>,
        force: f32,
    ) -> SequenceOutcome {
        info!("Exploring with {} N", force);
        self.search.initialize_maze_walls();
        self.search.set_search_initial_state();

        loop {
            if !self.go_to_target(motion, force) {
                return SequenceOutcome::Collision;
            }
            if self.search.search_position() == 0 {
                break;
            }
            let cell = self.search.find_unexplored_interesting_cell();
            info!("Next exploration target: {}", cell);
            self.search.set_target_cell(cell);
        }

        motion.stop_middle();
        motion.turn_to_start_position(force);
        SequenceOutcome::Completed
    }

    fn build_run_sequence(&mut self) -> Result<RunSequence, RunSequenceError> {
        self.search.set_search_initial_state();
        self.search.set_target_goal();
        self.search.set_distances();

        let mut sequence = RunSequence::new();
        sequence.push('B')?;
        while self.search.search_distance() > 0 {
            let step = self.search.best_neighbor_step(self.search.current_walls_around());
            match step {
                StepDirection::Front => sequence.push('F')?,
                StepDirection::Left => sequence.push('L')?,
                StepDirection::Right => sequence.push('R')?,
                StepDirection::Back | StepDirection::Stay => warn!("Ignoring {:?} step", step),
            }
            self.search.move_search_position(step);
        }
        // Cross the whole goal area
        loop {
            self.search.move_search_position(StepDirection::Front);
            if self.search.search_distance() != 0 {
                break;
            }
            sequence.push('F')?;
        }
        sequence.push('F')?;
        sequence.push('S')?;
        Ok(sequence)
    }

    /// Define the sequence executed on speed runs from the explored maze
    pub fn set_run_sequence(&mut self) {
        match self.build_run_sequence() {
            Ok(sequence) => {
                info!("Run sequence: {}", sequence);
                self.run_sequence = sequence;
            }
            Err(err) => {
                error!("Unable to build the run sequence: {}", err);
                self.run_sequence.clear();
            }
        }
    }

    /// Run from the start to the goal
    pub fn run<P: Platform, G: TurnGeometry, D: DebugOut, M: PathSmoother + ?Sized>(
        &self,
        motion: &mut MotionControl<'_, P, G, D>,
        smoother: &M,
        force: f32,
    ) -> SequenceOutcome {
        motion.execute_movement_sequence(self.run_sequence.as_str(), smoother, force, PathLanguage::Diagonals)
    }

    /// Run back from the goal to the start
    pub fn run_back<P: Platform, G: TurnGeometry, D: DebugOut, M: PathSmoother + ?Sized>(
        &self,
        motion: &mut MotionControl<'_, P, G, D>,
        smoother: &M,
        force: f32,
    ) -> SequenceOutcome {
        let sequence = self.run_sequence.reversed();
        motion.execute_movement_sequence(sequence.as_str(), smoother, force, PathLanguage::Safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{search::MockSearch, walls::WallsAround};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    // Flood distance after each search move: three steps to the goal, one
    // more goal cell, then out of the goal area
    const DISTANCES: [u8; 6] = [3, 2, 1, 0, 0, 5];
    const STEPS: [StepDirection; 3] = [StepDirection::Front, StepDirection::Left, StepDirection::Front];

    fn scripted_search(moves: Arc<AtomicUsize>) -> MockSearch {
        let mut search = MockSearch::new();
        search.expect_set_search_initial_state().times(1).return_const(());
        search.expect_set_target_goal().times(1).return_const(());
        search.expect_set_distances().return_const(());
        search
            .expect_current_walls_around()
            .return_const(WallsAround::default());

        let counter = moves.clone();
        search
            .expect_search_distance()
            .returning(move || DISTANCES[counter.load(Ordering::SeqCst)]);
        let counter = moves.clone();
        search
            .expect_best_neighbor_step()
            .returning(move |_| STEPS[counter.load(Ordering::SeqCst)]);
        search.expect_move_search_position().returning(move |_| {
            moves.fetch_add(1, Ordering::SeqCst);
        });
        search
    }

    #[test]
    fn run_sequence_crosses_the_goal_area() {
        let moves = Arc::new(AtomicUsize::new(0));
        let mut solver = Solver::new(scripted_search(moves.clone()));

        solver.set_run_sequence();

        assert_eq!(solver.run_sequence().as_str(), "BFLFFFS");
        assert_eq!(moves.load(Ordering::SeqCst), DISTANCES.len() - 1);
    }

    #[test]
    fn run_back_sequence_mirrors_the_run() {
        let mut solver = Solver::new(scripted_search(Arc::new(AtomicUsize::new(0))));
        solver.set_run_sequence();
        assert_eq!(solver.run_sequence().reversed().as_str(), "BFFFRFS");
    }
}
