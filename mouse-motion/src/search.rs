use crate::walls::WallsAround;

/// Relative direction of the next search step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Left,
    Front,
    Right,
    Back,
    /// No reachable neighbor
    Stay,
}

/// Maze model and flood fill, kept outside of the motion core.
///
/// Positions are cell indexes, `0` being the starting cell.
#[cfg_attr(test, mockall::automock)]
pub trait Search {
    /// Forget every explored wall, keeping only the maze borders
    fn initialize_maze_walls(&mut self);

    /// Place the mouse in the starting cell, targeting the goal
    fn set_search_initial_state(&mut self);

    fn set_target_goal(&mut self);

    fn set_target_cell(&mut self, cell: u8);

    /// Recompute flood distances to the target
    fn set_distances(&mut self);

    /// Record the walls seen from the current position
    fn update_walls(&mut self, walls: WallsAround);

    fn current_cell_is_visited(&self) -> bool;

    /// Walls of the current cell as already recorded, relative to the mouse
    fn current_walls_around(&self) -> WallsAround;

    /// Best step towards the target, given the walls around the current cell
    fn best_neighbor_step(&self, walls: WallsAround) -> StepDirection;

    /// Update the search position and orientation after a step
    fn move_search_position(&mut self, step: StepDirection);

    /// Flood distance from the current position to the target
    fn search_distance(&self) -> u8;

    fn search_position(&self) -> u8;

    /// Closest cell worth exploring, or the starting cell once the maze is known
    fn find_unexplored_interesting_cell(&self) -> u8;
}
