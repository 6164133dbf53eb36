use log::debug;
use rand::RngCore;

use crate::{
    coord::Coord,
    grid_model::GridModel,
    solver::{astar::cost_search, GridSolver, SearchOutcome, Strategy},
};

/// Uniform-cost search: A* with a zero heuristic.
#[derive(Clone, Debug, Default)]
pub struct UcsSolver;

impl GridSolver for UcsSolver {
    fn strategy(&self) -> Strategy {
        Strategy::Ucs
    }

    fn find_path(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        _rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let outcome = cost_search(grid, start, goal, |_| 0);
        debug!(
            "UCS from {} to {}: cost {:?}, {:?} expansions",
            start,
            goal,
            outcome.cost(),
            outcome.nodes_expanded()
        );
        outcome
    }
}
