use log::debug;
use rand::RngCore;

use crate::{
    coord::Coord,
    grid_model::GridModel,
    path::Path,
    search::best_first,
    solver::{heuristic, GridSolver, SearchOutcome, Solution, Strategy},
};

/// A* with the Manhattan distance heuristic. Every entered cell costs at least one on maps
/// loaded from text with non-zero digits, so the heuristic is consistent and the returned
/// cost is optimal.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver;

/// Runs the shared best-first core over the grid's planning neighbourhood, ordering the
/// frontier by accumulated cost plus `h`.
pub(crate) fn cost_search<FH>(
    grid: &GridModel,
    start: Coord,
    goal: Coord,
    h: FH,
) -> SearchOutcome
where
    FH: FnMut(&Coord) -> u32,
{
    let result = best_first(
        &start,
        |node| grid.neighbors4_and_cost(node),
        h,
        |node| *node == goal,
    );
    match result.solution {
        Some((path, cost)) => SearchOutcome::Found(Solution {
            path: Path::new(path),
            cost,
            nodes_expanded: Some(result.expanded),
        }),
        None => SearchOutcome::NoPath {
            nodes_expanded: Some(result.expanded),
        },
    }
}

impl GridSolver for AstarSolver {
    fn strategy(&self) -> Strategy {
        Strategy::AStar
    }

    fn find_path(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        _rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let outcome = cost_search(grid, start, goal, |node| heuristic(node, &goal));
        debug!(
            "A* from {} to {}: cost {:?}, {:?} expansions",
            start,
            goal,
            outcome.cost(),
            outcome.nodes_expanded()
        );
        outcome
    }
}
