use fxhash::FxHashMap;
use log::debug;
use rand::RngCore;
use std::collections::VecDeque;

use crate::{
    coord::Coord,
    grid_model::GridModel,
    path::Path,
    solver::{GridSolver, SearchOutcome, Solution, Strategy},
};

/// Breadth-first search. Finds a route with the fewest steps, ignoring terrain cost; the
/// reported cost is that step count.
#[derive(Clone, Debug, Default)]
pub struct BfsSolver;

/// Step count as a cost, saturating at [u32::MAX].
fn step_cost(steps: usize) -> u32 {
    u32::try_from(steps).unwrap_or(u32::MAX)
}

fn reconstruct_path(parents: &FxHashMap<Coord, Option<Coord>>, goal: Coord) -> Path {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&Some(parent)) = parents.get(&node) {
        path.push(parent);
        node = parent;
    }
    path.reverse();
    Path::new(path)
}

impl GridSolver for BfsSolver {
    fn strategy(&self) -> Strategy {
        Strategy::Bfs
    }

    fn find_path(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        _rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let mut queue = VecDeque::from([start]);
        // Doubles as the visited set: a cell is recorded when first discovered.
        let mut parents: FxHashMap<Coord, Option<Coord>> = FxHashMap::default();
        parents.insert(start, None);
        let mut expanded = 0;

        while let Some(node) = queue.pop_front() {
            expanded += 1;
            if node == goal {
                let path = reconstruct_path(&parents, goal);
                debug!("BFS reached {} after {} expansions", goal, expanded);
                return SearchOutcome::Found(Solution {
                    cost: step_cost(path.steps()),
                    path,
                    nodes_expanded: Some(expanded),
                });
            }
            for n in grid.neighbors4(&node) {
                if !parents.contains_key(&n) {
                    parents.insert(n, Some(node));
                    queue.push_back(n);
                }
            }
        }
        debug!("BFS found no path from {} to {}", start, goal);
        SearchOutcome::NoPath {
            nodes_expanded: Some(expanded),
        }
    }
}
