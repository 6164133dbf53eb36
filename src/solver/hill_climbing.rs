use fxhash::FxHashSet;
use log::debug;
use rand::seq::SliceRandom;
use rand::RngCore;
use smallvec::SmallVec;

use crate::{
    config::HillClimbingConfig,
    coord::Coord,
    grid_model::GridModel,
    path::Path,
    solver::{heuristic, GridSolver, SearchOutcome, Solution, Strategy},
};

/// Greedy descent on the Manhattan distance to the goal with random restarts. Each attempt
/// walks from the start to the unvisited neighbour closest to the goal, breaking ties at
/// random, and gives up at a dead end without backtracking. The shortest successful attempt is
/// kept. Neither complete nor optimal.
#[derive(Clone, Debug)]
pub struct HillClimbingSolver {
    pub restarts: usize,
}

impl HillClimbingSolver {
    pub fn new(config: &HillClimbingConfig) -> HillClimbingSolver {
        HillClimbingSolver {
            restarts: config.restarts,
        }
    }

    /// One greedy walk. Returns the visited trace if it ends on the goal.
    pub fn attempt(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<Coord>> {
        let mut current = start;
        let mut path = vec![current];
        let mut visited = FxHashSet::default();
        visited.insert(current);
        while current != goal {
            let candidates = grid
                .neighbors4(&current)
                .into_iter()
                .filter(|n| !visited.contains(n))
                .collect::<SmallVec<[Coord; 4]>>();
            let Some(best) = candidates.iter().map(|n| heuristic(n, &goal)).min() else {
                return None;
            };
            let ties = candidates
                .into_iter()
                .filter(|n| heuristic(n, &goal) == best)
                .collect::<SmallVec<[Coord; 4]>>();
            current = *ties.choose(rng)?;
            path.push(current);
            visited.insert(current);
        }
        Some(path)
    }
}

impl Default for HillClimbingSolver {
    fn default() -> Self {
        HillClimbingSolver::new(&HillClimbingConfig::default())
    }
}

impl GridSolver for HillClimbingSolver {
    fn strategy(&self) -> Strategy {
        Strategy::HillClimbing
    }

    fn find_path(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let mut best: Option<Vec<Coord>> = None;
        for _ in 0..self.restarts {
            if let Some(path) = self.attempt(grid, start, goal, rng) {
                if best.as_ref().map_or(true, |b| path.len() < b.len()) {
                    best = Some(path);
                }
            }
        }
        match best {
            Some(path) => {
                let path = Path::new(path);
                debug!(
                    "Hill climbing reached {} in {} steps",
                    goal,
                    path.steps()
                );
                match path.weighted_cost(grid) {
                    Some(cost) => SearchOutcome::Found(Solution {
                        path,
                        cost,
                        nodes_expanded: None,
                    }),
                    None => SearchOutcome::NoPath {
                        nodes_expanded: None,
                    },
                }
            }
            None => {
                debug!(
                    "Hill climbing: all {} attempts from {} stalled",
                    self.restarts, start
                );
                SearchOutcome::NoPath {
                    nodes_expanded: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn open_grid_walks_straight_in() {
        let grid = GridModel::uniform(5, 5, 1, Coord::new(0, 0), Coord::new(4, 4)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = HillClimbingSolver::default().solve(&grid, &mut rng);
        let path = outcome.path().unwrap();
        assert_eq!(path.len(), 9);
        assert!(path.is_contiguous());
        assert_eq!(outcome.cost(), Some(8));
        assert_eq!(outcome.nodes_expanded(), None);
    }

    /// The goal is reachable only by first moving away from it; greedy descent runs into the
    /// dead end on every attempt.
    #[test]
    fn stalls_in_local_optimum() {
        // |.#####|
        // |.S..#G|
        // |.####.|
        // |......|
        let grid: GridModel = "4 6 1 1 1 5\n.#####\n.S..#G\n.####.\n......\n"
            .parse()
            .unwrap();
        assert!(grid.reachable(&grid.start(), &grid.goal()));
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = HillClimbingSolver::default().solve(&grid, &mut rng);
        assert_eq!(
            outcome,
            SearchOutcome::NoPath {
                nodes_expanded: None
            }
        );
    }

    #[test]
    fn attempts_never_revisit() {
        // |S.#..|
        // |..#..|
        // |.....|
        // |..#.G|
        let grid: GridModel = "4 5 0 0 3 4\nS.#..\n..#..\n.....\n..#.G\n".parse().unwrap();
        let solver = HillClimbingSolver::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            if let Some(trace) = solver.attempt(&grid, grid.start(), grid.goal(), &mut rng) {
                let unique = trace.iter().collect::<FxHashSet<_>>();
                assert_eq!(unique.len(), trace.len());
                assert!(Path::new(trace).is_contiguous());
            }
        }
    }

    #[test]
    fn same_seed_same_path() {
        let grid = GridModel::uniform(6, 6, 1, Coord::new(0, 0), Coord::new(5, 5)).unwrap();
        let solver = HillClimbingSolver::default();
        let a = solver.solve(&grid, &mut StdRng::seed_from_u64(11));
        let b = solver.solve(&grid, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
