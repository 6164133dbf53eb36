use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::cmp::Ordering;

use crate::{
    config::AnnealingConfig,
    coord::Coord,
    grid_model::GridModel,
    path::Path,
    solver::{heuristic, GridSolver, SearchOutcome, Solution, Strategy},
};

/// Simulated annealing over single moves. Each iteration proposes a uniformly random valid
/// neighbour; moves that do not lead away from the goal are always taken, others with
/// probability `exp(delta / temperature)`. Cells may be revisited. The only guarantee is that
/// a returned path ends on the goal.
#[derive(Clone, Debug)]
pub struct AnnealingSolver {
    pub config: AnnealingConfig,
}

impl AnnealingSolver {
    pub fn new(config: &AnnealingConfig) -> AnnealingSolver {
        AnnealingSolver {
            config: config.clone(),
        }
    }

    fn accept(delta: i64, temperature: f64, rng: &mut dyn RngCore) -> bool {
        match delta.cmp(&0) {
            Ordering::Greater | Ordering::Equal => true,
            Ordering::Less if temperature <= 0.0 => false,
            Ordering::Less => (delta as f64 / temperature).exp() > rng.gen::<f64>(),
        }
    }

    /// The raw walk, returned whether or not it reached the goal.
    pub fn walk(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        rng: &mut dyn RngCore,
    ) -> Vec<Coord> {
        let mut current = start;
        let mut path = vec![current];
        let mut temperature = self.config.initial_temperature;
        for _ in 0..self.config.max_iterations {
            if current == goal {
                break;
            }
            let neighbours = grid.neighbors4(&current);
            let Some(&candidate) = neighbours.choose(rng) else {
                break;
            };
            let delta = heuristic(&current, &goal) as i64 - heuristic(&candidate, &goal) as i64;
            if AnnealingSolver::accept(delta, temperature, rng) {
                current = candidate;
                path.push(current);
            }
            temperature *= self.config.cooling_rate;
        }
        path
    }
}

impl Default for AnnealingSolver {
    fn default() -> Self {
        AnnealingSolver::new(&AnnealingConfig::default())
    }
}

impl GridSolver for AnnealingSolver {
    fn strategy(&self) -> Strategy {
        Strategy::SimulatedAnnealing
    }

    fn find_path(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let path = Path::new(self.walk(grid, start, goal, rng));
        if path.goal() != Some(goal) {
            debug!(
                "Annealing ended at {:?} after {} iterations without reaching {}",
                path.goal(),
                self.config.max_iterations,
                goal
            );
            return SearchOutcome::NoPath {
                nodes_expanded: None,
            };
        }
        debug!("Annealing reached {} in {} steps", goal, path.steps());
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
}
