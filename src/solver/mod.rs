use crate::config::EngineConfig;
use crate::coord::Coord;
use crate::error::UnknownStrategy;
use crate::grid_model::GridModel;
use crate::path::Path;
use core::fmt;
use rand::RngCore;
use std::str::FromStr;

pub mod annealing;
pub mod astar;
pub mod bfs;
pub mod hill_climbing;
pub mod ucs;

use annealing::AnnealingSolver;
use astar::AstarSolver;
use bfs::BfsSolver;
use hill_climbing::HillClimbingSolver;
use ucs::UcsSolver;

/// A successful search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub path: Path,
    /// Step count for BFS, summed entry costs for every other strategy.
    pub cost: u32,
    /// [None] for strategies that do not expand a frontier.
    pub nodes_expanded: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Solution),
    NoPath { nodes_expanded: Option<usize> },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(s) => Some(&s.path),
            SearchOutcome::NoPath { .. } => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(s) => Some(s.path),
            SearchOutcome::NoPath { .. } => None,
        }
    }

    pub fn cost(&self) -> Option<u32> {
        match self {
            SearchOutcome::Found(s) => Some(s.cost),
            SearchOutcome::NoPath { .. } => None,
        }
    }

    pub fn nodes_expanded(&self) -> Option<usize> {
        match self {
            SearchOutcome::Found(s) => s.nodes_expanded,
            SearchOutcome::NoPath { nodes_expanded } => *nodes_expanded,
        }
    }
}

/// A route finding strategy over a [GridModel]. Planning only considers static validity;
/// transient obstacles are left to the executing agent.
///
/// The random source is only drawn from by the local search strategies, which makes every
/// strategy reproducible given a seeded generator.
pub trait GridSolver {
    fn strategy(&self) -> Strategy;

    fn find_path(
        &self,
        grid: &GridModel,
        start: Coord,
        goal: Coord,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome;

    /// Plans between the grid's own start and goal.
    fn solve(&self, grid: &GridModel, rng: &mut dyn RngCore) -> SearchOutcome {
        self.find_path(grid, grid.start(), grid.goal(), rng)
    }
}

/// Selects one of the five strategies by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Bfs,
    Ucs,
    AStar,
    HillClimbing,
    SimulatedAnnealing,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Bfs,
        Strategy::Ucs,
        Strategy::AStar,
        Strategy::HillClimbing,
        Strategy::SimulatedAnnealing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Bfs => "bfs",
            Strategy::Ucs => "ucs",
            Strategy::AStar => "a_star",
            Strategy::HillClimbing => "hill_climbing",
            Strategy::SimulatedAnnealing => "simulated_annealing",
        }
    }

    /// Local strategies are incomplete and report no expansion count.
    pub fn is_local(&self) -> bool {
        matches!(self, Strategy::HillClimbing | Strategy::SimulatedAnnealing)
    }

    pub fn solver(&self, config: &EngineConfig) -> Box<dyn GridSolver> {
        match self {
            Strategy::Bfs => Box::new(BfsSolver),
            Strategy::Ucs => Box::new(UcsSolver),
            Strategy::AStar => Box::new(AstarSolver),
            Strategy::HillClimbing => Box::new(HillClimbingSolver::new(&config.hill_climbing)),
            Strategy::SimulatedAnnealing => Box::new(AnnealingSolver::new(&config.annealing)),
        }
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Strategy, UnknownStrategy> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_owned()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Manhattan distance, the heuristic shared by A* and both local strategies.
pub fn heuristic(a: &Coord, b: &Coord) -> u32 {
    a.manhattan_distance(b) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
            assert_eq!(strategy.solver(&EngineConfig::default()).strategy(), strategy);
        }
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        assert_eq!(
            "dijkstra".parse::<Strategy>(),
            Err(UnknownStrategy("dijkstra".to_owned()))
        );
        assert!("A_STAR".parse::<Strategy>().is_err());
    }
}
