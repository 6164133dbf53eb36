//! # delivery_grid
//!
//! Route planning for a single delivery agent on a 4-connected weighted grid with permanent
//! obstacles and obstacles that only appear at given time steps. Provides
//! [breadth-first search](solver::bfs), [uniform-cost search](solver::ucs),
//! [A*](solver::astar) with the Manhattan heuristic, and two local strategies,
//! [hill climbing](solver::hill_climbing) with restarts and
//! [simulated annealing](solver::annealing). An [Agent](agent::Agent) executes a plan one time
//! step at a time and replans when its next cell is blocked.
//!
//! Planning sees permanent obstacles and those present at time 0; later transient obstacles
//! are discovered while executing.
//! Randomized strategies draw from an injected [rand::RngCore], so seeded runs are
//! reproducible.
//!
//! ```
//! use delivery_grid::{GridModel, GridSolver, Strategy, EngineConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let grid: GridModel = "3 3 0 0 2 2\nS..\n.#.\n..G\n".parse().unwrap();
//! let solver = Strategy::AStar.solver(&EngineConfig::default());
//! let outcome = solver.solve(&grid, &mut StdRng::seed_from_u64(0));
//! assert_eq!(outcome.cost(), Some(4));
//! ```
pub mod agent;
pub mod config;
pub mod coord;
pub mod error;
pub mod grid_model;
mod loader;
pub mod path;
pub mod run;
mod search;
pub mod solver;

pub use agent::{Agent, AgentEvent, AgentState, DeliveryOutcome, DeliveryReport, EventSink};
pub use config::EngineConfig;
pub use coord::Coord;
pub use error::{ConfigError, GridError, UnknownStrategy};
pub use grid_model::{Cost, GridModel, ObstacleSchedule};
pub use path::Path;
pub use run::RunRecord;
pub use solver::{GridSolver, SearchOutcome, Solution, Strategy};
