//! One-shot runs producing the record that result logging and plotting consume.
use crate::agent::{Agent, DeliveryOutcome, EventSink};
use crate::config::EngineConfig;
use crate::grid_model::GridModel;
use crate::path::Path;
use crate::solver::{SearchOutcome, Strategy};
use core::fmt;
use log::info;
use rand::RngCore;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Result of a single run. Values that do not apply to the run are [None], never a numeric
/// stand-in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunRecord {
    pub algorithm: String,
    pub map: String,
    /// Cells on the path for static runs, elapsed time steps for dynamic runs; [None] on failure.
    pub path_length: Option<usize>,
    pub cost: Option<u32>,
    pub nodes_expanded: Option<usize>,
    pub runtime: Duration,
    /// Set for dynamic runs only.
    pub delivered: Option<bool>,
    #[serde(skip)]
    pub path: Option<Path>,
}

fn or_na<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| "NA".to_owned(), |v| v.to_string())
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} on {}: path length {}, cost {}, nodes expanded {}, runtime {:.6}s",
            self.algorithm,
            self.map,
            or_na(&self.path_length),
            or_na(&self.cost),
            or_na(&self.nodes_expanded),
            self.runtime.as_secs_f64()
        )?;
        if let Some(delivered) = self.delivered {
            write!(f, ", delivered {delivered}")?;
        }
        Ok(())
    }
}

/// Plans once from the grid's start to its goal with `strategy`.
pub fn run_static(
    grid: &GridModel,
    map: &str,
    strategy: Strategy,
    config: &EngineConfig,
    rng: &mut dyn RngCore,
) -> RunRecord {
    let solver = strategy.solver(config);
    let before = Instant::now();
    let outcome = solver.solve(grid, rng);
    let runtime = before.elapsed();
    let record = RunRecord {
        algorithm: strategy.name().to_owned(),
        map: map.to_owned(),
        path_length: outcome.path().map(|p| p.len()),
        cost: outcome.cost(),
        nodes_expanded: outcome.nodes_expanded(),
        runtime,
        delivered: None,
        path: match outcome {
            SearchOutcome::Found(solution) => Some(solution.path),
            SearchOutcome::NoPath { .. } => None,
        },
    };
    info!("{}", record);
    record
}

/// Drives a replanning agent to completion. Cost and expansion counts do not apply.
pub fn run_dynamic<R: RngCore, S: EventSink>(
    grid: &GridModel,
    map: &str,
    strategy: Strategy,
    config: &EngineConfig,
    rng: R,
    sink: S,
) -> RunRecord {
    let mut agent = Agent::new(grid, strategy, config, rng, sink);
    let before = Instant::now();
    let report = agent.run();
    let runtime = before.elapsed();
    let delivered = report.outcome == DeliveryOutcome::Delivered;
    let record = RunRecord {
        algorithm: strategy.name().to_owned(),
        map: map.to_owned(),
        path_length: delivered.then_some(report.steps),
        cost: None,
        nodes_expanded: None,
        runtime,
        delivered: Some(delivered),
        path: delivered.then(|| Path::new(report.trace)),
    };
    info!("{}", record);
    record
}
