//! Executes a plan one time step at a time against the transient obstacle table and replans
//! whenever the next cell turns out to be blocked at the current time.
//!
//! The agent moves through `Planning -> Moving <-> Replanning -> Delivered | Failed`. Time
//! advances by one for every executed move and for every replanning event. Replanning starts
//! from the blocked cell itself, so a blocked cell is retried one time step later; the number of
//! consecutive replans and the total number of time steps are both bounded.
use crate::config::{AgentConfig, EngineConfig};
use crate::coord::Coord;
use crate::error::UnknownStrategy;
use crate::grid_model::GridModel;
use crate::path::Path;
use crate::solver::{GridSolver, Strategy};
use core::fmt;
use log::{debug, info, warn};
use rand::RngCore;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The strategy found no route from the start.
    NoInitialPlan,
    /// The strategy found no route from a cell that was blocked on arrival.
    NoPlanFromConflict,
    /// Too many replans in a row without a move in between.
    ReplanLimit,
    /// The time step budget ran out.
    StepBudgetExhausted,
    /// The plan ran out somewhere other than the goal.
    Stranded,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            FailureReason::NoInitialPlan => "no path from start",
            FailureReason::NoPlanFromConflict => "no path from blocked cell",
            FailureReason::ReplanLimit => "consecutive replan limit reached",
            FailureReason::StepBudgetExhausted => "step budget exhausted",
            FailureReason::Stranded => "plan ended away from goal",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentState {
    Planning,
    Moving,
    Replanning,
    Delivered,
    Failed(FailureReason),
}

impl AgentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Delivered | AgentState::Failed(_))
    }
}

/// Reported to an [EventSink] as the agent runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentEvent {
    Moved { time: usize, to: Coord },
    ReplanTriggered { time: usize, blocked: Coord },
    Delivered { time: usize },
    Failed { time: usize, reason: FailureReason },
}

impl fmt::Display for AgentEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AgentEvent::Moved { time, to } => write!(f, "[t={time}] Moving to {to}"),
            AgentEvent::ReplanTriggered { time, blocked } => {
                write!(f, "[t={time}] Obstacle detected at {blocked}, replanning")
            }
            AgentEvent::Delivered { time } => write!(f, "[t={time}] Package delivered"),
            AgentEvent::Failed { time, reason } => {
                write!(f, "[t={time}] Delivery failed: {reason}")
            }
        }
    }
}

/// Receives every [AgentEvent] in order.
pub trait EventSink {
    fn on_event(&mut self, event: &AgentEvent);
}

/// Records events for later inspection.
impl EventSink for Vec<AgentEvent> {
    fn on_event(&mut self, event: &AgentEvent) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_event(&mut self, event: &AgentEvent) {
        (**self).on_event(event)
    }
}

/// Forwards events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &AgentEvent) {
        match event {
            AgentEvent::Moved { .. } => debug!("{}", event),
            AgentEvent::ReplanTriggered { .. } | AgentEvent::Failed { .. } => warn!("{}", event),
            AgentEvent::Delivered { .. } => info!("{}", event),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(FailureReason),
}

/// Summary of a finished delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcome: DeliveryOutcome,
    /// Elapsed time steps, counting replanning events.
    pub steps: usize,
    pub replans: usize,
    /// Every position occupied, start first.
    pub trace: Vec<Coord>,
    pub initial_plan: Option<Path>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        self.outcome == DeliveryOutcome::Delivered
    }
}

pub struct Agent<'g, R, S> {
    grid: &'g GridModel,
    solver: Box<dyn GridSolver>,
    config: AgentConfig,
    goal: Coord,
    position: Coord,
    time: usize,
    remaining: VecDeque<Coord>,
    state: AgentState,
    consecutive_replans: usize,
    replans: usize,
    trace: Vec<Coord>,
    initial_plan: Option<Path>,
    rng: R,
    sink: S,
}

impl<'g, R: RngCore, S: EventSink> Agent<'g, R, S> {
    /// An agent that will deliver from the grid's start to its goal.
    pub fn new(
        grid: &'g GridModel,
        strategy: Strategy,
        config: &EngineConfig,
        rng: R,
        sink: S,
    ) -> Agent<'g, R, S> {
        Agent::with_solver(grid, strategy.solver(config), config.agent.clone(), rng, sink)
    }

    /// Like [Agent::new] with the strategy given by name.
    pub fn from_name(
        grid: &'g GridModel,
        strategy: &str,
        config: &EngineConfig,
        rng: R,
        sink: S,
    ) -> Result<Agent<'g, R, S>, UnknownStrategy> {
        Ok(Agent::new(grid, strategy.parse()?, config, rng, sink))
    }

    pub fn with_solver(
        grid: &'g GridModel,
        solver: Box<dyn GridSolver>,
        config: AgentConfig,
        rng: R,
        sink: S,
    ) -> Agent<'g, R, S> {
        Agent {
            grid,
            solver,
            config,
            goal: grid.goal(),
            position: grid.start(),
            time: 0,
            remaining: VecDeque::new(),
            state: AgentState::Planning,
            consecutive_replans: 0,
            replans: 0,
            trace: vec![grid.start()],
            initial_plan: None,
            rng,
            sink,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn time(&self) -> usize {
        self.time
    }

    pub fn replans(&self) -> usize {
        self.replans
    }

    /// Cells still to be entered, next first.
    pub fn remaining(&self) -> &VecDeque<Coord> {
        &self.remaining
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn strategy(&self) -> Strategy {
        self.solver.strategy()
    }

    fn plan(&mut self, from: Coord) -> Option<Path> {
        self.solver
            .find_path(self.grid, from, self.goal, &mut self.rng)
            .into_path()
    }

    fn emit(&mut self, event: AgentEvent) {
        self.sink.on_event(&event);
    }

    fn fail(&mut self, reason: FailureReason) -> AgentState {
        self.state = AgentState::Failed(reason);
        let time = self.time;
        self.emit(AgentEvent::Failed { time, reason });
        self.state
    }

    fn finish_if_done(&mut self) -> AgentState {
        if !self.remaining.is_empty() {
            return self.state;
        }
        if self.position == self.goal {
            self.state = AgentState::Delivered;
            let time = self.time;
            self.emit(AgentEvent::Delivered { time });
            self.state
        } else {
            self.fail(FailureReason::Stranded)
        }
    }

    /// Advances the state machine by one transition and returns the new state. Terminal states
    /// are returned unchanged.
    pub fn step(&mut self) -> AgentState {
        match self.state {
            AgentState::Delivered | AgentState::Failed(_) => self.state,
            AgentState::Planning => self.initial_plan(),
            AgentState::Moving | AgentState::Replanning => self.advance(),
        }
    }

    fn initial_plan(&mut self) -> AgentState {
        let start = self.position;
        match self.plan(start) {
            Some(path) => {
                info!(
                    "{} planned {} steps from {} to {}",
                    self.solver.strategy(),
                    path.steps(),
                    start,
                    self.goal
                );
                self.remaining = path.iter().skip(1).copied().collect();
                self.initial_plan = Some(path);
                self.state = AgentState::Moving;
                self.finish_if_done()
            }
            None => self.fail(FailureReason::NoInitialPlan),
        }
    }

    fn advance(&mut self) -> AgentState {
        if self.time >= self.config.max_steps {
            return self.fail(FailureReason::StepBudgetExhausted);
        }
        let Some(&candidate) = self.remaining.front() else {
            return self.finish_if_done();
        };
        let time = self.time;
        if self.grid.is_valid(&candidate, time) {
            self.remaining.pop_front();
            self.position = candidate;
            self.trace.push(candidate);
            self.consecutive_replans = 0;
            self.state = AgentState::Moving;
            self.emit(AgentEvent::Moved { time, to: candidate });
        } else {
            if self.consecutive_replans >= self.config.max_consecutive_replans {
                return self.fail(FailureReason::ReplanLimit);
            }
            self.consecutive_replans += 1;
            self.replans += 1;
            self.state = AgentState::Replanning;
            self.emit(AgentEvent::ReplanTriggered {
                time,
                blocked: candidate,
            });
            match self.plan(candidate) {
                Some(path) => self.remaining = path.into_iter().collect(),
                None => return self.fail(FailureReason::NoPlanFromConflict),
            }
        }
        self.time += 1;
        self.finish_if_done()
    }

    /// Steps until a terminal state is reached.
    pub fn run(&mut self) -> DeliveryReport {
        loop {
            let state = self.step();
            if let Some(outcome) = Self::outcome(state) {
                return self.build_report(outcome);
            }
        }
    }

    fn outcome(state: AgentState) -> Option<DeliveryOutcome> {
        match state {
            AgentState::Delivered => Some(DeliveryOutcome::Delivered),
            AgentState::Failed(reason) => Some(DeliveryOutcome::Failed(reason)),
            AgentState::Planning | AgentState::Moving | AgentState::Replanning => None,
        }
    }

    /// The report of a finished attempt, [None] while still running.
    pub fn report(&self) -> Option<DeliveryReport> {
        Self::outcome(self.state).map(|outcome| self.build_report(outcome))
    }

    fn build_report(&self, outcome: DeliveryOutcome) -> DeliveryReport {
        DeliveryReport {
            outcome,
            steps: self.time,
            replans: self.replans,
            trace: self.trace.clone(),
            initial_plan: self.initial_plan.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_model::ObstacleSchedule;
    use crate::solver::astar::AstarSolver;
    use crate::solver::bfs::BfsSolver;
    use crate::solver::SearchOutcome;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_grid() -> GridModel {
        GridModel::uniform(5, 5, 1, Coord::new(0, 0), Coord::new(4, 4)).unwrap()
    }

    fn astar_plan(grid: &GridModel) -> Path {
        AstarSolver
            .solve(grid, &mut StepRng::new(0, 1))
            .into_path()
            .unwrap()
    }

    fn deliver(grid: &GridModel, strategy: Strategy, events: &mut Vec<AgentEvent>) -> DeliveryReport {
        let config = EngineConfig::default();
        let mut agent = Agent::new(grid, strategy, &config, StdRng::seed_from_u64(0), events);
        agent.run()
    }

    #[test]
    fn no_obstacles_no_replans() {
        let grid = open_grid();
        for strategy in [Strategy::Bfs, Strategy::Ucs, Strategy::AStar] {
            let mut events = Vec::new();
            let report = deliver(&grid, strategy, &mut events);
            let plan = report.initial_plan.clone().unwrap();
            assert!(report.is_delivered());
            assert_eq!(report.steps, plan.len() - 1);
            assert_eq!(report.replans, 0);
            assert_eq!(report.trace, plan.to_vec());
            assert_eq!(events.len(), plan.len());
            assert_eq!(events.last(), Some(&AgentEvent::Delivered { time: 8 }));
        }
    }

    #[test]
    fn single_conflict_triggers_one_replan() {
        let plan = astar_plan(&open_grid());
        // The agent checks plan[3] at time 2.
        let blocked = plan[3];
        let schedule: ObstacleSchedule = [(2, blocked)].into_iter().collect();
        let grid = open_grid().with_transient_obstacles(schedule);

        let mut events = Vec::new();
        let report = deliver(&grid, Strategy::AStar, &mut events);
        assert!(report.is_delivered());
        assert_eq!(report.replans, 1);
        assert_eq!(report.steps, plan.len());
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, AgentEvent::ReplanTriggered { .. }))
                .collect::<Vec<_>>(),
            vec![&AgentEvent::ReplanTriggered { time: 2, blocked }]
        );
        assert!(Path::new(report.trace.clone()).is_contiguous());
        assert_eq!(report.trace.last(), Some(&grid.goal()));
    }

    #[test]
    fn persistent_blockage_hits_replan_limit() {
        // A corridor leaves no way around the blocked cell.
        let grid: GridModel = "1 5 0 0 0 4\nS...G\n".parse().unwrap();
        let mut schedule = ObstacleSchedule::new();
        schedule.insert_span(1..100, Coord::new(0, 2));
        let grid = grid.with_transient_obstacles(schedule);

        let mut events = Vec::new();
        let report = deliver(&grid, Strategy::Bfs, &mut events);
        let limit = AgentConfig::default().max_consecutive_replans;
        assert_eq!(report.outcome, DeliveryOutcome::Failed(FailureReason::ReplanLimit));
        assert_eq!(report.replans, limit);
        assert_eq!(report.trace, vec![Coord::new(0, 0), Coord::new(0, 1)]);
        assert!(matches!(
            events.last(),
            Some(AgentEvent::Failed {
                reason: FailureReason::ReplanLimit,
                ..
            })
        ));
    }

    /// Plans from the grid's start only; every other origin has no route.
    struct StartOnly;

    impl GridSolver for StartOnly {
        fn strategy(&self) -> Strategy {
            Strategy::Bfs
        }

        fn find_path(
            &self,
            grid: &GridModel,
            start: Coord,
            goal: Coord,
            rng: &mut dyn RngCore,
        ) -> SearchOutcome {
            if start == grid.start() {
                BfsSolver.find_path(grid, start, goal, rng)
            } else {
                SearchOutcome::NoPath {
                    nodes_expanded: Some(0),
                }
            }
        }
    }

    #[test]
    fn failed_replan_ends_delivery() {
        let grid: GridModel = "1 5 0 0 0 4\nS...G\n".parse().unwrap();
        let blocked = Coord::new(0, 2);
        let schedule: ObstacleSchedule = [(1, blocked)].into_iter().collect();
        let grid = grid.with_transient_obstacles(schedule);

        let mut events = Vec::new();
        let mut agent = Agent::with_solver(
            &grid,
            Box::new(StartOnly),
            AgentConfig::default(),
            StepRng::new(0, 1),
            &mut events,
        );
        let report = agent.run();
        assert_eq!(
            report.outcome,
            DeliveryOutcome::Failed(FailureReason::NoPlanFromConflict)
        );
        assert_eq!(report.replans, 1);
        assert_eq!(report.trace, vec![Coord::new(0, 0), Coord::new(0, 1)]);
        assert_eq!(
            events,
            vec![
                AgentEvent::Moved {
                    time: 0,
                    to: Coord::new(0, 1)
                },
                AgentEvent::ReplanTriggered { time: 1, blocked },
                AgentEvent::Failed {
                    time: 1,
                    reason: FailureReason::NoPlanFromConflict
                },
            ]
        );
    }

    #[test]
    fn blockage_that_clears_is_waited_out() {
        let grid: GridModel = "1 5 0 0 0 4\nS...G\n".parse().unwrap();
        let mut schedule = ObstacleSchedule::new();
        schedule.insert_span(1..4, Coord::new(0, 2));
        let grid = grid.with_transient_obstacles(schedule);

        let report = deliver(&grid, Strategy::Bfs, &mut Vec::new());
        assert!(report.is_delivered());
        assert_eq!(report.replans, 3);
        assert_eq!(report.steps, 4 + 3);
    }

    #[test]
    fn unreachable_goal_fails_immediately() {
        let grid: GridModel = "3 3 0 0 2 2\nS..\n###\n..G\n".parse().unwrap();
        for strategy in Strategy::ALL {
            let mut events = Vec::new();
            let report = deliver(&grid, strategy, &mut events);
            assert_eq!(report.outcome, DeliveryOutcome::Failed(FailureReason::NoInitialPlan));
            assert_eq!(report.steps, 0);
            assert_eq!(
                events,
                vec![AgentEvent::Failed {
                    time: 0,
                    reason: FailureReason::NoInitialPlan
                }]
            );
        }
    }

    #[test]
    fn step_budget_is_enforced() {
        let grid = open_grid();
        let config = EngineConfig {
            agent: AgentConfig {
                max_steps: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut agent = Agent::new(&grid, Strategy::Bfs, &config, StepRng::new(0, 1), LogSink);
        let report = agent.run();
        assert_eq!(
            report.outcome,
            DeliveryOutcome::Failed(FailureReason::StepBudgetExhausted)
        );
        assert_eq!(report.steps, 3);
    }

    #[test]
    fn already_at_goal() {
        let grid = GridModel::uniform(2, 2, 1, Coord::new(1, 1), Coord::new(1, 1)).unwrap();
        let report = deliver(&grid, Strategy::Ucs, &mut Vec::new());
        assert!(report.is_delivered());
        assert_eq!(report.steps, 0);
    }

    #[test]
    fn stepwise_states() {
        let grid: GridModel = "1 3 0 0 0 2\nS.G\n".parse().unwrap();
        let config = EngineConfig::default();
        let mut agent = Agent::new(&grid, Strategy::AStar, &config, StepRng::new(0, 1), LogSink);
        assert_eq!(agent.state(), AgentState::Planning);
        assert_eq!(agent.report(), None);
        assert_eq!(agent.step(), AgentState::Moving);
        assert_eq!(agent.remaining().len(), 2);
        assert_eq!(agent.step(), AgentState::Moving);
        assert_eq!(agent.position(), Coord::new(0, 1));
        assert_eq!(agent.step(), AgentState::Delivered);
        assert_eq!(agent.time(), 2);
        assert_eq!(agent.report().map(|r| r.trace.len()), Some(3));
        assert_eq!(agent.step(), AgentState::Delivered);
    }

    #[test]
    fn local_strategy_delivers() {
        let grid = open_grid();
        let report = deliver(&grid, Strategy::HillClimbing, &mut Vec::new());
        assert!(report.is_delivered());
        assert_eq!(report.steps, 8);
    }

    #[test]
    fn unknown_strategy_name() {
        let grid = open_grid();
        let config = EngineConfig::default();
        let agent = Agent::from_name(&grid, "teleport", &config, StepRng::new(0, 1), LogSink);
        assert_eq!(agent.err(), Some(UnknownStrategy("teleport".to_owned())));
        let agent = Agent::from_name(&grid, "a_star", &config, StepRng::new(0, 1), LogSink);
        assert_eq!(agent.map(|a| a.strategy()).ok(), Some(Strategy::AStar));
    }
}
