use crate::coord::Coord;
use crate::error::{Endpoint, GridError};
use core::fmt;
use fxhash::{FxHashMap, FxHashSet};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Cost of entering a cell. Blocked cells carry no number, so they can never take part in
/// path cost arithmetic. Finite costs order before [Cost::Blocked].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cost {
    Finite(u32),
    Blocked,
}

impl Cost {
    pub fn finite(self) -> Option<u32> {
        match self {
            Cost::Finite(c) => Some(c),
            Cost::Blocked => None,
        }
    }

    pub fn is_blocked(self) -> bool {
        matches!(self, Cost::Blocked)
    }
}

/// Cells that are blocked only at particular time steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObstacleSchedule {
    by_time: FxHashMap<usize, FxHashSet<Coord>>,
}

impl ObstacleSchedule {
    pub fn new() -> ObstacleSchedule {
        ObstacleSchedule::default()
    }

    pub fn insert(&mut self, time: usize, coord: Coord) {
        self.by_time.entry(time).or_default().insert(coord);
    }

    /// Blocks `coord` for every time step in `times`.
    pub fn insert_span(&mut self, times: impl IntoIterator<Item = usize>, coord: Coord) {
        for t in times {
            self.insert(t, coord);
        }
    }

    pub fn is_blocked(&self, coord: &Coord, time: usize) -> bool {
        self.by_time
            .get(&time)
            .map_or(false, |cells| cells.contains(coord))
    }

    pub fn blocked_at(&self, time: usize) -> impl Iterator<Item = &Coord> {
        self.by_time.get(&time).into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.values().all(|cells| cells.is_empty())
    }
}

impl FromIterator<(usize, Coord)> for ObstacleSchedule {
    fn from_iter<I: IntoIterator<Item = (usize, Coord)>>(iter: I) -> Self {
        let mut schedule = ObstacleSchedule::new();
        for (time, coord) in iter {
            schedule.insert(time, coord);
        }
        schedule
    }
}

/// [GridModel] is the read-only terrain oracle every solver queries. It stores a row-major
/// [Cost] per cell, the start and goal of the delivery, and an [ObstacleSchedule] of transient
/// obstacles. Connected components of the static free cells are computed once using a
/// [UnionFind] so that reachability can be answered without searching.
#[derive(Clone, Debug)]
pub struct GridModel {
    rows: usize,
    cols: usize,
    costs: Vec<Cost>,
    start: Coord,
    goal: Coord,
    transient: ObstacleSchedule,
    components: UnionFind<usize>,
}

impl GridModel {
    /// Builds a grid from row-major costs. Fails if the cost count does not match the extent or
    /// if start or goal is out of bounds or permanently blocked.
    pub fn new(
        rows: usize,
        cols: usize,
        costs: Vec<Cost>,
        start: Coord,
        goal: Coord,
    ) -> Result<GridModel, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid { rows, cols });
        }
        if rows.checked_mul(cols) != Some(costs.len()) {
            return Err(GridError::CellCountMismatch {
                expected: rows.saturating_mul(cols),
                found: costs.len(),
            });
        }
        let mut grid = GridModel {
            rows,
            cols,
            costs,
            start,
            goal,
            transient: ObstacleSchedule::default(),
            components: UnionFind::new(rows * cols),
        };
        for (which, coord) in [(Endpoint::Start, start), (Endpoint::Goal, goal)] {
            if !grid.in_bounds(&coord) {
                return Err(GridError::EndpointOutOfBounds { which, coord });
            }
            if grid.cost(&coord).is_blocked() {
                return Err(GridError::EndpointBlocked { which, coord });
            }
        }
        grid.generate_components();
        Ok(grid)
    }

    /// A grid where every cell costs `cost`.
    pub fn uniform(
        rows: usize,
        cols: usize,
        cost: u32,
        start: Coord,
        goal: Coord,
    ) -> Result<GridModel, GridError> {
        GridModel::new(rows, cols, vec![Cost::Finite(cost); rows * cols], start, goal)
    }

    /// Attaches the transient obstacle table. Static components are unaffected.
    pub fn with_transient_obstacles(mut self, schedule: ObstacleSchedule) -> GridModel {
        self.transient = schedule;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    pub fn transient_obstacles(&self) -> &ObstacleSchedule {
        &self.transient
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows
            && (coord.col as usize) < self.cols
    }

    fn ix(&self, coord: &Coord) -> usize {
        coord.row as usize * self.cols + coord.col as usize
    }

    /// Static cost of entering `coord`; out-of-bounds cells are [Cost::Blocked].
    pub fn cost(&self, coord: &Coord) -> Cost {
        if self.in_bounds(coord) {
            self.costs[self.ix(coord)]
        } else {
            Cost::Blocked
        }
    }

    /// In bounds, not permanently blocked and not scheduled as a transient obstacle at `time`.
    pub fn is_valid(&self, coord: &Coord, time: usize) -> bool {
        !self.cost(coord).is_blocked() && !self.transient.is_blocked(coord, time)
    }

    /// The up-to-four adjacent cells that are valid at time 0. Planning sees the obstacles
    /// present at the start and nothing scheduled later.
    pub fn neighbors4(&self, coord: &Coord) -> SmallVec<[Coord; 4]> {
        coord
            .neumann_neighborhood()
            .into_iter()
            .filter(|n| self.is_valid(n, 0))
            .collect()
    }

    /// [GridModel::neighbors4] paired with the cost of entering each neighbour.
    pub fn neighbors4_and_cost(&self, coord: &Coord) -> SmallVec<[(Coord, u32); 4]> {
        coord
            .neumann_neighborhood()
            .into_iter()
            .filter(|n| !self.transient.is_blocked(n, 0))
            .filter_map(|n| self.cost(&n).finite().map(|c| (n, c)))
            .collect()
    }

    /// Retrieves the component id a given [Coord] belongs to.
    pub fn get_component(&self, coord: &Coord) -> Option<usize> {
        if self.cost(coord).is_blocked() {
            None
        } else {
            Some(self.components.find(self.ix(coord)))
        }
    }

    /// Checks if start and goal are on the same static component.
    pub fn reachable(&self, start: &Coord, goal: &Coord) -> bool {
        match (self.get_component(start), self.get_component(goal)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn unreachable(&self, start: &Coord, goal: &Coord) -> bool {
        !self.reachable(start, goal)
    }

    /// Links every free cell to its free lower and right neighbours.
    fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        for row in 0..self.rows as i32 {
            for col in 0..self.cols as i32 {
                let coord = Coord::new(row, col);
                if self.cost(&coord).is_blocked() {
                    continue;
                }
                let ix = self.ix(&coord);
                for n in [Coord::new(row + 1, col), Coord::new(row, col + 1)] {
                    if !self.cost(&n).is_blocked() {
                        let n_ix = self.ix(&n);
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows as i32 {
            let values = (0..self.cols as i32)
                .map(|col| match self.cost(&Coord::new(row, col)) {
                    Cost::Finite(c) => c.to_string(),
                    Cost::Blocked => "#".to_owned(),
                })
                .collect::<Vec<String>>();
            writeln!(f, "{}", values.join(" "))?;
        }
        Ok(())
    }
}
