use crate::coord::Coord;
use crate::grid_model::GridModel;
use itertools::Itertools;
use std::ops::Deref;

/// An ordered walk over the grid, first element the search start and last the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path(Vec<Coord>);

impl Path {
    pub fn new(cells: Vec<Coord>) -> Path {
        Path(cells)
    }

    pub fn start(&self) -> Option<Coord> {
        self.0.first().copied()
    }

    pub fn goal(&self) -> Option<Coord> {
        self.0.last().copied()
    }

    /// Number of moves, one less than the number of cells.
    pub fn steps(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Every consecutive pair differs by one unit along exactly one axis.
    pub fn is_contiguous(&self) -> bool {
        self.0.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
    }

    /// Sum of the costs of every entered cell; the start cell is not counted. [None] if the
    /// path enters a blocked cell or the total does not fit a `u32`.
    pub fn weighted_cost(&self, grid: &GridModel) -> Option<u32> {
        self.0
            .iter()
            .skip(1)
            .try_fold(0u32, |total, c| total.checked_add(grid.cost(c).finite()?))
    }

    pub fn into_inner(self) -> Vec<Coord> {
        self.0
    }
}

impl Deref for Path {
    type Target = [Coord];

    fn deref(&self) -> &[Coord] {
        &self.0
    }
}

impl From<Vec<Coord>> for Path {
    fn from(cells: Vec<Coord>) -> Path {
        Path(cells)
    }
}

impl IntoIterator for Path {
    type Item = Coord;
    type IntoIter = std::vec::IntoIter<Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguity() {
        let path: Path = vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 1)].into();
        assert!(path.is_contiguous());
        assert_eq!(path.steps(), 2);
        let jump: Path = vec![Coord::new(0, 0), Coord::new(1, 1)].into();
        assert!(!jump.is_contiguous());
        let stay: Path = vec![Coord::new(0, 0), Coord::new(0, 0)].into();
        assert!(!stay.is_contiguous());
    }

    #[test]
    fn cost_skips_start() {
        let grid: GridModel = "1 3 0 0 0 2\n934\n".parse().unwrap();
        let path: Path = vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)].into();
        assert_eq!(path.weighted_cost(&grid), Some(7));
        let single: Path = vec![Coord::new(0, 0)].into();
        assert_eq!(single.weighted_cost(&grid), Some(0));
    }
}
