use core::fmt;

/// A cell address on the grid as `(row, col)`. Coordinates are signed so that neighbours of
/// border cells can be formed and then rejected by bounds checks instead of wrapping around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Coord {
        Coord { row, col }
    }

    pub fn manhattan_distance(&self, other: &Coord) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// The four axis-aligned neighbours in the order down, up, right, left. Bounds are not
    /// checked here.
    pub fn neumann_neighborhood(&self) -> [Coord; 4] {
        [
            Coord::new(self.row + 1, self.col),
            Coord::new(self.row - 1, self.col),
            Coord::new(self.row, self.col + 1),
            Coord::new(self.row, self.col - 1),
        ]
    }

    /// True if `other` differs by exactly one unit along exactly one axis.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Coord {
        Coord::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_are_adjacent() {
        let c = Coord::new(2, 3);
        for n in c.neumann_neighborhood() {
            assert!(c.is_adjacent(&n));
        }
        assert!(!c.is_adjacent(&Coord::new(3, 4)));
        assert!(!c.is_adjacent(&c));
    }

    #[test]
    fn manhattan() {
        assert_eq!(Coord::new(0, 0).manhattan_distance(&Coord::new(4, 4)), 8);
        assert_eq!(Coord::new(-1, 2).manhattan_distance(&Coord::new(1, 0)), 4);
    }
}
