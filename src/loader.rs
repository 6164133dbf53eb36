//! Reads the plain-text map format.
//!
//! The first line holds `rows cols start_row start_col goal_row goal_col`. Every following
//! non-blank line is one grid row of exactly `cols` characters:
//!
//! - `S` and `G` cost 1,
//! - `#` is a permanent obstacle,
//! - a decimal digit is that cost,
//! - anything else costs 1.
use crate::coord::Coord;
use crate::error::GridError;
use crate::grid_model::{Cost, GridModel};
use log::debug;
use std::fs;
use std::path::Path;
use std::str::FromStr;

fn parse_cell(c: char) -> Cost {
    match c {
        'S' | 'G' => Cost::Finite(1),
        '#' => Cost::Blocked,
        _ => c.to_digit(10).map_or(Cost::Finite(1), Cost::Finite),
    }
}

struct Header {
    rows: usize,
    cols: usize,
    start: Coord,
    goal: Coord,
}

fn parse_header(line: &str) -> Result<Header, GridError> {
    let malformed = || GridError::MalformedHeader {
        line: line.to_owned(),
    };
    let values = line
        .split_whitespace()
        .map(|v| v.parse::<i64>().map_err(|_| malformed()))
        .collect::<Result<Vec<i64>, GridError>>()?;
    if values.len() < 6 {
        return Err(malformed());
    }
    let dim = |v: i64| usize::try_from(v).map_err(|_| malformed());
    let coord = |r: i64, c: i64| -> Result<Coord, GridError> {
        Ok(Coord::new(
            i32::try_from(r).map_err(|_| malformed())?,
            i32::try_from(c).map_err(|_| malformed())?,
        ))
    };
    let (rows, cols) = (dim(values[0])?, dim(values[1])?);
    // The cell count has to be addressable.
    rows.checked_mul(cols).ok_or_else(malformed)?;
    Ok(Header {
        rows,
        cols,
        start: coord(values[2], values[3])?,
        goal: coord(values[4], values[5])?,
    })
}

impl FromStr for GridModel {
    type Err = GridError;

    fn from_str(s: &str) -> Result<GridModel, GridError> {
        let mut lines = s.lines();
        let header = lines
            .by_ref()
            .find(|l| !l.trim().is_empty())
            .ok_or(GridError::MissingHeader)?;
        let Header {
            rows,
            cols,
            start,
            goal,
        } = parse_header(header.trim())?;

        let grid_lines = lines
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        if grid_lines.len() != rows {
            return Err(GridError::RowCountMismatch {
                expected: rows,
                found: grid_lines.len(),
            });
        }
        for (row, line) in grid_lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridError::WrongRowLength {
                    row,
                    expected: cols,
                    found,
                });
            }
        }
        let costs = grid_lines
            .iter()
            .flat_map(|line| line.chars().map(parse_cell))
            .collect::<Vec<Cost>>();
        let grid = GridModel::new(rows, cols, costs, start, goal)?;
        debug!(
            "Loaded {}x{} grid, start {} goal {}",
            rows, cols, start, goal
        );
        Ok(grid)
    }
}

impl GridModel {
    /// Reads and parses a map file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<GridModel, GridError> {
        fs::read_to_string(path)?.parse()
    }
}
