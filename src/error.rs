use crate::coord::Coord;
use thiserror::Error;

/// Failure to build a [GridModel](crate::grid_model::GridModel). A grid is either fully loaded
/// or not produced at all.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("could not read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("map is missing its dimension line")]
    MissingHeader,

    #[error("malformed dimension line {line:?}: expected six integers")]
    MalformedHeader { line: String },

    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("expected {expected} grid rows, found {found}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("row {row} has length {found}, expected {expected}")]
    WrongRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} cell costs, found {found}")]
    CellCountMismatch { expected: usize, found: usize },

    #[error("{which} {coord} lies outside the grid")]
    EndpointOutOfBounds { which: Endpoint, coord: Coord },

    #[error("{which} {coord} is a permanent obstacle")]
    EndpointBlocked { which: Endpoint, coord: Coord },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl core::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::Goal => f.write_str("goal"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Raised when a strategy is selected by a name no solver answers to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown strategy {0:?}, expected one of bfs, ucs, a_star, hill_climbing, simulated_annealing")]
pub struct UnknownStrategy(pub String);
