//! Grid coordinates
//!
//! Cells are addressed as `(row, col)`, i.e. `(y_coordinate, x_coordinate)`.
//! The `"row-col"` text form is kept for DOM attributes and legacy keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A cell position inside a garden grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether this coordinate lies inside a `size_x` by `size_y` grid
    pub const fn within(&self, size_x: usize, size_y: usize) -> bool {
        self.row < size_y && self.col < size_x
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cell key `{0}`, expected `row-col`")]
pub struct CoordParseError(pub String);

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once('-')
            .ok_or_else(|| CoordParseError(s.to_string()))?;
        let row = row.trim().parse().map_err(|_| CoordParseError(s.to_string()))?;
        let col = col.trim().parse().map_err(|_| CoordParseError(s.to_string()))?;
        Ok(Self { row, col })
    }
}
