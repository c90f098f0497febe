//! Match detection
//!
//! A match is a maximal run of three or more identical symbols in one row or
//! one column. Rows are scanned first, then columns. A cell at a T/L/+
//! intersection belongs to both of its matches and is credited by each.

use crate::grid::Grid;
use crate::types::{Orientation, Position, MIN_MATCH_LEN};

/// One maximal run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub start: Position,
    pub length: usize,
    pub orientation: Orientation,
}

impl Match {
    /// Position of the `i`-th cell of the run
    fn at(&self, i: usize) -> Position {
        match self.orientation {
            Orientation::Horizontal => Position::new(self.start.row, self.start.col + i),
            Orientation::Vertical => Position::new(self.start.row + i, self.start.col),
        }
    }

    /// Every position covered by the run, in scan order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.length).map(move |i| self.at(i))
    }

    /// Cell that receives the special tag for long runs
    pub fn middle(&self) -> Position {
        self.at(self.length / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }
}

/// Find all matches on the board. Pure; the grid is not touched.
pub fn detect(grid: &Grid) -> Vec<Match> {
    let mut matches = Vec::new();
    let (rows, cols) = (grid.rows(), grid.cols());

    for row in 0..rows {
        let mut col = 0;
        while col + MIN_MATCH_LEN <= cols {
            let symbol = grid.symbol_at(row, col);
            let mut len = 1;
            while col + len < cols && grid.symbol_at(row, col + len) == symbol {
                len += 1;
            }
            if len >= MIN_MATCH_LEN {
                matches.push(Match {
                    start: Position::new(row, col),
                    length: len,
                    orientation: Orientation::Horizontal,
                });
                col += len;
            } else {
                col += 1;
            }
        }
    }

    for col in 0..cols {
        let mut row = 0;
        while row + MIN_MATCH_LEN <= rows {
            let symbol = grid.symbol_at(row, col);
            let mut len = 1;
            while row + len < rows && grid.symbol_at(row + len, col) == symbol {
                len += 1;
            }
            if len >= MIN_MATCH_LEN {
                matches.push(Match {
                    start: Position::new(row, col),
                    length: len,
                    orientation: Orientation::Vertical,
                });
                row += len;
            } else {
                row += 1;
            }
        }
    }

    matches
}

/// Cheaper check used by the move validator: is there at least one match?
pub fn has_match(grid: &Grid) -> bool {
    let (rows, cols) = (grid.rows(), grid.cols());
    let run_at = |r0: usize, c0: usize, dr: usize, dc: usize| {
        let s = grid.symbol_at(r0, c0);
        (1..MIN_MATCH_LEN).all(|i| grid.symbol_at(r0 + i * dr, c0 + i * dc) == s)
    };
    for row in 0..rows {
        for col in 0..cols {
            if col + MIN_MATCH_LEN <= cols && run_at(row, col, 0, 1) {
                return true;
            }
            if row + MIN_MATCH_LEN <= rows && run_at(row, col, 1, 0) {
                return true;
            }
        }
    }
    false
}
