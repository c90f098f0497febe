//! Board cursor and two-step swap selection.
//!
//! The player moves a cursor, picks a cell, moves to a neighbour and picks
//! again. The second pick produces the swap pair; whether the swap is legal
//! is the game's decision, not the selector's.

use crate::types::{BoardAction, Direction, Position};

/// Cursor plus an optional picked cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    rows: usize,
    cols: usize,
    cursor: Position,
    picked: Option<Position>,
}

impl Selection {
    /// Cursor starts at the top-left cell
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cursor: Position::new(0, 0),
            picked: None,
        }
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn picked(&self) -> Option<Position> {
        self.picked
    }

    /// Fit a new board size, keeping the cursor in bounds
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.cursor = Position::new(
            self.cursor.row.min(rows.saturating_sub(1)),
            self.cursor.col.min(cols.saturating_sub(1)),
        );
        self.picked = None;
    }

    pub fn clear(&mut self) {
        self.picked = None;
    }

    /// Move the cursor, stopping at the board edges
    pub fn move_cursor(&mut self, dir: Direction) {
        if let Some(next) = self.cursor.step(dir) {
            if next.row < self.rows && next.col < self.cols {
                self.cursor = next;
            }
        }
    }

    /// Feed one action. Returns a swap pair once two neighbours are picked.
    ///
    /// Picking a non-adjacent cell moves the pick there; picking the same cell
    /// again drops it.
    pub fn apply(&mut self, action: BoardAction) -> Option<(Position, Position)> {
        match action {
            BoardAction::Move(dir) => self.move_cursor(dir),
            BoardAction::Select => match self.picked {
                None => self.picked = Some(self.cursor),
                Some(p) if p == self.cursor => self.picked = None,
                Some(p) if p.is_adjacent(self.cursor) => {
                    self.picked = None;
                    return Some((p, self.cursor));
                }
                Some(_) => self.picked = Some(self.cursor),
            },
            BoardAction::Cancel => self.picked = None,
            BoardAction::Restart | BoardAction::NextLevel => {}
        }
        None
    }
}
