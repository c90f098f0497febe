//! Grid module - the match board
//!
//! The grid is a `rows x cols` board of candy cells stored as a flat, row-major
//! vector. Row 0 is the top of the board; gravity pulls cells towards the
//! highest row index. Cell ids are issued by the grid itself and never reused,
//! so a renderer can key animations on them.

use crate::rng::SymbolSource;
use crate::types::{Position, Special, Symbol, MIN_MATCH_LEN};

/// A single candy on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Unique token for animation keying; not logically significant
    pub id: u32,
    pub symbol: Symbol,
    pub row: usize,
    pub col: usize,
    /// Set only in the "cleared" beat of a cascade step
    pub matched: bool,
    /// Spawned by the latest refill
    pub is_new: bool,
    pub special: Option<Special>,
}

impl Cell {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Row-major (row * cols + col)
    cells: Vec<Cell>,
    next_id: u32,
}

impl Grid {
    /// Generate a board with no run of three identical symbols.
    ///
    /// Cells are filled row-major; each candidate is redrawn while it would
    /// complete a run with the two cells to its left or the two cells above.
    /// A source that keeps offering illegal symbols falls back to the first
    /// legal palette symbol, so generation always terminates for palettes of
    /// three or more symbols.
    pub fn generate<S: SymbolSource + ?Sized>(
        rows: usize,
        cols: usize,
        palette: &[Symbol],
        source: &mut S,
    ) -> Self {
        debug_assert!(!palette.is_empty());
        let mut grid = Self {
            rows,
            cols,
            cells: Vec::with_capacity(rows * cols),
            next_id: 0,
        };
        let max_draws = palette.len() * 8;

        for row in 0..rows {
            for col in 0..cols {
                let mut symbol = source.next_symbol(palette);
                let mut draws = 1;
                while grid.completes_run(row, col, symbol) {
                    if draws >= max_draws {
                        symbol = palette
                            .iter()
                            .copied()
                            .find(|s| !grid.completes_run(row, col, *s))
                            .unwrap_or(symbol);
                        break;
                    }
                    symbol = source.next_symbol(palette);
                    draws += 1;
                }
                let cell = grid.spawn(row, col, symbol, false);
                grid.cells.push(cell);
            }
        }
        grid
    }

    /// Build a board from letter rows, e.g. `["CLH", "KAD"]`.
    ///
    /// Returns `None` for an empty layout, ragged rows or unknown letters.
    /// Matches are allowed; this is how tests set up scenarios.
    pub fn from_rows(layout: &[&str]) -> Option<Self> {
        let rows = layout.len();
        let cols = layout.first()?.chars().count();
        if cols == 0 {
            return None;
        }
        let mut grid = Self {
            rows,
            cols,
            cells: Vec::with_capacity(rows * cols),
            next_id: 0,
        };
        for (row, line) in layout.iter().enumerate() {
            if line.chars().count() != cols {
                return None;
            }
            for (col, ch) in line.chars().enumerate() {
                let symbol = Symbol::from_letter(ch)?;
                let cell = grid.spawn(row, col, symbol, false);
                grid.cells.push(cell);
            }
        }
        Some(grid)
    }

    /// Would placing `symbol` at (row, col) complete a run with the cells
    /// already placed to its left or above?
    fn completes_run(&self, row: usize, col: usize, symbol: Symbol) -> bool {
        let need = MIN_MATCH_LEN - 1;
        let left = col >= need
            && (1..=need).all(|d| self.placed_symbol(row, col - d) == Some(symbol));
        let up = row >= need
            && (1..=need).all(|d| self.placed_symbol(row - d, col) == Some(symbol));
        left || up
    }

    /// Symbol lookup that tolerates a partially generated grid
    fn placed_symbol(&self, row: usize, col: usize) -> Option<Symbol> {
        self.cells.get(row * self.cols + col).map(|c| c.symbol)
    }

    /// Create a fresh cell with a new id (not yet placed)
    pub(crate) fn spawn(&mut self, row: usize, col: usize, symbol: Symbol, is_new: bool) -> Cell {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        Cell {
            id,
            symbol,
            row,
            col,
            matched: false,
            is_new,
            special: None,
        }
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        Some(pos.row * self.cols + pos.col)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at position, `None` if out of bounds
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub(crate) fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        match self.index(pos) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    /// Symbol at (row, col), `None` if out of bounds
    #[inline]
    pub fn symbol_at(&self, row: usize, col: usize) -> Option<Symbol> {
        self.get(Position::new(row, col)).map(|c| c.symbol)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of one row, left to right
    pub fn row_cells(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Swap two cells and rewrite their coordinates.
    /// Returns false if either position is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        self.cells[ia].row = a.row;
        self.cells[ia].col = a.col;
        self.cells[ib].row = b.row;
        self.cells[ib].col = b.col;
        true
    }

    /// Tag a cell as a special piece. Returns false if out of bounds.
    pub fn set_special(&mut self, pos: Position, special: Option<Special>) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                cell.special = special;
                true
            }
            None => false,
        }
    }

    /// Positions holding a special piece
    pub fn specials(&self) -> impl Iterator<Item = (Position, Special)> + '_ {
        self.cells
            .iter()
            .filter_map(|c| c.special.map(|s| (c.position(), s)))
    }

    /// Reset the per-step animation flags
    pub(crate) fn clear_transient(&mut self) {
        for cell in &mut self.cells {
            cell.matched = false;
            cell.is_new = false;
        }
    }

    /// Replace a whole column (top to bottom), rewriting coordinates
    pub(crate) fn write_column(&mut self, col: usize, column: &[Cell]) {
        debug_assert_eq!(column.len(), self.rows);
        for (row, cell) in column.iter().enumerate() {
            let idx = row * self.cols + col;
            self.cells[idx] = Cell { row, col, ..*cell };
        }
    }

    /// Letter dump, one string per row (see [`Symbol::letter`])
    pub fn to_letters(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| self.row_cells(row).iter().map(|c| c.symbol.letter()).collect())
            .collect()
    }
}
