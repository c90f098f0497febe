//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the engine core, the session
//! layer and the terminal front end alike.
//!
//! # Board Coordinates
//!
//! Boards are addressed as `(row, col)`:
//!
//! - **Row 0** is the top row, gravity pulls towards the highest row index
//! - **Col 0** is the leftmost column
//! - Dimensions are fixed per [`Level`] (8x8 for the built-in catalog)
//!
//! # Gameplay Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MATCH_BASE_POINTS` | 10 | Points per matched cell before the combo multiplier |
//! | `MIN_MATCH_LEN` | 3 | Shortest run that counts as a match |
//! | `ROCKET_MATCH_LEN` | 4 | Run length that leaves a rocket behind |
//! | `BOMB_MATCH_LEN` | 5 | Run length that leaves a bomb behind |
//! | `MAX_LIVES` | 5 | Life stock cap |
//! | `LIFE_REGEN_INTERVAL_MS` | 30 min | Wall-clock time to regenerate one life |
//! | `CASCADE_STEP_PAUSE_MS` | 180 | Default presentation pause between cascade beats |
//!
//! # Examples
//!
//! ```
//! use candy_match_types::{Orientation, Special, Symbol};
//!
//! let symbol = Symbol::from_str("candy").unwrap();
//! assert_eq!(symbol, Symbol::Candy);
//! assert_eq!(Symbol::from_letter('C'), Some(Symbol::Candy));
//!
//! assert_eq!(Special::rocket(Orientation::Horizontal), Special::RocketH);
//! ```

use serde::{Deserialize, Serialize};

/// Points awarded per matched cell (before the combo multiplier)
pub const MATCH_BASE_POINTS: u32 = 10;

/// Shortest run of identical symbols that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Run length that tags the middle cell as a rocket
pub const ROCKET_MATCH_LEN: usize = 4;

/// Run length (and above) that tags the middle cell as a bomb
pub const BOMB_MATCH_LEN: usize = 5;

/// Maximum number of lives a player can hold
pub const MAX_LIVES: u32 = 5;

/// Time needed to regenerate a single life (30 minutes)
pub const LIFE_REGEN_INTERVAL_MS: u64 = 30 * 60 * 1000;

/// Score/target ratio needed for three stars
pub const THREE_STAR_RATIO: f64 = 1.5;

/// Score/target ratio needed for two stars
pub const TWO_STAR_RATIO: f64 = 1.2;

/// Default pause between the "cleared" and "settled" beats of a cascade step
pub const CASCADE_STEP_PAUSE_MS: u32 = 180;

/// Number of distinct candy kinds
pub const SYMBOL_KINDS: usize = 6;

/// Bomb blast radius (1 = the 3x3 square around the bomb)
pub const BOMB_RADIUS: usize = 1;

/// The six candy kinds
///
/// Levels pick a palette (a subset of these) to play with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Candy,
    Lollipop,
    Chocolate,
    Cookie,
    Cake,
    Donut,
}

impl Symbol {
    /// Every symbol, in palette order
    pub const ALL: [Symbol; SYMBOL_KINDS] = [
        Symbol::Candy,
        Symbol::Lollipop,
        Symbol::Chocolate,
        Symbol::Cookie,
        Symbol::Cake,
        Symbol::Donut,
    ];

    /// Parse symbol from its name or emoji (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use candy_match_types::Symbol;
    ///
    /// assert_eq!(Symbol::from_str("Cookie"), Some(Symbol::Cookie));
    /// assert_eq!(Symbol::from_str("🍬"), Some(Symbol::Candy));
    /// assert_eq!(Symbol::from_str("pretzel"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "candy" | "🍬" => Some(Symbol::Candy),
            "lollipop" | "🍭" => Some(Symbol::Lollipop),
            "chocolate" | "🍫" => Some(Symbol::Chocolate),
            "cookie" | "🍪" => Some(Symbol::Cookie),
            "cake" | "🍰" => Some(Symbol::Cake),
            "donut" | "🍩" => Some(Symbol::Donut),
            _ => None,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Candy => "candy",
            Symbol::Lollipop => "lollipop",
            Symbol::Chocolate => "chocolate",
            Symbol::Cookie => "cookie",
            Symbol::Cake => "cake",
            Symbol::Donut => "donut",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Symbol::Candy => "🍬",
            Symbol::Lollipop => "🍭",
            Symbol::Chocolate => "🍫",
            Symbol::Cookie => "🍪",
            Symbol::Cake => "🍰",
            Symbol::Donut => "🍩",
        }
    }

    /// Single-letter code used by board layouts in tests and debug dumps
    pub fn letter(&self) -> char {
        match self {
            Symbol::Candy => 'C',
            Symbol::Lollipop => 'L',
            Symbol::Chocolate => 'H',
            Symbol::Cookie => 'K',
            Symbol::Cake => 'A',
            Symbol::Donut => 'D',
        }
    }

    /// Inverse of [`Symbol::letter`] (case-insensitive)
    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'C' => Some(Symbol::Candy),
            'L' => Some(Symbol::Lollipop),
            'H' => Some(Symbol::Chocolate),
            'K' => Some(Symbol::Cookie),
            'A' => Some(Symbol::Cake),
            'D' => Some(Symbol::Donut),
            _ => None,
        }
    }

    /// Dense index into [`Symbol::ALL`]
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Match direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// Special piece tag left behind by long matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    /// Clears the 3x3 square around itself when detonated
    Bomb,
    /// Clears its whole row when detonated
    RocketH,
    /// Clears its whole column when detonated
    RocketV,
}

impl Special {
    /// Rocket matching a match orientation
    pub fn rocket(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Special::RocketH,
            Orientation::Vertical => Special::RocketV,
        }
    }

    /// Priority when two tags compete for the same cell (bomb wins)
    pub fn rank(&self) -> u8 {
        match self {
            Special::Bomb => 2,
            Special::RocketH | Special::RocketV => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Special::Bomb => "bomb",
            Special::RocketH => "rocket-h",
            Special::RocketV => "rocket-v",
        }
    }
}

/// Board position as `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour one step in `dir`, `None` past the top or left edge
    pub fn step(&self, dir: Direction) -> Option<Position> {
        match dir {
            Direction::Up => self.row.checked_sub(1).map(|row| Position::new(row, self.col)),
            Direction::Down => Some(Position::new(self.row + 1, self.col)),
            Direction::Left => self.col.checked_sub(1).map(|col| Position::new(self.row, col)),
            Direction::Right => Some(Position::new(self.row, self.col + 1)),
        }
    }

    /// Exactly one of the row/col deltas is 1 and the other is 0
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        (dr == 1 && dc == 0) || (dr == 0 && dc == 1)
    }
}

/// Cursor direction on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Player intent, independent of the input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardAction {
    Move(Direction),
    /// Pick the cell under the cursor, or swap it with the picked one
    Select,
    /// Drop the current pick
    Cancel,
    /// Replay the current level (costs a life)
    Restart,
    /// Continue to the next level after a win
    NextLevel,
}

/// A per-level collection requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub symbol: Symbol,
    pub required_count: u32,
}

impl Goal {
    pub const fn new(symbol: Symbol, required_count: u32) -> Self {
        Self {
            symbol,
            required_count,
        }
    }
}

/// Static level configuration, never mutated at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// 1-based level id; level `id + 1` unlocks when this one is won
    pub id: u32,
    pub rows: usize,
    pub cols: usize,
    pub moves: u32,
    pub target_score: u32,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub reward_tokens: u32,
    /// Symbol alphabet for this level
    pub palette: Vec<Symbol>,
}

impl Level {
    /// Palette made of the first `count` symbols
    pub fn palette_of(count: usize) -> Vec<Symbol> {
        Symbol::ALL.iter().copied().take(count.min(Symbol::ALL.len())).collect()
    }
}
