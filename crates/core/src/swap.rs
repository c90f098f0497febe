//! Move validation
//!
//! A swap is legal when the two positions are 4-directionally adjacent and the
//! swap either forms a match or moves a special piece (which then detonates).
//! Validation runs on a scratch copy; the live grid is never touched here.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::matcher::has_match;
use crate::types::Position;

/// Outcome of validating a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapCheck {
    OutOfBounds,
    NotAdjacent,
    /// Adjacent, but the swap forms no match and moves no special piece
    NoMatch,
    /// The swap forms at least one match
    Match,
    /// The swap moves a special piece; it detonates on resolution
    Activation,
}

impl SwapCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SwapCheck::Match | SwapCheck::Activation)
    }
}

/// Validate swapping `a` and `b`
pub fn check_swap(grid: &Grid, a: Position, b: Position) -> SwapCheck {
    let (Some(ca), Some(cb)) = (grid.get(a), grid.get(b)) else {
        return SwapCheck::OutOfBounds;
    };
    if !a.is_adjacent(b) {
        return SwapCheck::NotAdjacent;
    }
    if ca.special.is_some() || cb.special.is_some() {
        return SwapCheck::Activation;
    }
    if ca.symbol == cb.symbol {
        return SwapCheck::NoMatch;
    }

    let mut scratch = grid.clone();
    scratch.swap(a, b);
    if has_match(&scratch) {
        SwapCheck::Match
    } else {
        SwapCheck::NoMatch
    }
}

/// Special pieces sitting on the swapped positions (after the swap)
pub fn activation_triggers(grid: &Grid, a: Position, b: Position) -> ArrayVec<Position, 2> {
    let mut triggers = ArrayVec::new();
    for pos in [a, b] {
        if grid.get(pos).is_some_and(|c| c.special.is_some()) {
            triggers.push(pos);
        }
    }
    triggers
}

/// First legal swap in scan order (right neighbour before down neighbour)
pub fn find_legal_move(grid: &Grid) -> Option<(Position, Position)> {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let here = Position::new(row, col);
            for there in [Position::new(row, col + 1), Position::new(row + 1, col)] {
                if grid.in_bounds(there) && check_swap(grid, here, there).is_accepted() {
                    return Some((here, there));
                }
            }
        }
    }
    None
}

/// Whether the player has any move at all
pub fn has_legal_move(grid: &Grid) -> bool {
    find_legal_move(grid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Special;

    fn grid(layout: &[&str]) -> Grid {
        Grid::from_rows(layout).unwrap()
    }

    #[test]
    fn test_rejects_out_of_bounds_and_distance() {
        let g = grid(&["CLH", "KAD"]);
        assert_eq!(
            check_swap(&g, Position::new(0, 0), Position::new(0, 5)),
            SwapCheck::OutOfBounds
        );
        assert_eq!(
            check_swap(&g, Position::new(0, 0), Position::new(1, 1)),
            SwapCheck::NotAdjacent
        );
        assert_eq!(
            check_swap(&g, Position::new(0, 0), Position::new(0, 2)),
            SwapCheck::NotAdjacent
        );
        assert_eq!(
            check_swap(&g, Position::new(0, 0), Position::new(0, 0)),
            SwapCheck::NotAdjacent
        );
    }

    #[test]
    fn test_detects_matching_swap() {
        // Moving the bottom-left C up completes the top row.
        let g = grid(&["LCC", "CHK"]);
        assert_eq!(
            check_swap(&g, Position::new(0, 0), Position::new(1, 0)),
            SwapCheck::Match
        );
        assert_eq!(
            check_swap(&g, Position::new(1, 1), Position::new(1, 2)),
            SwapCheck::NoMatch
        );
        // Validation never mutates the board.
        assert_eq!(g.to_letters(), vec!["LCC".to_string(), "CHK".to_string()]);
    }

    #[test]
    fn test_special_swap_is_activation() {
        let mut g = grid(&["CLH", "KAD"]);
        g.set_special(Position::new(0, 1), Some(Special::RocketH));
        assert_eq!(
            check_swap(&g, Position::new(0, 1), Position::new(1, 1)),
            SwapCheck::Activation
        );

        let triggers = activation_triggers(&g, Position::new(0, 1), Position::new(1, 1));
        assert_eq!(triggers.as_slice(), &[Position::new(0, 1)]);
    }

    #[test]
    fn test_find_legal_move() {
        let g = grid(&["LCC", "CHK"]);
        assert_eq!(
            find_legal_move(&g),
            Some((Position::new(0, 0), Position::new(1, 0)))
        );

        let dead = grid(&["CLH", "KAD", "CLH"]);
        assert!(!has_legal_move(&dead));
    }
}
