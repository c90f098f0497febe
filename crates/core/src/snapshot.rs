use crate::grid::Grid;
use crate::scoring::{GameStatus, SymbolCounts};
use crate::types::Goal;

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub grid: Grid,
    pub level_id: u32,
    pub score: u32,
    pub target_score: u32,
    pub moves_remaining: u32,
    pub goals: Vec<Goal>,
    pub collected: SymbolCounts,
    pub combo: u32,
    pub animating: bool,
    pub status: GameStatus,
}

impl GameSnapshot {
    /// Whether a swap would currently be considered
    pub fn playable(&self) -> bool {
        !self.animating && !self.status.is_over()
    }

    /// Goals as `(goal, collected so far)` pairs
    pub fn goal_progress(&self) -> impl Iterator<Item = (Goal, u32)> + '_ {
        self.goals
            .iter()
            .map(|g| (*g, self.collected.get(g.symbol).min(g.required_count)))
    }
}
