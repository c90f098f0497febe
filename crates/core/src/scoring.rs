//! Scoring module - match points, goals and star rating
//!
//! Rules:
//! - A match (or blast) of `n` cells scores `n * MATCH_BASE_POINTS * combo`, where
//!   `combo` is the 1-based cascade step within the current turn.
//! - A level is won when every goal is collected AND the score reaches the
//!   target. Goals alone never win.
//! - Stars come from the score/target ratio: >= 1.5 three, >= 1.2 two, else one.

use crate::types::{
    Goal, Level, Symbol, MATCH_BASE_POINTS, SYMBOL_KINDS, THREE_STAR_RATIO, TWO_STAR_RATIO,
};

/// Per-symbol counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SymbolCounts {
    counts: [u32; SYMBOL_KINDS],
}

impl SymbolCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: Symbol) -> u32 {
        self.counts[symbol.index()]
    }

    pub fn add(&mut self, symbol: Symbol, n: u32) {
        let slot = &mut self.counts[symbol.index()];
        *slot = slot.saturating_add(n);
    }

    pub fn merge(&mut self, other: &SymbolCounts) {
        for symbol in Symbol::ALL {
            self.add(symbol, other.get(symbol));
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero entries in palette order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u32)> + '_ {
        Symbol::ALL
            .iter()
            .map(|s| (*s, self.get(*s)))
            .filter(|(_, n)| *n > 0)
    }
}

/// End-of-turn status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Won { stars: u8 },
    Lost,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won { .. } => "won",
            GameStatus::Lost => "lost",
        }
    }
}

/// Points for a run of `cells` cells at cascade step `combo` (1-based)
pub fn match_points(cells: usize, combo: u32) -> u32 {
    (cells as u32)
        .saturating_mul(MATCH_BASE_POINTS)
        .saturating_mul(combo)
}

/// Every goal satisfied by the session's collection counts
pub fn goals_met(goals: &[Goal], collected: &SymbolCounts) -> bool {
    goals
        .iter()
        .all(|g| collected.get(g.symbol) >= g.required_count)
}

/// Star rating for a winning score. Callers only ask once `score >= target`.
pub fn star_rating(score: u32, target_score: u32) -> u8 {
    if target_score == 0 {
        return 3;
    }
    let ratio = score as f64 / target_score as f64;
    if ratio >= THREE_STAR_RATIO {
        3
    } else if ratio >= TWO_STAR_RATIO {
        2
    } else {
        1
    }
}

/// Evaluate a stable board against the level
pub fn evaluate(
    level: &Level,
    score: u32,
    moves_remaining: u32,
    collected: &SymbolCounts,
) -> GameStatus {
    if goals_met(&level.goals, collected) && score >= level.target_score {
        GameStatus::Won {
            stars: star_rating(score, level.target_score),
        }
    } else if moves_remaining == 0 {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(target_score: u32, goals: Vec<Goal>) -> Level {
        Level {
            id: 1,
            rows: 8,
            cols: 8,
            moves: 20,
            target_score,
            goals,
            reward_tokens: 0,
            palette: Level::palette_of(5),
        }
    }

    #[test]
    fn test_match_points() {
        assert_eq!(match_points(3, 1), 30);
        assert_eq!(match_points(3, 2), 60);
        assert_eq!(match_points(5, 3), 150);
    }

    #[test]
    fn test_star_thresholds() {
        assert_eq!(star_rating(1000, 1000), 1);
        assert_eq!(star_rating(1199, 1000), 1);
        assert_eq!(star_rating(1200, 1000), 2);
        assert_eq!(star_rating(1499, 1000), 2);
        assert_eq!(star_rating(1500, 1000), 3);
        assert_eq!(star_rating(10, 0), 3);
    }

    #[test]
    fn test_goals_without_score_do_not_win() {
        let lvl = level(1000, vec![Goal::new(Symbol::Candy, 10)]);
        let mut collected = SymbolCounts::new();
        collected.add(Symbol::Candy, 12);
        assert_eq!(evaluate(&lvl, 900, 5, &collected), GameStatus::Playing);
        assert_eq!(evaluate(&lvl, 900, 0, &collected), GameStatus::Lost);
    }

    #[test]
    fn test_score_without_goals_does_not_win() {
        let lvl = level(1000, vec![Goal::new(Symbol::Candy, 10)]);
        let mut collected = SymbolCounts::new();
        collected.add(Symbol::Candy, 9);
        collected.add(Symbol::Cake, 40);
        assert_eq!(evaluate(&lvl, 5000, 3, &collected), GameStatus::Playing);
    }

    #[test]
    fn test_win_beats_last_move() {
        let lvl = level(1000, vec![Goal::new(Symbol::Candy, 10)]);
        let mut collected = SymbolCounts::new();
        collected.add(Symbol::Candy, 10);
        assert_eq!(
            evaluate(&lvl, 1250, 0, &collected),
            GameStatus::Won { stars: 2 }
        );
    }

    #[test]
    fn test_symbol_counts() {
        let mut a = SymbolCounts::new();
        a.add(Symbol::Cookie, 3);
        let mut b = SymbolCounts::new();
        b.add(Symbol::Cookie, 2);
        b.add(Symbol::Donut, 1);
        a.merge(&b);
        assert_eq!(a.get(Symbol::Cookie), 5);
        assert_eq!(a.total(), 6);
        assert_eq!(
            a.iter().collect::<Vec<_>>(),
            vec![(Symbol::Cookie, 5), (Symbol::Donut, 1)]
        );
        assert!(SymbolCounts::new().is_empty());
    }
}
