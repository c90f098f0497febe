//! Game state module - one level session
//!
//! Ties the board, the symbol source and scoring together. A session starts
//! with a freshly generated board and ends when the level is won or the move
//! budget runs out.
//!
//! Swaps go through [`GameState::begin_swap`], which returns a [`Turn`]: an
//! iterator over the cascade steps of that swap. The turn applies score and
//! collection counts as steps are pulled, and evaluates the end-of-turn
//! conditions once the board is stable. [`GameState::attempt_swap`] is the
//! synchronous shortcut that runs the whole turn at once.

use std::fmt;

use crate::cascade::{CascadeResolver, CascadeStep};
use crate::grid::Grid;
use crate::rng::{SimpleRng, SymbolSource};
use crate::scoring::{evaluate, GameStatus, SymbolCounts};
use crate::snapshot::GameSnapshot;
use crate::swap::{activation_triggers, check_swap, has_legal_move, SwapCheck};
use crate::types::{Level, Position};

/// Attempts at producing a board with at least one legal move
const MAX_DEAL_ATTEMPTS: u32 = 16;

/// Summary of the last completed turn (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSummary {
    /// Cascade depth of the turn
    pub steps: u32,
    pub points: u32,
    pub status: GameStatus,
    /// The board was re-dealt because no legal move was left
    pub reshuffled: bool,
}

/// Complete state of one level session
pub struct GameState {
    level: Level,
    grid: Grid,
    source: Box<dyn SymbolSource>,
    score: u32,
    moves_remaining: u32,
    collected: SymbolCounts,
    combo: u32,
    animating: bool,
    status: GameStatus,
    /// Accepted swaps so far
    turns: u32,
    reshuffles: u32,
    last_event: Option<TurnSummary>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("level", &self.level.id)
            .field("grid", &self.grid.to_letters())
            .field("score", &self.score)
            .field("moves_remaining", &self.moves_remaining)
            .field("combo", &self.combo)
            .field("animating", &self.animating)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Start a session with the built-in RNG
    pub fn new(level: Level, seed: u32) -> Self {
        Self::with_source(level, Box::new(SimpleRng::new(seed)))
    }

    /// Start a session drawing symbols from `source`
    pub fn with_source(level: Level, mut source: Box<dyn SymbolSource>) -> Self {
        let grid = deal(&level, source.as_mut());
        Self::from_grid(level, grid, source)
    }

    /// Start a session on a prepared board (used for scripted scenarios)
    pub fn from_grid(level: Level, grid: Grid, source: Box<dyn SymbolSource>) -> Self {
        Self {
            moves_remaining: level.moves,
            level,
            grid,
            source,
            score: 0,
            collected: SymbolCounts::new(),
            combo: 0,
            animating: false,
            status: GameStatus::Playing,
            turns: 0,
            reshuffles: 0,
            last_event: None,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn collected(&self) -> &SymbolCounts {
        &self.collected
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn animating(&self) -> bool {
        self.animating
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    /// Take and clear the last turn summary
    pub fn take_last_event(&mut self) -> Option<TurnSummary> {
        self.last_event.take()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid.clone(),
            level_id: self.level.id,
            score: self.score,
            target_score: self.level.target_score,
            moves_remaining: self.moves_remaining,
            goals: self.level.goals.clone(),
            collected: self.collected,
            combo: self.combo,
            animating: self.animating,
            status: self.status,
        }
    }

    /// Validate a swap without touching the board
    pub fn check_swap(&self, a: Position, b: Position) -> SwapCheck {
        check_swap(&self.grid, a, b)
    }

    /// Swap and resolve the full cascade. Returns whether the swap was accepted.
    ///
    /// Rejected swaps (non-adjacent, non-matching, mid-animation, or after the
    /// session ended) leave the state untouched.
    pub fn attempt_swap(&mut self, a: Position, b: Position) -> bool {
        match self.begin_swap(a, b) {
            Some(turn) => {
                turn.finish();
                true
            }
            None => false,
        }
    }

    /// Commit a swap and return its cascade as a lazy [`Turn`].
    ///
    /// The move is consumed immediately; score and collections accrue as the
    /// turn is iterated. Returns `None` for a rejected swap.
    pub fn begin_swap(&mut self, a: Position, b: Position) -> Option<Turn<'_>> {
        if self.animating || self.status.is_over() {
            return None;
        }
        let check = check_swap(&self.grid, a, b);
        if !check.is_accepted() {
            log::debug!("swap {:?} <-> {:?} rejected: {:?}", a, b, check);
            return None;
        }

        self.grid.swap(a, b);
        let resolver = match check {
            SwapCheck::Activation => {
                CascadeResolver::with_triggers(activation_triggers(&self.grid, a, b))
            }
            _ => CascadeResolver::new(),
        };
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.combo = 0;
        self.animating = true;

        Some(Turn {
            state: self,
            resolver,
            points: 0,
            done: false,
        })
    }

    /// Stable board reached: reset the combo and evaluate the level
    fn finish_turn(&mut self, steps: u32, points: u32) {
        self.combo = 0;
        self.animating = false;
        self.turns += 1;
        self.status = evaluate(
            &self.level,
            self.score,
            self.moves_remaining,
            &self.collected,
        );

        let mut reshuffled = false;
        if self.status == GameStatus::Playing && !has_legal_move(&self.grid) {
            log::warn!(
                "level {}: no legal move left after turn {}, re-dealing the board",
                self.level.id,
                self.turns
            );
            self.grid = deal(&self.level, self.source.as_mut());
            self.reshuffles += 1;
            reshuffled = true;
        }

        log::debug!(
            "level {} turn {}: {} steps, {} points, score {}, {} moves left, {}",
            self.level.id,
            self.turns,
            steps,
            points,
            self.score,
            self.moves_remaining,
            self.status.as_str()
        );

        self.last_event = Some(TurnSummary {
            steps,
            points,
            status: self.status,
            reshuffled,
        });
    }
}

/// Generate a board for `level`, retrying until it offers a legal move
fn deal(level: &Level, source: &mut dyn SymbolSource) -> Grid {
    let mut grid = Grid::generate(level.rows, level.cols, &level.palette, source);
    for _ in 1..MAX_DEAL_ATTEMPTS {
        if has_legal_move(&grid) {
            break;
        }
        grid = Grid::generate(level.rows, level.cols, &level.palette, source);
    }
    grid
}

/// Cascade of one accepted swap.
///
/// Holds the session mutably: no other swap can start while it exists, and
/// `animating` reads true through [`Turn::snapshot`]. Dropping a turn early
/// still resolves it to a stable board.
pub struct Turn<'a> {
    state: &'a mut GameState,
    resolver: CascadeResolver,
    points: u32,
    done: bool,
}

impl Turn<'_> {
    /// Session view at the current point of the cascade
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// Run the remaining steps and return the end-of-turn status
    pub fn finish(mut self) -> GameStatus {
        for _ in self.by_ref() {}
        self.state.status
    }

    fn complete(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.state.finish_turn(self.resolver.combo(), self.points);
    }
}

impl Iterator for Turn<'_> {
    type Item = CascadeStep;

    fn next(&mut self) -> Option<CascadeStep> {
        if self.done {
            return None;
        }
        let state = &mut *self.state;
        let step = self
            .resolver
            .step(&mut state.grid, state.source.as_mut(), &state.level.palette);

        match step {
            Some(step) => {
                state.combo = step.combo;
                state.score = state.score.saturating_add(step.points);
                state.collected.merge(&step.collected);
                self.points = self.points.saturating_add(step.points);
                Some(step)
            }
            None => {
                self.complete();
                None
            }
        }
    }
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        while self.next().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::detect;
    use crate::rng::FixedSymbols;
    use crate::types::{Goal, Special, Symbol};

    fn level(rows: usize, cols: usize) -> Level {
        Level {
            id: 1,
            rows,
            cols,
            moves: 20,
            target_score: 1000,
            goals: vec![Goal::new(Symbol::Candy, 10)],
            reward_tokens: 50,
            palette: Level::palette_of(5),
        }
    }

    fn scripted(layout: &[&str], refills: &str) -> GameState {
        let grid = Grid::from_rows(layout).unwrap();
        let lvl = level(grid.rows(), grid.cols());
        GameState::from_grid(lvl, grid, Box::new(FixedSymbols::from_letters(refills)))
    }

    /// 4x4 board where swapping (3,2) and (2,2) completes CCC on the bottom row.
    fn one_match_board() -> GameState {
        scripted(&["LHKA", "HKAL", "KACD", "CCDA"], "DLH")
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(level(8, 8), 12345);
        assert_eq!(state.score(), 0);
        assert_eq!(state.moves_remaining(), 20);
        assert_eq!(state.combo(), 0);
        assert!(!state.animating());
        assert_eq!(state.status(), GameStatus::Playing);
        assert!(detect(state.grid()).is_empty());
        assert!(has_legal_move(state.grid()));
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = GameState::new(level(8, 8), 99);
        let b = GameState::new(level(8, 8), 99);
        assert_eq!(a.grid().to_letters(), b.grid().to_letters());
    }

    #[test]
    fn test_rejected_swap_is_noop() {
        let mut state = scripted(&["CLH", "LHC", "HCL"], "K");
        let before = state.snapshot();

        assert!(!state.attempt_swap(Position::new(0, 0), Position::new(0, 1)));
        assert!(!state.attempt_swap(Position::new(0, 0), Position::new(1, 1)));
        assert!(!state.attempt_swap(Position::new(0, 0), Position::new(7, 7)));

        assert_eq!(state.snapshot(), before);
        assert_eq!(state.turns(), 0);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_accepted_swap_consumes_one_move() {
        let mut state = one_match_board();
        assert!(state.attempt_swap(Position::new(3, 2), Position::new(2, 2)));

        assert_eq!(state.moves_remaining(), 19);
        assert_eq!(state.score(), 30);
        assert_eq!(state.collected().get(Symbol::Candy), 3);
        assert_eq!(state.combo(), 0);
        assert!(!state.animating());
        assert_eq!(
            state.grid().to_letters(),
            vec!["DLHA", "LHKL", "HKAD", "KADA"]
        );

        let event = state.take_last_event().unwrap();
        assert_eq!(event.steps, 1);
        assert_eq!(event.points, 30);
        assert!(!event.reshuffled);
    }

    #[test]
    fn test_turn_is_lazy_and_marks_animating() {
        let mut state = one_match_board();
        let mut turn = state
            .begin_swap(Position::new(3, 2), Position::new(2, 2))
            .unwrap();

        let snap = turn.snapshot();
        assert!(snap.animating);
        assert_eq!(snap.moves_remaining, 19);
        assert_eq!(snap.score, 0);

        let step = turn.next().unwrap();
        assert_eq!(step.combo, 1);
        let snap = turn.snapshot();
        assert_eq!(snap.score, 30);
        assert_eq!(snap.combo, 1);

        assert!(turn.next().is_none());
        drop(turn);
        assert!(!state.animating());
        assert_eq!(state.combo(), 0);
    }

    #[test]
    fn test_dropped_turn_still_resolves() {
        let mut state = one_match_board();
        let turn = state.begin_swap(Position::new(3, 2), Position::new(2, 2));
        drop(turn);
        assert_eq!(state.score(), 30);
        assert!(!state.animating());
        assert!(detect(state.grid()).is_empty());
    }

    #[test]
    fn test_last_move_without_win_loses() {
        let mut state = one_match_board();
        state.moves_remaining = 1;
        assert!(state.attempt_swap(Position::new(3, 2), Position::new(2, 2)));
        assert_eq!(state.status(), GameStatus::Lost);

        // The session is over; further swaps are refused.
        assert!(!state.attempt_swap(Position::new(3, 2), Position::new(2, 2)));
        assert_eq!(state.moves_remaining(), 0);
    }

    #[test]
    fn test_win_needs_goals_and_score() {
        let mut state = one_match_board();
        state.level.target_score = 30;
        state.level.goals = vec![Goal::new(Symbol::Candy, 3)];
        assert!(state.attempt_swap(Position::new(3, 2), Position::new(2, 2)));
        assert_eq!(state.status(), GameStatus::Won { stars: 1 });
    }

    #[test]
    fn test_dead_board_is_redealt() {
        // After the bottom row clears, the refilled board offers no move.
        let mut state = scripted(&["LHK", "CAD", "LCC"], "KCL");
        assert!(state.attempt_swap(Position::new(1, 0), Position::new(2, 0)));
        assert_eq!(state.score(), 30);
        assert_eq!(state.reshuffles(), 1);
        assert!(state.take_last_event().unwrap().reshuffled);
        assert!(detect(state.grid()).is_empty());
    }

    #[test]
    fn test_special_swap_detonates() {
        let mut state = scripted(&["LHKA", "HKAL", "KACD", "CLDA"], "DLHKDAHK");
        state.grid.set_special(Position::new(3, 1), Some(Special::RocketH));

        // No match is formed, but moving the rocket is a legal move.
        assert_eq!(
            state.check_swap(Position::new(3, 1), Position::new(3, 0)),
            SwapCheck::Activation
        );
        let mut turn = state
            .begin_swap(Position::new(3, 1), Position::new(3, 0))
            .unwrap();
        let first = turn.next().unwrap();
        assert_eq!(first.blasts.len(), 1);
        assert_eq!(first.blasts[0].origin, Position::new(3, 0));
        assert_eq!(first.points, 40);
        drop(turn);

        assert_eq!(state.moves_remaining(), 19);
        assert!(state.score() >= 40);
        assert!(state.grid().specials().next().is_none());
    }
}
