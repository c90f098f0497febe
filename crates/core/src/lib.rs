//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules: board generation, match detection,
//! swap validation, cascade resolution and end-of-turn evaluation. It has no
//! dependency on I/O, clocks or persistence; randomness comes in through the
//! [`SymbolSource`] seam so every scenario can be replayed from a seed or a
//! scripted symbol sequence.
//!
//! # Module Structure
//!
//! - [`grid`]: `rows x cols` board of candy cells, generation without runs
//! - [`matcher`]: maximal horizontal and vertical runs of three or more
//! - [`swap`]: move validation and legal-move search
//! - [`cascade`]: clear / gravity / refill loop with combo scoring and specials
//! - [`scoring`]: points, goals, win/loss and star rating
//! - [`game_state`]: one level session driving all of the above
//! - [`rng`]: deterministic symbol sources
//!
//! # Game Rules
//!
//! - **Swaps**: orthogonally adjacent cells only; a swap must form a match
//!   (or move a special piece) or it is reverted and costs nothing
//! - **Cascades**: matched cells clear, columns fall, new cells drop in from
//!   the top; step `n` of a turn scores `cells * 10 * n`
//! - **Specials**: a run of four leaves a rocket, five or more a bomb
//! - **End of turn**: won when all goals are collected and the score reaches
//!   the target, lost when the moves run out first
//!
//! # Example
//!
//! ```
//! use candy_match_core::types::{Goal, Level, Symbol};
//! use candy_match_core::GameState;
//!
//! let level = Level {
//!     id: 1,
//!     rows: 8,
//!     cols: 8,
//!     moves: 20,
//!     target_score: 1000,
//!     goals: vec![Goal::new(Symbol::Candy, 10)],
//!     reward_tokens: 50,
//!     palette: Level::palette_of(5),
//! };
//! let mut game = GameState::new(level, 12345);
//!
//! // Every fresh board offers at least one legal move.
//! let (a, b) = candy_match_core::find_legal_move(game.grid()).unwrap();
//! assert!(game.attempt_swap(a, b));
//! assert_eq!(game.moves_remaining(), 19);
//! assert!(game.score() >= 30);
//! ```

pub mod cascade;
pub mod game_state;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod swap;

pub use candy_match_types as types;

// Re-export commonly used types for convenience
pub use cascade::{Blast, Cascade, CascadeResolver, CascadeStep};
pub use game_state::{GameState, Turn, TurnSummary};
pub use grid::{Cell, Grid};
pub use matcher::{detect, has_match, Match};
pub use rng::{FixedSymbols, SimpleRng, SymbolSource};
pub use scoring::{evaluate, match_points, star_rating, GameStatus, SymbolCounts};
pub use snapshot::GameSnapshot;
pub use swap::{check_swap, find_legal_move, has_legal_move, SwapCheck};
