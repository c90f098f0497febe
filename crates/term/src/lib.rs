//! Terminal rendering for the match board.
//!
//! A small game-oriented layer: views render snapshots into a plain
//! framebuffer, and the renderer flushes that framebuffer to the terminal
//! with diff encoding. No widget toolkit involved.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use candy_match_core as core;
pub use candy_match_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, HudView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
