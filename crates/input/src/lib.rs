//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::BoardAction`] and turns
//! cursor movement plus picks into swap requests. Nothing here knows about
//! game rules.

pub mod map;
pub mod selection;

pub use candy_match_types as types;

pub use map::{handle_key_event, should_quit};
pub use selection::Selection;
