//! Candy Match (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so binaries, integration
//! tests and benches can write `candy_match::core::Grid` and friends.

pub use candy_match_core as core;
pub use candy_match_engine as engine;
pub use candy_match_input as input;
pub use candy_match_term as term;
pub use candy_match_types as types;
