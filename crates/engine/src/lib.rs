//! Session and progress layer
//!
//! Wraps the pure game core with everything that outlives a single level:
//! the level catalog, the persisted player record with lives regeneration,
//! and the [`Engine`] facade that front ends drive.
//!
//! # Example
//!
//! ```
//! use candy_match_engine::{Engine, LevelCatalog, ManualClock, MemoryStore};
//!
//! let clock = ManualClock::new(1_700_000_000_000);
//! let mut engine = Engine::new(LevelCatalog::builtin(), MemoryStore::new(), &clock, 1);
//!
//! engine.start_level(1).unwrap();
//! assert_eq!(engine.get_progress().lives, 4);
//! assert_eq!(engine.start_level(2).unwrap_err().reason(), "locked");
//! ```

pub mod catalog;
pub mod clock;
pub mod config;
pub mod progress;
pub mod session;
pub mod store;

pub use catalog::{CatalogError, LevelCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use progress::{PlayerProgress, WinReport};
pub use session::{Engine, SessionOutcome, StartError};
pub use store::{JsonFileStore, MemoryStore, ProgressStore, StoreError};
