//! Runtime configuration

use std::path::PathBuf;

use candy_match_core::types::CASCADE_STEP_PAUSE_MS;

pub const DEFAULT_PROGRESS_PATH: &str = "candy-match-progress.json";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub progress_path: PathBuf,
    /// JSON level catalog; the built-in campaign when unset
    pub levels_path: Option<PathBuf>,
    /// Fixed RNG seed; random per run when unset
    pub seed: Option<u32>,
    /// Pause between the two beats of a cascade step
    pub step_delay_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            progress_path: PathBuf::from(DEFAULT_PROGRESS_PATH),
            levels_path: None,
            seed: None,
            step_delay_ms: CASCADE_STEP_PAUSE_MS,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let progress_path = non_empty("CANDY_MATCH_PROGRESS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRESS_PATH));

        let levels_path = non_empty("CANDY_MATCH_LEVELS_PATH").map(PathBuf::from);

        let seed = non_empty("CANDY_MATCH_SEED").and_then(|s| s.parse().ok());

        let step_delay_ms = non_empty("CANDY_MATCH_STEP_DELAY_MS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(CASCADE_STEP_PAUSE_MS);

        Self {
            progress_path,
            levels_path,
            seed,
            step_delay_ms,
        }
    }
}
