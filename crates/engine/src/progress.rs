//! Player progress - lives, unlocks, stars and rewards
//!
//! Lives regenerate lazily: nothing ticks in the background. Whenever the
//! stock is read, the time elapsed since `last_life_timestamp` is converted
//! into whole lives, and the anchor advances by exactly the intervals that
//! were converted so partial progress towards the next life is kept.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use candy_match_core::types::{Level, LIFE_REGEN_INTERVAL_MS, MAX_LIVES};

/// Persisted player record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProgress {
    /// Highest playable level id; only ever increases
    pub highest_level_unlocked: u32,
    pub lives: u32,
    /// Regeneration anchor (unix ms)
    pub last_life_timestamp: u64,
    pub total_score_all_time: u64,
    /// Best star rating per level id
    pub stars_by_level: BTreeMap<u32, u8>,
    pub tokens_earned: u64,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            highest_level_unlocked: 1,
            lives: MAX_LIVES,
            last_life_timestamp: 0,
            total_score_all_time: 0,
            stars_by_level: BTreeMap::new(),
            tokens_earned: 0,
        }
    }
}

/// What a win changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinReport {
    pub level_id: u32,
    pub stars: u8,
    /// Best rating after this win
    pub best_stars: u8,
    pub first_clear: bool,
    /// Level id unlocked by this win, if it was not already playable
    pub unlocked: Option<u32>,
    pub tokens: u32,
}

impl PlayerProgress {
    /// Apply lazy regeneration at `now_ms`. Returns the number of lives gained.
    pub fn regenerate(&mut self, now_ms: u64) -> u32 {
        if self.lives >= MAX_LIVES {
            return 0;
        }
        let intervals = now_ms.saturating_sub(self.last_life_timestamp) / LIFE_REGEN_INTERVAL_MS;
        if intervals == 0 {
            return 0;
        }
        let lives = (self.lives as u64 + intervals).min(MAX_LIVES as u64) as u32;
        let gained = lives - self.lives;
        self.lives = lives;
        self.last_life_timestamp = self
            .last_life_timestamp
            .saturating_add(intervals.saturating_mul(LIFE_REGEN_INTERVAL_MS));
        gained
    }

    /// Time until the next life regenerates, `None` with a full stock
    pub fn next_life_in_ms(&self, now_ms: u64) -> Option<u64> {
        if self.lives >= MAX_LIVES {
            return None;
        }
        let elapsed = now_ms.saturating_sub(self.last_life_timestamp);
        Some(LIFE_REGEN_INTERVAL_MS - elapsed % LIFE_REGEN_INTERVAL_MS)
    }

    /// Spend one life. Call [`regenerate`](Self::regenerate) first.
    ///
    /// Consuming from a full stock restarts the regeneration clock at `now_ms`.
    pub fn consume_life(&mut self, now_ms: u64) -> bool {
        if self.lives == 0 {
            return false;
        }
        if self.lives >= MAX_LIVES {
            self.last_life_timestamp = now_ms;
        }
        self.lives -= 1;
        true
    }

    /// Pull a loaded record back into range: at most `MAX_LIVES` lives, at
    /// least level 1 unlocked. Returns whether anything changed.
    pub fn sanitize(&mut self) -> bool {
        let before = (self.lives, self.highest_level_unlocked);
        self.lives = self.lives.min(MAX_LIVES);
        self.highest_level_unlocked = self.highest_level_unlocked.max(1);
        before != (self.lives, self.highest_level_unlocked)
    }

    pub fn is_unlocked(&self, level_id: u32) -> bool {
        level_id >= 1 && level_id <= self.highest_level_unlocked
    }

    /// Best star rating for a level, 0 if never won
    pub fn stars_for(&self, level_id: u32) -> u8 {
        self.stars_by_level.get(&level_id).copied().unwrap_or(0)
    }

    /// Record a won session
    pub fn record_win(&mut self, level: &Level, score: u32, stars: u8) -> WinReport {
        let first_clear = !self.stars_by_level.contains_key(&level.id);
        let best = self.stars_by_level.entry(level.id).or_insert(0);
        *best = (*best).max(stars);
        let best_stars = *best;

        let next = level.id.saturating_add(1);
        let unlocked = if next > self.highest_level_unlocked {
            self.highest_level_unlocked = next;
            Some(next)
        } else {
            None
        };

        self.total_score_all_time = self.total_score_all_time.saturating_add(score as u64);
        let tokens = if first_clear { level.reward_tokens } else { 0 };
        self.tokens_earned = self.tokens_earned.saturating_add(tokens as u64);

        WinReport {
            level_id: level.id,
            stars,
            best_stars,
            first_clear,
            unlocked,
            tokens,
        }
    }
}
