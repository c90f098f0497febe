//! Session layer - level start, swaps and progress bookkeeping
//!
//! [`Engine`] owns the player's progress and at most one running
//! [`GameState`]. It is the only place that touches the store: lives are
//! persisted when they change, and a win is recorded exactly once when the
//! session reaches its end.

use candy_match_core::rng::SimpleRng;
use candy_match_core::types::{Level, Position};
use candy_match_core::{GameSnapshot, GameState, GameStatus, Turn};

use crate::catalog::LevelCatalog;
use crate::clock::{Clock, SystemClock};
use crate::progress::{PlayerProgress, WinReport};
use crate::store::{JsonFileStore, ProgressStore};

/// Why a level could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("level {0} does not exist")]
    InvalidLevel(u32),
    #[error("level {level} is locked (highest unlocked: {highest_unlocked})")]
    Locked { level: u32, highest_unlocked: u32 },
    #[error("no lives left, next life in {next_life_in_ms} ms")]
    NoLives { next_life_in_ms: u64 },
}

impl StartError {
    /// Stable machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            StartError::InvalidLevel(_) => "invalid_level",
            StartError::Locked { .. } => "locked",
            StartError::NoLives { .. } => "no_lives",
        }
    }
}

/// How the last session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Won(WinReport),
    Lost { level_id: u32, score: u32 },
}

/// Player-facing engine: progress plus the current level session
pub struct Engine<St: ProgressStore = JsonFileStore, C: Clock = SystemClock> {
    catalog: LevelCatalog,
    store: St,
    clock: C,
    progress: PlayerProgress,
    session: Option<GameState>,
    /// Seeds each new session
    seeds: SimpleRng,
    outcome: Option<SessionOutcome>,
    /// The running session's end has been recorded
    settled: bool,
}

impl<St: ProgressStore, C: Clock> Engine<St, C> {
    /// Load progress from `store`
    pub fn new(catalog: LevelCatalog, mut store: St, clock: C, seed: u32) -> Self {
        let mut progress = store.load();
        if progress.sanitize() {
            log::warn!(
                "stored progress out of range, clamped to {} lives, level {}",
                progress.lives,
                progress.highest_level_unlocked
            );
        }
        let mut engine = Self {
            catalog,
            store,
            clock,
            progress,
            session: None,
            seeds: SimpleRng::new(seed),
            outcome: None,
            settled: true,
        };
        engine.refresh_lives();
        engine
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Current session level, if any
    pub fn level(&self) -> Option<&Level> {
        self.session.as_ref().map(|s| s.level())
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    /// Start (or restart) a level, consuming one life.
    ///
    /// Checks in order: the level exists, it is unlocked, a life is available.
    /// A session that already ended is recorded first; otherwise a refused
    /// start leaves progress and the running session untouched.
    pub fn start_level(&mut self, level_id: u32) -> Result<(), StartError> {
        // A paced turn may have ended the running session without a settle.
        self.settle();
        let Some(level) = self.catalog.get(level_id).cloned() else {
            log::warn!("start of unknown level {} refused", level_id);
            return Err(StartError::InvalidLevel(level_id));
        };
        if !self.progress.is_unlocked(level_id) {
            log::info!(
                "level {} is locked (highest unlocked {})",
                level_id,
                self.progress.highest_level_unlocked
            );
            return Err(StartError::Locked {
                level: level_id,
                highest_unlocked: self.progress.highest_level_unlocked,
            });
        }

        let now = self.clock.now_ms();
        self.refresh_lives();
        if !self.progress.consume_life(now) {
            let next_life_in_ms = self.progress.next_life_in_ms(now).unwrap_or(0);
            log::info!("level {} refused: no lives left", level_id);
            return Err(StartError::NoLives { next_life_in_ms });
        }
        self.store.save(&self.progress);

        let seed = self.seeds.next_u32();
        log::info!(
            "level {} started ({} lives left, seed {})",
            level_id,
            self.progress.lives,
            seed
        );
        self.session = Some(GameState::new(level, seed));
        self.outcome = None;
        self.settled = false;
        Ok(())
    }

    /// Swap two cells and resolve the whole turn
    pub fn attempt_swap(&mut self, row_a: usize, col_a: usize, row_b: usize, col_b: usize) -> bool {
        let accepted = match self.session.as_mut() {
            Some(session) => {
                session.attempt_swap(Position::new(row_a, col_a), Position::new(row_b, col_b))
            }
            None => false,
        };
        if accepted {
            self.settle();
        }
        accepted
    }

    /// Commit a swap and hand back its cascade for paced presentation.
    ///
    /// Call [`settle`](Self::settle) once the turn has been consumed.
    pub fn begin_swap(&mut self, a: Position, b: Position) -> Option<Turn<'_>> {
        self.session.as_mut()?.begin_swap(a, b)
    }

    /// Record the end of the session, if it has ended. Returns the outcome once.
    pub fn settle(&mut self) -> Option<SessionOutcome> {
        if self.settled {
            return None;
        }
        let session = self.session.as_ref()?;
        if session.animating() {
            return None;
        }

        let level = session.level();
        let outcome = match session.status() {
            GameStatus::Playing => return None,
            GameStatus::Won { stars } => {
                let report = self.progress.record_win(level, session.score(), stars);
                log::info!(
                    "level {} won with {} points, {} stars",
                    level.id,
                    session.score(),
                    stars
                );
                if let Some(next) = report.unlocked {
                    log::info!("level {} unlocked", next);
                }
                self.store.save(&self.progress);
                SessionOutcome::Won(report)
            }
            GameStatus::Lost => {
                log::info!("level {} lost with {} points", level.id, session.score());
                SessionOutcome::Lost {
                    level_id: level.id,
                    score: session.score(),
                }
            }
        };
        self.settled = true;
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Outcome of the most recently finished session
    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// Snapshot of the running session
    pub fn get_game_state(&self) -> Option<GameSnapshot> {
        self.session.as_ref().map(GameState::snapshot)
    }

    /// Progress with lazy life regeneration applied
    pub fn get_progress(&mut self) -> PlayerProgress {
        self.refresh_lives();
        self.progress.clone()
    }

    /// Milliseconds until the next life, `None` with a full stock
    pub fn next_life_in_ms(&mut self) -> Option<u64> {
        self.refresh_lives();
        self.progress.next_life_in_ms(self.clock.now_ms())
    }

    /// Drop the running session. A session that already ended is recorded first.
    pub fn abandon(&mut self) {
        self.settle();
        if let Some(session) = self.session.take() {
            log::info!("level {} abandoned", session.level().id);
        }
        self.settled = true;
    }

    fn refresh_lives(&mut self) {
        let gained = self.progress.regenerate(self.clock.now_ms());
        if gained > 0 {
            log::debug!("{} lives regenerated, now {}", gained, self.progress.lives);
            self.store.save(&self.progress);
        }
    }
}
