//! Cascade resolution
//!
//! One player swap triggers a chain of steps. Each step detects matches (and,
//! on the first step of an activation swap, special-piece blasts), credits
//! them, tags special pieces, then lets gravity settle the columns and refills
//! the top. Resolution stops at the first step that finds nothing to clear.
//!
//! Resolution is synchronous and has no notion of time. [`Cascade`] exposes
//! the chain as a lazy, finite iterator of [`CascadeStep`]s; every step carries
//! the board after clearing and after refilling so a front end can present the
//! two beats at its own pace.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::grid::{Cell, Grid};
use crate::matcher::{detect, Match};
use crate::rng::SymbolSource;
use crate::scoring::{match_points, SymbolCounts};
use crate::types::{Position, Special, Symbol, BOMB_MATCH_LEN, BOMB_RADIUS, ROCKET_MATCH_LEN};

/// Cells cleared by a detonating special piece.
///
/// Counts as a synthetic match for scoring and collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blast {
    pub origin: Position,
    pub special: Special,
    /// Cells not already claimed by an earlier blast of the same step
    pub cells: Vec<Position>,
}

/// Result of one cascade iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeStep {
    /// 1-based step index within the turn; the score multiplier
    pub combo: u32,
    pub matches: Vec<Match>,
    pub blasts: Vec<Blast>,
    /// Special pieces created this step, at their pre-gravity positions
    pub created: Vec<(Position, Special)>,
    pub points: u32,
    /// Cells credited this step, per symbol (cross cells count once per match)
    pub collected: SymbolCounts,
    /// Board with `matched` flags set, before gravity
    pub cleared: Grid,
    /// Board after gravity and refill (new cells flagged `is_new`)
    pub settled: Grid,
}

/// Resumable cascade state, independent of where the board lives
#[derive(Debug, Clone, Default)]
pub struct CascadeResolver {
    combo: u32,
    triggers: ArrayVec<Position, 2>,
    finished: bool,
}

impl CascadeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver whose first step detonates the special pieces at `triggers`
    pub fn with_triggers(triggers: ArrayVec<Position, 2>) -> Self {
        Self {
            triggers,
            ..Self::default()
        }
    }

    /// Steps resolved so far
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Run one iteration on `grid`. Returns `None` once the board is stable.
    pub fn step<S: SymbolSource + ?Sized>(
        &mut self,
        grid: &mut Grid,
        source: &mut S,
        palette: &[Symbol],
    ) -> Option<CascadeStep> {
        if self.finished {
            return None;
        }
        grid.clear_transient();

        let matches = detect(grid);
        let triggers = std::mem::take(&mut self.triggers);
        let blasts = blast_regions(grid, &triggers);
        if matches.is_empty() && blasts.is_empty() {
            self.finished = true;
            return None;
        }
        self.combo += 1;
        let combo = self.combo;

        let cols = grid.cols();
        let idx = |p: Position| p.row * cols + p.col;
        let mut doomed = vec![false; grid.rows() * cols];
        let mut blasted = vec![false; grid.rows() * cols];
        let mut collected = SymbolCounts::new();
        let mut points = 0u32;

        for blast in &blasts {
            for &pos in &blast.cells {
                doomed[idx(pos)] = true;
                blasted[idx(pos)] = true;
                if let Some(cell) = grid.get(pos) {
                    collected.add(cell.symbol, 1);
                }
            }
            points = points.saturating_add(match_points(blast.cells.len(), combo));
        }

        for m in &matches {
            for pos in m.positions() {
                doomed[idx(pos)] = true;
                if let Some(cell) = grid.get(pos) {
                    collected.add(cell.symbol, 1);
                }
            }
            points = points.saturating_add(match_points(m.length, combo));
        }

        let created = special_tags(&matches, |p| blasted[idx(p)]);
        for &(pos, special) in &created {
            doomed[idx(pos)] = false;
            grid.set_special(pos, Some(special));
        }

        for (i, _) in doomed.iter().enumerate().filter(|(_, d)| **d) {
            if let Some(cell) = grid.get_mut(Position::new(i / cols, i % cols)) {
                cell.matched = true;
            }
        }
        let cleared = grid.clone();

        apply_gravity(grid, source, palette);
        let settled = grid.clone();

        log::trace!(
            "cascade step {}: {} matches, {} blasts, {} points",
            combo,
            matches.len(),
            blasts.len(),
            points
        );

        Some(CascadeStep {
            combo,
            matches,
            blasts,
            created,
            points,
            collected,
            cleared,
            settled,
        })
    }
}

/// Lazy iterator over the steps of one cascade
pub struct Cascade<'a, S: SymbolSource + ?Sized> {
    grid: &'a mut Grid,
    source: &'a mut S,
    palette: &'a [Symbol],
    resolver: CascadeResolver,
}

impl<'a, S: SymbolSource + ?Sized> Cascade<'a, S> {
    pub fn new(grid: &'a mut Grid, source: &'a mut S, palette: &'a [Symbol]) -> Self {
        Self::with_resolver(grid, source, palette, CascadeResolver::new())
    }

    pub fn with_resolver(
        grid: &'a mut Grid,
        source: &'a mut S,
        palette: &'a [Symbol],
        resolver: CascadeResolver,
    ) -> Self {
        Self {
            grid,
            source,
            palette,
            resolver,
        }
    }

    pub fn combo(&self) -> u32 {
        self.resolver.combo()
    }
}

impl<S: SymbolSource + ?Sized> Iterator for Cascade<'_, S> {
    type Item = CascadeStep;

    fn next(&mut self) -> Option<CascadeStep> {
        self.resolver
            .step(&mut *self.grid, &mut *self.source, self.palette)
    }
}

/// Which middle cells become special pieces.
///
/// Runs of exactly four leave a rocket along the run's axis, five or more a
/// bomb. When two runs pick the same cell the higher-ranked tag wins. Cells
/// inside a blast are cleared and cannot carry a tag.
fn special_tags(
    matches: &[Match],
    is_blasted: impl Fn(Position) -> bool,
) -> Vec<(Position, Special)> {
    let mut tags: Vec<(Position, Special)> = Vec::new();
    for m in matches {
        let special = if m.length >= BOMB_MATCH_LEN {
            Special::Bomb
        } else if m.length == ROCKET_MATCH_LEN {
            Special::rocket(m.orientation)
        } else {
            continue;
        };
        let pos = m.middle();
        if is_blasted(pos) {
            continue;
        }
        match tags.iter_mut().find(|(p, _)| *p == pos) {
            Some(existing) => {
                if special.rank() > existing.1.rank() {
                    existing.1 = special;
                }
            }
            None => tags.push((pos, special)),
        }
    }
    tags
}

/// Cells hit by a special piece, including itself
fn blast_area(grid: &Grid, origin: Position, special: Special) -> Vec<Position> {
    match special {
        Special::RocketH => (0..grid.cols())
            .map(|col| Position::new(origin.row, col))
            .collect(),
        Special::RocketV => (0..grid.rows())
            .map(|row| Position::new(row, origin.col))
            .collect(),
        Special::Bomb => {
            let rows = origin.row.saturating_sub(BOMB_RADIUS)
                ..=(origin.row + BOMB_RADIUS).min(grid.rows() - 1);
            let cols = origin.col.saturating_sub(BOMB_RADIUS)
                ..=(origin.col + BOMB_RADIUS).min(grid.cols() - 1);
            rows.flat_map(|row| cols.clone().map(move |col| Position::new(row, col)))
                .collect()
        }
    }
}

/// Detonate the specials at `triggers`, chaining into specials caught in a blast
fn blast_regions(grid: &Grid, triggers: &[Position]) -> Vec<Blast> {
    if triggers.is_empty() {
        return Vec::new();
    }
    let cols = grid.cols();
    let idx = |p: Position| p.row * cols + p.col;
    let mut claimed = vec![false; grid.rows() * cols];
    let mut detonated = vec![false; grid.rows() * cols];
    let mut queue: VecDeque<Position> = triggers.iter().copied().collect();
    let mut blasts = Vec::new();

    while let Some(origin) = queue.pop_front() {
        let Some(special) = grid.get(origin).and_then(|c| c.special) else {
            continue;
        };
        if std::mem::replace(&mut detonated[idx(origin)], true) {
            continue;
        }

        let mut cells = Vec::new();
        for pos in blast_area(grid, origin, special) {
            if std::mem::replace(&mut claimed[idx(pos)], true) {
                continue;
            }
            if pos != origin && grid.get(pos).is_some_and(|c| c.special.is_some()) {
                queue.push_back(pos);
            }
            cells.push(pos);
        }
        blasts.push(Blast {
            origin,
            special,
            cells,
        });
    }
    blasts
}

/// Drop surviving cells to the bottom of each column and refill the top.
///
/// New cells are drawn column by column, left to right, filling each column's
/// gap from the bottom up.
fn apply_gravity<S: SymbolSource + ?Sized>(grid: &mut Grid, source: &mut S, palette: &[Symbol]) {
    let rows = grid.rows();
    for col in 0..grid.cols() {
        // Survivors, bottom to top.
        let mut column: Vec<Cell> = (0..rows)
            .rev()
            .filter_map(|row| grid.get(Position::new(row, col)).copied())
            .filter(|c| !c.matched)
            .collect();

        let mut row = rows - column.len();
        while column.len() < rows {
            row -= 1;
            let symbol = source.next_symbol(palette);
            let fresh = grid.spawn(row, col, symbol, true);
            column.push(fresh);
        }

        column.reverse();
        grid.write_column(col, &column);
    }
}
