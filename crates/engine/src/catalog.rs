//! Level catalog - the ordered list of playable levels

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use candy_match_core::types::{Goal, Level, Symbol, MIN_MATCH_LEN};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read level catalog `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level catalog is empty")]
    Empty,
    #[error("level id {0} appears more than once")]
    DuplicateId(u32),
    #[error("level {id}: {reason}")]
    InvalidLevel { id: u32, reason: &'static str },
}

/// Levels ordered by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

/// (moves, target score, goals, palette size, reward tokens)
type LevelRow = (u32, u32, &'static [(Symbol, u32)], usize, u32);

const BUILTIN: [LevelRow; 10] = [
    (20, 1000, &[(Symbol::Candy, 10)], 5, 50),
    (20, 1500, &[(Symbol::Lollipop, 15)], 5, 50),
    (18, 2000, &[(Symbol::Chocolate, 12), (Symbol::Candy, 12)], 5, 75),
    (20, 2500, &[(Symbol::Cookie, 20)], 5, 75),
    (18, 3000, &[(Symbol::Cake, 15), (Symbol::Lollipop, 15)], 5, 100),
    (22, 3500, &[(Symbol::Donut, 20)], 6, 100),
    (20, 4000, &[(Symbol::Candy, 20), (Symbol::Cookie, 20)], 6, 125),
    (18, 4500, &[(Symbol::Chocolate, 25)], 6, 125),
    (20, 5000, &[(Symbol::Cake, 20), (Symbol::Donut, 20)], 6, 150),
    (16, 6000, &[(Symbol::Candy, 15), (Symbol::Lollipop, 15), (Symbol::Cookie, 15)], 6, 200),
];

impl LevelCatalog {
    /// The built-in ten-level campaign on 8x8 boards
    pub fn builtin() -> Self {
        let levels = BUILTIN
            .iter()
            .zip(1u32..)
            .map(|(&(moves, target_score, goals, palette, reward_tokens), id)| Level {
                id,
                rows: 8,
                cols: 8,
                moves,
                target_score,
                goals: goals.iter().map(|&(s, n)| Goal::new(s, n)).collect(),
                reward_tokens,
                palette: Level::palette_of(palette),
            })
            .collect();
        Self { levels }
    }

    /// Validate and sort a set of levels
    pub fn from_levels(mut levels: Vec<Level>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for level in &levels {
            validate(level)?;
            if !seen.insert(level.id) {
                return Err(CatalogError::DuplicateId(level.id));
            }
        }
        levels.sort_by_key(|l| l.id);
        Ok(Self { levels })
    }

    /// Parse a JSON array of levels (camelCase keys)
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::from_levels(levels)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, id: u32) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Level following `id` in catalog order
    pub fn next_after(&self, id: u32) -> Option<&Level> {
        self.levels.iter().find(|l| l.id > id)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(level: &Level) -> Result<(), CatalogError> {
    let fail = |reason| {
        Err(CatalogError::InvalidLevel {
            id: level.id,
            reason,
        })
    };
    if level.id == 0 {
        return fail("ids start at 1");
    }
    if level.rows < MIN_MATCH_LEN || level.cols < MIN_MATCH_LEN {
        return fail("board must be at least 3x3");
    }
    if level.moves == 0 {
        return fail("needs at least one move");
    }
    let distinct: HashSet<Symbol> = level.palette.iter().copied().collect();
    if distinct.len() < 3 {
        return fail("palette needs at least three distinct symbols");
    }
    if level.goals.iter().any(|g| !distinct.contains(&g.symbol)) {
        return fail("goal symbol missing from palette");
    }
    Ok(())
}
