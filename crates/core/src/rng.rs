//! RNG module - seedable symbol supply
//!
//! Board generation and refills draw symbols through the [`SymbolSource`] trait
//! so that a game is fully reproducible from its seed:
//!
//! - [`SimpleRng`]: LCG used in production, seeded per session
//! - [`FixedSymbols`]: cycles through a fixed sequence, for scripted tests

use crate::types::Symbol;

/// Supplier of random symbols drawn from a level palette
pub trait SymbolSource {
    /// Draw the next symbol. `palette` is never empty.
    fn next_symbol(&mut self, palette: &[Symbol]) -> Symbol;
}

impl<S: SymbolSource + ?Sized> SymbolSource for &mut S {
    fn next_symbol(&mut self, palette: &[Symbol]) -> Symbol {
        (**self).next_symbol(palette)
    }
}

impl<S: SymbolSource + ?Sized> SymbolSource for Box<S> {
    fn next_symbol(&mut self, palette: &[Symbol]) -> Symbol {
        (**self).next_symbol(palette)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits cycle quickly; use the high half.
        (self.next_u32() >> 16) % max
    }

    /// Current state (for restarting a game with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SymbolSource for SimpleRng {
    fn next_symbol(&mut self, palette: &[Symbol]) -> Symbol {
        palette[self.next_range(palette.len() as u32) as usize]
    }
}

/// Deterministic source cycling through a fixed list
///
/// Ignores the palette. The sequence must not be degenerate (a single repeated
/// symbol would refill whole columns with matches forever).
#[derive(Debug, Clone)]
pub struct FixedSymbols {
    sequence: Vec<Symbol>,
    cursor: usize,
}

impl FixedSymbols {
    /// # Panics
    ///
    /// Panics if `sequence` is empty.
    pub fn new(sequence: Vec<Symbol>) -> Self {
        assert!(!sequence.is_empty(), "FixedSymbols needs at least one symbol");
        Self {
            sequence,
            cursor: 0,
        }
    }

    /// Build from letter codes, e.g. `"CLHK"` (see [`Symbol::from_letter`]).
    /// Unknown characters are skipped.
    pub fn from_letters(letters: &str) -> Self {
        Self::new(letters.chars().filter_map(Symbol::from_letter).collect())
    }

    /// Number of symbols handed out so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl SymbolSource for FixedSymbols {
    fn next_symbol(&mut self, _palette: &[Symbol]) -> Symbol {
        let symbol = self.sequence[self.cursor % self.sequence.len()];
        self.cursor += 1;
        symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_symbols_stay_in_palette() {
        let palette = [Symbol::Candy, Symbol::Cake, Symbol::Donut];
        let mut rng = SimpleRng::new(7);
        for _ in 0..500 {
            assert!(palette.contains(&rng.next_symbol(&palette)));
        }
    }

    #[test]
    fn test_every_palette_symbol_appears() {
        let palette = Symbol::ALL;
        let mut rng = SimpleRng::new(99);
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[rng.next_symbol(&palette).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_fixed_symbols_cycle() {
        let mut fixed = FixedSymbols::from_letters("CLH");
        let drawn: Vec<Symbol> = (0..5).map(|_| fixed.next_symbol(&Symbol::ALL)).collect();
        assert_eq!(
            drawn,
            vec![
                Symbol::Candy,
                Symbol::Lollipop,
                Symbol::Chocolate,
                Symbol::Candy,
                Symbol::Lollipop
            ]
        );
        assert_eq!(fixed.drawn(), 5);
    }
}
