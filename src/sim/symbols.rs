//! Puzzle glyphs and difficulty levels

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single puzzle glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub char);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Glyphs used by clean (verified) deliveries
pub const CLEAN_SYMBOLS: [Symbol; 6] = [
    Symbol('✦'),
    Symbol('◆'),
    Symbol('○'),
    Symbol('△'),
    Symbol('☆'),
    Symbol('◇'),
];

/// Glyphs used by corrupted deliveries
pub const CORRUPTED_SYMBOLS: [Symbol; 6] = [
    Symbol('⚠'),
    Symbol('✗'),
    Symbol('◈'),
    Symbol('⬢'),
    Symbol('◇'),
    Symbol('⬡'),
];

/// The glyph set for a delivery
pub fn symbol_set(corrupted: bool) -> &'static [Symbol; 6] {
    if corrupted {
        &CORRUPTED_SYMBOLS
    } else {
        &CLEAN_SYMBOLS
    }
}

/// Delivery difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Base sequence length for pattern puzzles
    pub fn sequence_len(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 6,
            Difficulty::Hard => 8,
        }
    }

    /// Memory puzzles are two symbols shorter, never below three
    pub fn memory_len(&self) -> usize {
        self.sequence_len().saturating_sub(2).max(3)
    }

    /// Number of symbol pairs in a matching puzzle
    pub fn pair_count(&self) -> usize {
        self.sequence_len().div_ceil(2).max(3)
    }
}
