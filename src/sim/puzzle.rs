//! Puzzle generation and interaction state machines
//!
//! Three minigames gate every delivery:
//! - Pattern: copy a visible glyph sequence
//! - Memory: copy a glyph sequence that hides itself after a short reveal
//! - Matching: pair up tiles whose glyphs belong together
//!
//! All delays are tick countdowns advanced by [`Puzzle::tick`].

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::symbols::{Difficulty, Symbol, symbol_set};
use crate::consts::{MEMORY_REVEAL_TICKS, MISMATCH_CLEAR_TICKS};

/// Puzzle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuzzleKind {
    Pattern,
    Memory,
    Matching,
}

impl PuzzleKind {
    pub const ALL: [PuzzleKind; 3] = [PuzzleKind::Pattern, PuzzleKind::Memory, PuzzleKind::Matching];

    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleKind::Pattern => "pattern",
            PuzzleKind::Memory => "memory",
            PuzzleKind::Matching => "matching",
        }
    }
}

/// Result of feeding one player action into a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Accepted, puzzle not finished yet
    Progress,
    /// Two tiles locked together (matching only)
    Matched,
    /// Wrong answer, input clears after a delay
    Mismatch,
    /// Puzzle solved
    Solved,
    /// Action not applicable right now
    Ignored,
}

/// A single player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleMove {
    /// Press a glyph button (pattern/memory)
    Symbol(Symbol),
    /// Pick a tile by id (matching)
    Tile(u32),
}

/// Timer expirations reported by [`Puzzle::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A wrong sequence was wiped
    InputCleared,
    /// A wrong tile selection was released
    SelectionCleared,
    /// The memory sequence is now hidden
    SequenceHidden,
}

/// Feedback state of one input slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Correct,
    Wrong,
}

/// Copy-the-sequence puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPuzzle {
    pub sequence: Vec<Symbol>,
    pub user_input: Vec<Symbol>,
    pub complete: bool,
    /// Ticks until a wrong answer is wiped (0 = none pending)
    clear_ticks: u32,
}

impl PatternPuzzle {
    pub fn new(sequence: Vec<Symbol>) -> Self {
        Self {
            sequence,
            user_input: Vec::new(),
            complete: false,
            clear_ticks: 0,
        }
    }

    /// True while a wrong answer is on screen waiting to be cleared
    pub fn awaiting_clear(&self) -> bool {
        self.clear_ticks > 0
    }

    /// Feed one glyph
    pub fn push(&mut self, symbol: Symbol) -> InputOutcome {
        if self.complete || self.awaiting_clear() || self.user_input.len() >= self.sequence.len() {
            return InputOutcome::Ignored;
        }

        self.user_input.push(symbol);
        if self.user_input.len() < self.sequence.len() {
            return InputOutcome::Progress;
        }

        if self.user_input == self.sequence {
            self.complete = true;
            InputOutcome::Solved
        } else {
            self.clear_ticks = MISMATCH_CLEAR_TICKS;
            InputOutcome::Mismatch
        }
    }

    /// Clear entered glyphs (no-op once solved)
    pub fn reset(&mut self) {
        if !self.complete {
            self.user_input.clear();
            self.clear_ticks = 0;
        }
    }

    /// Feedback for input slot `index`
    pub fn slot(&self, index: usize) -> SlotState {
        match (self.user_input.get(index), self.sequence.get(index)) {
            (Some(given), Some(expected)) if given == expected => SlotState::Correct,
            (Some(_), _) => SlotState::Wrong,
            (None, _) => SlotState::Empty,
        }
    }

    fn tick(&mut self) -> Option<TimerEvent> {
        if self.clear_ticks == 0 {
            return None;
        }
        self.clear_ticks -= 1;
        if self.clear_ticks == 0 {
            self.user_input.clear();
            Some(TimerEvent::InputCleared)
        } else {
            None
        }
    }
}

/// Recall-the-sequence puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPuzzle {
    pub pattern: PatternPuzzle,
    pub show_sequence: bool,
    /// Index of the next glyph the player must enter
    pub current_step: usize,
    reveal_ticks: u32,
}

impl MemoryPuzzle {
    pub fn new(sequence: Vec<Symbol>) -> Self {
        Self {
            pattern: PatternPuzzle::new(sequence),
            show_sequence: true,
            current_step: 0,
            reveal_ticks: MEMORY_REVEAL_TICKS,
        }
    }

    pub fn push(&mut self, symbol: Symbol) -> InputOutcome {
        if self.show_sequence {
            return InputOutcome::Ignored;
        }
        let outcome = self.pattern.push(symbol);
        self.current_step = self.pattern.user_input.len();
        outcome
    }

    pub fn reset(&mut self) {
        self.pattern.reset();
        self.current_step = self.pattern.user_input.len();
    }

    fn tick(&mut self) -> Option<TimerEvent> {
        if self.show_sequence {
            self.reveal_ticks = self.reveal_ticks.saturating_sub(1);
            if self.reveal_ticks == 0 {
                self.show_sequence = false;
                return Some(TimerEvent::SequenceHidden);
            }
            return None;
        }
        let event = self.pattern.tick();
        self.current_step = self.pattern.user_input.len();
        event
    }
}

/// One tile of a matching puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTile {
    pub id: u32,
    pub symbol: Symbol,
    /// Glyph this tile pairs with
    #[serde(rename = "match")]
    pub partner: Symbol,
}

/// Two tiles match when either one names the other's glyph as its partner
pub fn tiles_match(a: &MatchTile, b: &MatchTile) -> bool {
    a.partner == b.symbol || b.partner == a.symbol
}

/// Pair-the-tiles puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPuzzle {
    pub pairs: Vec<MatchTile>,
    pub selected: Vec<u32>,
    pub matched: Vec<u32>,
    pub complete: bool,
    clear_ticks: u32,
}

impl MatchingPuzzle {
    pub fn new(pairs: Vec<MatchTile>) -> Self {
        Self {
            pairs,
            selected: Vec::new(),
            matched: Vec::new(),
            complete: false,
            clear_ticks: 0,
        }
    }

    pub fn tile(&self, id: u32) -> Option<&MatchTile> {
        self.pairs.iter().find(|t| t.id == id)
    }

    pub fn is_matched(&self, id: u32) -> bool {
        self.matched.contains(&id)
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    pub fn awaiting_clear(&self) -> bool {
        self.clear_ticks > 0
    }

    /// Pick a tile
    pub fn select(&mut self, id: u32) -> InputOutcome {
        if self.complete
            || self.awaiting_clear()
            || self.tile(id).is_none()
            || self.is_matched(id)
            || self.is_selected(id)
        {
            return InputOutcome::Ignored;
        }

        self.selected.push(id);
        if self.selected.len() < 2 {
            return InputOutcome::Progress;
        }

        let hit = match (self.tile(self.selected[0]), self.tile(self.selected[1])) {
            (Some(a), Some(b)) => tiles_match(a, b),
            _ => false,
        };

        if !hit {
            self.clear_ticks = MISMATCH_CLEAR_TICKS;
            return InputOutcome::Mismatch;
        }

        self.matched.append(&mut self.selected);
        if self.matched.len() == self.pairs.len() {
            self.complete = true;
            InputOutcome::Solved
        } else {
            InputOutcome::Matched
        }
    }

    /// Drop the current selection (matched tiles stay locked)
    pub fn reset(&mut self) {
        self.selected.clear();
        self.clear_ticks = 0;
    }

    fn tick(&mut self) -> Option<TimerEvent> {
        if self.clear_ticks == 0 {
            return None;
        }
        self.clear_ticks -= 1;
        if self.clear_ticks == 0 {
            self.selected.clear();
            Some(TimerEvent::SelectionCleared)
        } else {
            None
        }
    }
}

/// A puzzle gating one delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Puzzle {
    Pattern(PatternPuzzle),
    Memory(MemoryPuzzle),
    Matching(MatchingPuzzle),
}

impl Puzzle {
    pub fn kind(&self) -> PuzzleKind {
        match self {
            Puzzle::Pattern(_) => PuzzleKind::Pattern,
            Puzzle::Memory(_) => PuzzleKind::Memory,
            Puzzle::Matching(_) => PuzzleKind::Matching,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Puzzle::Pattern(p) => p.complete,
            Puzzle::Memory(m) => m.pattern.complete,
            Puzzle::Matching(m) => m.complete,
        }
    }

    /// Apply a player action; actions for the wrong variant are ignored
    pub fn apply(&mut self, mv: PuzzleMove) -> InputOutcome {
        match (self, mv) {
            (Puzzle::Pattern(p), PuzzleMove::Symbol(s)) => p.push(s),
            (Puzzle::Memory(m), PuzzleMove::Symbol(s)) => m.push(s),
            (Puzzle::Matching(m), PuzzleMove::Tile(id)) => m.select(id),
            _ => InputOutcome::Ignored,
        }
    }

    pub fn reset(&mut self) {
        match self {
            Puzzle::Pattern(p) => p.reset(),
            Puzzle::Memory(m) => m.reset(),
            Puzzle::Matching(m) => m.reset(),
        }
    }

    /// Advance puzzle timers by one tick
    pub fn tick(&mut self) -> Option<TimerEvent> {
        match self {
            Puzzle::Pattern(p) => p.tick(),
            Puzzle::Memory(m) => m.tick(),
            Puzzle::Matching(m) => m.tick(),
        }
    }
}

/// Generate a puzzle of a uniformly random kind
pub fn generate_puzzle<R: Rng>(difficulty: Difficulty, corrupted: bool, rng: &mut R) -> Puzzle {
    let kind = PuzzleKind::ALL[rng.random_range(0..PuzzleKind::ALL.len())];
    generate_puzzle_of_kind(kind, difficulty, corrupted, rng)
}

/// Generate a puzzle of the given kind
pub fn generate_puzzle_of_kind<R: Rng>(
    kind: PuzzleKind,
    difficulty: Difficulty,
    corrupted: bool,
    rng: &mut R,
) -> Puzzle {
    let symbols = symbol_set(corrupted);
    match kind {
        PuzzleKind::Pattern => {
            Puzzle::Pattern(PatternPuzzle::new(random_sequence(difficulty.sequence_len(), symbols, rng)))
        }
        PuzzleKind::Memory => {
            Puzzle::Memory(MemoryPuzzle::new(random_sequence(difficulty.memory_len(), symbols, rng)))
        }
        PuzzleKind::Matching => {
            let mut tiles = Vec::with_capacity(difficulty.pair_count() * 2);
            for i in 0..difficulty.pair_count() {
                // Adjacent glyphs pair up; hard puzzles wrap around and repeat a pair
                let symbol = symbols[(2 * i) % symbols.len()];
                let partner = symbols[(2 * i + 1) % symbols.len()];
                let id = (2 * i) as u32;
                tiles.push(MatchTile { id, symbol, partner });
                tiles.push(MatchTile {
                    id: id + 1,
                    symbol: partner,
                    partner: symbol,
                });
            }
            tiles.shuffle(rng);
            Puzzle::Matching(MatchingPuzzle::new(tiles))
        }
    }
}

fn random_sequence<R: Rng>(len: usize, symbols: &[Symbol], rng: &mut R) -> Vec<Symbol> {
    (0..len).map(|_| symbols[rng.random_range(0..symbols.len())]).collect()
}
