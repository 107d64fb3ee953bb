//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (every delay is a tick countdown)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod delivery;
pub mod puzzle;
pub mod state;
pub mod symbols;
pub mod tick;

pub use autoplay::{next_commands, solution};
pub use delivery::{DELIVERY_TEMPLATES, Delivery, DeliveryBoard, DeliveryTemplate};
pub use puzzle::{
    InputOutcome, MatchTile, MatchingPuzzle, MemoryPuzzle, PatternPuzzle, Puzzle, PuzzleKind,
    PuzzleMove, SlotState, TimerEvent, generate_puzzle, generate_puzzle_of_kind, tiles_match,
};
pub use state::{CityState, GameEvent, GameState, Hearts, PuzzleSession, SessionPhase};
pub use symbols::{CLEAN_SYMBOLS, CORRUPTED_SYMBOLS, Difficulty, Symbol, symbol_set};
pub use tick::{Command, TickInput, tick};
