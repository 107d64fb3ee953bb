//! Game state and core simulation types
//!
//! Nothing here is persisted; a page load always starts from [`GameState::new`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::delivery::{Delivery, DeliveryBoard};
use super::puzzle::{Puzzle, generate_puzzle};
use crate::consts::*;

/// Cosmetic condition of the city, derived from hearts restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityState {
    Stable,
    Glitching,
    Corrupted,
}

impl CityState {
    pub fn from_hearts(hearts: u32) -> Self {
        if hearts <= CORRUPTED_MAX_HEARTS {
            CityState::Corrupted
        } else if hearts <= GLITCHING_MAX_HEARTS {
            CityState::Glitching
        } else {
            CityState::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CityState::Stable => "stable",
            CityState::Glitching => "glitching",
            CityState::Corrupted => "corrupted",
        }
    }
}

/// Hearts restored counter, always within `0..=total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hearts {
    restored: u32,
    total: u32,
}

impl Default for Hearts {
    fn default() -> Self {
        Self::new(STARTING_HEARTS, TOTAL_HEARTS)
    }
}

impl Hearts {
    pub fn new(restored: u32, total: u32) -> Self {
        Self {
            restored: restored.min(total),
            total,
        }
    }

    pub fn restored(&self) -> u32 {
        self.restored
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_full(&self) -> bool {
        self.restored >= self.total
    }

    /// Restore one heart, capped at total. Returns true if the count changed.
    pub fn restore_one(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.restored += 1;
        true
    }

    /// Restored share in 0.0..=1.0
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.restored as f32 / self.total as f32
    }

    pub fn city_state(&self) -> CityState {
        CityState::from_hearts(self.restored)
    }
}

/// Where the open puzzle modal is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Player is working on the puzzle
    Solving,
    /// Puzzle solved, success panel showing
    Success { ticks_left: u32 },
}

/// An accepted delivery and its puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSession {
    pub delivery: Delivery,
    pub puzzle: Puzzle,
    pub phase: SessionPhase,
}

impl PuzzleSession {
    pub fn new<R: rand::Rng>(delivery: Delivery, rng: &mut R) -> Self {
        let puzzle = generate_puzzle(delivery.difficulty, delivery.corrupted, rng);
        Self {
            delivery,
            puzzle,
            phase: SessionPhase::Solving,
        }
    }

    pub fn is_solving(&self) -> bool {
        self.phase == SessionPhase::Solving
    }

    pub fn showing_success(&self) -> bool {
        matches!(self.phase, SessionPhase::Success { .. })
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh set of requests was posted
    BoardRefreshed,
    /// A delivery was accepted and its puzzle opened
    DeliveryAccepted { id: String },
    /// Player input was rejected as wrong
    PuzzleMismatch,
    /// A matching pair locked
    PairMatched,
    /// A puzzle timer expired
    PuzzleTimer(super::puzzle::TimerEvent),
    /// Puzzle solved, success panel is up
    PuzzleSolved,
    /// Input was cleared with the reset button
    PuzzleReset,
    /// The modal was closed without completing
    PuzzleClosed { id: String },
    /// A delivery finished and the city got a heart back
    DeliveryCompleted { id: String, hearts: u32 },
    /// The derived city state changed
    CityStateChanged { from: CityState, to: CityState },
}

/// Complete game state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG for all gameplay randomness
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// City progress
    pub hearts: Hearts,
    /// Open delivery requests
    pub board: DeliveryBoard,
    /// Open puzzle modal, if any
    pub session: Option<PuzzleSession>,
    /// Events produced by the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh game; the request board starts scanning right away
    pub fn new(seed: u64) -> Self {
        let mut board = DeliveryBoard::new();
        board.refresh();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            hearts: Hearts::default(),
            board,
            session: None,
            events: Vec::new(),
        }
    }

    /// Current city condition
    pub fn city_state(&self) -> CityState {
        self.hearts.city_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new(12345);
        assert_eq!(state.hearts.restored(), 3);
        assert_eq!(state.hearts.total(), 12);
        assert_eq!(state.city_state(), CityState::Glitching);
        assert!(state.board.is_scanning());
        assert!(state.session.is_none());
    }

    #[test]
    fn test_city_state_thresholds() {
        assert_eq!(CityState::from_hearts(0), CityState::Corrupted);
        assert_eq!(CityState::from_hearts(2), CityState::Corrupted);
        assert_eq!(CityState::from_hearts(3), CityState::Glitching);
        assert_eq!(CityState::from_hearts(5), CityState::Glitching);
        assert_eq!(CityState::from_hearts(6), CityState::Stable);
        assert_eq!(CityState::from_hearts(12), CityState::Stable);
    }

    #[test]
    fn test_hearts_capped() {
        let mut hearts = Hearts::new(11, 12);
        assert!(hearts.restore_one());
        assert!(hearts.is_full());
        assert!(!hearts.restore_one());
        assert_eq!(hearts.restored(), 12);

        assert_eq!(Hearts::new(40, 12).restored(), 12);
        assert_eq!(Hearts::new(0, 0).fraction(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_city_state_partitions_hearts(h in 0u32..=TOTAL_HEARTS) {
            let state = Hearts::new(h, TOTAL_HEARTS).city_state();
            prop_assert_eq!(state == CityState::Corrupted, h <= 2);
            prop_assert_eq!(state == CityState::Glitching, (3..=5).contains(&h));
            prop_assert_eq!(state == CityState::Stable, h >= 6);
        }

        #[test]
        fn prop_hearts_never_exceed_total(start in 0u32..=TOTAL_HEARTS, restores in 0usize..40) {
            let mut hearts = Hearts::new(start, TOTAL_HEARTS);
            for _ in 0..restores {
                hearts.restore_one();
                prop_assert!(hearts.restored() <= hearts.total());
            }
        }
    }
}
