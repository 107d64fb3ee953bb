//! COURIER.EXE - a dream delivery puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (deliveries, puzzles, hearts, timers)
//! - `rain`: Falling glyph background simulation
//! - `ui`: Presentation mapping (texts, palettes, telemetry)
//! - `renderer`: DOM and Canvas2D output (wasm32 only)
//! - `settings`: Player preferences

pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod rain;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::UiError;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Hearts restored on a fresh page load
    pub const STARTING_HEARTS: u32 = 3;
    /// Hearts the city can hold
    pub const TOTAL_HEARTS: u32 = 12;
    /// Highest heart count at which the city is corrupted
    pub const CORRUPTED_MAX_HEARTS: u32 = 2;
    /// Highest heart count at which the city is glitching
    pub const GLITCHING_MAX_HEARTS: u32 = 5;

    /// Requests shown on the delivery board
    pub const BOARD_SIZE: usize = 3;
    /// Chance that a request is corrupted while the city is corrupted
    pub const CORRUPTED_REQUEST_CHANCE: f64 = 0.7;

    /// Board rescan duration (1.5 seconds)
    pub const SCAN_TICKS: u32 = secs_to_ticks(1.5);
    /// Delay before a wrong answer is cleared (1 second)
    pub const MISMATCH_CLEAR_TICKS: u32 = secs_to_ticks(1.0);
    /// How long the success panel stays up before the heart is restored (2 seconds)
    pub const SUCCESS_DISPLAY_TICKS: u32 = secs_to_ticks(2.0);
    /// How long a memory sequence stays visible (3 seconds)
    pub const MEMORY_REVEAL_TICKS: u32 = secs_to_ticks(3.0);

    /// Convert seconds to whole simulation ticks
    pub const fn secs_to_ticks(secs: f32) -> u32 {
        (secs * SIM_HZ as f32) as u32
    }
}
