//! Click and key actions
//!
//! Interactive elements get `data-action` and optional `data-value`
//! attributes; a single delegated click listener turns them back into
//! actions.

use crate::sim::{Command, PuzzleMove, Symbol};

/// Something the player clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Forwarded to the simulation
    Game(Command),
    ToggleRain,
    ToggleReducedMotion,
    ToggleTelemetry,
    CycleQuality,
}

impl UiAction {
    /// Decode `data-action` / `data-value`
    pub fn parse(action: &str, value: Option<&str>) -> Option<Self> {
        let game = |command| Some(UiAction::Game(command));
        match action {
            "refresh" => game(Command::RefreshBoard),
            "accept" => game(Command::AcceptDelivery(value?.to_string())),
            "symbol" => {
                let mut chars = value?.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                game(Command::Puzzle(PuzzleMove::Symbol(Symbol(ch))))
            }
            "tile" => game(Command::Puzzle(PuzzleMove::Tile(value?.parse().ok()?))),
            "reset" => game(Command::ResetPuzzle),
            "close" => game(Command::ClosePuzzle),
            "toggle-rain" => Some(UiAction::ToggleRain),
            "toggle-motion" => Some(UiAction::ToggleReducedMotion),
            "toggle-telemetry" => Some(UiAction::ToggleTelemetry),
            "cycle-quality" => Some(UiAction::CycleQuality),
            _ => None,
        }
    }

    /// Decode a `keydown` key name
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(UiAction::Game(Command::ClosePuzzle)),
            _ => None,
        }
    }
}
