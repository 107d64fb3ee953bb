//! Presentation mapping
//!
//! Texts, tones and telemetry numbers derived from simulation state, the
//! element trees built from them, and the click actions those elements carry.
//! The renderer only turns the trees into DOM, so all of it is testable
//! natively.

pub mod action;
pub mod node;
pub mod view;

pub use action::UiAction;
pub use node::Node;

use crate::sim::{CityState, Delivery, Difficulty, Hearts, PuzzleKind};

pub const GAME_TITLE: &str = "COURIER.EXE";
pub const GAME_SUBTITLE: &str = "Digital Witch • Dream Delivery Service";
pub const GAME_VERSION: &str = "v2.3.7-beta";

/// Color family of a piece of UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Warn,
    Bad,
}

impl Tone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Ok => "tone-ok",
            Tone::Warn => "tone-warn",
            Tone::Bad => "tone-bad",
        }
    }

    pub fn for_city(city: CityState) -> Self {
        match city {
            CityState::Stable => Tone::Ok,
            CityState::Glitching => Tone::Warn,
            CityState::Corrupted => Tone::Bad,
        }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Tone::Ok,
            Difficulty::Medium => Tone::Warn,
            Difficulty::Hard => Tone::Bad,
        }
    }
}

/// Page background class
pub fn city_class(city: CityState) -> &'static str {
    match city {
        CityState::Stable => "city-stable",
        CityState::Glitching => "city-glitching",
        CityState::Corrupted => "city-corrupted",
    }
}

/// Connection status shown in the header
pub fn header_status(city: CityState) -> &'static str {
    match city {
        CityState::Stable => "CONNECTION STABLE",
        CityState::Glitching => "SIGNAL UNSTABLE",
        CityState::Corrupted => "SYSTEM CRITICAL",
    }
}

/// Icon next to the city status title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Shield,
    Zap,
    Heart,
}

impl StatusIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            StatusIcon::Shield => "⛨",
            StatusIcon::Zap => "⚡",
            StatusIcon::Heart => "♥",
        }
    }
}

/// Flavor message for the city status panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: &'static str,
    pub icon: StatusIcon,
    pub tone: Tone,
}

/// Message by restored percentage (>= 80 optimal, >= 50 partial, else critical)
pub fn status_message(hearts: &Hearts) -> StatusMessage {
    let percent = hearts.fraction() * 100.0;
    if percent >= 80.0 {
        StatusMessage {
            text: "City systems running optimally. The simulation hums with restored dreams.",
            icon: StatusIcon::Shield,
            tone: Tone::Ok,
        }
    } else if percent >= 50.0 {
        StatusMessage {
            text: "Partial system restoration detected. Reality flickers but holds.",
            icon: StatusIcon::Zap,
            tone: Tone::Warn,
        }
    } else {
        StatusMessage {
            text: "Critical system failure. The city's heart beats weakly.",
            icon: StatusIcon::Heart,
            tone: Tone::Bad,
        }
    }
}

/// Cosmetic readouts under the heart grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telemetry {
    pub memory_usage_percent: i32,
    pub dream_bandwidth_kbps: u32,
    pub hope_percent: u32,
}

impl Telemetry {
    pub fn from_hearts(hearts: &Hearts) -> Self {
        let restored = hearts.restored();
        Self {
            memory_usage_percent: 85 - restored as i32 * 3,
            dream_bandwidth_kbps: restored * 12,
            hope_percent: (hearts.fraction() * 100.0).round() as u32,
        }
    }
}

/// Progress bar width, in percent
pub fn progress_percent(hearts: &Hearts) -> f32 {
    hearts.fraction() * 100.0
}

/// Header line of a request card
pub fn delivery_badge(delivery: &Delivery) -> &'static str {
    if delivery.corrupted {
        "⚠ CORRUPTED DATA ⚠"
    } else {
        "✓ VERIFIED REQUEST"
    }
}

pub fn delivery_tone(delivery: &Delivery) -> Tone {
    if delivery.corrupted { Tone::Bad } else { Tone::Ok }
}

pub fn refresh_label(scanning: bool) -> &'static str {
    if scanning {
        "SCANNING..."
    } else {
        "REFRESH REQUESTS"
    }
}

pub fn modal_title(corrupted: bool) -> &'static str {
    if corrupted {
        "CORRUPTION DETECTED"
    } else {
        "DREAM ENCODING"
    }
}

/// Heading and instructions for a puzzle
pub fn puzzle_instructions(kind: PuzzleKind, corrupted: bool) -> (&'static str, &'static str) {
    match (kind, corrupted) {
        (PuzzleKind::Pattern, false) => (
            "MATCH THE PATTERN",
            "Encode the dream by replicating the magical pattern",
        ),
        (PuzzleKind::Pattern, true) => (
            "REPAIR SEQUENCE",
            "Fix the corrupted data by matching the clean sequence",
        ),
        (PuzzleKind::Memory, false) => (
            "RECALL THE DREAM",
            "Memorize the pattern before it fades, then replay it",
        ),
        (PuzzleKind::Memory, true) => (
            "RECOVER FRAGMENTS",
            "Memorize the damaged sequence before it decays, then rebuild it",
        ),
        (PuzzleKind::Matching, false) => (
            "BIND THE SYMBOLS",
            "Pair each symbol with the one it longs for",
        ),
        (PuzzleKind::Matching, true) => (
            "RELINK DATA",
            "Reconnect the broken symbol pairs",
        ),
    }
}

pub const SUCCESS_TITLE: &str = "DELIVERY COMPLETE";
pub const SUCCESS_TEXT: &str =
    "The dream has been successfully encoded and delivered. Another heart beats stronger in the city.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_bands() {
        assert_eq!(status_message(&Hearts::new(12, 12)).icon, StatusIcon::Shield);
        assert_eq!(status_message(&Hearts::new(10, 12)).tone, Tone::Ok); // 83%
        assert_eq!(status_message(&Hearts::new(9, 12)).tone, Tone::Warn); // 75%
        assert_eq!(status_message(&Hearts::new(6, 12)).tone, Tone::Warn); // 50%
        assert_eq!(status_message(&Hearts::new(5, 12)).icon, StatusIcon::Heart);
    }

    #[test]
    fn test_telemetry() {
        let t = Telemetry::from_hearts(&Hearts::new(3, 12));
        assert_eq!(t.memory_usage_percent, 76);
        assert_eq!(t.dream_bandwidth_kbps, 36);
        assert_eq!(t.hope_percent, 25);

        let t = Telemetry::from_hearts(&Hearts::new(7, 12));
        assert_eq!(t.hope_percent, 58);
    }

    #[test]
    fn test_header_follows_city() {
        assert_eq!(header_status(CityState::Corrupted), "SYSTEM CRITICAL");
        assert_eq!(Tone::for_city(CityState::Glitching).css_class(), "tone-warn");
        assert_eq!(city_class(CityState::Stable), "city-stable");
    }

    #[test]
    fn test_instructions_cover_every_kind() {
        for kind in PuzzleKind::ALL {
            for corrupted in [false, true] {
                let (heading, text) = puzzle_instructions(kind, corrupted);
                assert!(!heading.is_empty() && !text.is_empty());
            }
        }
        assert_eq!(puzzle_instructions(PuzzleKind::Pattern, true).0, "REPAIR SEQUENCE");
    }
}
