//! Page sections as element trees
//!
//! Every builder is a pure function of state; the renderer rebuilds a section
//! only when its tree changes.

use super::node::Node;
use super::{
    GAME_SUBTITLE, GAME_TITLE, GAME_VERSION, SUCCESS_TEXT, SUCCESS_TITLE, Telemetry, Tone,
    delivery_badge, delivery_tone, header_status, modal_title, progress_percent,
    puzzle_instructions, refresh_label, status_message,
};
use crate::settings::Settings;
use crate::sim::{
    CityState, Delivery, DeliveryBoard, Hearts, MatchingPuzzle, MemoryPuzzle, PatternPuzzle,
    Puzzle, PuzzleSession, SlotState, symbol_set,
};

fn div(class: impl Into<String>) -> Node {
    Node::new("div").class(class)
}

fn span(class: impl Into<String>, text: impl Into<String>) -> Node {
    Node::new("span").class(class).text(text)
}

pub fn header(city: CityState) -> Vec<Node> {
    let tone = Tone::for_city(city).css_class();
    vec![
        div("header-row")
            .child(
                Node::new("div")
                    .child(
                        Node::new("h1")
                            .class(format!("title title-{} {}", city.as_str(), tone))
                            .text(GAME_TITLE),
                    )
                    .child(Node::new("p").class("subtitle").text(GAME_SUBTITLE)),
            )
            .child(
                div("header-status")
                    .child(div(format!("status {}", tone)).text(header_status(city)))
                    .child(div("version").text(GAME_VERSION)),
            ),
    ]
}

pub fn board(board: &DeliveryBoard) -> Vec<Node> {
    let scanning = board.is_scanning();
    let head = div("board-head")
        .child(Node::new("h2").text("DELIVERY REQUESTS"))
        .child(
            Node::new("button")
                .class("btn tone-ok")
                .attr("data-action", "refresh")
                .flag("disabled", scanning)
                .text(refresh_label(scanning)),
        );
    let cards = div("cards").children(board.deliveries.iter().map(card));
    vec![head, cards]
}

fn card(delivery: &Delivery) -> Node {
    let tone = delivery_tone(delivery).css_class();
    Node::new("article")
        .class(format!("card {}", tone))
        .child(
            Node::new("header")
                .child(span(format!("badge {}", tone), delivery_badge(delivery)))
                .child(span(
                    format!("difficulty {}", Tone::for_difficulty(delivery.difficulty).css_class()),
                    delivery.difficulty.as_str().to_uppercase(),
                )),
        )
        .child(Node::new("p").class("card-title").text(format!("\"{}\"", delivery.title)))
        .child(Node::new("p").class("card-desc").text(delivery.description.as_str()))
        .child(
            Node::new("footer")
                .child(span("recipient", format!("RECIPIENT: {}", delivery.recipient)))
                .child(
                    Node::new("button")
                        .class(format!("btn {}", tone))
                        .attr("data-action", "accept")
                        .attr("data-value", delivery.id.as_str())
                        .text("ACCEPT DELIVERY"),
                ),
        )
}

pub fn city_status(hearts: &Hearts, settings: &Settings) -> Vec<Node> {
    let city_tone = Tone::for_city(hearts.city_state()).css_class();
    let message = status_message(hearts);

    let mut nodes = vec![
        Node::new("h3")
            .class("panel-title")
            .child(span(message.tone.css_class(), message.icon.glyph()))
            .child(Node::new("span").text(" CITY STATUS")),
        div("hearts-row")
            .child(Node::new("span").text("HEARTS RESTORED"))
            .child(Node::new("span").text(format!("{}/{}", hearts.restored(), hearts.total()))),
        div("bar").child(
            div(format!("bar-fill {}", city_tone))
                .attr("style", format!("width: {:.1}%", progress_percent(hearts))),
        ),
        div("heart-grid").children((0..hearts.total()).map(|i| {
            if i < hearts.restored() {
                span(format!("heart filled {}", city_tone), "♥")
            } else {
                span("heart empty", "♡")
            }
        })),
        Node::new("p").class("status-text").text(message.text),
    ];

    if settings.show_telemetry {
        let t = Telemetry::from_hearts(hearts);
        let memory_tone = if hearts.city_state() == CityState::Corrupted {
            Tone::Bad
        } else {
            Tone::Ok
        };
        let row = |label: &str, tone: Tone, value: String| {
            [
                Node::new("dt").text(label),
                Node::new("dd").class(tone.css_class()).text(value),
            ]
        };
        nodes.push(
            Node::new("dl")
                .class("telemetry")
                .children(row("MEMORY USAGE", memory_tone, format!("{}%", t.memory_usage_percent)))
                .children(row("DREAM BANDWIDTH", Tone::Ok, format!("{}kb/s", t.dream_bandwidth_kbps)))
                .children(row("HOPE LEVELS", message.tone, format!("{}%", t.hope_percent))),
        );
    }
    nodes
}

/// Puzzle modal; empty when no delivery is open
pub fn modal(session: Option<&PuzzleSession>) -> Vec<Node> {
    let Some(session) = session else {
        return Vec::new();
    };
    let delivery = &session.delivery;
    let tone = delivery_tone(delivery).css_class();

    let mut card = div(format!("modal-card {}", tone))
        .child(
            div("modal-head")
                .child(Node::new("h2").class(tone).text(modal_title(delivery.corrupted)))
                .child(
                    Node::new("button")
                        .class("btn-ghost")
                        .attr("data-action", "close")
                        .text("✕"),
                ),
        )
        .child(Node::new("p").class("card-title").text(format!("\"{}\"", delivery.title)))
        .child(Node::new("p").class("recipient").text(format!("RECIPIENT: {}", delivery.recipient)));

    if session.showing_success() {
        card = card.child(
            div("success")
                .child(div("success-icon").text("✔"))
                .child(Node::new("h3").text(SUCCESS_TITLE))
                .child(Node::new("p").text(SUCCESS_TEXT)),
        );
    } else {
        let (heading, text) = puzzle_instructions(session.puzzle.kind(), delivery.corrupted);
        card = card.child(
            div("instructions")
                .child(Node::new("h3").class(tone).text(heading))
                .child(Node::new("p").text(text)),
        );
        card = card.children(match &session.puzzle {
            Puzzle::Pattern(p) => pattern_body(p, delivery.corrupted, tone),
            Puzzle::Memory(m) => memory_body(m, delivery.corrupted, tone),
            Puzzle::Matching(m) => matching_body(m, tone),
        });
        card = card.child(
            div("modal-actions").child(
                Node::new("button")
                    .class("btn-outline")
                    .attr("data-action", "reset")
                    .text("RESET"),
            ),
        );
    }
    vec![card]
}

fn slot_class(state: SlotState) -> &'static str {
    match state {
        SlotState::Empty => "slot-empty",
        SlotState::Correct => "slot-correct",
        SlotState::Wrong => "slot-wrong",
    }
}

fn sequence_row(p: &PatternPuzzle, corrupted: bool) -> Node {
    div("sequence").children(p.sequence.iter().enumerate().map(|(i, symbol)| {
        let class = match p.slot(i) {
            SlotState::Empty if corrupted => "glyph-dim tone-bad",
            SlotState::Empty => "glyph-dim tone-ok",
            state => slot_class(state),
        };
        span(format!("glyph {}", class), symbol.to_string())
    }))
}

fn input_slots(p: &PatternPuzzle) -> Node {
    div("slots").children((0..p.sequence.len()).map(|i| {
        let glyph = p.user_input.get(i).map(|s| s.to_string()).unwrap_or_default();
        div(format!("slot {}", slot_class(p.slot(i)))).text(glyph)
    }))
}

fn keypad(corrupted: bool, tone: &str, disabled: bool) -> Node {
    div("keypad").children(symbol_set(corrupted).iter().map(|symbol| {
        Node::new("button")
            .class(format!("key {}", tone))
            .attr("data-action", "symbol")
            .attr("data-value", symbol.to_string())
            .flag("disabled", disabled)
            .text(symbol.to_string())
    }))
}

fn pattern_body(p: &PatternPuzzle, corrupted: bool, tone: &str) -> Vec<Node> {
    vec![
        div("puzzle-box")
            .child(sequence_row(p, corrupted))
            .child(input_slots(p)),
        keypad(corrupted, tone, p.complete || p.awaiting_clear()),
    ]
}

fn memory_body(m: &MemoryPuzzle, corrupted: bool, tone: &str) -> Vec<Node> {
    let len = m.pattern.sequence.len();
    let mut puzzle_box = div("puzzle-box");
    if m.show_sequence {
        puzzle_box = puzzle_box
            .child(sequence_row(&m.pattern, corrupted))
            .child(Node::new("p").class("memory-hint").text("MEMORIZE..."));
    } else {
        puzzle_box = puzzle_box
            .child(div("sequence").children((0..len).map(|_| span("glyph glyph-hidden", "?"))))
            .child(
                Node::new("p")
                    .class("memory-hint")
                    .text(format!("STEP {}/{}", (m.current_step + 1).min(len), len)),
            );
    }
    vec![
        puzzle_box.child(input_slots(&m.pattern)),
        keypad(
            corrupted,
            tone,
            m.show_sequence || m.pattern.complete || m.pattern.awaiting_clear(),
        ),
    ]
}

fn matching_body(m: &MatchingPuzzle, tone: &str) -> Vec<Node> {
    let tiles = m.pairs.iter().map(|tile| {
        let (state, disabled) = if m.is_matched(tile.id) {
            ("tile-matched", true)
        } else if m.is_selected(tile.id) {
            if m.awaiting_clear() { ("tile-wrong", true) } else { ("tile-selected", false) }
        } else {
            ("", m.complete || m.awaiting_clear())
        };
        Node::new("button")
            .class(format!("tile {} {}", tone, state).trim_end().to_string())
            .attr("data-action", "tile")
            .attr("data-value", tile.id.to_string())
            .flag("disabled", disabled)
            .child(span("tile-symbol", tile.symbol.to_string()))
            .child(span("tile-match", format!("→{}", tile.partner)))
    });
    vec![
        div("tile-grid").children(tiles),
        Node::new("p")
            .class("memory-hint")
            .text(format!("PAIRS {}/{}", m.matched.len() / 2, m.pairs.len() / 2)),
    ]
}

/// Preference toggles in the footer
pub fn settings_bar(settings: &Settings) -> Vec<Node> {
    let on_off = |flag: bool| if flag { "ON" } else { "OFF" };
    let toggle = |action: &str, label: String| {
        Node::new("button")
            .class("btn-ghost")
            .attr("data-action", action)
            .text(label)
    };
    vec![
        toggle("toggle-rain", format!("RAIN: {}", on_off(settings.rain))),
        toggle("cycle-quality", format!("QUALITY: {}", settings.quality.as_str().to_uppercase())),
        toggle("toggle-motion", format!("REDUCED MOTION: {}", on_off(settings.reduced_motion))),
        toggle("toggle-telemetry", format!("TELEMETRY: {}", on_off(settings.show_telemetry))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCAN_TICKS;
    use crate::sim::{
        Difficulty, GameState, MatchTile, PuzzleKind, SessionPhase, Symbol, TickInput,
        generate_puzzle_of_kind, tick,
    };
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn all(nodes: &[Node]) -> Vec<&Node> {
        nodes.iter().flat_map(|n| n.descendants()).collect()
    }

    fn with_class<'a>(nodes: &'a [Node], class: &str) -> Vec<&'a Node> {
        all(nodes).into_iter().filter(|n| n.has_class(class)).collect()
    }

    fn with_action<'a>(nodes: &'a [Node], action: &str) -> Vec<&'a Node> {
        all(nodes)
            .into_iter()
            .filter(|n| n.get_attr("data-action") == Some(action))
            .collect()
    }

    fn text(nodes: &[Node]) -> String {
        nodes.iter().map(Node::text_content).collect()
    }

    fn delivery(corrupted: bool) -> Delivery {
        Delivery {
            id: "abc123xyz".into(),
            title: "A cat's contented purr".into(),
            description: "Vibrations of pure peace, trust made audible".into(),
            recipient: "Lonely Apartment 404".into(),
            difficulty: Difficulty::Easy,
            corrupted,
        }
    }

    fn session(puzzle: Puzzle) -> PuzzleSession {
        PuzzleSession {
            delivery: delivery(false),
            puzzle,
            phase: SessionPhase::Solving,
        }
    }

    #[test]
    fn test_text_is_never_markup() {
        let mut d = delivery(false);
        d.title = "<img src=x onerror=alert(1)>".into();
        let s = PuzzleSession { delivery: d, ..session(Puzzle::Pattern(PatternPuzzle::new(vec![Symbol('✦')]))) };
        let nodes = modal(Some(&s));
        assert!(text(&nodes).contains("\"<img src=x onerror=alert(1)>\""));
        assert!(all(&nodes).iter().all(|n| n.tag != "img"));
    }

    #[test]
    fn test_header_shows_status() {
        let nodes = header(CityState::Corrupted);
        assert!(text(&nodes).contains("SYSTEM CRITICAL"));
        assert!(!with_class(&nodes, "tone-bad").is_empty());
        assert!(text(&nodes).contains(GAME_TITLE));
    }

    #[test]
    fn test_board_view() {
        let mut state = GameState::new(5);
        let nodes = board(&state.board);
        assert!(text(&nodes).contains("SCANNING..."));
        assert_eq!(with_action(&nodes, "refresh")[0].get_attr("disabled"), Some(""));

        for _ in 0..SCAN_TICKS {
            tick(&mut state, &TickInput::default());
        }
        let nodes = board(&state.board);
        assert!(text(&nodes).contains("REFRESH REQUESTS"));
        assert_eq!(with_action(&nodes, "refresh")[0].get_attr("disabled"), None);

        let accepts = with_action(&nodes, "accept");
        assert_eq!(accepts.len(), state.board.deliveries.len());
        for (button, d) in accepts.iter().zip(&state.board.deliveries) {
            assert_eq!(button.get_attr("data-value"), Some(d.id.as_str()));
        }
    }

    #[test]
    fn test_city_status_view() {
        let hearts = Hearts::new(3, 12);
        let mut settings = Settings::default();
        let nodes = city_status(&hearts, &settings);
        assert!(text(&nodes).contains("3/12"));
        assert_eq!(with_class(&nodes, "filled").len(), 3);
        assert_eq!(with_class(&nodes, "empty").len(), 9);
        assert!(text(&nodes).contains("36kb/s"));

        settings.show_telemetry = false;
        assert!(!text(&city_status(&hearts, &settings)).contains("MEMORY USAGE"));
    }

    #[test]
    fn test_modal_empty_without_session() {
        assert!(modal(None).is_empty());
    }

    #[test]
    fn test_pattern_modal() {
        let mut rng = Pcg32::seed_from_u64(1);
        let s = session(generate_puzzle_of_kind(PuzzleKind::Pattern, Difficulty::Easy, false, &mut rng));
        let nodes = modal(Some(&s));
        assert!(text(&nodes).contains("DREAM ENCODING"));
        assert!(text(&nodes).contains("MATCH THE PATTERN"));
        assert_eq!(with_action(&nodes, "symbol").len(), 6);
        assert_eq!(with_class(&nodes, "slot").len(), 4);
    }

    #[test]
    fn test_memory_modal_hides_sequence() {
        let mut m = MemoryPuzzle::new(vec![Symbol('✦'), Symbol('○'), Symbol('△')]);
        let nodes = modal(Some(&session(Puzzle::Memory(m.clone()))));
        assert!(text(&nodes).contains("MEMORIZE"));
        assert!(with_class(&nodes, "glyph-hidden").is_empty());
        // Keypad stays locked while the sequence is on screen
        let keys = with_action(&nodes, "symbol");
        assert!(keys.iter().all(|k| k.get_attr("disabled").is_some()));

        m.show_sequence = false;
        let nodes = modal(Some(&session(Puzzle::Memory(m))));
        assert_eq!(with_class(&nodes, "glyph-hidden").len(), 3);
        assert!(text(&nodes).contains("STEP 1/3"));
        assert!(with_action(&nodes, "symbol").iter().all(|k| k.get_attr("disabled").is_none()));
    }

    #[test]
    fn test_matching_modal_marks_tiles() {
        let mut m = MatchingPuzzle::new(vec![
            MatchTile { id: 0, symbol: Symbol('✦'), partner: Symbol('◆') },
            MatchTile { id: 1, symbol: Symbol('◆'), partner: Symbol('✦') },
            MatchTile { id: 2, symbol: Symbol('○'), partner: Symbol('△') },
            MatchTile { id: 3, symbol: Symbol('△'), partner: Symbol('○') },
        ]);
        m.select(0);
        m.select(1);
        m.select(2);
        let nodes = modal(Some(&session(Puzzle::Matching(m))));
        assert_eq!(with_class(&nodes, "tile-matched").len(), 2);
        assert_eq!(with_class(&nodes, "tile-selected").len(), 1);
        assert!(text(&nodes).contains("PAIRS 1/2"));
    }

    #[test]
    fn test_success_panel() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut s = session(generate_puzzle_of_kind(PuzzleKind::Matching, Difficulty::Hard, true, &mut rng));
        s.phase = SessionPhase::Success { ticks_left: 10 };
        let nodes = modal(Some(&s));
        assert!(text(&nodes).contains(SUCCESS_TITLE));
        assert!(with_action(&nodes, "tile").is_empty());
    }

    #[test]
    fn test_settings_bar() {
        let nodes = settings_bar(&Settings::default());
        assert!(text(&nodes).contains("RAIN: ON"));
        assert!(text(&nodes).contains("QUALITY: MEDIUM"));
    }
}
