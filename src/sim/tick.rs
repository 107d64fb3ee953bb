//! Fixed timestep simulation tick
//!
//! Advances every running timer by one step, then applies queued player
//! commands. Events for the tick are left in [`GameState::events`].

use log::{debug, info};

use super::puzzle::{InputOutcome, PuzzleMove};
use super::state::{GameEvent, GameState, PuzzleSession, SessionPhase};
use crate::consts::SUCCESS_DISPLAY_TICKS;

/// A player action coming from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// "REFRESH REQUESTS"
    RefreshBoard,
    /// "ACCEPT DELIVERY" on the request with this id
    AcceptDelivery(String),
    /// Glyph button or tile click inside the modal
    Puzzle(PuzzleMove),
    /// "RESET" inside the modal
    ResetPuzzle,
    /// Close button or Escape
    ClosePuzzle,
}

/// Commands gathered since the last tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Advance the game state by one fixed timestep
///
/// Running timers advance before this tick's commands apply, so a countdown
/// started by a command lasts its full length in later ticks.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    // Board scan uses the city state at the moment the scan lands
    let city = state.city_state();
    if state.board.tick(city, &mut state.rng) {
        info!("Board refreshed with {} requests", state.board.deliveries.len());
        state.events.push(GameEvent::BoardRefreshed);
    }

    let mut finished = false;
    if let Some(session) = state.session.as_mut() {
        match session.phase {
            SessionPhase::Solving => {
                if let Some(timer) = session.puzzle.tick() {
                    debug!("Puzzle timer: {:?}", timer);
                    state.events.push(GameEvent::PuzzleTimer(timer));
                }
            }
            SessionPhase::Success { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                session.phase = SessionPhase::Success { ticks_left };
                finished = ticks_left == 0;
            }
        }
    }
    if finished {
        complete_delivery(state);
    }

    for command in &input.commands {
        apply_command(state, command);
    }
}

fn apply_command(state: &mut GameState, command: &Command) {
    match command {
        Command::RefreshBoard => {
            if state.board.refresh() {
                debug!("Scanning for requests");
            }
        }
        Command::AcceptDelivery(id) => {
            if state.session.is_some() {
                debug!("Ignoring accept of {} while a puzzle is open", id);
                return;
            }
            let Some(delivery) = state.board.get(id).cloned() else {
                debug!("Ignoring accept of unknown delivery {}", id);
                return;
            };
            let session = PuzzleSession::new(delivery, &mut state.rng);
            info!(
                "Accepted delivery {} ({}, {}{})",
                id,
                session.delivery.difficulty.as_str(),
                session.puzzle.kind().as_str(),
                if session.delivery.corrupted { ", corrupted" } else { "" }
            );
            state.session = Some(session);
            state.events.push(GameEvent::DeliveryAccepted { id: id.clone() });
        }
        Command::Puzzle(mv) => {
            let Some(session) = state.session.as_mut() else {
                return;
            };
            if !session.is_solving() {
                return;
            }
            let outcome = session.puzzle.apply(*mv);
            debug!("Puzzle input {:?} -> {:?}", mv, outcome);
            match outcome {
                InputOutcome::Solved => {
                    session.phase = SessionPhase::Success {
                        ticks_left: SUCCESS_DISPLAY_TICKS,
                    };
                    info!("Puzzle solved for delivery {}", session.delivery.id);
                    state.events.push(GameEvent::PuzzleSolved);
                }
                InputOutcome::Mismatch => state.events.push(GameEvent::PuzzleMismatch),
                InputOutcome::Matched => state.events.push(GameEvent::PairMatched),
                InputOutcome::Progress | InputOutcome::Ignored => {}
            }
        }
        Command::ResetPuzzle => {
            if let Some(session) = state.session.as_mut() {
                if session.is_solving() {
                    session.puzzle.reset();
                    state.events.push(GameEvent::PuzzleReset);
                }
            }
        }
        Command::ClosePuzzle => {
            let showing_success = state
                .session
                .as_ref()
                .is_some_and(|s| s.showing_success());
            if showing_success {
                // The heart was already earned
                complete_delivery(state);
            } else if let Some(session) = state.session.take() {
                info!("Closed puzzle for delivery {}", session.delivery.id);
                state.events.push(GameEvent::PuzzleClosed {
                    id: session.delivery.id,
                });
            }
        }
    }
}

/// Close the session, restore a heart and retire the delivery
fn complete_delivery(state: &mut GameState) {
    let Some(session) = state.session.take() else {
        return;
    };
    let before = state.city_state();
    state.hearts.restore_one();
    state.board.remove(&session.delivery.id);
    let after = state.city_state();

    info!(
        "Delivery {} complete, hearts {}/{}",
        session.delivery.id,
        state.hearts.restored(),
        state.hearts.total()
    );
    state.events.push(GameEvent::DeliveryCompleted {
        id: session.delivery.id,
        hearts: state.hearts.restored(),
    });

    if before != after {
        info!("City state {} -> {}", before.as_str(), after.as_str());
        state
            .events
            .push(GameEvent::CityStateChanged { from: before, to: after });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::autoplay::solution;
    use crate::sim::puzzle::{PatternPuzzle, Puzzle, PuzzleKind, TimerEvent};
    use crate::sim::state::CityState;
    use crate::sim::symbols::Symbol;

    fn input(commands: Vec<Command>) -> TickInput {
        TickInput { commands }
    }

    fn run(state: &mut GameState, ticks: u32) -> Vec<GameEvent> {
        let idle = TickInput::default();
        let mut events = Vec::new();
        for _ in 0..ticks {
            tick(state, &idle);
            events.extend(state.events.drain(..));
        }
        events
    }

    /// New game with the initial scan finished
    fn ready_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let events = run(&mut state, SCAN_TICKS);
        assert!(events.contains(&GameEvent::BoardRefreshed));
        state
    }

    fn accept_first(state: &mut GameState) -> String {
        let id = state.board.deliveries[0].id.clone();
        tick(state, &input(vec![Command::AcceptDelivery(id.clone())]));
        assert!(state.events.contains(&GameEvent::DeliveryAccepted { id: id.clone() }));
        id
    }

    /// Feed the winning moves, waiting out a memory reveal if needed
    fn solve_open_puzzle(state: &mut GameState) {
        run(state, MEMORY_REVEAL_TICKS);
        let session = state.session.as_ref().expect("no open puzzle");
        let moves = solution(&session.puzzle);
        let commands = moves.into_iter().map(Command::Puzzle).collect();
        tick(state, &input(commands));
        assert!(state.events.contains(&GameEvent::PuzzleSolved));
    }

    /// Idle ticks until an event matching `done` shows up
    fn ticks_until(state: &mut GameState, done: impl Fn(&GameEvent) -> bool) -> u32 {
        let idle = TickInput::default();
        for n in 1..=10_000 {
            tick(state, &idle);
            if state.events.iter().any(&done) {
                return n;
            }
        }
        panic!("event never arrived");
    }

    /// Open a one-glyph pattern puzzle on the first request
    fn open_pattern(state: &mut GameState, glyph: char) {
        let delivery = state.board.deliveries[0].clone();
        state.session = Some(PuzzleSession {
            delivery,
            puzzle: Puzzle::Pattern(PatternPuzzle::new(vec![Symbol(glyph)])),
            phase: SessionPhase::Solving,
        });
    }

    fn press(glyph: char) -> TickInput {
        input(vec![Command::Puzzle(PuzzleMove::Symbol(Symbol(glyph)))])
    }

    #[test]
    fn test_mismatch_clear_lasts_full_delay() {
        let mut state = ready_state(50);
        open_pattern(&mut state, '✦');
        tick(&mut state, &press('○'));
        assert!(state.events.contains(&GameEvent::PuzzleMismatch));

        let n = ticks_until(&mut state, |e| *e == GameEvent::PuzzleTimer(TimerEvent::InputCleared));
        assert_eq!(n, MISMATCH_CLEAR_TICKS);
    }

    #[test]
    fn test_success_display_lasts_full_delay() {
        let mut state = ready_state(51);
        open_pattern(&mut state, '✦');
        tick(&mut state, &press('✦'));
        assert!(state.events.contains(&GameEvent::PuzzleSolved));

        let n = ticks_until(&mut state, |e| matches!(e, GameEvent::DeliveryCompleted { .. }));
        assert_eq!(n, SUCCESS_DISPLAY_TICKS);
    }

    #[test]
    fn test_memory_reveal_lasts_full_delay() {
        let mut seed = 0;
        let mut state = loop {
            let mut state = ready_state(seed);
            accept_first(&mut state);
            if state.session.as_ref().is_some_and(|s| s.puzzle.kind() == PuzzleKind::Memory) {
                break state;
            }
            seed += 1;
            assert!(seed < 1000, "no memory puzzle in 1000 seeds");
        };

        let n = ticks_until(&mut state, |e| *e == GameEvent::PuzzleTimer(TimerEvent::SequenceHidden));
        assert_eq!(n, MEMORY_REVEAL_TICKS);
    }

    #[test]
    fn test_board_fills_after_scan() {
        let mut state = GameState::new(1);
        assert!(run(&mut state, SCAN_TICKS - 1).is_empty());
        assert!(state.board.deliveries.is_empty());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.events, vec![GameEvent::BoardRefreshed]);
        assert_eq!(state.board.deliveries.len(), BOARD_SIZE);
    }

    #[test]
    fn test_full_delivery_flow() {
        let mut state = ready_state(777);
        let id = accept_first(&mut state);

        solve_open_puzzle(&mut state);
        assert!(state.session.as_ref().is_some_and(|s| s.showing_success()));
        assert_eq!(state.hearts.restored(), STARTING_HEARTS);

        // Heart arrives after the success display
        let events = run(&mut state, SUCCESS_DISPLAY_TICKS);
        assert!(events.contains(&GameEvent::DeliveryCompleted {
            id: id.clone(),
            hearts: STARTING_HEARTS + 1
        }));
        assert!(state.session.is_none());
        assert!(state.board.get(&id).is_none());
        assert_eq!(state.hearts.restored(), STARTING_HEARTS + 1);
    }

    #[test]
    fn test_close_keeps_request() {
        let mut state = ready_state(31);
        let id = accept_first(&mut state);

        tick(&mut state, &input(vec![Command::ClosePuzzle]));
        assert!(state.session.is_none());
        assert_eq!(state.events, vec![GameEvent::PuzzleClosed { id: id.clone() }]);
        assert!(state.board.get(&id).is_some());
        assert_eq!(state.hearts.restored(), STARTING_HEARTS);
    }

    #[test]
    fn test_close_during_success_completes() {
        let mut state = ready_state(32);
        accept_first(&mut state);
        solve_open_puzzle(&mut state);

        tick(&mut state, &input(vec![Command::ClosePuzzle]));
        assert!(state.session.is_none());
        assert_eq!(state.hearts.restored(), STARTING_HEARTS + 1);
    }

    #[test]
    fn test_accept_ignored_while_puzzle_open() {
        let mut state = ready_state(33);
        let first = accept_first(&mut state);
        let other = state.board.deliveries[1].id.clone();

        tick(&mut state, &input(vec![Command::AcceptDelivery(other)]));
        assert_eq!(state.session.as_ref().map(|s| s.delivery.id.clone()), Some(first));

        tick(&mut state, &input(vec![Command::ClosePuzzle]));
        tick(&mut state, &input(vec![Command::AcceptDelivery("nope".into())]));
        assert!(state.session.is_none());
    }

    #[test]
    fn test_reaching_six_hearts_stabilizes_city() {
        let mut state = ready_state(4242);
        assert_eq!(state.city_state(), CityState::Glitching);

        let mut changes = Vec::new();
        for _ in 0..3 {
            if state.board.deliveries.is_empty() {
                tick(&mut state, &input(vec![Command::RefreshBoard]));
                run(&mut state, SCAN_TICKS);
            }
            accept_first(&mut state);
            solve_open_puzzle(&mut state);
            for event in run(&mut state, SUCCESS_DISPLAY_TICKS) {
                if let GameEvent::CityStateChanged { from, to } = event {
                    changes.push((from, to));
                }
            }
        }

        assert_eq!(state.hearts.restored(), 6);
        assert_eq!(changes, vec![(CityState::Glitching, CityState::Stable)]);
    }

    #[test]
    fn test_hearts_capped_at_total() {
        let mut state = ready_state(9);
        state.hearts = crate::sim::Hearts::new(TOTAL_HEARTS, TOTAL_HEARTS);
        accept_first(&mut state);
        solve_open_puzzle(&mut state);
        run(&mut state, SUCCESS_DISPLAY_TICKS);
        assert_eq!(state.hearts.restored(), TOTAL_HEARTS);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = ready_state(99999);
        let mut state2 = ready_state(99999);
        assert_eq!(state1.board.deliveries, state2.board.deliveries);

        accept_first(&mut state1);
        accept_first(&mut state2);
        assert_eq!(state1.session, state2.session);
    }
}
