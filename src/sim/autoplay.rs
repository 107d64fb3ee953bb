//! Autoplay - plays deliveries without a player
//!
//! Drives the native headless run and the simulation tests.

use super::puzzle::{Puzzle, PuzzleMove, tiles_match};
use super::state::GameState;
use super::tick::Command;

/// Commands a player would issue next in this state
pub fn next_commands(state: &GameState) -> Vec<Command> {
    match &state.session {
        Some(session) => {
            if !session.is_solving() || !accepts_input(&session.puzzle) {
                return Vec::new();
            }
            solution(&session.puzzle).into_iter().map(Command::Puzzle).collect()
        }
        None => match state.board.deliveries.first() {
            Some(delivery) => vec![Command::AcceptDelivery(delivery.id.clone())],
            None if !state.board.is_scanning() => vec![Command::RefreshBoard],
            None => Vec::new(),
        },
    }
}

fn accepts_input(puzzle: &Puzzle) -> bool {
    match puzzle {
        Puzzle::Pattern(p) => !p.awaiting_clear(),
        Puzzle::Memory(m) => !m.show_sequence && !m.pattern.awaiting_clear(),
        Puzzle::Matching(m) => !m.awaiting_clear(),
    }
}

/// Moves that solve `puzzle` from its current state.
///
/// Pattern and memory answers are the remaining part of the sequence, so any
/// wrong input already entered must be cleared first. Memory puzzles only
/// accept the moves once the sequence is hidden.
pub fn solution(puzzle: &Puzzle) -> Vec<PuzzleMove> {
    match puzzle {
        Puzzle::Pattern(p) => remaining(&p.sequence, &p.user_input),
        Puzzle::Memory(m) => remaining(&m.pattern.sequence, &m.pattern.user_input),
        Puzzle::Matching(m) => {
            let mut open: Vec<_> = m.pairs.iter().filter(|t| !m.is_matched(t.id)).collect();
            let mut moves = Vec::with_capacity(open.len());
            while let Some(first) = open.pop() {
                let Some(pos) = open.iter().position(|other| tiles_match(first, other)) else {
                    continue;
                };
                let second = open.swap_remove(pos);
                moves.push(PuzzleMove::Tile(first.id));
                moves.push(PuzzleMove::Tile(second.id));
            }
            moves
        }
    }
}

fn remaining(sequence: &[super::Symbol], entered: &[super::Symbol]) -> Vec<PuzzleMove> {
    let start = if sequence.starts_with(entered) { entered.len() } else { 0 };
    sequence[start..].iter().copied().map(PuzzleMove::Symbol).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MEMORY_REVEAL_TICKS;
    use crate::sim::puzzle::{InputOutcome, PuzzleKind, generate_puzzle_of_kind};
    use crate::sim::symbols::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_solution_solves_every_kind() {
        let mut rng = Pcg32::seed_from_u64(11);
        for kind in PuzzleKind::ALL {
            for difficulty in Difficulty::ALL {
                for corrupted in [false, true] {
                    let mut puzzle = generate_puzzle_of_kind(kind, difficulty, corrupted, &mut rng);
                    for _ in 0..MEMORY_REVEAL_TICKS {
                        puzzle.tick();
                    }

                    let mut last = InputOutcome::Ignored;
                    for mv in solution(&puzzle) {
                        last = puzzle.apply(mv);
                    }
                    assert_eq!(last, InputOutcome::Solved, "{:?} {:?}", kind, difficulty);
                    assert!(puzzle.is_complete());
                }
            }
        }
    }

    #[test]
    fn test_autoplay_restores_every_heart() {
        use crate::consts::TOTAL_HEARTS;
        use crate::sim::tick::{TickInput, tick};

        let mut state = GameState::new(2025);
        let mut input = TickInput::default();
        let mut ticks = 0;
        while !state.hearts.is_full() {
            input.commands = next_commands(&state);
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks < 100_000, "autoplay stalled");
        }
        assert_eq!(state.hearts.restored(), TOTAL_HEARTS);
    }

    #[test]
    fn test_solution_continues_partial_input() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut puzzle = generate_puzzle_of_kind(PuzzleKind::Pattern, Difficulty::Medium, false, &mut rng);
        let first = solution(&puzzle)[0];
        puzzle.apply(first);
        assert_eq!(solution(&puzzle).len(), Difficulty::Medium.sequence_len() - 1);
    }
}
