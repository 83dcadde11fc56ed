//! Fork and pin detection over the user's candidate moves
//!
//! Both detectors are coarse: a "fork" is any move after which two or more
//! enemy pieces stand attacked, and a "pin" is a capture after which the
//! opponent has very few legal replies.

use shakmaty::{Color, Move};
use tracing::warn;

use super::types::*;
use crate::config::{FORK_MIN_TARGETS, PIN_MOBILITY_THRESHOLD};
use crate::parser::ParsedGame;
use crate::rules::{move_to_uci, Board};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticKind {
    Fork,
    Pin,
}

impl TacticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TacticKind::Fork => "fork",
            TacticKind::Pin => "pin",
        }
    }
}

/// A tactic available in a position, and the move that exposes it
#[derive(Debug, Clone)]
pub struct TacticFound {
    pub kind: TacticKind,
    pub candidate: Move,
    /// Attacked pieces for a fork, opponent replies for a pin
    pub measure: usize,
}

impl TacticFound {
    fn explanation(&self) -> String {
        let uci = move_to_uci(&self.candidate);
        match self.kind {
            TacticKind::Fork => format!(
                "{} would have attacked {} pieces at once",
                uci, self.measure
            ),
            TacticKind::Pin => format!(
                "{} would have left the opponent only {} legal moves, a sign of a pin or skewer",
                uci, self.measure
            ),
        }
    }
}

/// Number of `victim` pieces attacked by `attacker`
fn attacked_pieces(board: &Board, victim: Color, attacker: Color) -> usize {
    board
        .pieces()
        .into_iter()
        .filter(|(square, piece)| piece.color == victim && board.is_attacked(*square, attacker))
        .count()
}

/// First tactic available to `side` in legal-move order, if any.
/// The board is left exactly as it was found.
pub fn find_tactic(board: &mut Board, side: Color) -> Option<TacticFound> {
    let opponent = side.other();

    for candidate in board.legal_moves() {
        let is_capture = candidate.is_capture();
        let found = board
            .probe(candidate.clone(), |after| {
                let attacked = attacked_pieces(after, opponent, side);
                if attacked >= FORK_MIN_TARGETS {
                    return Some((TacticKind::Fork, attacked));
                }
                if is_capture {
                    let replies = after.legal_moves().len();
                    if replies < PIN_MOBILITY_THRESHOLD {
                        return Some((TacticKind::Pin, replies));
                    }
                }
                None
            })
            .flatten();

        if let Some((kind, measure)) = found {
            return Some(TacticFound {
                kind,
                candidate,
                measure,
            });
        }
    }

    None
}

pub fn run_tactics_analysis(game: &ParsedGame, user_color: UserColor) -> TacticsAnalysisResult {
    scan_tactics(Board::new(), game.san_moves(), user_color)
}

/// Walks `moves` from `board`, checking every position where `user_color` is to move
fn scan_tactics<'a>(
    mut board: Board,
    moves: impl Iterator<Item = &'a str>,
    user_color: UserColor,
) -> TacticsAnalysisResult {
    let color = user_color.as_color();
    let mut result = TacticsAnalysisResult::default();

    for (ply, san) in moves.enumerate() {
        let move_number = (ply / 2 + 1) as u32;

        let mv = match board.parse_san(san) {
            Ok(mv) => mv,
            Err(e) => {
                warn!("skipping move {} at ply {}: {}", san, ply, e);
                continue;
            }
        };

        if board.turn() == color {
            let position = board.fen();
            if let Some(found) = find_tactic(&mut board, color) {
                if found.candidate == mv {
                    result.executed_tactics.push(ExecutedTactic {
                        move_number,
                        position,
                        tactic: found.kind.as_str().to_string(),
                    });
                } else {
                    result.missed_tactics.push(MissedTactic {
                        move_number,
                        position,
                        tactic: found.kind.as_str().to_string(),
                        explanation: found.explanation(),
                    });
                }
            }
        }

        if let Err(e) = board.push(mv) {
            warn!("skipping move {} at ply {}: {}", san, ply, e);
        }
    }

    result
}
