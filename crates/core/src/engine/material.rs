//! Material-count evaluator
//!
//! Stands in for a real engine: scores are material only and "search" is a
//! single ply. One instance per analysis; nothing is shared between games.

use shakmaty::{Color, Move, Role};
use tracing::debug;

use crate::rules::{move_to_uci, Board};

/// Best reply found by the one-ply search
#[derive(Debug, Clone)]
pub struct BestMove {
    pub mv: Move,
    pub uci: String,
    /// Material balance after the move, from the mover's point of view
    pub evaluation: f64,
}

pub fn piece_value(role: Role) -> f64 {
    match role {
        Role::Pawn => 1.0,
        Role::Knight | Role::Bishop => 3.0,
        Role::Rook => 5.0,
        Role::Queen => 9.0,
        Role::King => 0.0,
    }
}

/// White-positive material balance of a board
pub fn material_balance(board: &Board) -> f64 {
    board
        .pieces()
        .into_iter()
        .map(|(_, piece)| match piece.color {
            Color::White => piece_value(piece.role),
            Color::Black => -piece_value(piece.role),
        })
        .sum()
}

/// Material balance from the side to move's point of view
pub fn relative_balance(board: &Board) -> f64 {
    match board.turn() {
        Color::White => material_balance(board),
        Color::Black => -material_balance(board),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaterialEngine {
    board: Board,
}

impl MaterialEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a position. An unreadable FEN falls back to the starting position.
    pub fn set_position(&mut self, fen: &str) {
        match Board::from_fen(fen) {
            Ok(board) => self.board = board,
            Err(e) => {
                debug!("engine falling back to start position: {}", e);
                self.board.reset();
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// White-positive material balance
    pub fn evaluate(&self) -> f64 {
        material_balance(&self.board)
    }

    /// Negamax over the legal moves, one ply deep.
    /// Ties keep the first move in generation order; `None` if no move exists.
    pub fn best_move(&mut self) -> Option<BestMove> {
        let mut best: Option<BestMove> = None;

        for mv in self.board.legal_moves() {
            let Some(score) = self.board.probe(mv.clone(), |after| -relative_balance(after))
            else {
                continue;
            };

            if best.as_ref().map_or(true, |b| score > b.evaluation) {
                best = Some(BestMove {
                    uci: move_to_uci(&mv),
                    mv,
                    evaluation: score,
                });
            }
        }

        best
    }
}
