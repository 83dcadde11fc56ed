//! Board state wrapper used by the analysis pipelines
//!
//! Wraps a `shakmaty::Chess` position with an undo stack so pipelines can
//! make hypothetical moves and take them back.

use shakmaty::{
    fen::Fen, san::San, san::SanPlus, CastlingMode, Chess, Color, EnPassantMode, File, Move,
    MoveList, Piece, Position, Rank, Role, Square,
};

use crate::error::{Error, Result};

/// One occupied square of the 8x8 grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquarePiece {
    pub square: Square,
    pub color: Color,
    pub role: Role,
}

/// A legal move with its notations and capture flag
#[derive(Debug, Clone)]
pub struct VerboseMove {
    pub mv: Move,
    pub san: String,
    pub uci: String,
    pub capture: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    position: Chess,
    history: Vec<Chess>,
}

impl Board {
    /// Standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let invalid = |reason: String| Error::Fen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{}", e)))?;
        Ok(Self {
            position,
            history: Vec::new(),
        })
    }

    /// Back to the starting position with an empty undo stack
    pub fn reset(&mut self) {
        self.position = Chess::default();
        self.history.clear();
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Number of moves that can currently be taken back
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    pub fn legal_moves(&self) -> MoveList {
        self.position.legal_moves()
    }

    pub fn legal_moves_verbose(&self) -> Vec<VerboseMove> {
        self.position
            .legal_moves()
            .into_iter()
            .map(|mv| VerboseMove {
                san: San::from_move(&self.position, mv.clone()).to_string(),
                uci: move_to_uci(&mv),
                capture: mv.is_capture(),
                mv,
            })
            .collect()
    }

    /// Resolves a SAN token against the current position.
    /// Trailing `!`/`?` annotations are ignored.
    pub fn parse_san(&self, san: &str) -> Result<Move> {
        let illegal = || Error::IllegalMove {
            san: san.to_string(),
            fen: self.fen(),
        };
        let cleaned = san.trim().trim_end_matches(['!', '?']);
        let parsed: SanPlus = cleaned.parse().map_err(|_| illegal())?;
        parsed.san.to_move(&self.position).map_err(|_| illegal())
    }

    pub fn push(&mut self, mv: Move) -> Result<()> {
        match self.position.clone().play(mv.clone()) {
            Ok(next) => {
                let previous = std::mem::replace(&mut self.position, next);
                self.history.push(previous);
                Ok(())
            }
            Err(_) => Err(Error::IllegalMove {
                san: move_to_uci(&mv),
                fen: self.fen(),
            }),
        }
    }

    pub fn push_san(&mut self, san: &str) -> Result<Move> {
        let mv = self.parse_san(san)?;
        self.push(mv.clone())?;
        Ok(mv)
    }

    /// Takes back the last move. Returns false when there is nothing to undo.
    pub fn pop(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.position = previous;
                true
            }
            None => false,
        }
    }

    /// Plays `mv`, runs `f` on the resulting board, then takes the move back.
    /// Returns `None` if the move is illegal; the board is unchanged either way.
    pub fn probe<R>(&mut self, mv: Move, f: impl FnOnce(&Board) -> R) -> Option<R> {
        self.push(mv).ok()?;
        let out = f(self);
        self.pop();
        Some(out)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square)
    }

    /// True if any piece of `by` attacks `square`
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        let board = self.position.board();
        !board.attacks_to(square, by, board.occupied()).is_empty()
    }

    /// All occupied squares with their pieces, a1 first
    pub fn pieces(&self) -> Vec<(Square, Piece)> {
        let board = self.position.board();
        board
            .occupied()
            .into_iter()
            .filter_map(|sq| board.piece_at(sq).map(|piece| (sq, piece)))
            .collect()
    }

    /// Rows from rank 8 down to rank 1, files a to h
    pub fn grid(&self) -> [[Option<SquarePiece>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        for (row, rank) in Rank::ALL.iter().rev().enumerate() {
            for (col, file) in File::ALL.iter().enumerate() {
                let square = Square::from_coords(*file, *rank);
                grid[row][col] = self.piece_at(square).map(|piece| SquarePiece {
                    square,
                    color: piece.color,
                    role: piece.role,
                });
            }
        }
        grid
    }
}

/// Convert shakmaty Move to UCI string
pub fn move_to_uci(mv: &Move) -> String {
    match mv {
        Move::Normal {
            from, to, promotion, ..
        } => {
            let promo = promotion
                .map(|r| match r {
                    Role::Queen => "q",
                    Role::Rook => "r",
                    Role::Bishop => "b",
                    Role::Knight => "n",
                    _ => "",
                })
                .unwrap_or("");
            format!("{}{}{}", from, to, promo)
        }
        Move::EnPassant { from, to, .. } => format!("{}{}", from, to),
        Move::Castle { king, rook } => {
            let king_to = if rook.file() > king.file() {
                Square::from_coords(File::G, king.rank())
            } else {
                Square::from_coords(File::C, king.rank())
            };
            format!("{}{}", king, king_to)
        }
        Move::Put { .. } => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_start_position() {
        let board = Board::new();
        assert_eq!(board.fen(), START_FEN);
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.legal_moves().len(), 20);
        assert_eq!(board.pieces().len(), 32);
    }

    #[test]
    fn test_invalid_fen_is_an_error() {
        assert!(matches!(Board::from_fen("not a fen"), Err(Error::Fen { .. })));
        assert!(Board::from_fen(START_FEN).is_ok());
    }

    #[test]
    fn test_push_san_and_pop() {
        let mut board = Board::new();
        board.push_san("e4").unwrap();
        board.push_san("e5").unwrap();
        board.push_san("Nf3!?").unwrap();
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.depth(), 3);

        assert!(board.pop());
        assert!(board.pop());
        assert!(board.pop());
        assert!(!board.pop());
        assert_eq!(board.fen(), START_FEN);

        board.push_san("d4").unwrap();
        board.reset();
        assert_eq!(board.depth(), 0);
        assert_eq!(board.fen(), START_FEN);
    }

    #[test]
    fn test_illegal_san_leaves_board_untouched() {
        let mut board = Board::new();
        assert!(matches!(board.push_san("Ke2"), Err(Error::IllegalMove { .. })));
        assert!(board.push_san("{comment}").is_err());
        assert_eq!(board.fen(), START_FEN);
    }

    #[test]
    fn test_probe_restores_position() {
        let mut board = Board::new();
        let mv = board.parse_san("d4").unwrap();
        let turn_after = board.probe(mv, |b| b.turn());
        assert_eq!(turn_after, Some(Color::Black));
        assert_eq!(board.fen(), START_FEN);
        assert_eq!(board.depth(), 0);
    }

    #[test]
    fn test_is_attacked() {
        let board = Board::new();
        assert!(board.is_attacked(Square::F3, Color::White));
        assert!(!board.is_attacked(Square::E4, Color::White));
        assert!(board.is_attacked(Square::F6, Color::Black));
    }

    #[test]
    fn test_verbose_moves_flag_captures() {
        let mut board = Board::new();
        for san in ["e4", "d5"] {
            board.push_san(san).unwrap();
        }
        let captures: Vec<_> = board
            .legal_moves_verbose()
            .into_iter()
            .filter(|m| m.capture)
            .collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].san, "exd5");
        assert_eq!(captures[0].uci, "e4d5");
    }

    #[test]
    fn test_grid_layout() {
        let grid = Board::new().grid();
        let a8 = grid[0][0].unwrap();
        assert_eq!(a8.square, Square::A8);
        assert_eq!(a8.role, Role::Rook);
        assert_eq!(a8.color, Color::Black);
        let e1 = grid[7][4].unwrap();
        assert_eq!(e1.role, Role::King);
        assert_eq!(e1.color, Color::White);
        assert!(grid[4][4].is_none());
    }

    #[test]
    fn test_castle_uci() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let mv = board.push_san("O-O").unwrap();
        assert_eq!(move_to_uci(&mv), "e1g1");
    }
}
