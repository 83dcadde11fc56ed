//! Chess rules adapter: board state, legality and PGN replay

pub mod board;
pub mod replay;

pub use board::{move_to_uci, Board, SquarePiece, VerboseMove};
pub use replay::{load_pgn, Replay};
