//! Parser module for reading chess game formats
//!
//! Currently supports:
//! - PGN (Portable Game Notation)

pub mod pgn;

pub use pgn::{
    extract_basic_info, parse_pgn, parse_pgn_with, BasicInfo, ParseOptions, ParsedGame,
    ParsedMove,
};
