//! Chess Review Core Library
//!
//! Parses PGN games and produces a four-part review (game, tactics,
//! openings, fundamentals) for one player, optionally through an AI backend.

pub mod ai;
pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod rules;

pub use analysis::{AnalysisBundle, UserColor};
pub use analyzer::{analyze_heuristic, determine_user_color, Analyzer};
pub use config::Config;
pub use error::{Error, Result};
pub use parser::{parse_pgn, ParsedGame};
