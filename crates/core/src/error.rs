//! Error types for chess-review-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("AI backend error: {0}")]
    Ai(String),

    #[error("AI response rejected: {0}")]
    InvalidShape(String),

    #[error("AI analysis timed out after {0} seconds")]
    Timeout(u64),

    #[error("Invalid FEN '{fen}': {reason}")]
    Fen { fen: String, reason: String },

    #[error("Illegal move '{san}' in position {fen}")]
    IllegalMove { san: String, fen: String },

    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
