//! Runtime configuration and heuristic thresholds

use std::env;
use std::time::Duration;

pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

// Eval-diff thresholds in material points (pawn = 1)
pub const BLUNDER_THRESHOLD: f64 = 2.0;
pub const MISTAKE_THRESHOLD: f64 = 1.0;
pub const INACCURACY_THRESHOLD: f64 = 0.5;
pub const EXCELLENT_THRESHOLD: f64 = 0.2;

/// Opponent replies below this count after a capture are read as a pin or skewer.
pub const PIN_MOBILITY_THRESHOLD: usize = 10;
/// Opponent pieces that must be attacked at once to call it a fork.
pub const FORK_MIN_TARGETS: usize = 2;

/// Plies considered when scoring the opening.
pub const OPENING_WINDOW_PLIES: usize = 20;
/// User plies before this index count as book moves.
pub const OPENING_BOOK_PLIES: usize = 12;

/// Plies scored by the fundamentals pipeline.
pub const FUNDAMENTALS_WINDOW_PLIES: usize = 40;
/// Scores below this produce a recommendation.
pub const RECOMMENDATION_THRESHOLD: u32 = 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub ai_api_key: Option<String>,
    pub ai_api_url: String,
    pub ai_model: String,
    pub ai_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            ai_api_key: env::var("AI_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            ai_api_url: env::var("AI_API_URL").unwrap_or_else(|_| DEFAULT_AI_API_URL.to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            ai_timeout: Duration::from_secs(
                env::var("AI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_AI_TIMEOUT_SECS),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai_api_key: None,
            ai_api_url: DEFAULT_AI_API_URL.to_string(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_credential() {
        let config = Config::default();
        assert!(config.ai_api_key.is_none());
        assert_eq!(config.ai_timeout, Duration::from_secs(30));
    }
}
