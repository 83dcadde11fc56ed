//! Entry point: PGN + username in, full analysis bundle out
//!
//! `analyze` is total. AI failures fall back to the local pipelines per
//! slot, and a panic anywhere in the local work yields
//! `AnalysisBundle::fallback()`.

use serde::de::DeserializeOwned;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::ai::{extract_json, AiBackend, AiClient, Prompts};
use crate::analysis::*;
use crate::config::{Config, DEFAULT_AI_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::parser::{parse_pgn, ParsedGame};

/// Case-insensitive match against the White then Black header; White otherwise
pub fn determine_user_color(game: &ParsedGame, username: &str) -> UserColor {
    let username = username.to_lowercase();
    let matches = |name: &Option<String>| {
        name.as_deref()
            .is_some_and(|n| n.to_lowercase() == username)
    };

    if matches(&game.white) {
        UserColor::White
    } else if matches(&game.black) {
        UserColor::Black
    } else {
        UserColor::White
    }
}

/// All four local pipelines, each on its own board
pub fn run_heuristic(game: &ParsedGame, user_color: UserColor) -> AnalysisBundle {
    AnalysisBundle {
        game: run_game_analysis(game, user_color),
        tactics: run_tactics_analysis(game, user_color),
        openings: run_openings_analysis(game, user_color),
        fundamentals: run_fundamentals_analysis(game, user_color),
    }
}

/// Local-only analysis, never panics
pub fn analyze_heuristic(pgn: &str, username: &str) -> AnalysisBundle {
    shield(|| {
        let game = parse_pgn(pgn);
        let user_color = determine_user_color(&game, username);
        run_heuristic(&game, user_color)
    })
    .unwrap_or_else(AnalysisBundle::fallback)
}

/// Runs `f`, turning a panic into `None`
fn shield<T>(f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            error!("analysis panicked, returning the fallback bundle");
            None
        }
    }
}

/// Accepted AI answers; an empty slot is filled locally
#[derive(Default)]
struct AiResults {
    game: Option<GameAnalysisResult>,
    tactics: Option<TacticsAnalysisResult>,
    openings: Option<OpeningsAnalysisResult>,
    fundamentals: Option<FundamentalsAnalysisResult>,
}

async fn fetch<T, B>(backend: &B, prompt: String) -> Result<T>
where
    T: DeserializeOwned + Validate,
    B: AiBackend,
{
    let reply = backend.complete(prompt).await?;
    let value: T = serde_json::from_str(extract_json(&reply))?;
    value.validate()?;
    Ok(value)
}

fn keep<T>(slot: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("AI {} analysis rejected, using local analysis: {}", slot, e);
            None
        }
    }
}

pub struct Analyzer<B = AiClient> {
    backend: Option<B>,
    timeout: Duration,
}

impl Analyzer<AiClient> {
    /// AI-backed when `config` carries an API key, local-only otherwise
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            backend: AiClient::from_config(config)?,
            timeout: config.ai_timeout,
        })
    }

    pub fn heuristic_only() -> Self {
        Self {
            backend: None,
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl<B: AiBackend + Sync> Analyzer<B> {
    pub fn with_backend(backend: B, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn analyze(&self, pgn: &str, username: &str) -> AnalysisBundle {
        let Some(backend) = &self.backend else {
            debug!("no AI backend configured, running local analysis");
            return analyze_heuristic(pgn, username);
        };

        let Some((game, user_color)) = shield(|| {
            let game = parse_pgn(pgn);
            let user_color = determine_user_color(&game, username);
            (game, user_color)
        }) else {
            return AnalysisBundle::fallback();
        };

        let Some(prompts) = shield(|| Prompts::build(&game, user_color)) else {
            return analyze_heuristic(pgn, username);
        };

        let calls = async {
            tokio::join!(
                fetch::<GameAnalysisResult, _>(backend, prompts.game),
                fetch::<TacticsAnalysisResult, _>(backend, prompts.tactics),
                fetch::<OpeningsAnalysisResult, _>(backend, prompts.openings),
                fetch::<FundamentalsAnalysisResult, _>(backend, prompts.fundamentals),
            )
        };

        // On timeout the outstanding calls are dropped and every slot is filled locally
        let ai = match tokio::time::timeout(self.timeout, calls).await {
            Ok((game, tactics, openings, fundamentals)) => AiResults {
                game: keep("game", game),
                tactics: keep("tactics", tactics),
                openings: keep("openings", openings),
                fundamentals: keep("fundamentals", fundamentals),
            },
            Err(_) => {
                warn!("{}", Error::Timeout(self.timeout.as_secs()));
                AiResults::default()
            }
        };

        let from_ai = [
            ai.game.is_some(),
            ai.tactics.is_some(),
            ai.openings.is_some(),
            ai.fundamentals.is_some(),
        ]
        .iter()
        .filter(|&&used| used)
        .count();

        let bundle = shield(|| AnalysisBundle {
            game: match ai.game {
                Some(mut result) => {
                    // Color and outcome come from the headers, not the model
                    result.user_color = user_color;
                    result.outcome = Outcome::from_result(game.result.as_deref(), user_color);
                    result
                }
                None => run_game_analysis(&game, user_color),
            },
            tactics: ai
                .tactics
                .unwrap_or_else(|| run_tactics_analysis(&game, user_color)),
            openings: ai
                .openings
                .unwrap_or_else(|| run_openings_analysis(&game, user_color)),
            fundamentals: ai
                .fundamentals
                .unwrap_or_else(|| run_fundamentals_analysis(&game, user_color)),
        })
        .unwrap_or_else(AnalysisBundle::fallback);

        info!(
            "analyzed {} ({} moves) as {}: {}/4 sections from AI",
            game.summary(),
            game.move_count(),
            user_color.as_str(),
            from_ai
        );

        bundle
    }
}
