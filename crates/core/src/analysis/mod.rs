//! Heuristic analysis pipelines
//!
//! Each pipeline replays the game on its own board; none of them share
//! state, so they can run in any order or in parallel.

pub mod fundamentals;
pub mod game;
pub mod openings;
pub mod tactics;
mod types;

pub use fundamentals::run_fundamentals_analysis;
pub use game::run_game_analysis;
pub use openings::run_openings_analysis;
pub use tactics::{find_tactic, run_tactics_analysis, TacticFound, TacticKind};
pub use types::*;
