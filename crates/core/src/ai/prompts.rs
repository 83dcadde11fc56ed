//! Prompt text for the four AI analyses

use crate::analysis::UserColor;
use crate::parser::ParsedGame;
use crate::rules::load_pgn;

const GAME_SHAPE: &str = r#"{
  "outcome": "Win" | "Loss" | "Draw" | "Unknown",
  "userColor": "white" | "black",
  "accuracy": number between 0 and 100,
  "blunders": integer,
  "mistakes": integer,
  "inaccuracies": integer,
  "keyMoments": [{"moveNumber": integer, "position": FEN, "type": "blunder" | "mistake" | "inaccuracy" | "good" | "excellent", "description": string}]
}"#;

const TACTICS_SHAPE: &str = r#"{
  "missedTactics": [{"moveNumber": integer, "position": FEN, "tactic": string, "explanation": string}],
  "executedTactics": [{"moveNumber": integer, "position": FEN, "tactic": string}]
}"#;

const OPENINGS_SHAPE: &str = r#"{
  "eco": string,
  "name": string,
  "accuracy": number between 0 and 100,
  "commonLines": [{"name": string, "moves": string}],
  "recommendations": [string]
}"#;

const FUNDAMENTALS_SHAPE: &str = r#"{
  "pieceDevelopment": integer between 0 and 100,
  "centerControl": integer between 0 and 100,
  "kingSafety": integer between 0 and 100,
  "pawnStructure": integer between 0 and 100,
  "recommendations": [string]
}"#;

/// One prompt per analysis, all describing the same game
#[derive(Debug, Clone)]
pub struct Prompts {
    pub game: String,
    pub tactics: String,
    pub openings: String,
    pub fundamentals: String,
}

impl Prompts {
    pub fn build(game: &ParsedGame, user_color: UserColor) -> Self {
        let context = game_context(game, user_color);

        Self {
            game: render(
                "game",
                &context,
                "Grade each of the player's moves and pick out the key moments.",
                GAME_SHAPE,
            ),
            tactics: render(
                "tactics",
                &context,
                "List the tactics the player missed and the ones they executed.",
                TACTICS_SHAPE,
            ),
            openings: render(
                "openings",
                &context,
                "Name the opening, rate how well the player handled it and suggest lines to study.",
                OPENINGS_SHAPE,
            ),
            fundamentals: render(
                "fundamentals",
                &context,
                "Score the player's development, center control, king safety and pawn structure.",
                FUNDAMENTALS_SHAPE,
            ),
        }
    }
}

fn game_context(game: &ParsedGame, user_color: UserColor) -> String {
    let mut context = format!(
        "The player had the {} pieces.\n{}\n",
        user_color.as_str(),
        game.summary()
    );

    // Best effort: a PGN the rules engine rejects still gets analysed
    if let Ok(replay) = load_pgn(&game.raw_pgn) {
        context.push_str(&format!("Final position (FEN): {}\n", replay.board.fen()));
    }

    context.push_str("\nPGN:\n");
    context.push_str(game.raw_pgn.trim());
    context.push('\n');
    context
}

fn render(task: &str, context: &str, instruction: &str, shape: &str) -> String {
    format!(
        "Task: {} analysis\n\n{}\n{}\nRespond with a JSON object of exactly this shape:\n{}\n",
        task, context, instruction, shape
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pgn;

    const PGN: &str = "[White \"alice\"]\n[Black \"bob\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0";

    #[test]
    fn test_prompts_carry_task_and_shape() {
        let prompts = Prompts::build(&parse_pgn(PGN), UserColor::White);
        assert!(prompts.game.starts_with("Task: game analysis"));
        assert!(prompts.tactics.starts_with("Task: tactics analysis"));
        assert!(prompts.openings.starts_with("Task: openings analysis"));
        assert!(prompts.fundamentals.starts_with("Task: fundamentals analysis"));
        assert!(prompts.game.contains("\"keyMoments\""));
        assert!(prompts.fundamentals.contains("\"pawnStructure\""));
    }

    #[test]
    fn test_prompt_includes_game_context() {
        let prompts = Prompts::build(&parse_pgn(PGN), UserColor::Black);
        assert!(prompts.game.contains("black pieces"));
        assert!(prompts.game.contains("Qxf7#"));
        assert!(prompts
            .game
            .contains("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4"));
    }

    #[test]
    fn test_unreplayable_pgn_still_builds() {
        let prompts = Prompts::build(&parse_pgn("1. e4 e4 *"), UserColor::White);
        assert!(!prompts.game.contains("Final position"));
        assert!(prompts.game.contains("1. e4 e4"));
    }
}
