//! Move-by-move accuracy analysis

use shakmaty::Color;
use tracing::{debug, warn};

use super::types::*;
use crate::engine::MaterialEngine;
use crate::parser::ParsedGame;
use crate::rules::Board;

/// Replays the game and grades every move the user made against the
/// evaluator's one-ply best move.
pub fn run_game_analysis(game: &ParsedGame, user_color: UserColor) -> GameAnalysisResult {
    let mut board = Board::new();
    let mut engine = MaterialEngine::new();
    let color = user_color.as_color();

    let mut result = GameAnalysisResult {
        outcome: Outcome::from_result(game.result.as_deref(), user_color),
        user_color,
        ..GameAnalysisResult::default()
    };
    let mut user_moves = 0u32;
    let mut good_moves = 0u32;

    for (ply, san) in game.san_moves().enumerate() {
        let move_number = (ply / 2 + 1) as u32;

        let mv = match board.parse_san(san) {
            Ok(mv) => mv,
            Err(e) => {
                warn!("skipping move {} at ply {}: {}", san, ply, e);
                continue;
            }
        };

        if board.turn() != color {
            if let Err(e) = board.push(mv) {
                warn!("skipping move {} at ply {}: {}", san, ply, e);
            }
            continue;
        }

        let fen_before = board.fen();
        engine.set_position(&fen_before);
        let best = engine.best_move();

        if let Err(e) = board.push(mv) {
            warn!("skipping move {} at ply {}: {}", san, ply, e);
            continue;
        }

        let Some(best) = best else {
            debug!("no legal reply found before {} at ply {}", san, ply);
            continue;
        };

        // Scores from the mover's side
        engine.set_position(&board.fen());
        let played_eval = match color {
            Color::White => engine.evaluate(),
            Color::Black => -engine.evaluate(),
        };
        let eval_diff = (best.evaluation - played_eval).abs();
        let class = MoveClass::from_eval_diff(eval_diff);

        debug!("move {} {}: {} ({:.1})", move_number, san, class.as_str(), eval_diff);
        user_moves += 1;
        if class.is_good() {
            good_moves += 1;
        }
        match class {
            MoveClass::Blunder => result.blunders += 1,
            MoveClass::Mistake => result.mistakes += 1,
            MoveClass::Inaccuracy => result.inaccuracies += 1,
            MoveClass::Good | MoveClass::Excellent => {}
        }

        let description = match class {
            MoveClass::Blunder => format!(
                "{} was a blunder: {} kept {:.1} more points of material",
                san, best.uci, eval_diff
            ),
            MoveClass::Excellent => format!("{} was an excellent move", san),
            _ => continue,
        };

        result.key_moments.push(KeyMoment {
            move_number,
            position: fen_before,
            kind: class,
            description,
        });
    }

    result.accuracy = if user_moves == 0 {
        0.0
    } else {
        good_moves as f64 / user_moves as f64 * 100.0
    };

    debug!(
        "game analysis: {} user moves, {} blunders, {} mistakes, {} inaccuracies",
        user_moves, result.blunders, result.mistakes, result.inaccuracies
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_pgn, ParsedMove};

    const KNIGHT_LEFT_HANGING: &str = r#"[White "me"]
[Black "you"]
[Result "0-1"]

1. e4 e5 2. Nf3 Nc6 3. d4 Nxd4 4. a3 *"#;

    #[test]
    fn test_empty_game() {
        let result = run_game_analysis(&parse_pgn(""), UserColor::White);
        assert_eq!(result.outcome, Outcome::Unknown);
        assert_eq!(result.accuracy, 0.0);
        assert!(result.key_moments.is_empty());
    }

    #[test]
    fn test_classifies_white_moves() {
        let result = run_game_analysis(&parse_pgn(KNIGHT_LEFT_HANGING), UserColor::White);
        assert_eq!(result.outcome, Outcome::Loss);
        assert_eq!(result.user_color, UserColor::White);
        assert_eq!(result.blunders, 1);
        assert_eq!(result.mistakes, 0);
        assert_eq!(result.inaccuracies, 1);
        assert_eq!(result.accuracy, 50.0);

        let kinds: Vec<_> = result
            .key_moments
            .iter()
            .map(|m| (m.move_number, m.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (1, MoveClass::Excellent),
                (2, MoveClass::Excellent),
                (4, MoveClass::Blunder),
            ]
        );
        assert!(result.key_moments[2].description.starts_with("a3 was a blunder"));
        assert_eq!(
            result.key_moments[0].position,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_classifies_black_moves() {
        let result = run_game_analysis(&parse_pgn(KNIGHT_LEFT_HANGING), UserColor::Black);
        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(result.blunders + result.mistakes + result.inaccuracies, 0);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.key_moments.len(), 3);
        assert!(result.key_moments.iter().all(|m| m.kind == MoveClass::Excellent));
    }

    #[test]
    fn test_escaped_tag_does_not_shift_move_numbers() {
        let pgn = "[White \"me\"]\n[Event \"The \\\"Big\\\" One\"]\n\n1. e4 e5 2. Nf3 *";
        let result = run_game_analysis(&parse_pgn(pgn), UserColor::White);
        let numbers: Vec<_> = result.key_moments.iter().map(|m| m.move_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_unplayable_tokens_are_skipped() {
        let game = ParsedGame {
            moves: ["e4", "xx", "e5", "Nf3", "Zz9"]
                .into_iter()
                .map(ParsedMove::new)
                .collect(),
            ..ParsedGame::default()
        };
        let result = run_game_analysis(&game, UserColor::White);
        assert_eq!(result.key_moments.len(), 2);
        assert_eq!(result.key_moments[1].move_number, 2);
        assert_eq!(result.accuracy, 100.0);
    }
}
