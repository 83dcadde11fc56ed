//! Development, center, king safety and pawn structure scoring
//!
//! Each position after a user move in the first 40 plies adds to four
//! running totals. The totals are clamped to 0..=100 at the end.

use shakmaty::{Color, File, Rank, Role, Square};
use tracing::warn;

use super::types::*;
use crate::config::{FUNDAMENTALS_WINDOW_PLIES, RECOMMENDATION_THRESHOLD};
use crate::parser::ParsedGame;
use crate::rules::Board;

const DEVELOPED_PIECE_BONUS: u32 = 10;
const CENTER_SQUARE_BONUS: u32 = 15;
const KING_SAFETY_BASE: u32 = 50;
const CASTLED_KING_BONUS: u32 = 30;
const PAWN_STRUCTURE_BASE: u32 = 60;
const PAWN_WEAKNESS_PENALTY: u32 = 5;

const CENTER: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

fn home_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    }
}

/// Knights and bishops that have left the back rank
pub fn development_score(board: &Board, color: Color) -> u32 {
    let developed = board
        .grid()
        .iter()
        .flatten()
        .flatten()
        .filter(|p| p.color == color && matches!(p.role, Role::Knight | Role::Bishop))
        .filter(|p| p.square.rank() != home_rank(color))
        .count() as u32;
    developed * DEVELOPED_PIECE_BONUS
}

pub fn center_score(board: &Board, color: Color) -> u32 {
    let occupied = CENTER
        .iter()
        .filter(|&&sq| board.piece_at(sq).is_some_and(|p| p.color == color))
        .count() as u32;
    occupied * CENTER_SQUARE_BONUS
}

/// Base score, plus a bonus when the king sits on b or g of its back rank
pub fn king_safety_score(board: &Board, color: Color) -> u32 {
    let castled = board
        .grid()
        .iter()
        .flatten()
        .flatten()
        .any(|p| {
            p.color == color
                && p.role == Role::King
                && p.square.rank() == home_rank(color)
                && matches!(p.square.file(), File::B | File::G)
        });
    if castled {
        KING_SAFETY_BASE + CASTLED_KING_BONUS
    } else {
        KING_SAFETY_BASE
    }
}

/// Base score minus penalties for doubled and isolated pawns, floored at 0
pub fn pawn_structure_score(board: &Board, color: Color) -> u32 {
    let mut per_file = [0u32; 8];
    for piece in board.grid().iter().flatten().flatten() {
        if piece.color == color && piece.role == Role::Pawn {
            per_file[piece.square.file() as usize] += 1;
        }
    }

    let mut penalty = 0;
    for (file, &count) in per_file.iter().enumerate() {
        if count == 0 {
            continue;
        }
        penalty += count.saturating_sub(1) * PAWN_WEAKNESS_PENALTY;

        let left = file.checked_sub(1).map_or(0, |f| per_file[f]);
        let right = per_file.get(file + 1).copied().unwrap_or(0);
        if left == 0 && right == 0 {
            penalty += count * PAWN_WEAKNESS_PENALTY;
        }
    }

    PAWN_STRUCTURE_BASE.saturating_sub(penalty)
}

fn recommendations(result: &FundamentalsAnalysisResult) -> Vec<String> {
    let threshold = RECOMMENDATION_THRESHOLD;
    let mut advice: Vec<&str> = Vec::new();

    if result.piece_development < threshold {
        advice.push("Develop your knights and bishops early, before starting an attack.");
        advice.push("Avoid moving the same piece twice in the opening without a reason.");
    }
    if result.center_control < threshold {
        advice.push("Occupy or control the central squares d4, d5, e4 and e5.");
    }
    if result.king_safety < threshold {
        advice.push("Castle early to get your king out of the center.");
        advice.push("Keep the pawns in front of your castled king intact.");
    }
    if result.pawn_structure < threshold {
        advice.push("Avoid doubled and isolated pawns unless you get concrete compensation.");
    }
    if advice.is_empty() {
        advice.push("Your fundamentals look solid. Keep applying them consistently.");
    }

    advice.into_iter().map(String::from).collect()
}

pub fn run_fundamentals_analysis(
    game: &ParsedGame,
    user_color: UserColor,
) -> FundamentalsAnalysisResult {
    let mut board = Board::new();
    let color = user_color.as_color();
    let (mut development, mut center, mut king, mut pawns) = (0u32, 0u32, 0u32, 0u32);

    for (ply, san) in game.san_moves().take(FUNDAMENTALS_WINDOW_PLIES).enumerate() {
        let mover = board.turn();
        if let Err(e) = board.push_san(san) {
            warn!("skipping move {} at ply {}: {}", san, ply, e);
            continue;
        }
        if mover != color {
            continue;
        }

        development += development_score(&board, color);
        center += center_score(&board, color);
        king += king_safety_score(&board, color);
        pawns += pawn_structure_score(&board, color);
    }

    let mut result = FundamentalsAnalysisResult {
        piece_development: development.min(100),
        center_control: center.min(100),
        king_safety: king.min(100),
        pawn_structure: pawns.min(100),
        recommendations: Vec::new(),
    };
    result.recommendations = recommendations(&result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pgn;

    fn assert_in_range(result: &FundamentalsAnalysisResult) {
        for score in [
            result.piece_development,
            result.center_control,
            result.king_safety,
            result.pawn_structure,
        ] {
            assert!(score <= 100);
        }
    }

    #[test]
    fn test_single_move_game() {
        let result = run_fundamentals_analysis(&parse_pgn("1. e4 *"), UserColor::White);
        assert_in_range(&result);
        assert_eq!(result.piece_development, 0);
        assert_eq!(result.center_control, 15);
        assert_eq!(result.king_safety, 50);
        assert_eq!(result.pawn_structure, 60);
        assert_eq!(result.recommendations.len(), 5);
    }

    #[test]
    fn test_no_user_moves_scores_zero() {
        let result = run_fundamentals_analysis(&parse_pgn("1. e4 *"), UserColor::Black);
        assert_eq!(result.piece_development, 0);
        assert_eq!(result.king_safety, 0);
        assert_eq!(result.pawn_structure, 0);
        assert_eq!(result.recommendations.len(), 6);
    }

    #[test]
    fn test_castled_game_accumulates_and_clamps() {
        let game = parse_pgn("1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 *");
        let result = run_fundamentals_analysis(&game, UserColor::White);
        assert_eq!(result.piece_development, 50);
        assert_eq!(result.center_control, 60);
        assert_eq!(result.king_safety, 100);
        assert_eq!(result.pawn_structure, 100);
        assert_eq!(
            result.recommendations,
            vec![
                "Develop your knights and bishops early, before starting an attack.",
                "Avoid moving the same piece twice in the opening without a reason.",
            ]
        );
    }

    #[test]
    fn test_long_game_stays_in_range() {
        let game = parse_pgn(
            "1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7 5. e3 O-O 6. Nf3 Nbd7 7. Rc1 c6 \
             8. Bd3 dxc4 9. Bxc4 Nd5 10. Bxe7 Qxe7 11. O-O Nxc3 12. Rxc3 e5 *",
        );
        for color in [UserColor::White, UserColor::Black] {
            let result = run_fundamentals_analysis(&game, color);
            assert_in_range(&result);
            assert_eq!(result.king_safety, 100);
        }
    }

    #[test]
    fn test_pawn_structure_penalties() {
        // c2/c3 doubled and isolated, e2 isolated
        let board = Board::from_fen("4k3/8/8/8/8/2P5/2P1P3/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_structure_score(&board, Color::White), 40);
        assert_eq!(pawn_structure_score(&Board::new(), Color::Black), 60);

        // Enough weaknesses to hit the floor
        let wrecked = Board::from_fen("4k3/8/P1P1P1P1/P1P1P1P1/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_structure_score(&wrecked, Color::White), 0);
    }

    #[test]
    fn test_center_and_development_helpers() {
        let board = Board::from_fen("4k3/8/8/3pP3/3N4/2B5/8/4K3 w - - 0 1").unwrap();
        assert_eq!(center_score(&board, Color::White), 30);
        assert_eq!(center_score(&board, Color::Black), 15);
        assert_eq!(development_score(&board, Color::White), 20);
        assert_eq!(king_safety_score(&board, Color::White), 50);
        let castled = Board::from_fen("6k1/8/8/8/8/8/8/1K6 w - - 0 1").unwrap();
        assert_eq!(king_safety_score(&castled, Color::White), 80);
        assert_eq!(king_safety_score(&castled, Color::Black), 80);
    }
}
