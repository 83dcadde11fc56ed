//! Opening report built from the PGN's own ECO/Opening headers

use super::types::*;
use crate::config::{OPENING_BOOK_PLIES, OPENING_WINDOW_PLIES};
use crate::parser::ParsedGame;

/// Reference lines and advice for a family of openings
struct OpeningGuide {
    key: &'static str,
    lines: &'static [(&'static str, &'static str)],
    advice: &'static [&'static str],
}

const GUIDES: &[OpeningGuide] = &[
    OpeningGuide {
        key: "Sicilian",
        lines: &[
            ("Open Sicilian", "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3"),
            ("Najdorf Variation", "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6"),
            ("Alapin Variation", "1. e4 c5 2. c3"),
        ],
        advice: &[
            "In the Sicilian, fight for the d4 square and don't let the queenside majority go to waste.",
            "Be ready for sharp play: both sides usually castle on opposite wings.",
        ],
    },
    OpeningGuide {
        key: "Ruy Lopez",
        lines: &[
            ("Closed Ruy Lopez", "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 5. O-O Be7"),
            ("Berlin Defense", "1. e4 e5 2. Nf3 Nc6 3. Bb5 Nf6"),
        ],
        advice: &[
            "In the Ruy Lopez, keep the pressure on e5 and prepare c3 and d4.",
            "Don't rush the exchange on c6 unless it wins material or ruins Black's structure.",
        ],
    },
    OpeningGuide {
        key: "French Defense",
        lines: &[
            ("Advance Variation", "1. e4 e6 2. d4 d5 3. e5"),
            ("Winawer Variation", "1. e4 e6 2. d4 d5 3. Nc3 Bb4"),
        ],
        advice: &[
            "In the French, strike at the white center with ...c5 and ...f6.",
            "Find a good square for the light-squared bishop before it gets buried.",
        ],
    },
    OpeningGuide {
        key: "Queen's Gambit",
        lines: &[
            ("Queen's Gambit Declined", "1. d4 d5 2. c4 e6 3. Nc3 Nf6"),
            ("Queen's Gambit Accepted", "1. d4 d5 2. c4 dxc4"),
            ("Slav Defense", "1. d4 d5 2. c4 c6"),
        ],
        advice: &[
            "In the Queen's Gambit, use the c-file and pressure on d5 to build play.",
            "After ...dxc4, recover the pawn with e3 and Bxc4 rather than defending it.",
        ],
    },
    OpeningGuide {
        key: "Italian",
        lines: &[
            ("Giuoco Piano", "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. c3"),
            ("Two Knights Defense", "1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6"),
        ],
        advice: &[
            "In the Italian, prepare d4 with c3 and keep an eye on the f7 square.",
        ],
    },
    OpeningGuide {
        key: "Caro-Kann",
        lines: &[
            ("Classical Variation", "1. e4 c6 2. d4 d5 3. Nc3 dxe4 4. Nxe4 Bf5"),
            ("Advance Variation", "1. e4 c6 2. d4 d5 3. e5 Bf5"),
        ],
        advice: &[
            "In the Caro-Kann, develop the light-squared bishop before playing ...e6.",
        ],
    },
    OpeningGuide {
        key: "King's Indian",
        lines: &[
            ("Classical Variation", "1. d4 Nf6 2. c4 g6 3. Nc3 Bg7 4. e4 d6 5. Nf3 O-O 6. Be2 e5"),
        ],
        advice: &[
            "In the King's Indian, time the ...e5 or ...c5 break before White's space becomes decisive.",
        ],
    },
    OpeningGuide {
        key: "English",
        lines: &[
            ("Symmetrical Variation", "1. c4 c5"),
            ("Reversed Sicilian", "1. c4 e5"),
        ],
        advice: &[
            "In the English, control d5 and consider a kingside fianchetto.",
        ],
    },
];

const GENERIC_LINES: &[(&str, &str)] = &[
    ("King's Pawn Opening", "1. e4 e5 2. Nf3 Nc6"),
    ("Queen's Pawn Opening", "1. d4 d5 2. c4"),
];

const GENERIC_ADVICE: &[&str] = &[
    "Control the center with pawns and pieces in the first moves.",
    "Develop knights and bishops before moving the queen or rooks.",
    "Castle early to keep your king safe.",
];

fn find_guide(name: &str) -> Option<&'static OpeningGuide> {
    let name = name.to_ascii_lowercase();
    GUIDES
        .iter()
        .find(|guide| name.contains(&guide.key.to_ascii_lowercase()))
}

fn to_lines(lines: &[(&str, &str)]) -> Vec<CommonLine> {
    lines
        .iter()
        .map(|(name, moves)| CommonLine {
            name: name.to_string(),
            moves: moves.to_string(),
        })
        .collect()
}

/// Share of the opening window played by the user inside the book range
pub fn opening_accuracy(move_count: usize, user_color: UserColor) -> f64 {
    let window = move_count.min(OPENING_WINDOW_PLIES);
    if window == 0 {
        return 0.0;
    }
    let correct = (0..window)
        .filter(|&ply| user_color.owns_ply(ply) && ply < OPENING_BOOK_PLIES)
        .count();
    correct as f64 / window as f64 * 100.0
}

pub fn run_openings_analysis(game: &ParsedGame, user_color: UserColor) -> OpeningsAnalysisResult {
    let eco = game.eco.clone().unwrap_or_else(|| "Unknown".to_string());
    let name = game.opening.clone().unwrap_or_else(|| "Unknown".to_string());

    let (common_lines, recommendations) = match find_guide(&name) {
        Some(guide) => (to_lines(guide.lines), guide.advice),
        None => (to_lines(GENERIC_LINES), GENERIC_ADVICE),
    };

    OpeningsAnalysisResult {
        accuracy: opening_accuracy(game.move_count(), user_color),
        eco,
        name,
        common_lines,
        recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pgn;

    #[test]
    fn test_uses_headers() {
        let game = parse_pgn(
            "[ECO \"B90\"]\n[Opening \"Sicilian Defense: Najdorf Variation\"]\n\n1. e4 c5 2. Nf3 d6 *",
        );
        let result = run_openings_analysis(&game, UserColor::White);
        assert_eq!(result.eco, "B90");
        assert_eq!(result.name, "Sicilian Defense: Najdorf Variation");
        assert_eq!(result.common_lines[0].name, "Open Sicilian");
        assert!(result.recommendations[0].contains("Sicilian"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(find_guide("queen's gambit declined").map(|g| g.key), Some("Queen's Gambit"));
        assert_eq!(find_guide("Ruy Lopez: Berlin Defense").map(|g| g.key), Some("Ruy Lopez"));
        assert!(find_guide("Bongcloud Attack").is_none());
    }

    #[test]
    fn test_unknown_opening_gets_generic_advice() {
        let result = run_openings_analysis(&parse_pgn("1. e4 e5 *"), UserColor::Black);
        assert_eq!(result.eco, "Unknown");
        assert_eq!(result.name, "Unknown");
        assert_eq!(result.common_lines.len(), GENERIC_LINES.len());
        assert_eq!(result.recommendations.len(), GENERIC_ADVICE.len());
    }

    #[test]
    fn test_escaped_tag_keeps_ply_parity() {
        let game = parse_pgn(
            "[Opening \"Sicilian \\\"Open\\\"\"]\n[Event \"The \\\"Big\\\" One\"]\n\n1. e4 c5 *",
        );
        let result = run_openings_analysis(&game, UserColor::White);
        assert_eq!(result.name, "Sicilian \"Open\"");
        assert_eq!(result.common_lines[0].name, "Open Sicilian");
        assert_eq!(result.accuracy, 50.0);
    }

    #[test]
    fn test_opening_accuracy() {
        assert_eq!(opening_accuracy(0, UserColor::White), 0.0);
        // 4 plies: white owns 0 and 2
        assert_eq!(opening_accuracy(4, UserColor::White), 50.0);
        // 20 plies: white's plies 0..12 are 0,2,4,6,8,10
        assert_eq!(opening_accuracy(20, UserColor::White), 30.0);
        // Longer games are capped at the 20-ply window
        assert_eq!(opening_accuracy(80, UserColor::Black), 30.0);
        // 3 plies: black owns only ply 1
        assert!((opening_accuracy(3, UserColor::Black) - 100.0 / 3.0).abs() < 1e-9);
    }
}
