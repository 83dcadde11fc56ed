//! Result types shared by the analysis pipelines
//!
//! The serialized form (camelCase) is also the schema AI responses must
//! match before they are accepted.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::config::{BLUNDER_THRESHOLD, EXCELLENT_THRESHOLD, INACCURACY_THRESHOLD, MISTAKE_THRESHOLD};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    #[default]
    Unknown,
}

impl Outcome {
    /// Derived from the PGN `Result` header only
    pub fn from_result(result: Option<&str>, user_color: UserColor) -> Self {
        match (result.map(str::trim), user_color) {
            (Some("1-0"), UserColor::White) | (Some("0-1"), UserColor::Black) => Outcome::Win,
            (Some("1-0"), UserColor::Black) | (Some("0-1"), UserColor::White) => Outcome::Loss,
            (Some("1/2-1/2"), _) => Outcome::Draw,
            _ => Outcome::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserColor {
    #[default]
    White,
    Black,
}

impl UserColor {
    pub fn as_color(self) -> Color {
        match self {
            UserColor::White => Color::White,
            UserColor::Black => Color::Black,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserColor::White => "white",
            UserColor::Black => "black",
        }
    }

    /// Whether the ply at `index` (0-based) belongs to this color
    pub fn owns_ply(self, index: usize) -> bool {
        (index % 2 == 0) == (self == UserColor::White)
    }
}

/// Quality of a single move, by eval loss against the best move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveClass {
    Blunder,
    Mistake,
    Inaccuracy,
    Good,
    Excellent,
}

impl MoveClass {
    pub fn from_eval_diff(diff: f64) -> Self {
        match diff {
            d if d > BLUNDER_THRESHOLD => MoveClass::Blunder,
            d if d > MISTAKE_THRESHOLD => MoveClass::Mistake,
            d if d > INACCURACY_THRESHOLD => MoveClass::Inaccuracy,
            d if d < EXCELLENT_THRESHOLD => MoveClass::Excellent,
            _ => MoveClass::Good,
        }
    }

    /// Good and excellent moves count towards accuracy
    pub fn is_good(&self) -> bool {
        matches!(self, MoveClass::Good | MoveClass::Excellent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveClass::Blunder => "blunder",
            MoveClass::Mistake => "mistake",
            MoveClass::Inaccuracy => "inaccuracy",
            MoveClass::Good => "good",
            MoveClass::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMoment {
    pub move_number: u32,
    /// FEN before the move, or empty
    pub position: String,
    #[serde(rename = "type")]
    pub kind: MoveClass,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysisResult {
    pub outcome: Outcome,
    pub user_color: UserColor,
    pub accuracy: f64,
    pub blunders: u32,
    pub mistakes: u32,
    pub inaccuracies: u32,
    pub key_moments: Vec<KeyMoment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedTactic {
    pub move_number: u32,
    pub position: String,
    pub tactic: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedTactic {
    pub move_number: u32,
    pub position: String,
    pub tactic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticsAnalysisResult {
    pub missed_tactics: Vec<MissedTactic>,
    pub executed_tactics: Vec<ExecutedTactic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonLine {
    pub name: String,
    pub moves: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningsAnalysisResult {
    pub eco: String,
    pub name: String,
    pub accuracy: f64,
    pub common_lines: Vec<CommonLine>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsAnalysisResult {
    pub piece_development: u32,
    pub center_control: u32,
    pub king_safety: u32,
    pub pawn_structure: u32,
    pub recommendations: Vec<String>,
}

/// Everything returned for one PGN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    pub game: GameAnalysisResult,
    pub tactics: TacticsAnalysisResult,
    pub openings: OpeningsAnalysisResult,
    pub fundamentals: FundamentalsAnalysisResult,
}

impl AnalysisBundle {
    /// Zeroed bundle with generic advice, returned when analysis itself fails
    pub fn fallback() -> Self {
        Self {
            game: GameAnalysisResult::default(),
            tactics: TacticsAnalysisResult::default(),
            openings: OpeningsAnalysisResult {
                eco: "Unknown".to_string(),
                name: "Unknown".to_string(),
                accuracy: 0.0,
                common_lines: Vec::new(),
                recommendations: vec![
                    "Focus on controlling the center in the opening.".to_string(),
                    "Develop your knights and bishops before moving the same piece twice.".to_string(),
                ],
            },
            fundamentals: FundamentalsAnalysisResult {
                piece_development: 0,
                center_control: 0,
                king_safety: 0,
                pawn_structure: 0,
                recommendations: vec![
                    "Review the basic opening principles: center, development, king safety.".to_string(),
                    "Avoid creating pawn weaknesses without a concrete reason.".to_string(),
                ],
            },
        }
    }
}

/// Range checks applied to results that did not come from the local pipelines
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn check_percentage(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidShape(format!("{} out of range: {}", field, value)))
    }
}

fn check_score(field: &str, value: u32) -> Result<()> {
    if value <= 100 {
        Ok(())
    } else {
        Err(Error::InvalidShape(format!("{} out of range: {}", field, value)))
    }
}

fn check_move_number(value: u32) -> Result<()> {
    if value >= 1 {
        Ok(())
    } else {
        Err(Error::InvalidShape("move number must start at 1".to_string()))
    }
}

impl Validate for GameAnalysisResult {
    fn validate(&self) -> Result<()> {
        check_percentage("accuracy", self.accuracy)?;
        for moment in &self.key_moments {
            check_move_number(moment.move_number)?;
        }
        Ok(())
    }
}

impl Validate for TacticsAnalysisResult {
    fn validate(&self) -> Result<()> {
        for t in &self.missed_tactics {
            check_move_number(t.move_number)?;
        }
        for t in &self.executed_tactics {
            check_move_number(t.move_number)?;
        }
        Ok(())
    }
}

impl Validate for OpeningsAnalysisResult {
    fn validate(&self) -> Result<()> {
        check_percentage("accuracy", self.accuracy)
    }
}

impl Validate for FundamentalsAnalysisResult {
    fn validate(&self) -> Result<()> {
        check_score("pieceDevelopment", self.piece_development)?;
        check_score("centerControl", self.center_control)?;
        check_score("kingSafety", self.king_safety)?;
        check_score("pawnStructure", self.pawn_structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_result() {
        assert_eq!(Outcome::from_result(Some("1-0"), UserColor::White), Outcome::Win);
        assert_eq!(Outcome::from_result(Some("1-0"), UserColor::Black), Outcome::Loss);
        assert_eq!(Outcome::from_result(Some("0-1"), UserColor::Black), Outcome::Win);
        assert_eq!(Outcome::from_result(Some("0-1"), UserColor::White), Outcome::Loss);
        assert_eq!(Outcome::from_result(Some("1/2-1/2"), UserColor::White), Outcome::Draw);
        assert_eq!(Outcome::from_result(Some("1/2-1/2"), UserColor::Black), Outcome::Draw);
        assert_eq!(Outcome::from_result(Some("*"), UserColor::White), Outcome::Unknown);
        assert_eq!(Outcome::from_result(None, UserColor::Black), Outcome::Unknown);
    }

    #[test]
    fn test_move_class_thresholds() {
        assert_eq!(MoveClass::from_eval_diff(9.0), MoveClass::Blunder);
        assert_eq!(MoveClass::from_eval_diff(2.0), MoveClass::Mistake);
        assert_eq!(MoveClass::from_eval_diff(1.5), MoveClass::Mistake);
        assert_eq!(MoveClass::from_eval_diff(1.0), MoveClass::Inaccuracy);
        assert_eq!(MoveClass::from_eval_diff(0.5), MoveClass::Good);
        assert_eq!(MoveClass::from_eval_diff(0.2), MoveClass::Good);
        assert_eq!(MoveClass::from_eval_diff(0.0), MoveClass::Excellent);
        assert!(MoveClass::Excellent.is_good());
        assert!(!MoveClass::Inaccuracy.is_good());
    }

    #[test]
    fn test_owns_ply() {
        assert!(UserColor::White.owns_ply(0));
        assert!(!UserColor::White.owns_ply(1));
        assert!(UserColor::Black.owns_ply(1));
    }

    #[test]
    fn test_bundle_json_shape() {
        let json = serde_json::to_value(AnalysisBundle::fallback()).unwrap();
        assert_eq!(json["game"]["outcome"], "Unknown");
        assert_eq!(json["game"]["userColor"], "white");
        assert!(json["game"]["keyMoments"].as_array().unwrap().is_empty());
        assert!(json["tactics"]["missedTactics"].is_array());
        assert_eq!(json["openings"]["eco"], "Unknown");
        assert_eq!(json["fundamentals"]["pawnStructure"], 0);
    }

    #[test]
    fn test_key_moment_type_field() {
        let moment = KeyMoment {
            move_number: 3,
            position: String::new(),
            kind: MoveClass::Blunder,
            description: "hung a piece".to_string(),
        };
        let json = serde_json::to_value(&moment).unwrap();
        assert_eq!(json["type"], "blunder");
        assert_eq!(json["moveNumber"], 3);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let mut fundamentals = FundamentalsAnalysisResult::default();
        assert!(fundamentals.validate().is_ok());
        fundamentals.king_safety = 150;
        assert!(fundamentals.validate().is_err());

        let game = GameAnalysisResult {
            accuracy: f64::NAN,
            ..GameAnalysisResult::default()
        };
        assert!(game.validate().is_err());
    }
}
