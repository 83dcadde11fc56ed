//! PGN text parsing
//!
//! The parser is purely textual: it never checks move legality and never
//! fails. Unknown headers are ignored and tokens that cannot be moves are
//! dropped. Moves are replayed later, on a board, by the analysis pipelines.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[\s*(\w+)\s+"((?:[^"\\]|\\.)*)"\s*\]"#).expect("valid header regex"));
static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.+").expect("valid move number regex"));
static NAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+").expect("valid NAG regex"));

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A move as it appears in the PGN movetext
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMove {
    #[serde(rename = "move")]
    pub san: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ParsedMove {
    pub fn new(san: impl Into<String>) -> Self {
        Self {
            san: san.into(),
            evaluation: None,
            position: None,
            comment: None,
        }
    }
}

/// Represents a parsed chess game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedGame {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub opening: Option<String>,
    pub fen: Option<String>,
    pub moves: Vec<ParsedMove>,
    pub raw_pgn: String,
}

impl ParsedGame {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// SAN strings in play order
    pub fn san_moves(&self) -> impl Iterator<Item = &str> {
        self.moves.iter().map(|m| m.san.as_str())
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }
}

/// Controls how movetext is tokenized
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Remove `{}` comments, `()` variations, `;` comments and `$n` NAGs
    /// before splitting. When off, their tokens end up in the move list.
    pub strip_annotations: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strip_annotations: true,
        }
    }
}

/// Header summary of a game, with the date resolved to a calendar day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicInfo {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub event: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub opening: Option<String>,
    pub date: Option<NaiveDate>,
}

pub fn parse_pgn(pgn: &str) -> ParsedGame {
    parse_pgn_with(pgn, ParseOptions::default())
}

pub fn parse_pgn_with(pgn: &str, options: ParseOptions) -> ParsedGame {
    let normalized = pgn.replace("\r\n", "\n").replace('\r', "\n");
    let text = normalized.trim();

    let mut game = ParsedGame {
        raw_pgn: pgn.to_string(),
        ..ParsedGame::default()
    };

    let movetext_start = tag_section_end(text);
    for cap in HEADER_RE.captures_iter(&text[..movetext_start]) {
        let value = unescape_tag_value(&cap[2]);
        let slot = match cap[1].to_ascii_lowercase().as_str() {
            "event" => &mut game.event,
            "site" => &mut game.site,
            "date" => &mut game.date,
            "white" => &mut game.white,
            "black" => &mut game.black,
            "result" => &mut game.result,
            "timecontrol" => &mut game.time_control,
            "eco" => &mut game.eco,
            "opening" => &mut game.opening,
            "fen" => &mut game.fen,
            _ => continue,
        };
        *slot = Some(value);
    }

    game.moves = extract_moves(&text[movetext_start..], options)
        .into_iter()
        .map(ParsedMove::new)
        .collect();
    game
}

/// End of the leading block of `[...]` tag lines, whether or not they parse.
/// Brackets inside movetext comments such as `{[%clk 0:03:00]}` are not tags.
fn tag_section_end(text: &str) -> usize {
    let mut end = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            end = offset + line.len();
        } else if !trimmed.is_empty() {
            break;
        }
        offset += line.len();
    }
    end
}

/// Resolves `\"` and `\\` escapes in a tag value
fn unescape_tag_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

fn extract_moves(movetext: &str, options: ParseOptions) -> Vec<String> {
    let cleaned = if options.strip_annotations {
        strip_annotations(movetext)
    } else {
        movetext.to_string()
    };
    let cleaned = MOVE_NUMBER_RE.replace_all(&cleaned, " ");

    cleaned
        .split_whitespace()
        .filter(|token| !RESULT_TOKENS.contains(token))
        .filter(|token| token.chars().any(|c| c.is_ascii_alphanumeric()))
        .map(String::from)
        .collect()
}

/// Drops comments, (nested) variations and NAGs from movetext
fn strip_annotations(movetext: &str) -> String {
    let mut out = String::with_capacity(movetext.len());
    let mut depth = 0usize;
    let mut chars = movetext.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
                out.push(' ');
            }
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                out.push(' ');
            }
            '(' => {
                depth += 1;
                out.push(' ');
            }
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(' ');
            }
            _ if depth > 0 => {}
            _ => out.push(c),
        }
    }

    NAG_RE.replace_all(&out, " ").into_owned()
}

/// Reads the headers of a game and resolves its `YYYY.MM.DD` date
pub fn extract_basic_info(pgn: &str) -> BasicInfo {
    let game = parse_pgn(pgn);
    BasicInfo {
        date: game.date.as_deref().and_then(parse_pgn_date),
        white: game.white,
        black: game.black,
        result: game.result,
        event: game.event,
        time_control: game.time_control,
        eco: game.eco,
        opening: game.opening,
    }
}

/// `None` unless year, month and day all parse and form a real date
pub fn parse_pgn_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().split('.');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
