//! Mainline replay of a PGN through pgn-reader
//!
//! Unlike the textual parser this one is strict: every SAN must be legal in
//! sequence, starting from the `FEN` tag when present.

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use std::io::Cursor;
use std::ops::ControlFlow;

use super::board::Board;
use crate::error::{Error, Result};

/// Board after the mainline, plus the moves that got it there
#[derive(Debug, Clone)]
pub struct Replay {
    pub board: Board,
    pub moves: Vec<String>,
}

#[derive(Default)]
struct ReplayTags {
    fen: Option<String>,
}

struct ReplayMoves {
    board: Board,
    moves: Vec<String>,
    error: Option<Error>,
}

struct MainlineReplayer;

impl Visitor for MainlineReplayer {
    type Tags = ReplayTags;
    type Movetext = ReplayMoves;
    type Output = Result<Replay>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(ReplayTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        if name.eq_ignore_ascii_case(b"FEN") {
            tags.fen = Some(value.decode_utf8_lossy().to_string());
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        let (board, error) = match tags.fen.as_deref().map(Board::from_fen) {
            Some(Ok(board)) => (board, None),
            Some(Err(e)) => (Board::new(), Some(e)),
            None => (Board::new(), None),
        };
        ControlFlow::Continue(ReplayMoves {
            board,
            moves: Vec::new(),
            error,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if movetext.error.is_some() {
            return ControlFlow::Continue(());
        }

        let san_str = san.san.to_string();
        match movetext.board.push_san(&san_str) {
            Ok(_) => movetext.moves.push(san_str),
            Err(e) => movetext.error = Some(e),
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        match movetext.error {
            Some(e) => Err(e),
            None => Ok(Replay {
                board: movetext.board,
                moves: movetext.moves,
            }),
        }
    }
}

/// Replays the first game in `pgn`
pub fn load_pgn(pgn: &str) -> Result<Replay> {
    let mut reader = pgn_reader::Reader::new(Cursor::new(pgn.as_bytes()));

    match reader.read_game(&mut MainlineReplayer) {
        Ok(Some(replay)) => replay,
        Ok(None) => Err(Error::Pgn("no game found".to_string())),
        Err(e) => Err(Error::Pgn(e.to_string())),
    }
}

impl Board {
    /// Board at the end of the first game's mainline
    pub fn from_pgn(pgn: &str) -> Result<Self> {
        load_pgn(pgn).map(|replay| replay.board)
    }
}
