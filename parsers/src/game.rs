use std::fmt::Display;

use pgn_common::Player;

use crate::san::PieceMove;

/// Every game in a PGN document, in input order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pgn {
    pub games: Vec<Game>,
}

impl Display for Pgn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, game) in self.games.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            writeln!(f, "{game}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Game {
    pub tag_pairs: Vec<TagPair>,
    /// Comments that appear before the first move number
    pub leading_comments: Vec<String>,
    pub movetext: Vec<MovetextEntry>,
    /// None when the movetext was not closed by a result marker
    pub result: Option<GameResult>,
}

impl Game {
    /// Value of the first tag pair called `name`.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tag_pairs
            .iter()
            .find(|tag_pair| tag_pair.name == name)
            .map(|tag_pair| tag_pair.value.as_str())
    }

    fn has_movetext(&self) -> bool {
        !self.leading_comments.is_empty() || !self.movetext.is_empty() || self.result.is_some()
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for tag_pair in self.tag_pairs.iter() {
            writeln!(f, "{tag_pair}")?;
        }
        if !self.has_movetext() {
            return Ok(());
        }
        if !self.tag_pairs.is_empty() {
            f.write_str("\n")?;
        }

        let mut separator = "";
        for comment in self.leading_comments.iter() {
            write!(f, "{separator}{{{comment}}}")?;
            separator = " ";
        }
        for entry in self.movetext.iter() {
            write!(f, "{separator}{entry}")?;
            separator = " ";
        }
        if let Some(result) = self.result {
            write!(f, "{separator}{result}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagPair {
    pub name: String,
    pub value: String,
}

impl TagPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Display for TagPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} \"{}\"]", self.name, self.value)
    }
}

/// A move number with the half-moves and comments that follow it.
///
/// An entry whose White half-move is missing but whose Black one is
/// present renders as a `12...` continuation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MovetextEntry {
    pub number: u32,
    /// Comments between the move number and the first half-move
    pub leading_comments: Vec<String>,
    pub white: Option<PieceMove>,
    /// Comments between White's and Black's half-moves
    pub white_comments: Vec<String>,
    pub black: Option<PieceMove>,
    pub black_comments: Vec<String>,
}

impl MovetextEntry {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            leading_comments: Vec::new(),
            white: None,
            white_comments: Vec::new(),
            black: None,
            black_comments: Vec::new(),
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.white.is_none() && self.black.is_some()
    }

    pub fn half_move(&self, player: Player) -> Option<&PieceMove> {
        match player {
            Player::White => self.white.as_ref(),
            Player::Black => self.black.as_ref(),
        }
    }

    pub fn set_half_move(&mut self, player: Player, move_: PieceMove) {
        match player {
            Player::White => self.white = Some(move_),
            Player::Black => self.black = Some(move_),
        }
    }

    /// Comments written right after `player`'s half-move.
    pub fn comments_after(&self, player: Player) -> &[String] {
        match player {
            Player::White => &self.white_comments,
            Player::Black => &self.black_comments,
        }
    }

    /// Attaches `comment` after the latest half-move of the entry.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        let comments = if self.black.is_some() {
            &mut self.black_comments
        } else if self.white.is_some() {
            &mut self.white_comments
        } else {
            &mut self.leading_comments
        };
        comments.push(comment.into());
    }
}

fn write_comments(f: &mut std::fmt::Formatter<'_>, comments: &[String]) -> std::fmt::Result {
    for comment in comments.iter() {
        write!(f, " {{{comment}}}")?;
    }
    Ok(())
}

impl Display for MovetextEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.", self.number)?;
        if self.is_continuation() {
            f.write_str("..")?;
        }
        write_comments(f, &self.leading_comments)?;

        if let Some(white) = &self.white {
            write!(f, " {white}")?;
        }
        write_comments(f, &self.white_comments)?;

        if let Some(black) = &self.black {
            write!(f, " {black}")?;
        }
        write_comments(f, &self.black_comments)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    Inconclusive,
}

impl GameResult {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Inconclusive => "*",
        }
    }
}

impl AsRef<str> for GameResult {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
