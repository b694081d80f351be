use std::fmt::{Debug, Display};

use serde_derive::Serialize;

/// Every terminal the lexer can emit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum TokenKind {
    /// [
    TagPairOpen,
    TagName,
    /// The contents of a tag pair's string, quotes excluded.
    TagValue,
    /// ]
    TagPairClose,
    MoveNumber,
    /// The `...` after a move number when the movetext resumes with Black's move.
    Continuation,
    Piece,
    /// A full origin square written before a capture: the `h4` of `Qh4xe1`.
    OriginSquare,
    File,
    Rank,
    /// x
    Capture,
    /// +
    Check,
    /// #
    Checkmate,
    /// =
    PromotionIndicator,
    PromotionPiece,
    /// O-O
    CastleKingside,
    /// O-O-O
    CastleQueenside,
    /// 1/2-1/2
    Draw,
    /// 1-0
    WhiteWins,
    /// 0-1
    BlackWins,
    /// *
    Unfinished,
    /// The text between `{` and `}`.
    Comment,
    EOF,
}

impl TokenKind {
    pub fn is_result(self) -> bool {
        matches!(
            self,
            TokenKind::Draw | TokenKind::WhiteWins | TokenKind::BlackWins | TokenKind::Unfinished
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::TagPairOpen => "TagPairOpen",
            TokenKind::TagName => "TagName",
            TokenKind::TagValue => "TagValue",
            TokenKind::TagPairClose => "TagPairClose",
            TokenKind::MoveNumber => "MoveNumber",
            TokenKind::Continuation => "Continuation",
            TokenKind::Piece => "Piece",
            TokenKind::OriginSquare => "OriginSquare",
            TokenKind::File => "File",
            TokenKind::Rank => "Rank",
            TokenKind::Capture => "Capture",
            TokenKind::Check => "Check",
            TokenKind::Checkmate => "Checkmate",
            TokenKind::PromotionIndicator => "PromotionIndicator",
            TokenKind::PromotionPiece => "PromotionPiece",
            TokenKind::CastleKingside => "CastleKingside",
            TokenKind::CastleQueenside => "CastleQueenside",
            TokenKind::Draw => "Draw",
            TokenKind::WhiteWins => "WhiteWins",
            TokenKind::BlackWins => "BlackWins",
            TokenKind::Unfinished => "Unfinished",
            TokenKind::Comment => "Comment",
            TokenKind::EOF => "EOF",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Serialize)]
pub struct Token {
    kind: TokenKind,
    value: String,
    /// Always empty for now.
    children: Vec<Token>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[Token] {
        &self.children
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.kind, self.value)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<18} {}", self.kind.as_str(), self.value)
    }
}
