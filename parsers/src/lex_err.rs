use thiserror::Error;

use crate::token::Token;

/// What went wrong while scanning a PGN document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("malformed castling notation, expected O-O or O-O-O")]
    MalformedCastle,
    #[error("tag pair is missing its closing ']'")]
    MissingTagPairClose,
    #[error("tag pair is missing its name")]
    MissingTagName,
    #[error("a piece letter or capture must be followed by a file")]
    MissingFileAfterPiece,
    #[error("a file must be followed by a rank")]
    MissingRankAfterFile,
    #[error("tag value must start with '\"'")]
    MissingStringOpenQuote,
    #[error("tag value is missing its closing '\"'")]
    UnterminatedString,
    #[error("malformed draw marker, expected 1/2-1/2")]
    MalformedDraw,
    #[error("malformed result, expected 1-0 or 0-1")]
    MalformedResult,
    #[error("promotion must name a knight, bishop, rook or queen")]
    InvalidPromotionPiece,
    #[error("comment is missing its closing '}}'")]
    UnterminatedComment,
    #[error("move must be followed by whitespace or a comment")]
    MissingMoveSeparator,
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
}

impl LexErrorKind {
    /// Stable short code for the error, usable in scripts and test fixtures.
    pub fn code(&self) -> &'static str {
        match self {
            LexErrorKind::MalformedCastle => "ERR_CASTLE",
            LexErrorKind::MissingTagPairClose => "ERR_TAG_PAIR_CLOSE",
            LexErrorKind::MissingTagName => "ERR_TAG_NAME",
            LexErrorKind::MissingFileAfterPiece => "ERR_FILE",
            LexErrorKind::MissingRankAfterFile => "ERR_RANK",
            LexErrorKind::MissingStringOpenQuote => "ERR_STRING",
            LexErrorKind::UnterminatedString => "ERR_STRING_NOT_CLOSED",
            LexErrorKind::MalformedDraw => "ERR_DRAW",
            LexErrorKind::MalformedResult => "ERR_RESULT",
            LexErrorKind::InvalidPromotionPiece => "ERR_PROMOTION",
            LexErrorKind::UnterminatedComment => "ERR_COMMENT_NOT_CLOSED",
            LexErrorKind::MissingMoveSeparator => "ERR_MOVE_SEPARATOR",
            LexErrorKind::UnexpectedCharacter(_) => "ERR_UNEXPECTED_CHARACTER",
        }
    }
}

/// A failed tokenization.
///
/// Carries the tokens produced before the failure. They are only useful
/// for diagnostics and should not be treated as a complete stream.
#[derive(Clone, Debug, Error)]
#[error("(byte {offset}) {kind} while reading {rule}")]
pub struct LexError {
    kind: LexErrorKind,
    offset: usize,
    rule: &'static str,
    tokens: Vec<Token>,
}

impl LexError {
    pub(crate) fn new(
        kind: LexErrorKind,
        offset: usize,
        rule: &'static str,
        tokens: Vec<Token>,
    ) -> Self {
        Self {
            kind,
            offset,
            rule,
            tokens,
        }
    }

    pub fn kind(&self) -> LexErrorKind {
        self.kind
    }

    /// Byte index into the source where scanning stopped.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Name of the grammar rule that was active.
    pub fn rule(&self) -> &'static str {
        self.rule
    }

    pub fn partial_tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_partial_tokens(self) -> Vec<Token> {
        self.tokens
    }
}
