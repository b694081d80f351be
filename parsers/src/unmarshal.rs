use log::trace;
use pgn_common::{File, PieceKind, Player, Rank, Square};
use thiserror::Error;

use crate::{
    game::{Game, GameResult, MovetextEntry, Pgn, TagPair},
    san::{Check, NormalMove, PieceMove, PieceMoveKind},
    token::{Token, TokenKind},
};

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum UnmarshalErr {
    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
    },
    #[error("token stream ended in the middle of a {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("move number {value:?} is out of range")]
    InvalidMoveNumber { value: String },
    #[error("{value:?} is not a valid {kind} value")]
    InvalidValue { kind: TokenKind, value: String },
}

/// Builds the game records described by a token stream.
///
/// Tag pair brackets and the end of stream marker may be present or not.
pub fn unmarshal(tokens: &[Token]) -> Result<Pgn, UnmarshalErr> {
    Unmarshaller::new(tokens).read_pgn()
}

/// One slot of a move pair.
enum HalfMove {
    Move(PieceMove),
    Result(GameResult),
    Empty,
}

struct Unmarshaller<'tokens> {
    tokens: &'tokens [Token],
    index: usize,
}

type UnmarshalResult<T> = Result<T, UnmarshalErr>;

impl<'tokens> Unmarshaller<'tokens> {
    fn new(tokens: &'tokens [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    fn read_pgn(mut self) -> UnmarshalResult<Pgn> {
        let mut pgn = Pgn::default();
        loop {
            while self.match_kind(TokenKind::EOF).is_some() {}
            if self.peek().is_none() {
                return Ok(pgn);
            }
            let game = self.read_game()?;
            trace!(
                "read game {} with {} move numbers",
                pgn.games.len() + 1,
                game.movetext.len()
            );
            pgn.games.push(game);
        }
    }

    fn read_game(&mut self) -> UnmarshalResult<Game> {
        let mut game = Game::default();
        self.read_tag_pairs(&mut game)?;

        loop {
            let Some(token) = self.peek() else {
                return Ok(game);
            };

            match token.kind() {
                TokenKind::EOF | TokenKind::TagName | TokenKind::TagPairOpen => return Ok(game),
                TokenKind::Comment => {
                    let comment = token.value().to_string();
                    self.index += 1;
                    match game.movetext.last_mut() {
                        Some(entry) => entry.push_comment(comment),
                        None => game.leading_comments.push(comment),
                    }
                }
                TokenKind::MoveNumber => {
                    if self.read_move_pair(&mut game)? {
                        return Ok(game);
                    }
                }
                kind if kind.is_result() => {
                    self.index += 1;
                    game.result = Some(result_from_kind(kind));
                    return Ok(game);
                }
                _ => {
                    return Err(UnmarshalErr::UnexpectedToken {
                        expected: "move number",
                        found: token.clone(),
                    })
                }
            }
        }
    }

    fn read_tag_pairs(&mut self, game: &mut Game) -> UnmarshalResult<()> {
        loop {
            let bracketed = self.match_kind(TokenKind::TagPairOpen).is_some();
            let Some(name) = self.match_kind(TokenKind::TagName) else {
                if bracketed {
                    return Err(self.unexpected("tag name"));
                }
                return Ok(());
            };
            let value = self.expect_kind(TokenKind::TagValue, "tag value")?;
            if bracketed {
                self.expect_kind(TokenKind::TagPairClose, "tag pair close")?;
            }
            game.tag_pairs
                .push(TagPair::new(name.value(), value.value()));
        }
    }

    /// Returns true when the pair ended the game with a result.
    fn read_move_pair(&mut self, game: &mut Game) -> UnmarshalResult<bool> {
        let number = self.expect_kind(TokenKind::MoveNumber, "move number")?;
        let number = number
            .value()
            .parse::<u32>()
            .map_err(|_| UnmarshalErr::InvalidMoveNumber {
                value: number.value().to_string(),
            })?;

        let mut entry = MovetextEntry::new(number);
        let players: &[Player] = if self.match_kind(TokenKind::Continuation).is_some() {
            &[Player::Black]
        } else {
            &[Player::White, Player::Black]
        };
        self.read_comments(&mut entry);

        for &player in players {
            match self.read_half_move()? {
                HalfMove::Move(move_) => {
                    trace!("{number}. {player} plays {move_}");
                    entry.set_half_move(player, move_);
                }
                HalfMove::Result(result) => {
                    game.result = Some(result);
                    game.movetext.push(entry);
                    return Ok(true);
                }
                HalfMove::Empty => break,
            }
            self.read_comments(&mut entry);
        }

        game.movetext.push(entry);
        Ok(false)
    }

    fn read_comments(&mut self, entry: &mut MovetextEntry) {
        while let Some(comment) = self.match_kind(TokenKind::Comment) {
            entry.push_comment(comment.value());
        }
    }

    fn read_half_move(&mut self) -> UnmarshalResult<HalfMove> {
        let Some(token) = self.peek() else {
            return Ok(HalfMove::Empty);
        };

        let move_kind = match token.kind() {
            TokenKind::CastleKingside => {
                self.index += 1;
                PieceMoveKind::CastleKingside
            }
            TokenKind::CastleQueenside => {
                self.index += 1;
                PieceMoveKind::CastleQueenside
            }
            TokenKind::Piece
            | TokenKind::OriginSquare
            | TokenKind::File
            | TokenKind::Rank
            | TokenKind::Capture => {
                return self.read_normal_move().map(HalfMove::Move);
            }
            kind if kind.is_result() => {
                self.index += 1;
                return Ok(HalfMove::Result(result_from_kind(kind)));
            }
            _ => return Ok(HalfMove::Empty),
        };

        let check_kind = self.read_check();
        Ok(HalfMove::Move(PieceMove::new(move_kind, check_kind)))
    }

    /// Groups the tokens of one move the same way the lexer produced them:
    /// the last file and rank are the destination, anything before them
    /// disambiguates the origin. A complete square is always a destination,
    /// so a capture after it belongs to the next half-move.
    fn read_normal_move(&mut self) -> UnmarshalResult<PieceMove> {
        let piece_kind = match self.match_kind(TokenKind::Piece) {
            None => PieceKind::Pawn,
            Some(token) => parse_value(token, PieceKind::try_from)?,
        };

        let mut is_capture = self.match_kind(TokenKind::Capture).is_some();
        let mut disambiguation_file = None;
        let mut disambiguation_rank = None;

        let destination = if let Some(origin) = self.match_kind(TokenKind::OriginSquare) {
            let origin = parse_value(origin, Square::try_from)?;
            disambiguation_file = Some(origin.file());
            disambiguation_rank = Some(origin.rank());
            self.expect_kind(TokenKind::Capture, "capture")?;
            is_capture = true;
            self.expect_square()?
        } else if let Some(first_file) = self.match_file()? {
            if let Some(second_file) = self.match_file()? {
                disambiguation_file = Some(first_file);
                Square::new(second_file, self.expect_rank()?)
            } else if !is_capture && self.match_kind(TokenKind::Capture).is_some() {
                is_capture = true;
                disambiguation_file = Some(first_file);
                self.expect_square()?
            } else {
                Square::new(first_file, self.expect_rank()?)
            }
        } else if !is_capture && self.peek_kind() == Some(TokenKind::Rank) {
            disambiguation_rank = Some(self.expect_rank()?);
            is_capture = self.match_kind(TokenKind::Capture).is_some();
            self.expect_square()?
        } else {
            return Err(self.unexpected("file"));
        };

        let mut promotion_kind = self.read_promotion()?;
        let check_kind = self.read_check();
        if promotion_kind.is_none() {
            promotion_kind = self.read_promotion()?;
        }

        let normal_move = NormalMove {
            piece_kind,
            destination,
            disambiguation_file,
            disambiguation_rank,
            is_capture,
            promotion_kind,
        };
        Ok(PieceMove::new(PieceMoveKind::Normal(normal_move), check_kind))
    }

    fn read_promotion(&mut self) -> UnmarshalResult<Option<PieceKind>> {
        if self.match_kind(TokenKind::PromotionIndicator).is_none() {
            return Ok(None);
        }
        let piece = self.expect_kind(TokenKind::PromotionPiece, "promotion piece")?;
        parse_value(piece, PieceKind::try_from).map(Some)
    }

    fn read_check(&mut self) -> Check {
        let mut check_kind = Check::None;
        if self.match_kind(TokenKind::Check).is_some() {
            check_kind = Check::Check;
        }
        if self.match_kind(TokenKind::Checkmate).is_some() {
            check_kind = Check::Mate;
        }
        check_kind
    }

    fn match_file(&mut self) -> UnmarshalResult<Option<File>> {
        match self.match_kind(TokenKind::File) {
            None => Ok(None),
            Some(token) => parse_value(token, File::try_from).map(Some),
        }
    }

    fn expect_rank(&mut self) -> UnmarshalResult<Rank> {
        let token = self.expect_kind(TokenKind::Rank, "rank")?;
        parse_value(token, Rank::try_from)
    }

    fn expect_square(&mut self) -> UnmarshalResult<Square> {
        let file = self.expect_kind(TokenKind::File, "file")?;
        let file = parse_value(file, File::try_from)?;
        Ok(Square::new(file, self.expect_rank()?))
    }

    fn peek(&self) -> Option<&'tokens Token> {
        self.tokens.get(self.index)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(Token::kind)
    }

    fn match_kind(&mut self, kind: TokenKind) -> Option<&'tokens Token> {
        let token = self.peek().filter(|token| token.kind() == kind)?;
        self.index += 1;
        Some(token)
    }

    fn expect_kind(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> UnmarshalResult<&'tokens Token> {
        self.match_kind(kind).ok_or_else(|| self.unexpected(expected))
    }

    fn unexpected(&self, expected: &'static str) -> UnmarshalErr {
        match self.peek() {
            None => UnmarshalErr::UnexpectedEnd { expected },
            Some(found) => UnmarshalErr::UnexpectedToken {
                expected,
                found: found.clone(),
            },
        }
    }
}

fn parse_value<'a, T>(
    token: &'a Token,
    parse: impl FnOnce(&'a str) -> Result<T, ()>,
) -> UnmarshalResult<T> {
    parse(token.value()).map_err(|()| UnmarshalErr::InvalidValue {
        kind: token.kind(),
        value: token.value().to_string(),
    })
}

fn result_from_kind(kind: TokenKind) -> GameResult {
    match kind {
        TokenKind::WhiteWins => GameResult::WhiteWin,
        TokenKind::BlackWins => GameResult::BlackWin,
        TokenKind::Draw => GameResult::Draw,
        _ => GameResult::Inconclusive,
    }
}
