use log::{debug, trace};
use pgn_common::{File, PieceKind, Rank};
use serde_derive::Deserialize;

use crate::{
    lex_err::{LexError, LexErrorKind},
    scanner::Scanner,
    token::{Token, TokenKind},
};

type LexResult<T> = Result<T, LexErrorKind>;

/// Knobs for the shape of the emitted token stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct LexerOptions {
    /// Emit `TagPairOpen`/`TagPairClose` around each tag pair.
    pub tag_pair_brackets: bool,
    /// Finish the stream with an `EOF` token.
    pub eof_token: bool,
    /// Fail on characters the grammar has no rule for instead of skipping them.
    pub strict: bool,
}

impl LexerOptions {
    pub fn with_tag_pair_brackets(mut self, enabled: bool) -> Self {
        self.tag_pair_brackets = enabled;
        self
    }

    pub fn with_eof_token(mut self, enabled: bool) -> Self {
        self.eof_token = enabled;
        self
    }

    pub fn with_strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }
}

/// Recursive-descent lexer for PGN.
///
/// The grammar, roughly:
///
/// ```text
/// document  -> (tag-pair | movetext | comment | '*')*
/// tag-pair  -> '[' ws name ws string ws ']'
/// name      -> [A-Za-z0-9_]+
/// string    -> '"' printing-char* '"'
/// movetext  -> (result | number '.'* ws comment* move ws comment* move ws comment*
///             | number '...' ws comment* move ws comment*)*
/// move      -> result | castle check? | san
/// castle    -> 'O-O' | 'O-O-O'
/// san       -> piece? 'x'? file (file rank | 'x' square | rank) suffix
///            | piece? origin-square 'x' square suffix
///            | piece rank 'x'? square suffix
/// suffix    -> ('=' promotion-piece)? '+'? '#'? ('=' promotion-piece)? [!?]{0,2}
/// result    -> '1-0' | '0-1' | '1/2-1/2' | '*'
/// comment   -> '{' [^}]* '}'
/// ```
///
/// Only the shape of the notation is checked, not whether a move is legal.
pub struct Lexer<'pgn> {
    scanner: Scanner<'pgn>,
    current_rule: &'static str,
    options: LexerOptions,
    tokens: Vec<Token>,
}

impl<'pgn> Lexer<'pgn> {
    pub fn new(scanner: Scanner<'pgn>) -> Self {
        Self::with_options(scanner, LexerOptions::default())
    }

    pub fn with_options(scanner: Scanner<'pgn>, options: LexerOptions) -> Self {
        Self {
            scanner,
            current_rule: "start",
            options,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole input.
    ///
    /// On failure the error holds the tokens produced up to that point.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        match self.read_document() {
            Ok(()) => Ok(self.tokens),
            Err(kind) => {
                debug!(
                    "tokenizing failed in {} at byte {}: {kind}",
                    self.current_rule,
                    self.scanner.offset()
                );
                Err(LexError::new(
                    kind,
                    self.scanner.offset(),
                    self.current_rule,
                    self.tokens,
                ))
            }
        }
    }

    fn read_document(&mut self) -> LexResult<()> {
        loop {
            self.enter("start");
            self.skip_whitespace();

            if self.scanner.is_exhausted() {
                if self.options.eof_token {
                    self.emit(TokenKind::EOF, "");
                }
                return Ok(());
            }

            match self.scanner.peek() {
                '[' => self.read_tag_pair()?,
                '0'..='9' => self.read_movetext()?,
                '*' => self.read_result()?,
                '{' => self.read_comment()?,
                other => {
                    if self.options.strict {
                        return Err(LexErrorKind::UnexpectedCharacter(other));
                    }
                    debug!(
                        "skipping {other:?} at byte {}, no rule starts with it",
                        self.scanner.offset()
                    );
                    self.scanner.next();
                }
            }
        }
    }

    fn read_tag_pair(&mut self) -> LexResult<()> {
        self.enter("tag pair");
        self.scanner.next();
        if self.options.tag_pair_brackets {
            self.emit(TokenKind::TagPairOpen, "[");
        }

        self.skip_whitespace();
        let name = self.read_tag_name()?;
        self.emit(TokenKind::TagName, name);

        self.skip_whitespace();
        let value = self.read_string()?;
        self.emit(TokenKind::TagValue, value);

        self.skip_whitespace();
        self.enter("tag pair");
        if !self.match_char(']') {
            return Err(LexErrorKind::MissingTagPairClose);
        }
        if self.options.tag_pair_brackets {
            self.emit(TokenKind::TagPairClose, "]");
        }

        Ok(())
    }

    fn read_tag_name(&mut self) -> LexResult<&'pgn str> {
        self.enter("tag name");
        let name = self.match_char_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if name.is_empty() {
            return Err(LexErrorKind::MissingTagName);
        }
        Ok(name)
    }

    fn read_string(&mut self) -> LexResult<&'pgn str> {
        self.enter("string");
        if !self.match_char('"') {
            return Err(LexErrorKind::MissingStringOpenQuote);
        }

        let contents =
            self.match_char_while(|ch| ch != '"' && (is_printing_char(ch) || is_whitespace(ch)));

        if !self.match_char('"') {
            return Err(LexErrorKind::UnterminatedString);
        }
        Ok(contents)
    }

    fn read_movetext(&mut self) -> LexResult<()> {
        loop {
            self.enter("move number");
            if self.at_result() {
                return self.read_result();
            }

            let number = self.match_char_while(|ch| ch.is_ascii_digit());
            if number.is_empty() {
                return Ok(());
            }
            self.emit(TokenKind::MoveNumber, number);

            let periods = self.match_char_while(|ch| ch == '.');
            let mut half_moves = 2;
            if periods == "..." {
                // "12... Nf6" resumes with Black's move
                self.emit(TokenKind::Continuation, periods);
                half_moves = 1;
            }
            self.skip_whitespace();
            self.read_comments()?;

            for _ in 0..half_moves {
                self.read_move()?;
                self.skip_whitespace();
                self.read_comments()?;
            }
        }
    }

    fn read_comments(&mut self) -> LexResult<()> {
        while self.scanner.peek() == '{' {
            self.read_comment()?;
            self.skip_whitespace();
        }
        Ok(())
    }

    fn read_comment(&mut self) -> LexResult<()> {
        self.enter("comment");
        self.scanner.next();
        let text = self.match_char_while(|ch| ch != '}');
        if !self.match_char('}') {
            return Err(LexErrorKind::UnterminatedComment);
        }
        self.emit(TokenKind::Comment, text);
        Ok(())
    }

    /// Reads one half-move. A slot that holds no move at all is left
    /// untouched and is not an error.
    fn read_move(&mut self) -> LexResult<()> {
        self.enter("move");
        if self.at_result() {
            self.read_result()?;
        } else if self.scanner.peek() == 'O' {
            self.read_castle()?;
        } else if !self.read_san_move()? {
            return Ok(());
        }

        // '!' and '?' annotations carry no meaning for the token stream
        for _ in 0..2 {
            self.match_char_if(|ch| ch == '!' || ch == '?');
        }

        if self.scanner.is_exhausted() {
            return Ok(());
        }
        match self.scanner.peek() {
            '{' => Ok(()),
            ch if is_whitespace(ch) => Ok(()),
            _ => Err(LexErrorKind::MissingMoveSeparator),
        }
    }

    fn at_result(&self) -> bool {
        match self.scanner.peek() {
            '*' => true,
            '1' => matches!(self.peek_second(), '/' | '-'),
            '0' => self.peek_second() == '-',
            _ => false,
        }
    }

    fn read_result(&mut self) -> LexResult<()> {
        self.enter("result");
        match self.scanner.next() {
            '*' => self.emit(TokenKind::Unfinished, "*"),
            '1' if self.scanner.peek() == '/' => {
                self.enter("draw");
                self.match_literal("/2-1/2", LexErrorKind::MalformedDraw)?;
                self.emit(TokenKind::Draw, "1/2-1/2");
            }
            '1' => {
                self.match_literal("-0", LexErrorKind::MalformedResult)?;
                self.emit(TokenKind::WhiteWins, "1-0");
            }
            _ => {
                self.match_literal("-1", LexErrorKind::MalformedResult)?;
                self.emit(TokenKind::BlackWins, "0-1");
            }
        }
        Ok(())
    }

    fn read_castle(&mut self) -> LexResult<()> {
        self.enter("castle");
        self.scanner.next();
        self.match_literal("-O", LexErrorKind::MalformedCastle)?;

        if self.match_char('-') {
            if !self.match_char('O') {
                return Err(LexErrorKind::MalformedCastle);
            }
            self.emit(TokenKind::CastleQueenside, "O-O-O");
        } else {
            self.emit(TokenKind::CastleKingside, "O-O");
        }

        self.read_check();
        Ok(())
    }

    /// Returns false when the slot does not start a move.
    fn read_san_move(&mut self) -> LexResult<bool> {
        self.enter("piece");
        let piece = self.match_char_if(|ch| PieceKind::try_from(ch).is_ok());
        if let Some(piece) = piece {
            self.emit(TokenKind::Piece, piece);
        }

        self.enter("capture");
        let mut captured = self.read_capture();

        self.enter("file");
        if let Some(file) = self.match_char_if(File::is_file_char) {
            self.read_after_first_file(file, captured)?;
        } else if piece.is_some() && !captured && Rank::is_rank_char(self.scanner.peek()) {
            // origin rank only: R1a3
            self.read_required_rank()?;
            captured = self.read_capture();
            trace!("rank disambiguated move, capture: {captured}");
            self.read_square()?;
        } else if piece.is_some() || captured {
            return Err(LexErrorKind::MissingFileAfterPiece);
        } else {
            return Ok(false);
        }

        self.read_move_suffixes()?;
        Ok(true)
    }

    fn read_after_first_file(&mut self, file: char, captured: bool) -> LexResult<()> {
        if File::is_file_char(self.scanner.peek()) {
            // the first file only disambiguates: Nbd7
            self.emit(TokenKind::File, file);
            self.read_file();
            return self.read_required_rank();
        }
        if !captured && self.scanner.peek() == 'x' {
            // exd5, Nbxd7
            self.emit(TokenKind::File, file);
            self.read_capture();
            return self.read_square();
        }

        self.enter("rank");
        let Some(rank) = self.match_char_if(Rank::is_rank_char) else {
            self.emit(TokenKind::File, file);
            return Err(LexErrorKind::MissingRankAfterFile);
        };
        if !captured && self.scanner.peek() == 'x' {
            // full origin square: Qh4xe1
            self.emit(TokenKind::OriginSquare, format!("{file}{rank}"));
            self.read_capture();
            return self.read_square();
        }
        self.emit(TokenKind::File, file);
        self.emit(TokenKind::Rank, rank);
        Ok(())
    }

    fn read_capture(&mut self) -> bool {
        if self.match_char('x') {
            self.emit(TokenKind::Capture, "x");
            return true;
        }
        false
    }

    fn read_file(&mut self) -> Option<char> {
        let file = self.match_char_if(File::is_file_char)?;
        self.emit(TokenKind::File, file);
        Some(file)
    }

    fn read_square(&mut self) -> LexResult<()> {
        self.enter("file");
        if self.read_file().is_none() {
            return Err(LexErrorKind::MissingFileAfterPiece);
        }
        self.read_required_rank()
    }

    fn read_required_rank(&mut self) -> LexResult<()> {
        self.enter("rank");
        match self.match_char_if(Rank::is_rank_char) {
            None => Err(LexErrorKind::MissingRankAfterFile),
            Some(rank) => {
                self.emit(TokenKind::Rank, rank);
                Ok(())
            }
        }
    }

    fn read_move_suffixes(&mut self) -> LexResult<()> {
        let promoted = self.read_promotion()?;
        self.read_check();
        if !promoted {
            self.read_promotion()?;
        }
        Ok(())
    }

    fn read_check(&mut self) {
        self.enter("check");
        if self.match_char('+') {
            self.emit(TokenKind::Check, "+");
        }
        self.enter("checkmate");
        if self.match_char('#') {
            self.emit(TokenKind::Checkmate, "#");
        }
    }

    fn read_promotion(&mut self) -> LexResult<bool> {
        self.enter("promotion");
        if !self.match_char('=') {
            return Ok(false);
        }
        self.emit(TokenKind::PromotionIndicator, "=");

        let piece = self.match_char_if(|ch| {
            PieceKind::try_from(ch).is_ok_and(|piece_kind| piece_kind.is_promotion_target())
        });
        match piece {
            None => Err(LexErrorKind::InvalidPromotionPiece),
            Some(piece) => {
                self.emit(TokenKind::PromotionPiece, piece);
                Ok(true)
            }
        }
    }

    fn skip_whitespace(&mut self) {
        self.match_char_while(is_whitespace);
    }

    fn match_literal(&mut self, literal: &str, err: LexErrorKind) -> LexResult<()> {
        for expected in literal.chars() {
            if !self.match_char(expected) {
                return Err(err);
            }
        }
        Ok(())
    }

    fn match_char(&mut self, ch: char) -> bool {
        self.match_char_if(|other| other == ch).is_some()
    }

    fn match_char_if<F: FnOnce(char) -> bool>(&mut self, func: F) -> Option<char> {
        if self.scanner.is_exhausted() || !func(self.scanner.peek()) {
            return None;
        }
        Some(self.scanner.next())
    }

    /// Consumes the longest run matching `func` and returns it as a slice of the source.
    fn match_char_while<F: FnMut(char) -> bool>(&mut self, mut func: F) -> &'pgn str {
        let rest = self.scanner.remaining();
        let start = self.scanner.offset();
        while self.match_char_if(&mut func).is_some() {}
        &rest[..self.scanner.offset() - start]
    }

    fn peek_second(&self) -> char {
        let mut lookahead = self.scanner.clone();
        lookahead.next();
        lookahead.peek()
    }

    fn enter(&mut self, rule: &'static str) {
        if self.current_rule != rule {
            trace!("{} -> {rule} at byte {}", self.current_rule, self.scanner.offset());
            self.current_rule = rule;
        }
    }

    fn emit(&mut self, kind: TokenKind, value: impl ToString) {
        let token = Token::new(kind, value.to_string());
        trace!("emit {token:?}");
        self.tokens.push(token);
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// ASCII 32 through 126 inclusive.
fn is_printing_char(ch: char) -> bool {
    matches!(ch, ' '..='~')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Lexer, LexerOptions};
    use crate::{
        lex_err::LexErrorKind,
        scanner::Scanner,
        token::{Token, TokenKind},
    };

    fn lex(pgn: &str) -> Vec<Token> {
        Lexer::new(Scanner::new(pgn)).tokenize().unwrap()
    }

    fn lex_err(pgn: &str) -> LexErrorKind {
        Lexer::new(Scanner::new(pgn)).tokenize().unwrap_err().kind()
    }

    fn tokens(expected: &[(TokenKind, &str)]) -> Vec<Token> {
        expected
            .iter()
            .map(|(kind, value)| Token::new(*kind, *value))
            .collect()
    }

    use TokenKind::*;

    #[test]
    fn tokenizes_empty_input() {
        assert!(lex("").is_empty());
        assert!(lex("  \n\t ").is_empty());
    }

    #[test]
    fn tokenizes_tag_pair() {
        assert_eq!(
            lex("[Event \"F/S Return Match\"]"),
            tokens(&[(TagName, "Event"), (TagValue, "F/S Return Match")])
        );
    }

    #[test]
    fn tokenizes_tag_pair_regardless_of_whitespace() {
        let expected = tokens(&[(TagName, "Event"), (TagValue, "F/S      Return      Match")]);
        assert_eq!(
            lex("  [   Event \"F/S      Return      Match\"    ]    "),
            expected
        );
        assert_eq!(lex("[Event\"F/S      Return      Match\"]"), expected);
    }

    #[test]
    fn tokenizes_consecutive_tag_pairs() {
        let pgn = "[Event \"F/S Return Match\"]\n\
                   [Site \"Belgrade, Serbia JUG\"]\n\
                   [Date \"1992.11.04\"]\n[Round \"29\"]\n\
                   [Result \"1/2-1/2\"]\n\
                   [a \"\"]\n\
                   [A1 \"\"]\n\
                   [_ \"\"]\n";
        assert_eq!(
            lex(pgn),
            tokens(&[
                (TagName, "Event"),
                (TagValue, "F/S Return Match"),
                (TagName, "Site"),
                (TagValue, "Belgrade, Serbia JUG"),
                (TagName, "Date"),
                (TagValue, "1992.11.04"),
                (TagName, "Round"),
                (TagValue, "29"),
                (TagName, "Result"),
                (TagValue, "1/2-1/2"),
                (TagName, "a"),
                (TagValue, ""),
                (TagName, "A1"),
                (TagValue, ""),
                (TagName, "_"),
                (TagValue, ""),
            ])
        );
    }

    #[test]
    fn emits_brackets_when_asked() {
        let options = LexerOptions::default().with_tag_pair_brackets(true);
        let lexed = Lexer::with_options(Scanner::new("[Round \"29\"]"), options)
            .tokenize()
            .unwrap();
        assert_eq!(
            lexed,
            tokens(&[
                (TagPairOpen, "["),
                (TagName, "Round"),
                (TagValue, "29"),
                (TagPairClose, "]"),
            ])
        );
    }

    #[test]
    fn emits_eof_when_asked() {
        let options = LexerOptions::default().with_eof_token(true);
        let lexed = Lexer::with_options(Scanner::new("1. e4 e5"), options)
            .tokenize()
            .unwrap();
        assert_eq!(lexed.last(), Some(&Token::new(EOF, "")));
        assert_eq!(lexed.len(), 6);
    }

    #[test]
    fn reports_broken_tag_pairs() {
        assert_eq!(lex_err("[Event \"x\""), LexErrorKind::MissingTagPairClose);
        assert_eq!(lex_err("[Event x]"), LexErrorKind::MissingStringOpenQuote);
        assert_eq!(lex_err("[Event \"x"), LexErrorKind::UnterminatedString);
        assert_eq!(lex_err("[Event \"R\u{e9}ti\"]"), LexErrorKind::UnterminatedString);
        assert_eq!(lex_err("[ \"x\"]"), LexErrorKind::MissingTagName);
    }

    #[test]
    fn tokenizes_pawn_moves() {
        assert_eq!(
            lex("1. e4 e5"),
            tokens(&[(MoveNumber, "1"), (File, "e"), (Rank, "4"), (File, "e"), (Rank, "5")])
        );
    }

    #[test]
    fn tokenizes_several_move_pairs() {
        assert_eq!(
            lex("1. e4 e5 2. Nf3 Nc6"),
            tokens(&[
                (MoveNumber, "1"),
                (File, "e"),
                (Rank, "4"),
                (File, "e"),
                (Rank, "5"),
                (MoveNumber, "2"),
                (Piece, "N"),
                (File, "f"),
                (Rank, "3"),
                (Piece, "N"),
                (File, "c"),
                (Rank, "6"),
            ])
        );
    }

    #[test]
    fn move_number_period_is_optional() {
        assert_eq!(
            lex("3 O-O O-O"),
            tokens(&[(MoveNumber, "3"), (CastleKingside, "O-O"), (CastleKingside, "O-O")])
        );
        assert_eq!(
            lex("12.. Nf6"),
            tokens(&[(MoveNumber, "12"), (Piece, "N"), (File, "f"), (Rank, "6")])
        );
    }

    #[test]
    fn continuation_resumes_with_one_move() {
        assert_eq!(
            lex("12... Nf6 13. d4"),
            tokens(&[
                (MoveNumber, "12"),
                (Continuation, "..."),
                (Piece, "N"),
                (File, "f"),
                (Rank, "6"),
                (MoveNumber, "13"),
                (File, "d"),
                (Rank, "4"),
            ])
        );
    }

    #[test]
    fn tokenizes_castling() {
        assert_eq!(
            lex("18. O-O Be7"),
            tokens(&[
                (MoveNumber, "18"),
                (CastleKingside, "O-O"),
                (Piece, "B"),
                (File, "e"),
                (Rank, "7"),
            ])
        );
        assert_eq!(
            lex("45. Ka6 O-O-O"),
            tokens(&[
                (MoveNumber, "45"),
                (Piece, "K"),
                (File, "a"),
                (Rank, "6"),
                (CastleQueenside, "O-O-O"),
            ])
        );
        assert_eq!(
            lex("3 O-O-O+ O-O#"),
            tokens(&[
                (MoveNumber, "3"),
                (CastleQueenside, "O-O-O"),
                (Check, "+"),
                (CastleKingside, "O-O"),
                (Checkmate, "#"),
            ])
        );
    }

    #[test]
    fn reports_malformed_castling() {
        assert_eq!(lex_err("1. O-"), LexErrorKind::MalformedCastle);
        assert_eq!(lex_err("1. O"), LexErrorKind::MalformedCastle);
        assert_eq!(lex_err("1. O-O-"), LexErrorKind::MalformedCastle);
        assert_eq!(lex_err("1. O-X"), LexErrorKind::MalformedCastle);
    }

    #[test]
    fn tokenizes_captures() {
        assert_eq!(
            lex("2. Rxf5 e4"),
            tokens(&[
                (MoveNumber, "2"),
                (Piece, "R"),
                (Capture, "x"),
                (File, "f"),
                (Rank, "5"),
                (File, "e"),
                (Rank, "4"),
            ])
        );
        assert_eq!(
            lex("2. Rf5 xe4"),
            tokens(&[
                (MoveNumber, "2"),
                (Piece, "R"),
                (File, "f"),
                (Rank, "5"),
                (Capture, "x"),
                (File, "e"),
                (Rank, "4"),
            ])
        );
    }

    #[test]
    fn tokenizes_pawn_captures() {
        assert_eq!(
            lex("12. cxb5 axb5"),
            tokens(&[
                (MoveNumber, "12"),
                (File, "c"),
                (Capture, "x"),
                (File, "b"),
                (Rank, "5"),
                (File, "a"),
                (Capture, "x"),
                (File, "b"),
                (Rank, "5"),
            ])
        );
    }

    #[test]
    fn tokenizes_file_disambiguation() {
        assert_eq!(
            lex("10. Nbd7 d4"),
            tokens(&[
                (MoveNumber, "10"),
                (Piece, "N"),
                (File, "b"),
                (File, "d"),
                (Rank, "7"),
                (File, "d"),
                (Rank, "4"),
            ])
        );
        assert_eq!(
            lex("20. Nbxd2 Rae8"),
            tokens(&[
                (MoveNumber, "20"),
                (Piece, "N"),
                (File, "b"),
                (Capture, "x"),
                (File, "d"),
                (Rank, "2"),
                (Piece, "R"),
                (File, "a"),
                (File, "e"),
                (Rank, "8"),
            ])
        );
    }

    #[test]
    fn tokenizes_rank_and_square_disambiguation() {
        assert_eq!(
            lex("30. R1a3 Qh4xe1"),
            tokens(&[
                (MoveNumber, "30"),
                (Piece, "R"),
                (Rank, "1"),
                (File, "a"),
                (Rank, "3"),
                (Piece, "Q"),
                (OriginSquare, "h4"),
                (Capture, "x"),
                (File, "e"),
                (Rank, "1"),
            ])
        );
    }

    #[test]
    fn origin_square_differs_from_a_capture_in_the_next_slot() {
        assert_eq!(
            lex("30. Qh4 xe1"),
            tokens(&[
                (MoveNumber, "30"),
                (Piece, "Q"),
                (File, "h"),
                (Rank, "4"),
                (Capture, "x"),
                (File, "e"),
                (Rank, "1"),
            ])
        );
        assert_eq!(
            lex("30. h4xg5"),
            tokens(&[
                (MoveNumber, "30"),
                (OriginSquare, "h4"),
                (Capture, "x"),
                (File, "g"),
                (Rank, "5"),
            ])
        );
    }

    #[test]
    fn tokenizes_checks_and_mates() {
        assert_eq!(
            lex("43. Ke6+ Bf4#"),
            tokens(&[
                (MoveNumber, "43"),
                (Piece, "K"),
                (File, "e"),
                (Rank, "6"),
                (Check, "+"),
                (Piece, "B"),
                (File, "f"),
                (Rank, "4"),
                (Checkmate, "#"),
            ])
        );
    }

    #[test]
    fn tokenizes_promotions_in_either_suffix_order() {
        assert_eq!(
            lex("60. e8=Q+ fxg1=N"),
            tokens(&[
                (MoveNumber, "60"),
                (File, "e"),
                (Rank, "8"),
                (PromotionIndicator, "="),
                (PromotionPiece, "Q"),
                (Check, "+"),
                (File, "f"),
                (Capture, "x"),
                (File, "g"),
                (Rank, "1"),
                (PromotionIndicator, "="),
                (PromotionPiece, "N"),
            ])
        );
        assert_eq!(
            lex("60. e8+=R"),
            tokens(&[
                (MoveNumber, "60"),
                (File, "e"),
                (Rank, "8"),
                (Check, "+"),
                (PromotionIndicator, "="),
                (PromotionPiece, "R"),
            ])
        );
    }

    #[test]
    fn reports_invalid_promotions() {
        assert_eq!(lex_err("2. e4= Rf5"), LexErrorKind::InvalidPromotionPiece);
        assert_eq!(lex_err("2. e8=K"), LexErrorKind::InvalidPromotionPiece);
        assert_eq!(lex_err("2. e8=P"), LexErrorKind::InvalidPromotionPiece);
    }

    #[test]
    fn reports_incomplete_squares() {
        assert_eq!(lex_err("1. N"), LexErrorKind::MissingFileAfterPiece);
        assert_eq!(lex_err("1. Nx"), LexErrorKind::MissingFileAfterPiece);
        assert_eq!(lex_err("1. Nf"), LexErrorKind::MissingRankAfterFile);
        assert_eq!(lex_err("1. e4 e"), LexErrorKind::MissingRankAfterFile);
        assert_eq!(lex_err("1. exd"), LexErrorKind::MissingRankAfterFile);
    }

    #[test]
    fn reports_moves_run_together() {
        assert_eq!(lex_err("1. e4e5"), LexErrorKind::MissingMoveSeparator);
        assert_eq!(lex_err("1. Qa6b7"), LexErrorKind::MissingMoveSeparator);
    }

    #[test]
    fn tokenizes_results() {
        assert_eq!(
            lex("43. Re6 1/2-1/2"),
            tokens(&[
                (MoveNumber, "43"),
                (Piece, "R"),
                (File, "e"),
                (Rank, "6"),
                (Draw, "1/2-1/2"),
            ])
        );
        assert_eq!(
            lex("43. 1/2-1/2 Re6"),
            tokens(&[
                (MoveNumber, "43"),
                (Draw, "1/2-1/2"),
                (Piece, "R"),
                (File, "e"),
                (Rank, "6"),
            ])
        );
        assert_eq!(
            lex("17. Rd8# 1-0"),
            tokens(&[
                (MoveNumber, "17"),
                (Piece, "R"),
                (File, "d"),
                (Rank, "8"),
                (Checkmate, "#"),
                (WhiteWins, "1-0"),
            ])
        );
        assert_eq!(
            lex("5. d4 d5 0-1"),
            tokens(&[
                (MoveNumber, "5"),
                (File, "d"),
                (Rank, "4"),
                (File, "d"),
                (Rank, "5"),
                (BlackWins, "0-1"),
            ])
        );
        assert_eq!(lex("*"), tokens(&[(Unfinished, "*")]));
        assert_eq!(
            lex("1. d4 *"),
            tokens(&[(MoveNumber, "1"), (File, "d"), (Rank, "4"), (Unfinished, "*")])
        );
    }

    #[test]
    fn reports_malformed_results() {
        assert_eq!(lex_err("43. Re6 1/2-1"), LexErrorKind::MalformedDraw);
        assert_eq!(lex_err("43. Re6 1/3"), LexErrorKind::MalformedDraw);
        assert_eq!(lex_err("43. Re6 1-1"), LexErrorKind::MalformedResult);
        assert_eq!(lex_err("0-0"), LexErrorKind::MalformedResult);
    }

    #[test]
    fn move_slots_may_be_empty() {
        assert_eq!(
            lex("1. e4\n2. d4"),
            tokens(&[
                (MoveNumber, "1"),
                (File, "e"),
                (Rank, "4"),
                (MoveNumber, "2"),
                (File, "d"),
                (Rank, "4"),
            ])
        );
    }

    #[test]
    fn tokenizes_comments() {
        assert_eq!(
            lex("3. Bb5 a6 {This opening is called the Ruy Lopez.}\n4. Ba4"),
            tokens(&[
                (MoveNumber, "3"),
                (Piece, "B"),
                (File, "b"),
                (Rank, "5"),
                (File, "a"),
                (Rank, "6"),
                (Comment, "This opening is called the Ruy Lopez."),
                (MoveNumber, "4"),
                (Piece, "B"),
                (File, "a"),
                (Rank, "4"),
            ])
        );
        assert_eq!(
            lex("{start} 1. e4 {best by test} e5"),
            tokens(&[
                (Comment, "start"),
                (MoveNumber, "1"),
                (File, "e"),
                (Rank, "4"),
                (Comment, "best by test"),
                (File, "e"),
                (Rank, "5"),
            ])
        );
    }

    #[test]
    fn tokenizes_comment_before_first_move() {
        assert_eq!(
            lex("1. {c} e4 e5"),
            tokens(&[
                (MoveNumber, "1"),
                (Comment, "c"),
                (File, "e"),
                (Rank, "4"),
                (File, "e"),
                (Rank, "5"),
            ])
        );
    }

    #[test]
    fn reports_unterminated_comments() {
        assert_eq!(
            lex_err("1. a4 e5 { unterminated "),
            LexErrorKind::UnterminatedComment
        );
        assert_eq!(lex_err("{"), LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn ignores_suffix_annotations() {
        assert_eq!(
            lex("1. e4! e5?!"),
            tokens(&[(MoveNumber, "1"), (File, "e"), (Rank, "4"), (File, "e"), (Rank, "5")])
        );
    }

    #[test]
    fn skips_unknown_characters_unless_strict() {
        assert_eq!(
            lex("% 1. e4 e5"),
            tokens(&[(MoveNumber, "1"), (File, "e"), (Rank, "4"), (File, "e"), (Rank, "5")])
        );

        let options = LexerOptions::default().with_strict(true);
        let err = Lexer::with_options(Scanner::new("% 1. e4"), options)
            .tokenize()
            .unwrap_err();
        assert_eq!(err.kind(), LexErrorKind::UnexpectedCharacter('%'));
        assert_eq!(err.offset(), 0);
    }

    #[test]
    fn errors_keep_partial_tokens_and_position() {
        let err = Lexer::new(Scanner::new("[Event \"x\"]\n1. e4 O-"))
            .tokenize()
            .unwrap_err();
        assert_eq!(err.kind(), LexErrorKind::MalformedCastle);
        assert_eq!(err.kind().code(), "ERR_CASTLE");
        assert_eq!(err.rule(), "castle");
        assert_eq!(err.offset(), 20);
        assert_eq!(
            err.partial_tokens(),
            tokens(&[
                (TagName, "Event"),
                (TagValue, "x"),
                (MoveNumber, "1"),
                (File, "e"),
                (Rank, "4"),
            ])
            .as_slice()
        );
    }

    #[test]
    fn tokenizing_twice_gives_identical_streams() {
        let pgn = include_str!("../fixtures/fischer_spassky_1992.pgn");
        assert_eq!(lex(pgn), lex(pgn));
    }

    #[test]
    fn tokenizes_real_game() {
        let pgn = include_str!("../fixtures/fischer_spassky_1992.pgn");
        let lexed = lex(pgn);

        let count = |kind: TokenKind| lexed.iter().filter(|token| token.kind() == kind).count();
        assert_eq!(count(TagName), 7);
        assert_eq!(count(TagValue), 7);
        assert_eq!(count(MoveNumber), 43);
        assert_eq!(count(Comment), 1);
        assert_eq!(count(CastleKingside), 2);
        assert_eq!(count(Check), 3);
        assert_eq!(lexed.last(), Some(&Token::new(Draw, "1/2-1/2")));
    }

    #[test]
    fn tokenizes_multiple_games() {
        let pgn = "[White \"a\"]\n\n1. e4 e5 1-0\n\n[White \"b\"]\n\n1. d4 0-1\n";
        assert_eq!(
            lex(pgn),
            tokens(&[
                (TagName, "White"),
                (TagValue, "a"),
                (MoveNumber, "1"),
                (File, "e"),
                (Rank, "4"),
                (File, "e"),
                (Rank, "5"),
                (WhiteWins, "1-0"),
                (TagName, "White"),
                (TagValue, "b"),
                (MoveNumber, "1"),
                (File, "d"),
                (Rank, "4"),
                (BlackWins, "0-1"),
            ])
        );
    }
}
