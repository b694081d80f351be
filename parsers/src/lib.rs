mod game;
mod lex_err;
mod lexer;
mod san;
mod scanner;
mod token;
mod unmarshal;

pub use game::{Game, GameResult, MovetextEntry, Pgn, TagPair};
pub use lex_err::{LexError, LexErrorKind};
pub use lexer::{Lexer, LexerOptions};
pub use san::{Check, NormalMove, PieceMove, PieceMoveKind};
pub use scanner::{Scanner, NUL};
pub use token::{Token, TokenKind};
pub use unmarshal::{unmarshal, UnmarshalErr};

use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum PgnErr {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Unmarshal(#[from] UnmarshalErr),
}

/// Tokenizes `pgn` with the default options.
pub fn tokenize(pgn: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(Scanner::new(pgn)).tokenize()
}

pub fn parse_pgn(pgn: &str) -> Result<Pgn, PgnErr> {
    let tokens = tokenize(pgn)?;
    Ok(unmarshal(&tokens)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{parse_pgn, tokenize, LexErrorKind, PgnErr};

    const CANONICAL: &str = "[Event \"F/S Return Match\"]\n\
        [Result \"1-0\"]\n\
        \n\
        1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 {This opening is called the Ruy Lopez.} \
        4. O-O Nbd7 5. Rf1xf7+ R1a3 6. e8=Q O-O-O# 1-0\n\
        \n\
        [Event \"Second\"]\n\
        \n\
        1. d4 *\n";

    #[test]
    fn renders_canonical_pgn_unchanged() {
        let parsed = parse_pgn(CANONICAL).unwrap();
        assert_eq!(parsed.games.len(), 2);
        assert_eq!(parsed.to_string(), CANONICAL);
    }

    #[test]
    fn rendering_normalizes_layout() {
        let messy = "[Event   \"x\"]   [Site \"y\"]\n1.e4   e5\n\n2. Nf3{hi}   1/2-1/2";
        let parsed = parse_pgn(messy).unwrap();
        assert_eq!(
            parsed.to_string(),
            "[Event \"x\"]\n[Site \"y\"]\n\n1. e4 e5 2. Nf3 {hi} 1/2-1/2\n"
        );
        assert_eq!(parse_pgn(&parsed.to_string()).unwrap(), parsed);
    }

    #[test]
    fn real_game_survives_a_round_trip() {
        let pgn = include_str!("../fixtures/fischer_spassky_1992.pgn");
        let parsed = parse_pgn(pgn).unwrap();
        let rendered = parsed.to_string();
        assert_eq!(parse_pgn(&rendered).unwrap(), parsed);
        assert_eq!(tokenize(&rendered).unwrap(), tokenize(pgn).unwrap());
    }

    #[test]
    fn movetext_keeps_its_shape_through_a_round_trip() {
        for pgn in [
            "1. e4 {c} e5\n",
            "1. {c} e4 e5\n",
            "1. {a} e4 {b} e5 {c} 2. d4 {d}\n",
            "12... a6\n",
            "{from here} 12... a6 {c} 13. d4 Nf6\n",
            "2. Nf3 xd5\n",
            "30. Qh4xe1 Rf5\n",
        ] {
            let parsed = parse_pgn(pgn).unwrap();
            assert_eq!(parsed.to_string(), pgn);
        }
    }

    #[test]
    fn surfaces_lexer_errors() {
        match parse_pgn("1. O-") {
            Err(PgnErr::Lex(err)) => assert_eq!(err.kind(), LexErrorKind::MalformedCastle),
            other => panic!("expected a lex error, got {other:?}"),
        }
        // the result closes the game, so the trailing move has no move number
        assert!(matches!(
            parse_pgn("43. 1/2-1/2 Re6"),
            Err(PgnErr::Unmarshal(_))
        ));
    }

    #[test]
    fn stray_characters_are_not_games() {
        assert!(parse_pgn("% N ;").unwrap().games.is_empty());
    }
}
