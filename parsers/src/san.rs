use std::fmt::{Debug, Display};

use pgn_common::{File, PieceKind, Rank, Square};

/// One half-move in standard algebraic notation.
#[derive(Clone, Eq, PartialEq)]
pub struct PieceMove {
    /// The type of check this move resulted in
    pub check_kind: Check,
    pub move_kind: PieceMoveKind,
}

impl PieceMove {
    pub fn new(move_kind: PieceMoveKind, check_kind: Check) -> Self {
        Self {
            check_kind,
            move_kind,
        }
    }
}

impl Debug for PieceMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Display for PieceMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.move_kind, self.check_kind)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PieceMoveKind {
    CastleKingside,
    CastleQueenside,
    Normal(NormalMove),
}

impl Display for PieceMoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceMoveKind::CastleKingside => f.write_str("O-O"),
            PieceMoveKind::CastleQueenside => f.write_str("O-O-O"),
            PieceMoveKind::Normal(normal_move) => write!(f, "{normal_move}"),
        }
    }
}

#[derive(Clone, Eq, PartialEq)]
pub struct NormalMove {
    /// The piece being moved
    pub piece_kind: PieceKind,
    /// The destination square of the move
    pub destination: Square,
    /// The file from which the piece is moving (only given if necessary for disambiguation)
    pub disambiguation_file: Option<File>,
    /// The rank from which the piece is moving (only given if necessary for disambiguation)
    pub disambiguation_rank: Option<Rank>,
    pub is_capture: bool,
    /// None = no promotion
    pub promotion_kind: Option<PieceKind>,
}

impl NormalMove {
    /// A quiet move with no disambiguation.
    pub fn to(piece_kind: PieceKind, destination: Square) -> Self {
        Self {
            piece_kind,
            destination,
            disambiguation_file: None,
            disambiguation_rank: None,
            is_capture: false,
            promotion_kind: None,
        }
    }
}

impl Debug for NormalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Display for NormalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.piece_kind != PieceKind::Pawn {
            write!(f, "{}", self.piece_kind)?;
        }
        if let Some(disambiguation_file) = self.disambiguation_file {
            write!(f, "{disambiguation_file}")?;
        }
        if let Some(disambiguation_rank) = self.disambiguation_rank {
            write!(f, "{disambiguation_rank}")?;
        }
        if self.is_capture {
            f.write_str("x")?;
        }

        write!(f, "{}", self.destination)?;

        if let Some(promotion_piece) = self.promotion_kind {
            write!(f, "={promotion_piece}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Check {
    None,
    Check,
    Mate,
}

impl Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Check::None => Ok(()),
            Check::Check => f.write_str("+"),
            Check::Mate => f.write_str("#"),
        }
    }
}
