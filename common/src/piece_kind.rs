use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const fn as_char(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Pawns may promote to any piece but a pawn or a king.
    pub const fn is_promotion_target(self) -> bool {
        matches!(self, Self::Knight | Self::Bishop | Self::Rook | Self::Queen)
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for PieceKind {
    type Error = ();
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'P' => Ok(PieceKind::Pawn),
            'N' => Ok(PieceKind::Knight),
            'B' => Ok(PieceKind::Bishop),
            'R' => Ok(PieceKind::Rook),
            'Q' => Ok(PieceKind::Queen),
            'K' => Ok(PieceKind::King),
            _ => Err(()),
        }
    }
}

impl TryFrom<&str> for PieceKind {
    type Error = ();
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => ch.try_into(),
            _ => Err(()),
        }
    }
}
