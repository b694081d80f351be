use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

/// A vertical column of the board, `a` through `h`.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum File {
    a = 0,
    b = 1,
    c = 2,
    d = 3,
    e = 4,
    f = 5,
    g = 6,
    h = 7,
}

impl File {
    pub const fn as_char(self) -> char {
        match self {
            Self::a => 'a',
            Self::b => 'b',
            Self::c => 'c',
            Self::d => 'd',
            Self::e => 'e',
            Self::f => 'f',
            Self::g => 'g',
            Self::h => 'h',
        }
    }

    /// Whether `ch` names a file in algebraic notation.
    pub const fn is_file_char(ch: char) -> bool {
        matches!(ch, 'a'..='h')
    }
}

impl Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for File {
    type Error = ();
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a' => Ok(File::a),
            'b' => Ok(File::b),
            'c' => Ok(File::c),
            'd' => Ok(File::d),
            'e' => Ok(File::e),
            'f' => Ok(File::f),
            'g' => Ok(File::g),
            'h' => Ok(File::h),
            _ => Err(()),
        }
    }
}

impl TryFrom<&str> for File {
    type Error = ();
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => ch.try_into(),
            _ => Err(()),
        }
    }
}
