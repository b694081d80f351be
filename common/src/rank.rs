use std::fmt::Display;

use serde::{de::Visitor, Deserialize, Serialize};

/// A horizontal row of the board, one through eight.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Rank {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
}

impl Rank {
    pub const fn as_char(self) -> char {
        match self {
            Self::One => '1',
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
        }
    }

    pub const fn as_int(self) -> i8 {
        self as i8
    }

    pub const fn is_rank_char(ch: char) -> bool {
        matches!(ch, '1'..='8')
    }

    fn try_from_i128(value: i128) -> Option<Self> {
        match value {
            1 => Some(Rank::One),
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            _ => None,
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Rank {
    type Error = ();
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1' => Ok(Rank::One),
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            _ => Err(()),
        }
    }
}

impl TryFrom<&str> for Rank {
    type Error = ();
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => ch.try_into(),
            _ => Err(()),
        }
    }
}

impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i8(self.as_int())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_i8(RankDeserializeVisitor)
    }
}

struct RankDeserializeVisitor;
impl RankDeserializeVisitor {
    const fn err_message() -> &'static str {
        "Expected an integer between 1 and 8."
    }
}

impl<'de> Visitor<'de> for RankDeserializeVisitor {
    type Value = Rank;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an integer between 1 and 8.")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Rank::try_from_i128(v as i128).ok_or_else(|| E::custom(Self::err_message()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Rank::try_from_i128(v as i128).ok_or_else(|| E::custom(Self::err_message()))
    }

    fn visit_char<E>(self, v: char) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Rank::try_from(v).map_err(|_| E::custom(Self::err_message()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Rank::try_from(v).map_err(|_| E::custom(Self::err_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn converts_from_chars() {
        assert_eq!(Rank::try_from('1'), Ok(Rank::One));
        assert_eq!(Rank::try_from('8'), Ok(Rank::Eight));
        assert!(Rank::try_from('0').is_err());
        assert!(Rank::try_from('9').is_err());
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Rank::Seven).unwrap(), "7");
        assert_eq!(serde_json::from_str::<Rank>("3").unwrap(), Rank::Three);
        assert!(serde_json::from_str::<Rank>("9").is_err());
    }
}
