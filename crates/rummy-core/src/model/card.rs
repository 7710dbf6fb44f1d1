use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a physical card. Multi-deck shoes contain several cards with
/// the same face, so decisions that track individual cards key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u16);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rank and suit without identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Face {
    pub rank: Rank,
    pub suit: Suit,
}

impl Face {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("empty card notation")]
    Empty,
    #[error("unknown rank '{0}'")]
    Rank(String),
    #[error("unknown suit '{0}'")]
    Suit(String),
}

impl FromStr for Face {
    type Err = ParseCardError;

    /// Parses `A♠`, `10h`, `TD`, `qc`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        let Some((split, _)) = text.char_indices().last() else {
            return Err(ParseCardError::Empty);
        };
        let (rank_token, suit_token) = text.split_at(split);
        if rank_token.is_empty() {
            return Err(ParseCardError::Rank(String::new()));
        }
        let rank =
            Rank::from_token(rank_token).ok_or_else(|| ParseCardError::Rank(rank_token.into()))?;
        let suit =
            Suit::from_token(suit_token).ok_or_else(|| ParseCardError::Suit(suit_token.into()))?;
        Ok(Face::new(rank, suit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub rank: Rank,
    pub suit: Suit,
    /// Printed joker: wild regardless of rank, suit or the deal's wildcard.
    #[serde(default)]
    pub printed_joker: bool,
}

impl Card {
    pub const fn new(id: u16, rank: Rank, suit: Suit) -> Self {
        Self {
            id: CardId(id),
            rank,
            suit,
            printed_joker: false,
        }
    }

    pub const fn printed_joker(id: u16, rank: Rank, suit: Suit) -> Self {
        Self {
            id: CardId(id),
            rank,
            suit,
            printed_joker: true,
        }
    }

    pub const fn face(self) -> Face {
        Face::new(self.rank, self.suit)
    }

    pub fn has_face(self, face: Face) -> bool {
        self.rank == face.rank && self.suit == face.suit
    }

    /// Parses card notation and attaches an identity. A trailing `*` marks a
    /// printed joker, e.g. `5♣*`.
    pub fn parse_with_id(input: &str, id: u16) -> Result<Self, ParseCardError> {
        let text = input.trim();
        let (face_text, printed) = match text.strip_suffix('*') {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        let face: Face = face_text.parse()?;
        Ok(Self {
            id: CardId(id),
            rank: face.rank,
            suit: face.suit,
            printed_joker: printed,
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)?;
        if self.printed_joker {
            f.write_str("*")?;
        }
        Ok(())
    }
}
