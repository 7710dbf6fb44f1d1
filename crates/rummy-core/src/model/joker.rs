use crate::model::card::{Card, Face};
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Wild cards for one deal, derived from the card revealed at deal time.
///
/// The wildcard itself is never wild. The two cards of its rank in the
/// opposite color are wild, and so is the card one rank up in the wildcard's
/// suit (King wraps to Ace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JokerConfig {
    wildcard: Face,
    alternate_color: [Face; 2],
    one_up: Face,
}

impl JokerConfig {
    pub fn from_wildcard(wildcard: Face) -> Self {
        let [first, second] = Suit::of_color(wildcard.suit.color().opposite());
        Self {
            wildcard,
            alternate_color: [
                Face::new(wildcard.rank, first),
                Face::new(wildcard.rank, second),
            ],
            one_up: Face::new(wildcard.rank.next_wrapping(), wildcard.suit),
        }
    }

    pub const fn wildcard(&self) -> Face {
        self.wildcard
    }

    pub const fn alternate_color(&self) -> [Face; 2] {
        self.alternate_color
    }

    pub const fn one_up(&self) -> Face {
        self.one_up
    }

    /// Every face that counts as wild under this configuration.
    pub fn jokers(&self) -> [Face; 3] {
        [self.alternate_color[0], self.alternate_color[1], self.one_up]
    }

    /// A printed joker is never the wildcard, whatever face it carries.
    pub fn is_wildcard(&self, card: Card) -> bool {
        !card.printed_joker && card.has_face(self.wildcard)
    }
}

/// Whether `card` substitutes for any rank in a meld.
///
/// Without a configuration only printed jokers are wild.
pub fn is_wild(card: Card, jokers: Option<&JokerConfig>) -> bool {
    if card.printed_joker {
        return true;
    }
    let Some(config) = jokers else {
        return false;
    };
    if config.is_wildcard(card) {
        return false;
    }
    config.jokers().iter().any(|face| card.has_face(*face))
}

/// Number of wild cards in `cards`.
pub fn count_wild(cards: &[Card], jokers: Option<&JokerConfig>) -> usize {
    cards.iter().filter(|card| is_wild(**card, jokers)).count()
}

#[cfg(test)]
mod tests {
    use super::{JokerConfig, count_wild, is_wild};
    use crate::model::card::{Card, Face};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn config(rank: Rank, suit: Suit) -> JokerConfig {
        JokerConfig::from_wildcard(Face::new(rank, suit))
    }

    #[test]
    fn five_of_hearts_marks_black_fives_and_six_of_hearts() {
        let cfg = config(Rank::Five, Suit::Hearts);
        assert!(is_wild(Card::new(1, Rank::Five, Suit::Spades), Some(&cfg)));
        assert!(is_wild(Card::new(2, Rank::Five, Suit::Clubs), Some(&cfg)));
        assert!(is_wild(Card::new(3, Rank::Six, Suit::Hearts), Some(&cfg)));
        assert!(!is_wild(Card::new(4, Rank::Five, Suit::Hearts), Some(&cfg)));
        assert!(!is_wild(Card::new(5, Rank::Five, Suit::Diamonds), Some(&cfg)));
        assert!(!is_wild(Card::new(6, Rank::Six, Suit::Spades), Some(&cfg)));
    }

    #[test]
    fn wildcard_is_never_wild() {
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let cfg = config(rank, suit);
                assert!(!is_wild(Card::new(0, rank, suit), Some(&cfg)));
            }
        }
    }

    #[test]
    fn king_wildcard_wraps_one_up_to_ace() {
        let cfg = config(Rank::King, Suit::Clubs);
        assert_eq!(cfg.one_up(), Face::new(Rank::Ace, Suit::Clubs));
        assert_eq!(
            cfg.alternate_color(),
            [
                Face::new(Rank::King, Suit::Hearts),
                Face::new(Rank::King, Suit::Diamonds)
            ]
        );
    }

    #[test]
    fn missing_configuration_only_honours_printed_jokers() {
        let plain = Card::new(1, Rank::Five, Suit::Spades);
        let printed = Card::printed_joker(2, Rank::Two, Suit::Hearts);
        assert!(!is_wild(plain, None));
        assert!(is_wild(printed, None));
        assert_eq!(count_wild(&[plain, printed], None), 1);
    }

    #[test]
    fn printed_joker_stays_wild_even_with_wildcard_face() {
        let cfg = config(Rank::Nine, Suit::Diamonds);
        let printed = Card::printed_joker(3, Rank::Nine, Suit::Diamonds);
        assert!(is_wild(printed, Some(&cfg)));
        assert!(!cfg.is_wildcard(printed));
        assert!(cfg.is_wildcard(Card::new(4, Rank::Nine, Suit::Diamonds)));
    }
}
