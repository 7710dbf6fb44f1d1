//! Meld predicates. All of them are order-insensitive: any permutation of the
//! same cards gives the same answer.

use crate::model::card::Card;
use crate::model::joker::{JokerConfig, is_wild};
use crate::model::suit::Suit;

/// Three or more wild-free cards of one suit with strictly consecutive ranks.
pub fn is_pure_sequence(cards: &[Card], jokers: Option<&JokerConfig>) -> bool {
    if cards.len() < 3 || cards.iter().any(|card| is_wild(*card, jokers)) {
        return false;
    }
    if !same_suit(cards) {
        return false;
    }
    let ranks = sorted_ordinals(cards);
    ranks.windows(2).all(|pair| pair[1] == pair[0] + 1)
}

/// Three or more cards where every natural card shares one rank. Wild cards
/// fill in for the missing members; suits are not checked.
pub fn is_set(cards: &[Card], jokers: Option<&JokerConfig>) -> bool {
    if cards.len() < 3 {
        return false;
    }
    let mut naturals = cards.iter().filter(|card| !is_wild(**card, jokers));
    let Some(first) = naturals.next() else {
        return false;
    };
    naturals.all(|card| card.rank == first.rank)
}

/// Natural cards share one suit and the wild cards cover every rank gap
/// between consecutive distinct natural ranks.
///
/// Gap coverage is the whole acceptance rule: group size is left to the
/// caller, and repeated natural ranks do not disqualify the group.
pub fn is_sequence_with_jokers(cards: &[Card], jokers: Option<&JokerConfig>) -> bool {
    let (wild, naturals): (Vec<Card>, Vec<Card>) =
        cards.iter().partition(|card| is_wild(**card, jokers));
    if naturals.is_empty() || !same_suit(&naturals) {
        return false;
    }
    let ranks = sorted_ordinals(&naturals);
    let gaps: usize = ranks
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0] + 1) as usize)
        .sum();
    wild.len() >= gaps
}

fn same_suit(cards: &[Card]) -> bool {
    let mut suits = cards.iter().map(|card| card.suit);
    match suits.next() {
        Some(first) => suits.all(|suit: Suit| suit == first),
        None => true,
    }
}

fn sorted_ordinals(cards: &[Card]) -> Vec<u8> {
    let mut ranks: Vec<u8> = cards.iter().map(|card| card.rank.ordinal()).collect();
    ranks.sort_unstable();
    ranks
}
