use crate::meld::in_natural_run;
use crate::model::card::Card;
use crate::model::joker::{JokerConfig, is_wild};
use crate::win::verifier::{WINNING_HAND_SIZE, is_winning_hand};

/// A hand holds this many cards between picking and discarding.
pub const PRE_DISCARD_HAND_SIZE: usize = WINNING_HAND_SIZE + 1;

/// A card whose removal leaves a winning 13-card hand, if one exists.
///
/// Only defined for 14 cards. Candidates are tried cheapest first: natural
/// cards outside any natural run, then the remaining natural cards, then
/// wild cards. Ties keep input order.
pub fn find_best_discard_for_win(cards: &[Card], jokers: Option<&JokerConfig>) -> Option<Card> {
    if cards.len() != PRE_DISCARD_HAND_SIZE {
        return None;
    }

    let mut order: Vec<(u8, usize)> = cards
        .iter()
        .enumerate()
        .map(|(index, card)| (discard_tier(*card, cards, jokers), index))
        .collect();
    order.sort_unstable();

    let mut rest = Vec::with_capacity(WINNING_HAND_SIZE);
    for (_, index) in order {
        rest.clear();
        rest.extend(
            cards
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, card)| *card),
        );
        if is_winning_hand(&rest, jokers) {
            return Some(cards[index]);
        }
    }
    None
}

fn discard_tier(card: Card, hand: &[Card], jokers: Option<&JokerConfig>) -> u8 {
    if is_wild(card, jokers) {
        2
    } else if in_natural_run(card, hand, jokers) {
        1
    } else {
        0
    }
}
