use crate::model::card::Card;
use crate::model::joker::{JokerConfig, is_wild};
use crate::model::suit::Suit;

/// Natural, same-suit, consecutive runs of three or more ranks already in
/// `hand`. Each run holds the first card seen for every rank it spans, so a
/// duplicate of a run rank is left out.
pub fn natural_runs(hand: &[Card], jokers: Option<&JokerConfig>) -> Vec<Vec<Card>> {
    let mut runs = Vec::new();
    for suit in Suit::ALL {
        let mut by_rank: [Option<Card>; 13] = [None; 13];
        for card in hand
            .iter()
            .filter(|card| card.suit == suit && !is_wild(**card, jokers))
        {
            let slot = &mut by_rank[card.rank.ordinal() as usize];
            if slot.is_none() {
                *slot = Some(*card);
            }
        }
        let ranks: Vec<u8> = (0u8..13)
            .filter(|&ordinal| by_rank[ordinal as usize].is_some())
            .collect();
        for (start, end) in run_segments(&ranks) {
            if end - start + 1 >= 3 {
                runs.push(
                    (start..=end)
                        .filter_map(|ordinal| by_rank[ordinal as usize])
                        .collect(),
                );
            }
        }
    }
    runs
}

/// Whether `card`'s rank sits inside a natural run of three or more in its
/// suit among the natural cards of `hand`. Wild cards never qualify.
pub fn in_natural_run(card: Card, hand: &[Card], jokers: Option<&JokerConfig>) -> bool {
    if is_wild(card, jokers) {
        return false;
    }
    let ranks = suit_ranks(hand, card.suit, jokers, None);
    if ranks.len() < 3 {
        return false;
    }
    let target = card.rank.ordinal();
    run_segments(&ranks)
        .into_iter()
        .any(|(start, end)| end - start + 1 >= 3 && (start..=end).contains(&target))
}

/// Sorted, deduplicated rank ordinals of the natural `suit` cards in `hand`,
/// optionally skipping one card by identity.
pub fn suit_ranks(
    hand: &[Card],
    suit: Suit,
    jokers: Option<&JokerConfig>,
    skip: Option<Card>,
) -> Vec<u8> {
    let mut ranks: Vec<u8> = hand
        .iter()
        .filter(|card| card.suit == suit && !is_wild(**card, jokers))
        .filter(|card| skip.is_none_or(|skipped| skipped.id != card.id))
        .map(|card| card.rank.ordinal())
        .collect();
    ranks.sort_unstable();
    ranks.dedup();
    ranks
}

/// Maximal consecutive segments of sorted, deduplicated ranks as inclusive
/// `(start, end)` pairs.
pub fn run_segments(ranks: &[u8]) -> Vec<(u8, u8)> {
    let mut segments = Vec::new();
    let mut iter = ranks.iter().copied();
    let Some(first) = iter.next() else {
        return segments;
    };
    let (mut start, mut end) = (first, first);
    for rank in iter {
        if rank == end + 1 {
            end = rank;
        } else {
            segments.push((start, end));
            start = rank;
            end = rank;
        }
    }
    segments.push((start, end));
    segments
}
