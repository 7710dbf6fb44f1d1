use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use rummy_core::model::card::{Card, Face};
use rummy_core::model::rank::Rank;
use rummy_core::model::suit::Suit;
use rummy_core::win::WINNING_HAND_SIZE;

use crate::config::SamplingConfig;

/// One random deal as seen by a single player.
#[derive(Debug, Clone)]
pub struct SampledDeal {
    /// Sorted by suit, then rank.
    pub hand: Vec<Card>,
    pub wildcard: Face,
    pub discard_top: Card,
}

/// Deals 13-card hands from a freshly shuffled shoe, reproducibly per seed.
pub struct HandSampler {
    rng: StdRng,
    decks: u8,
}

impl HandSampler {
    pub fn new(config: &SamplingConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed.unwrap_or(0)),
            decks: config.decks.max(1),
        }
    }

    pub fn deal(&mut self) -> SampledDeal {
        let mut cards = shoe(self.decks);
        cards.shuffle(&mut self.rng);

        // The wildcard is the first natural card turned over.
        let reveal = cards
            .iter()
            .position(|card| !card.printed_joker)
            .unwrap_or(0);
        let wildcard = cards.remove(reveal).face();

        let discard_top = cards[WINNING_HAND_SIZE];
        cards.truncate(WINNING_HAND_SIZE);
        cards.sort_by_key(|card| (card.suit, card.rank, card.id));
        SampledDeal {
            hand: cards,
            wildcard,
            discard_top,
        }
    }
}

/// Every card of `decks` standard decks plus a red and a black printed joker
/// per deck, with distinct ids. A printed joker's face is nominal.
pub fn shoe(decks: u8) -> Vec<Card> {
    let mut faces = Vec::with_capacity(usize::from(decks) * 54);
    for _ in 0..decks {
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                faces.push((rank, suit, false));
            }
        }
        faces.push((Rank::Ace, Suit::Hearts, true));
        faces.push((Rank::Ace, Suit::Spades, true));
    }

    faces
        .into_iter()
        .enumerate()
        .map(|(index, (rank, suit, printed))| {
            let id = index as u16;
            if printed {
                Card::printed_joker(id, rank, suit)
            } else {
                Card::new(id, rank, suit)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sampling(seed: u64, decks: u8) -> SamplingConfig {
        SamplingConfig {
            seed: Some(seed),
            hands: 1,
            decks,
        }
    }

    #[test]
    fn shoe_holds_every_deck_with_unique_ids() {
        let cards = shoe(2);
        assert_eq!(cards.len(), 108);
        let ids: HashSet<_> = cards.iter().map(|card| card.id).collect();
        assert_eq!(ids.len(), cards.len());
        assert_eq!(cards.iter().filter(|card| card.printed_joker).count(), 4);
    }

    #[test]
    fn deals_are_reproducible_per_seed() {
        let first = HandSampler::new(&sampling(7, 2)).deal();
        let second = HandSampler::new(&sampling(7, 2)).deal();
        assert_eq!(first.hand, second.hand);
        assert_eq!(first.wildcard, second.wildcard);
        assert_eq!(first.discard_top, second.discard_top);
    }

    #[test]
    fn dealt_cards_are_distinct_and_sized() {
        let mut sampler = HandSampler::new(&sampling(99, 1));
        for _ in 0..20 {
            let deal = sampler.deal();
            assert_eq!(deal.hand.len(), WINNING_HAND_SIZE);
            assert!(deal.hand.iter().all(|card| card.id != deal.discard_top.id));
            let ids: HashSet<_> = deal.hand.iter().map(|card| card.id).collect();
            assert_eq!(ids.len(), WINNING_HAND_SIZE);
            assert!(
                deal.hand
                    .windows(2)
                    .all(|pair| (pair[0].suit, pair[0].rank) <= (pair[1].suit, pair[1].rank))
            );
        }
    }
}
