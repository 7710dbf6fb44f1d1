use super::BotContext;
use super::scoring::card_score;
use rummy_core::meld::{natural_runs, run_segments, suit_ranks};
use rummy_core::model::card::{Card, CardId};
use rummy_core::model::joker::{JokerConfig, is_wild};
use rummy_core::model::rank::Rank;
use rummy_core::model::suit::Suit;
use rummy_core::win::{PRE_DISCARD_HAND_SIZE, find_best_discard_for_win};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// Dropping the card leaves a declarable hand.
    WinningDiscard,
    /// Lowest score among cards that break nothing.
    LowestScore,
    /// Every candidate feeds a partial meld; lowest score outside natural runs.
    LowestUnprotected,
    /// Every candidate sits in a natural run.
    Fallback,
}

impl DiscardReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiscardReason::WinningDiscard => "winning_discard",
            DiscardReason::LowestScore => "lowest_score",
            DiscardReason::LowestUnprotected => "lowest_unprotected",
            DiscardReason::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscardChoice {
    pub card: Card,
    pub reason: DiscardReason,
}

/// Two-card fragments of melds: pairs of a rank and adjacent same-suit cards.
#[derive(Debug, Clone, Default)]
pub struct PartialMelds {
    pairs: Vec<Rank>,
    links: Vec<(Suit, u8, u8)>,
}

impl PartialMelds {
    pub fn scan(hand: &[Card]) -> Self {
        let faced: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|card| !card.printed_joker)
            .collect();
        let mut by_rank: HashMap<Rank, usize> = HashMap::new();
        for card in &faced {
            *by_rank.entry(card.rank).or_default() += 1;
        }
        let pairs = by_rank
            .into_iter()
            .filter(|(_, count)| *count == 2)
            .map(|(rank, _)| rank)
            .collect();

        let mut links = Vec::new();
        for suit in Suit::ALL {
            let mut ranks: Vec<u8> = faced
                .iter()
                .filter(|card| card.suit == suit)
                .map(|card| card.rank.ordinal())
                .collect();
            ranks.sort_unstable();
            for pair in ranks.windows(2) {
                if pair[1] == pair[0] + 1 {
                    links.push((suit, pair[0], pair[1]));
                }
            }
        }

        Self { pairs, links }
    }

    /// Whether `card` would turn a fragment into a three-card meld.
    pub fn completed_by(&self, card: Card) -> bool {
        if card.printed_joker {
            return false;
        }
        if self.pairs.contains(&card.rank) {
            return true;
        }
        let target = card.rank.ordinal();
        self.links.iter().any(|&(suit, low, high)| {
            suit == card.suit && (target + 1 == low || target == high + 1)
        })
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

pub struct DiscardPlanner;

impl DiscardPlanner {
    /// Picks the card to throw. `None` only for an empty hand.
    pub fn choose(hand: &[Card], ctx: &BotContext<'_>) -> Option<DiscardChoice> {
        if hand.is_empty() {
            return None;
        }
        if hand.len() == PRE_DISCARD_HAND_SIZE {
            if let Some(card) = find_best_discard_for_win(hand, ctx.jokers) {
                return Some(DiscardChoice {
                    card,
                    reason: DiscardReason::WinningDiscard,
                });
            }
        }

        let partials = PartialMelds::scan(hand);
        let protected: HashSet<CardId> = natural_runs(hand, ctx.jokers)
            .iter()
            .flatten()
            .map(|card| card.id)
            .collect();

        let naturals: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|card| !is_wild(*card, ctx.jokers))
            .collect();
        let candidates: &[Card] = if naturals.is_empty() { hand } else { &naturals };

        let safe = candidates.iter().copied().filter(|card| {
            !protected.contains(&card.id)
                && !in_potential_long_run(*card, hand, ctx.jokers)
                && !partials.completed_by(*card)
        });
        if let Some(card) = lowest_scoring(safe, hand, ctx) {
            return Some(DiscardChoice {
                card,
                reason: DiscardReason::LowestScore,
            });
        }

        let unprotected = candidates
            .iter()
            .copied()
            .filter(|card| !protected.contains(&card.id));
        if let Some(card) = lowest_scoring(unprotected, hand, ctx) {
            return Some(DiscardChoice {
                card,
                reason: DiscardReason::LowestUnprotected,
            });
        }

        candidates.first().map(|card| DiscardChoice {
            card: *card,
            reason: DiscardReason::Fallback,
        })
    }
}

/// First card with the minimum score.
fn lowest_scoring<I>(pool: I, hand: &[Card], ctx: &BotContext<'_>) -> Option<Card>
where
    I: Iterator<Item = Card>,
{
    pool.map(|card| (card_score(card, hand, ctx), card))
        .min_by_key(|(score, _)| *score)
        .map(|(_, card)| card)
}

/// A natural card whose rank sits in a run of four or more natural ranks of
/// its suit.
pub(crate) fn in_potential_long_run(
    card: Card,
    hand: &[Card],
    jokers: Option<&JokerConfig>,
) -> bool {
    if is_wild(card, jokers) {
        return false;
    }
    let mut ranks = suit_ranks(hand, card.suit, jokers, None);
    let target = card.rank.ordinal();
    if let Err(slot) = ranks.binary_search(&target) {
        ranks.insert(slot, target);
    }
    run_segments(&ranks)
        .into_iter()
        .any(|(start, end)| end - start + 1 >= 4 && (start..=end).contains(&target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotParams;
    use rummy_core::model::card::Face;

    fn cards(notation: &str) -> Vec<Card> {
        notation
            .split_whitespace()
            .enumerate()
            .map(|(i, token)| Card::parse_with_id(token, i as u16).expect("card"))
            .collect()
    }

    fn choose(hand: &[Card], jokers: Option<&JokerConfig>) -> DiscardChoice {
        let params = BotParams::default();
        let ctx = BotContext::new(jokers, &params);
        DiscardPlanner::choose(hand, &ctx).expect("non-empty hand")
    }

    #[test]
    fn empty_hand_has_no_discard() {
        let params = BotParams::default();
        let ctx = BotContext::new(None, &params);
        assert_eq!(DiscardPlanner::choose(&[], &ctx), None);
    }

    #[test]
    fn winning_discard_comes_first() {
        let hand = cards("A♠ 2♠ 3♠ 4♥ 4♦ 4♣ K♠ K♥ K♦ 7♠ 7♥ 7♦ 7♣ 9♠");
        let choice = choose(&hand, None);
        assert_eq!(choice.reason, DiscardReason::WinningDiscard);
        assert_eq!(choice.card.face(), Face::new(Rank::Nine, Suit::Spades));
    }

    #[test]
    fn isolated_edge_card_goes_before_connected_cards() {
        let hand = cards("4♥ 5♥ 6♥ 9♣ 9♦ J♠ Q♠ K♦ 2♣");
        let choice = choose(&hand, None);
        assert_eq!(choice.reason, DiscardReason::LowestScore);
        assert_eq!(choice.card.face(), Face::new(Rank::King, Suit::Diamonds));
    }

    #[test]
    fn wild_cards_are_kept_while_naturals_remain() {
        // Wild: 5♠, 5♣, 6♥.
        let cfg = JokerConfig::from_wildcard(Face::new(Rank::Five, Suit::Hearts));
        let hand = cards("5♠ 5♣ 6♥ K♦");
        let choice = choose(&hand, Some(&cfg));
        assert_eq!(choice.card.face(), Face::new(Rank::King, Suit::Diamonds));

        let all_wild = cards("5♠ 5♣ 6♥");
        let choice = choose(&all_wild, Some(&cfg));
        assert!(is_wild(choice.card, Some(&cfg)));
    }

    #[test]
    fn natural_runs_are_never_broken() {
        let hand = cards("4♥ 5♥ 6♥ 7♥ 9♣ 9♦");
        let choice = choose(&hand, None);
        assert_eq!(choice.reason, DiscardReason::LowestUnprotected);
        assert_eq!(choice.card.rank, Rank::Nine);

        let only_runs = cards("4♥ 5♥ 6♥ 8♣ 9♣ 10♣");
        let choice = choose(&only_runs, None);
        assert_eq!(choice.reason, DiscardReason::Fallback);
        assert_eq!(choice.card.id, CardId(0));
    }

    #[test]
    fn partial_melds_cover_pairs_and_links() {
        let hand = cards("9♣ 9♦ 4♥ 5♥ K♠");
        let partials = PartialMelds::scan(&hand);
        assert_eq!(partials.pair_count(), 1);
        assert_eq!(partials.link_count(), 1);
        assert!(partials.completed_by(Card::new(20, Rank::Nine, Suit::Spades)));
        assert!(partials.completed_by(Card::new(21, Rank::Six, Suit::Hearts)));
        assert!(partials.completed_by(Card::new(22, Rank::Three, Suit::Hearts)));
        assert!(!partials.completed_by(Card::new(23, Rank::Six, Suit::Clubs)));
        assert!(!partials.completed_by(hand[4]));
    }

    #[test]
    fn printed_jokers_do_not_form_partial_melds() {
        let hand = vec![
            Card::new(0, Rank::Nine, Suit::Clubs),
            Card::printed_joker(1, Rank::Nine, Suit::Hearts),
            Card::printed_joker(2, Rank::Ten, Suit::Clubs),
        ];
        let partials = PartialMelds::scan(&hand);
        assert_eq!(partials.pair_count(), 0);
        assert_eq!(partials.link_count(), 0);
        assert!(!partials.completed_by(Card::new(20, Rank::Nine, Suit::Spades)));
        assert!(!partials.completed_by(hand[1]));
    }

    #[test]
    fn long_runs_are_detected_per_card() {
        let hand = cards("3♦ 4♦ 5♦ 6♦ 9♦");
        assert!(in_potential_long_run(hand[0], &hand, None));
        assert!(!in_potential_long_run(hand[4], &hand, None));
    }
}
