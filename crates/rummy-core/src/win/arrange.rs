use crate::meld::{
    HandMask, MAX_MELD_SIZE, MIN_MELD_SIZE, cards_in, for_each_combination, is_pure_sequence,
    is_sequence_with_jokers, is_set, mask_of,
};
use crate::model::card::Card;
use crate::model::joker::JokerConfig;
use crate::win::verifier::is_winning_hand;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    PureSequence,
    Sequence,
    Set,
    /// Cards the greedy layout could not place.
    Remaining,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GroupKind::PureSequence => "Pure Sequence",
            GroupKind::Sequence => "Sequence",
            GroupKind::Set => "Set",
            GroupKind::Remaining => "Remaining",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangedGroup {
    pub kind: GroupKind,
    pub cards: Vec<Card>,
}

/// Lays out a winning hand for display.
///
/// Returns `None` unless the verifier accepts the hand. The layout is greedy
/// and may differ from the partition the verifier found: one pure sequence
/// per size from 5 down to 3, then one joker sequence per size over the
/// unused cards, then one set of four and one of three. Anything left over
/// is reported as [`GroupKind::Remaining`].
pub fn arrange_winning_hand(
    cards: &[Card],
    jokers: Option<&JokerConfig>,
) -> Option<Vec<ArrangedGroup>> {
    if !is_winning_hand(cards, jokers) {
        return None;
    }

    let mut layout = Layout {
        cards,
        used: 0,
        groups: Vec::new(),
    };
    for size in (MIN_MELD_SIZE..=MAX_MELD_SIZE).rev() {
        layout.take_first(size, GroupKind::PureSequence, |group| {
            is_pure_sequence(group, jokers)
        });
    }
    for size in (MIN_MELD_SIZE..=MAX_MELD_SIZE).rev() {
        layout.take_first(size, GroupKind::Sequence, |group| {
            is_sequence_with_jokers(group, jokers)
        });
    }
    for size in (MIN_MELD_SIZE..=4).rev() {
        layout.take_first(size, GroupKind::Set, |group| is_set(group, jokers));
    }

    let leftover = !layout.used & (((1u32 << cards.len()) - 1) as HandMask);
    let mut groups = layout.groups;
    if leftover != 0 {
        groups.push(ArrangedGroup {
            kind: GroupKind::Remaining,
            cards: cards_in(cards, leftover),
        });
    }
    Some(groups)
}

struct Layout<'c> {
    cards: &'c [Card],
    used: HandMask,
    groups: Vec<ArrangedGroup>,
}

impl Layout<'_> {
    /// Claims the first unused `size`-card group accepted by `accepts`.
    fn take_first<F>(&mut self, size: usize, kind: GroupKind, accepts: F)
    where
        F: Fn(&[Card]) -> bool,
    {
        let free: Vec<usize> = (0..self.cards.len())
            .filter(|&i| self.used & (1 << i) == 0)
            .collect();
        let mut claimed: Option<HandMask> = None;
        let mut group = Vec::with_capacity(size);
        for_each_combination(free.len(), size, |picks| {
            if claimed.is_some() {
                return;
            }
            group.clear();
            group.extend(picks.iter().map(|&p| self.cards[free[p]]));
            if accepts(&group) {
                let positions: Vec<usize> = picks.iter().map(|&p| free[p]).collect();
                claimed = Some(mask_of(&positions));
            }
        });
        if let Some(mask) = claimed {
            self.used |= mask;
            self.groups.push(ArrangedGroup {
                kind,
                cards: cards_in(self.cards, mask),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::Face;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn hand(faces: &[(Rank, Suit)]) -> Vec<Card> {
        faces
            .iter()
            .enumerate()
            .map(|(i, (rank, suit))| Card::new(i as u16, *rank, *suit))
            .collect()
    }

    #[test]
    fn lays_out_pure_sequences_before_sets() {
        use Rank::*;
        use Suit::*;
        let cards = hand(&[
            (Seven, Spades),
            (Seven, Hearts),
            (Seven, Diamonds),
            (Ace, Spades),
            (Two, Spades),
            (Three, Spades),
            (Four, Hearts),
            (Four, Diamonds),
            (Four, Clubs),
            (King, Spades),
            (King, Hearts),
            (King, Diamonds),
            (Seven, Clubs),
        ]);
        let groups = arrange_winning_hand(&cards, None).expect("winning");
        assert_eq!(groups[0].kind, GroupKind::PureSequence);
        let covered: usize = groups.iter().map(|g| g.cards.len()).sum();
        assert_eq!(covered, 13);
    }

    #[test]
    fn non_winning_hand_has_no_layout() {
        use Rank::*;
        use Suit::*;
        let cfg = JokerConfig::from_wildcard(Face::new(Two, Clubs));
        let cards = hand(&[
            (Ace, Spades),
            (Three, Hearts),
            (Five, Diamonds),
            (Seven, Clubs),
            (Nine, Spades),
            (Jack, Hearts),
            (King, Diamonds),
            (Four, Clubs),
            (Four, Spades),
            (Six, Hearts),
            (Eight, Diamonds),
            (Ten, Clubs),
            (Queen, Spades),
        ]);
        assert_eq!(arrange_winning_hand(&cards, Some(&cfg)), None);
    }

    #[test]
    fn leftovers_are_reported_as_remaining() {
        use Rank::*;
        use Suit::*;
        // Two natural runs of three in one suit: the greedy layout takes a
        // five-card run first and strands the sixth card.
        let cards = hand(&[
            (Two, Hearts),
            (Three, Hearts),
            (Four, Hearts),
            (Five, Hearts),
            (Six, Hearts),
            (Seven, Hearts),
            (Nine, Clubs),
            (Nine, Spades),
            (Nine, Diamonds),
            (Queen, Clubs),
            (Queen, Spades),
            (Queen, Diamonds),
            (Queen, Hearts),
        ]);
        let groups = arrange_winning_hand(&cards, None).expect("winning");
        let covered: usize = groups.iter().map(|g| g.cards.len()).sum();
        assert_eq!(covered, 13);
        assert_eq!(groups[0].kind, GroupKind::PureSequence);
        assert_eq!(groups[0].cards.len(), 5);
    }
}
