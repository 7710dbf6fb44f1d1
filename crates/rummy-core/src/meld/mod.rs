mod runs;
mod validators;

pub use runs::{in_natural_run, natural_runs, run_segments, suit_ranks};
pub use validators::{is_pure_sequence, is_sequence_with_jokers, is_set};

use crate::model::card::Card;
use crate::model::joker::JokerConfig;
use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_MELD_SIZE: usize = 3;
pub const MAX_MELD_SIZE: usize = 5;

/// Bit `i` set means card `i` of the analysed slice is covered.
pub(crate) type HandMask = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeldKind {
    PureSequence,
    Sequence,
    Set,
}

impl MeldKind {
    /// Pure sequences also count toward the sequence requirement.
    pub const fn is_sequence(self) -> bool {
        matches!(self, MeldKind::PureSequence | MeldKind::Sequence)
    }
}

impl fmt::Display for MeldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MeldKind::PureSequence => "Pure Sequence",
            MeldKind::Sequence => "Sequence",
            MeldKind::Set => "Set",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    pub cards: Vec<Card>,
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.kind)?;
        for card in &self.cards {
            write!(f, " {card}")?;
        }
        Ok(())
    }
}

/// Tags a group with the strongest kind it satisfies: pure sequence first,
/// then sequence with jokers, then set.
pub fn classify(cards: &[Card], jokers: Option<&JokerConfig>) -> Option<MeldKind> {
    if is_pure_sequence(cards, jokers) {
        Some(MeldKind::PureSequence)
    } else if is_sequence_with_jokers(cards, jokers) {
        Some(MeldKind::Sequence)
    } else if is_set(cards, jokers) {
        Some(MeldKind::Set)
    } else {
        None
    }
}

/// A valid meld over a slice of at most 16 cards, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub kind: MeldKind,
    pub mask: HandMask,
}

impl Candidate {
    pub fn to_meld(self, cards: &[Card]) -> Meld {
        Meld {
            kind: self.kind,
            cards: cards_in(cards, self.mask),
        }
    }
}

/// Every 3..=5 card combination of `cards` that classifies as a meld.
pub(crate) fn candidate_melds(cards: &[Card], jokers: Option<&JokerConfig>) -> Vec<Candidate> {
    debug_assert!(cards.len() <= HandMask::BITS as usize);
    let mut found = Vec::new();
    let mut group = Vec::with_capacity(MAX_MELD_SIZE);
    for size in MIN_MELD_SIZE..=MAX_MELD_SIZE.min(cards.len()) {
        for_each_combination(cards.len(), size, |indices| {
            group.clear();
            group.extend(indices.iter().map(|&i| cards[i]));
            if let Some(kind) = classify(&group, jokers) {
                found.push(Candidate {
                    kind,
                    mask: mask_of(indices),
                });
            }
        });
    }
    found
}

/// Calls `visit` with each `size`-element index combination of `0..n` in
/// lexicographic order.
pub(crate) fn for_each_combination<F>(n: usize, size: usize, mut visit: F)
where
    F: FnMut(&[usize]),
{
    if size == 0 || size > n {
        return;
    }
    let mut indices: Vec<usize> = (0..size).collect();
    loop {
        visit(&indices);
        let Some(pivot) = (0..size).rev().find(|&i| indices[i] != i + n - size) else {
            return;
        };
        indices[pivot] += 1;
        for i in pivot + 1..size {
            indices[i] = indices[i - 1] + 1;
        }
    }
}

pub(crate) fn mask_of(indices: &[usize]) -> HandMask {
    indices.iter().fold(0, |mask, &i| mask | (1 << i))
}

pub(crate) fn cards_in(cards: &[Card], mask: HandMask) -> Vec<Card> {
    cards
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, card)| *card)
        .collect()
}
