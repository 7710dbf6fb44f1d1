use super::BotContext;
use rummy_core::meld::{in_natural_run, natural_runs, run_segments};
use rummy_core::model::card::Card;
use rummy_core::model::joker::{JokerConfig, count_wild, is_wild};
use rummy_core::model::rank::Rank;
use rummy_core::model::suit::Suit;
use std::collections::HashMap;

/// How much the bot wants to keep `card` given the rest of `hand`.
///
/// `hand` is expected to contain `card`.
pub fn card_score(card: Card, hand: &[Card], ctx: &BotContext<'_>) -> i32 {
    let params = ctx.params;
    if is_wild(card, ctx.jokers) {
        return params.wild_card;
    }

    let mut score = 0;
    let in_pure_run = in_natural_run(card, hand, ctx.jokers);
    if in_pure_run {
        score += params.pure_run_member;
    }
    let in_joker_run = in_joker_sequence(card, hand, ctx.jokers);
    if in_joker_run {
        score += params.joker_sequence_member;
    }

    let run_value = pure_sequence_value(card, hand, ctx);
    score += run_value;

    let same_rank = same_rank_count(card.rank, hand);
    score += match same_rank {
        0 => 0,
        1 => params.same_rank_single,
        2 => params.same_rank_pair,
        _ => params.same_rank_three,
    };

    let covered = in_pure_run || in_joker_run;
    if !covered {
        score += joker_sequence_value(card, hand, ctx);
    }

    let isolated = is_isolated(card, hand, ctx.jokers);
    if isolated {
        score += params.isolated_penalty;
        if card.rank.is_edge() {
            score += params.isolated_edge_penalty;
        }
    }

    if !covered && run_value == 0 && same_rank == 1 {
        score += params.no_potential_penalty;
    }

    if !isolated && !in_pure_run && (2..=10).contains(&card.rank.ordinal()) {
        score += params.middle_rank_bonus;
    }

    score
}

/// Sum of card scores plus bonuses for meld-shaped groups.
pub fn hand_value(hand: &[Card], ctx: &BotContext<'_>) -> i32 {
    let cards: i32 = hand.iter().map(|card| card_score(*card, hand, ctx)).sum();
    let melds = count_potential_melds(hand) as i32;
    let pure = count_pure_sequences(hand, ctx.jokers) as i32;
    cards + melds * ctx.params.meld_bonus + pure * ctx.params.pure_sequence_bonus
}

/// Cards of `rank` in `hand`, wild ones included. Printed jokers have no
/// rank.
pub(crate) fn same_rank_count(rank: Rank, hand: &[Card]) -> usize {
    hand.iter()
        .filter(|card| !card.printed_joker && card.rank == rank)
        .count()
}

/// Rank groups of three or more plus same-suit runs of three or more,
/// counting wild cards at face value.
pub(crate) fn count_potential_melds(hand: &[Card]) -> usize {
    let mut by_rank: HashMap<Rank, usize> = HashMap::new();
    for card in hand.iter().filter(|card| !card.printed_joker) {
        *by_rank.entry(card.rank).or_default() += 1;
    }
    let sets = by_rank.values().filter(|count| **count >= 3).count();

    let runs: usize = Suit::ALL
        .iter()
        .map(|suit| {
            let ranks = face_ranks(hand, *suit);
            run_segments(&ranks)
                .into_iter()
                .filter(|(start, end)| end - start + 1 >= 3)
                .count()
        })
        .sum();

    sets + runs
}

pub(crate) fn count_pure_sequences(hand: &[Card], jokers: Option<&JokerConfig>) -> usize {
    natural_runs(hand, jokers).len()
}

/// Whether no other natural card could realistically join `card` in a meld.
pub(crate) fn is_isolated(card: Card, hand: &[Card], jokers: Option<&JokerConfig>) -> bool {
    if is_wild(card, jokers) {
        return false;
    }
    let has_rank_partner = hand
        .iter()
        .any(|other| other.id != card.id && other.rank == card.rank && !is_wild(*other, jokers));
    if has_rank_partner {
        return false;
    }

    let wild = count_wild(hand, jokers);
    let others = other_suit_naturals(card, hand, jokers);
    if others.is_empty() {
        return wild < 2;
    }

    let target = card.rank.ordinal();
    let min_gaps = others
        .iter()
        .map(|rank| rank.abs_diff(target))
        .filter(|distance| *distance <= 2)
        .map(|distance| distance.saturating_sub(1) as usize)
        .min();
    match min_gaps {
        Some(gaps) => gaps > wild,
        None => true,
    }
}

/// Whether the hand's wild cards can bridge `card` into a run of three or
/// more with at least one other natural card of its suit.
pub(crate) fn in_joker_sequence(card: Card, hand: &[Card], jokers: Option<&JokerConfig>) -> bool {
    let others = other_suit_naturals(card, hand, jokers);
    if others.is_empty() {
        return false;
    }
    let wild = count_wild(hand, jokers);
    if wild == 0 {
        return false;
    }

    let target = card.rank.ordinal();
    let mut ranks = others;
    ranks.push(target);
    ranks.sort_unstable();
    ranks.dedup();

    for start_index in 0..ranks.len() {
        let start = ranks[start_index];
        for end_index in start_index + 2..ranks.len() + 3 {
            let length = (end_index - start_index + 1) as u8;
            let end = start + length - 1;
            if target < start || target > end {
                continue;
            }
            let present = (start..=end).filter(|rank| ranks.contains(rank)).count();
            let gaps = length as usize - present;
            if gaps <= wild && present >= 2 {
                return true;
            }
        }
    }
    false
}

/// Best run-building value of `card` against the other natural cards of its
/// suit: extending a chain, or sitting in a one-rank gap.
pub(crate) fn pure_sequence_value(card: Card, hand: &[Card], ctx: &BotContext<'_>) -> i32 {
    let ranks = other_suit_naturals(card, hand, ctx.jokers);
    let target = card.rank.ordinal();

    let mut best = 0;
    for i in 0..ranks.len() {
        let mut length = 1;
        let mut top = ranks[i];
        for &rank in &ranks[i + 1..] {
            if rank != top + 1 {
                break;
            }
            length += 1;
            top = rank;
        }
        if target + 1 == ranks[i] || target == top + 1 {
            best = best.max(ctx.params.extension_value(length + 1));
        }
    }

    let fills_gap = ranks
        .windows(2)
        .any(|pair| pair[0] + 1 == target && target + 1 == pair[1]);
    if fills_gap {
        best = best.max(ctx.params.gap_fill);
    }
    best
}

/// Flat bonus when the hand's wild cards cover every gap between `card` and
/// the other natural cards of its suit.
///
/// A repeated rank counts as a gap of -1, so duplicates offset real gaps.
pub(crate) fn joker_sequence_value(card: Card, hand: &[Card], ctx: &BotContext<'_>) -> i32 {
    let wild = count_wild(hand, ctx.jokers);
    if wild == 0 {
        return 0;
    }
    let mut ranks = other_suit_naturals(card, hand, ctx.jokers);
    if ranks.is_empty() {
        return 0;
    }
    ranks.push(card.rank.ordinal());
    ranks.sort_unstable();
    let gaps: i32 = ranks
        .windows(2)
        .map(|pair| i32::from(pair[1]) - i32::from(pair[0]) - 1)
        .sum();
    if gaps <= wild as i32 {
        ctx.params.joker_sequence_potential
    } else {
        0
    }
}

/// Sorted rank ordinals of the natural cards sharing `card`'s suit, other
/// than `card` itself. Repeated ranks are kept.
fn other_suit_naturals(card: Card, hand: &[Card], jokers: Option<&JokerConfig>) -> Vec<u8> {
    let mut ranks: Vec<u8> = hand
        .iter()
        .filter(|other| other.id != card.id && other.suit == card.suit)
        .filter(|other| !is_wild(**other, jokers))
        .map(|other| other.rank.ordinal())
        .collect();
    ranks.sort_unstable();
    ranks
}

/// Sorted, deduplicated ranks of every `suit` card, wild or not, leaving
/// out printed jokers.
pub(crate) fn face_ranks(hand: &[Card], suit: Suit) -> Vec<u8> {
    let mut ranks: Vec<u8> = hand
        .iter()
        .filter(|card| !card.printed_joker && card.suit == suit)
        .map(|card| card.rank.ordinal())
        .collect();
    ranks.sort_unstable();
    ranks.dedup();
    ranks
}
