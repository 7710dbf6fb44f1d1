use super::BotContext;
use super::memory::DiscardMemory;
use super::scoring::{face_ranks, hand_value, same_rank_count};
use rummy_core::meld::run_segments;
use rummy_core::model::card::Card;
use rummy_core::model::joker::is_wild;
use rummy_core::win::{PRE_DISCARD_HAND_SIZE, find_best_discard_for_win};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickAction {
    Draw,
    TakeDiscard,
}

impl PickAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            PickAction::Draw => "draw",
            PickAction::TakeDiscard => "take_discard",
        }
    }
}

/// Which rule settled a pick, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickReason {
    NoDiscardTop,
    RecentlyDiscarded,
    IsWildcard,
    WildCard,
    ImmediateWin,
    CompletesSet,
    CompletesRun,
    FormsSequence,
    ImprovesHand,
    NoImprovement,
}

impl PickReason {
    pub const fn action(self) -> PickAction {
        match self {
            PickReason::NoDiscardTop
            | PickReason::RecentlyDiscarded
            | PickReason::IsWildcard
            | PickReason::NoImprovement => PickAction::Draw,
            PickReason::WildCard
            | PickReason::ImmediateWin
            | PickReason::CompletesSet
            | PickReason::CompletesRun
            | PickReason::FormsSequence
            | PickReason::ImprovesHand => PickAction::TakeDiscard,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PickReason::NoDiscardTop => "no_discard_top",
            PickReason::RecentlyDiscarded => "recently_discarded",
            PickReason::IsWildcard => "is_wildcard",
            PickReason::WildCard => "wild_card",
            PickReason::ImmediateWin => "immediate_win",
            PickReason::CompletesSet => "completes_set",
            PickReason::CompletesRun => "completes_run",
            PickReason::FormsSequence => "forms_sequence",
            PickReason::ImprovesHand => "improves_hand",
            PickReason::NoImprovement => "no_improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickDecision {
    pub action: PickAction,
    pub reason: PickReason,
}

impl From<PickReason> for PickDecision {
    fn from(reason: PickReason) -> Self {
        Self {
            action: reason.action(),
            reason,
        }
    }
}

pub struct PickPlanner;

impl PickPlanner {
    /// Decides between drawing and taking `discard_top`. Rules are checked in
    /// order and the first match wins.
    pub fn choose(
        hand: &[Card],
        discard_top: Option<Card>,
        memory: &DiscardMemory,
        ctx: &BotContext<'_>,
    ) -> PickDecision {
        Self::reason(hand, discard_top, memory, ctx).into()
    }

    fn reason(
        hand: &[Card],
        discard_top: Option<Card>,
        memory: &DiscardMemory,
        ctx: &BotContext<'_>,
    ) -> PickReason {
        let Some(top) = discard_top else {
            return PickReason::NoDiscardTop;
        };
        if memory.contains(top.id) {
            return PickReason::RecentlyDiscarded;
        }
        if ctx.jokers.is_some_and(|config| config.is_wildcard(top)) {
            return PickReason::IsWildcard;
        }
        if is_wild(top, ctx.jokers) {
            return PickReason::WildCard;
        }

        let mut with_top = Vec::with_capacity(hand.len() + 1);
        with_top.extend_from_slice(hand);
        with_top.push(top);

        if with_top.len() == PRE_DISCARD_HAND_SIZE
            && find_best_discard_for_win(&with_top, ctx.jokers).is_some()
        {
            return PickReason::ImmediateWin;
        }
        if same_rank_count(top.rank, hand) == 2 {
            return PickReason::CompletesSet;
        }
        if completes_run(top, hand) {
            return PickReason::CompletesRun;
        }
        if forms_sequence(top, hand) {
            return PickReason::FormsSequence;
        }

        let improvement = hand_value(&with_top, ctx) - hand_value(hand, ctx);
        if improvement >= ctx.params.take_threshold {
            PickReason::ImprovesHand
        } else {
            PickReason::NoImprovement
        }
    }
}

/// `card` sits in a one-rank gap between two cards of its suit, or extends
/// the suit's only two cards when they are adjacent.
fn completes_run(card: Card, hand: &[Card]) -> bool {
    let mut ranks: Vec<u8> = hand
        .iter()
        .filter(|other| !other.printed_joker && other.suit == card.suit)
        .map(|other| other.rank.ordinal())
        .collect();
    if ranks.len() < 2 {
        return false;
    }
    ranks.sort_unstable();

    let target = card.rank.ordinal();
    if ranks
        .windows(2)
        .any(|pair| pair[0] + 1 == target && target + 1 == pair[1])
    {
        return true;
    }
    ranks.len() == 2
        && ranks[1] == ranks[0] + 1
        && (target + 1 == ranks[0] || target == ranks[1] + 1)
}

/// With `card` added, some run of its suit spans three or more ranks. The
/// run need not contain `card`.
fn forms_sequence(card: Card, hand: &[Card]) -> bool {
    let mut ranks = face_ranks(hand, card.suit);
    let target = card.rank.ordinal();
    if let Err(slot) = ranks.binary_search(&target) {
        ranks.insert(slot, target);
    }
    run_segments(&ranks)
        .into_iter()
        .any(|(start, end)| end - start + 1 >= 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotParams;
    use rummy_core::model::card::Face;
    use rummy_core::model::joker::JokerConfig;
    use rummy_core::model::rank::Rank;
    use rummy_core::model::suit::Suit;

    fn cards(notation: &str, first_id: u16) -> Vec<Card> {
        notation
            .split_whitespace()
            .enumerate()
            .map(|(i, token)| Card::parse_with_id(token, first_id + i as u16).expect("card"))
            .collect()
    }

    fn top(notation: &str) -> Option<Card> {
        Some(Card::parse_with_id(notation, 100).expect("card"))
    }

    fn decide(hand: &[Card], discard: Option<Card>, jokers: Option<&JokerConfig>) -> PickReason {
        let params = BotParams::default();
        let ctx = BotContext::new(jokers, &params);
        let memory = DiscardMemory::new(params.memory_capacity);
        PickPlanner::choose(hand, discard, &memory, &ctx).reason
    }

    const SCATTERED: &str = "A♠ 3♥ 5♦ 7♣ 9♠ J♥ K♦ 2♣ 4♠ 6♥ 8♦ 10♣ Q♠";

    #[test]
    fn empty_pile_means_draw() {
        let hand = cards(SCATTERED, 0);
        assert_eq!(decide(&hand, None, None), PickReason::NoDiscardTop);
    }

    #[test]
    fn remembered_cards_are_left_alone() {
        let params = BotParams::default();
        let ctx = BotContext::new(None, &params);
        let hand = cards(SCATTERED, 0);
        let discard = Card::parse_with_id("9♥", 100).expect("card");
        let mut memory = DiscardMemory::new(3);
        memory.remember(discard.id);
        let decision = PickPlanner::choose(&hand, Some(discard), &memory, &ctx);
        assert_eq!(decision.reason, PickReason::RecentlyDiscarded);
        assert_eq!(decision.action, PickAction::Draw);
    }

    #[test]
    fn wildcard_is_refused_but_jokers_are_taken() {
        let cfg = JokerConfig::from_wildcard(Face::new(Rank::Five, Suit::Hearts));
        let hand = cards(SCATTERED, 0);
        assert_eq!(decide(&hand, top("5♥"), Some(&cfg)), PickReason::IsWildcard);
        assert_eq!(decide(&hand, top("5♣"), Some(&cfg)), PickReason::WildCard);
        assert_eq!(decide(&hand, top("6♥"), Some(&cfg)), PickReason::WildCard);
        assert_eq!(decide(&hand, top("2♦*"), None), PickReason::WildCard);
    }

    #[test]
    fn printed_joker_with_the_wildcard_face_is_still_taken() {
        let cfg = JokerConfig::from_wildcard(Face::new(Rank::Ace, Suit::Hearts));
        let hand = cards(SCATTERED, 0);
        let joker = Some(Card::printed_joker(99, Rank::Ace, Suit::Hearts));
        assert_eq!(decide(&hand, joker, Some(&cfg)), PickReason::WildCard);
        assert_eq!(decide(&hand, top("A♥"), Some(&cfg)), PickReason::IsWildcard);
    }

    #[test]
    fn printed_joker_face_does_not_pair_with_naturals() {
        let hand = vec![
            Card::new(0, Rank::Nine, Suit::Spades),
            Card::printed_joker(1, Rank::Nine, Suit::Hearts),
            Card::new(2, Rank::King, Suit::Clubs),
        ];
        assert_ne!(decide(&hand, top("9♦"), None), PickReason::CompletesSet);

        let links = vec![
            Card::new(0, Rank::Four, Suit::Diamonds),
            Card::printed_joker(1, Rank::Five, Suit::Diamonds),
            Card::new(2, Rank::King, Suit::Clubs),
        ];
        assert_ne!(decide(&links, top("6♦"), None), PickReason::CompletesRun);
    }

    #[test]
    fn winning_card_is_taken() {
        let hand = cards("A♠ 2♠ 3♠ 4♥ 4♦ 4♣ K♠ K♥ K♦ 7♠ 7♥ 7♦ 9♣", 0);
        assert_eq!(decide(&hand, top("7♣"), None), PickReason::ImmediateWin);
    }

    #[test]
    fn third_card_of_a_rank_completes_a_set() {
        let hand = cards("9♠ 9♥ 2♦ 5♣", 0);
        assert_eq!(decide(&hand, top("9♦"), None), PickReason::CompletesSet);
    }

    #[test]
    fn gap_fill_and_pair_extension_complete_runs() {
        let gap = cards("4♦ 6♦ K♣", 0);
        assert_eq!(decide(&gap, top("5♦"), None), PickReason::CompletesRun);

        let pair = cards("4♦ 5♦ K♣", 0);
        assert_eq!(decide(&pair, top("3♦"), None), PickReason::CompletesRun);
        assert_eq!(decide(&pair, top("6♦"), None), PickReason::CompletesRun);
    }

    #[test]
    fn extending_a_longer_run_forms_a_sequence() {
        let hand = cards("4♦ 5♦ 6♦ 9♦ K♣", 0);
        assert_eq!(decide(&hand, top("7♦"), None), PickReason::FormsSequence);
    }

    #[test]
    fn any_run_of_the_suit_makes_a_card_a_sequence_take() {
        let hand = cards("4♦ 5♦ 6♦ 9♣ K♣", 0);
        assert_eq!(decide(&hand, top("J♦"), None), PickReason::FormsSequence);

        let no_run = cards("4♦ 5♦ 9♣ K♣", 0);
        assert_ne!(decide(&no_run, top("J♦"), None), PickReason::FormsSequence);
    }

    #[test]
    fn pairing_up_a_stray_clears_the_take_threshold() {
        // 9♠ stops being isolated: -545 becomes 115, and 9♥ adds 115.
        let hand = cards("9♠ 2♦ 5♣ K♥", 0);
        assert_eq!(decide(&hand, top("9♥"), None), PickReason::ImprovesHand);
    }

    #[test]
    fn take_threshold_is_inclusive() {
        let hand = cards("9♠ 2♦ 5♣ K♥", 0);
        let discard = Card::parse_with_id("9♥", 100).expect("card");
        let memory = DiscardMemory::new(3);

        let defaults = BotParams::default();
        let ctx = BotContext::new(None, &defaults);
        let mut with_top = hand.clone();
        with_top.push(discard);
        let improvement = hand_value(&with_top, &ctx) - hand_value(&hand, &ctx);
        assert_eq!(improvement, 775);

        let at = BotParams {
            take_threshold: improvement,
            ..BotParams::default()
        };
        let ctx = BotContext::new(None, &at);
        let decision = PickPlanner::choose(&hand, Some(discard), &memory, &ctx);
        assert_eq!(decision.reason, PickReason::ImprovesHand);
        assert_eq!(decision.action, PickAction::TakeDiscard);

        let above = BotParams {
            take_threshold: improvement + 1,
            ..BotParams::default()
        };
        let ctx = BotContext::new(None, &above);
        let decision = PickPlanner::choose(&hand, Some(discard), &memory, &ctx);
        assert_eq!(decision.reason, PickReason::NoImprovement);
        assert_eq!(decision.action, PickAction::Draw);
    }

    #[test]
    fn isolated_card_is_drawn_past() {
        let hand = cards("A♠ 3♥ 5♦ 7♣ 9♠ J♥ K♦", 0);
        assert_eq!(decide(&hand, top("Q♣"), None), PickReason::NoImprovement);
    }
}
