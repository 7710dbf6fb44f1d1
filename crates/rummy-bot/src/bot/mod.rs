mod discard;
mod memory;
mod params;
mod pick;
mod scoring;

pub use discard::{DiscardChoice, DiscardPlanner, DiscardReason, PartialMelds};
pub use memory::DiscardMemory;
pub use params::BotParams;
pub use pick::{PickAction, PickDecision, PickPlanner, PickReason};
pub use scoring::{card_score, hand_value};

use rummy_core::model::card::Card;
use rummy_core::model::joker::{JokerConfig, count_wild};
use rummy_core::win::{PRE_DISCARD_HAND_SIZE, find_best_discard_for_win};
use tracing::{Level, event};

/// Borrowed view of what every scoring and planning step needs.
#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub jokers: Option<&'a JokerConfig>,
    pub params: &'a BotParams,
}

impl<'a> BotContext<'a> {
    pub fn new(jokers: Option<&'a JokerConfig>, params: &'a BotParams) -> Self {
        Self { jokers, params }
    }
}

/// What the bot did with one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPlan {
    pub action: PickAction,
    pub reason: PickReason,
    /// The card that joined the hand, from the pile or the stock.
    pub acquired: Option<Card>,
    pub discard: Option<Card>,
    /// Whether the 14 cards held before discarding contain a winning hand.
    pub can_declare: bool,
}

/// One computer player. Owns its joker configuration and the short memory of
/// its own discards.
#[derive(Debug, Clone)]
pub struct RummyBot {
    jokers: Option<JokerConfig>,
    params: BotParams,
    memory: DiscardMemory,
}

impl RummyBot {
    pub fn new(jokers: Option<JokerConfig>, params: BotParams) -> Self {
        Self {
            jokers,
            memory: DiscardMemory::new(params.memory_capacity),
            params,
        }
    }

    /// Called when a new deal reveals a different wildcard.
    pub fn set_jokers(&mut self, jokers: Option<JokerConfig>) {
        self.jokers = jokers;
    }

    pub fn jokers(&self) -> Option<&JokerConfig> {
        self.jokers.as_ref()
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }

    pub fn memory(&self) -> &DiscardMemory {
        &self.memory
    }

    pub fn forget_discards(&mut self) {
        self.memory.clear();
    }

    pub fn pick_card(&self, hand: &[Card], discard_top: Option<Card>) -> PickDecision {
        let ctx = self.context();
        let decision = PickPlanner::choose(hand, discard_top, &self.memory, &ctx);
        log_pick_decision(&ctx, hand, discard_top, decision);
        decision
    }

    /// Chooses and remembers a discard. `None` only for an empty hand.
    pub fn discard_card(&mut self, hand: &[Card]) -> Option<Card> {
        self.plan_discard(hand).map(|choice| choice.card)
    }

    /// Like [`RummyBot::discard_card`] but keeps the rule that chose the card.
    pub fn plan_discard(&mut self, hand: &[Card]) -> Option<DiscardChoice> {
        let choice = {
            let ctx = self.context();
            let choice = DiscardPlanner::choose(hand, &ctx)?;
            log_discard_decision(&ctx, hand, choice);
            choice
        };
        self.memory.remember(choice.card.id);
        Some(choice)
    }

    pub fn can_declare(&self, hand: &[Card]) -> bool {
        hand.len() == PRE_DISCARD_HAND_SIZE
            && find_best_discard_for_win(hand, self.jokers.as_ref()).is_some()
    }

    /// Plays a whole turn: pick, acquire a card, discard.
    ///
    /// `draw` is only called when the bot passes on the discard pile. If it
    /// yields nothing the bot discards from the cards it already holds.
    pub fn take_turn<F>(&mut self, hand: &[Card], discard_top: Option<Card>, draw: F) -> TurnPlan
    where
        F: FnOnce() -> Option<Card>,
    {
        let decision = self.pick_card(hand, discard_top);
        let acquired = match decision.action {
            PickAction::TakeDiscard => discard_top,
            PickAction::Draw => draw(),
        };

        let mut held = Vec::with_capacity(hand.len() + 1);
        held.extend_from_slice(hand);
        held.extend(acquired);

        let can_declare = self.can_declare(&held);
        let discard = self.discard_card(&held);
        TurnPlan {
            action: decision.action,
            reason: decision.reason,
            acquired,
            discard,
            can_declare,
        }
    }

    fn context(&self) -> BotContext<'_> {
        BotContext::new(self.jokers.as_ref(), &self.params)
    }
}

fn log_pick_decision(
    ctx: &BotContext<'_>,
    hand: &[Card],
    discard_top: Option<Card>,
    decision: PickDecision,
) {
    if !tracing::enabled!(target: "rummy_bot::pick", Level::INFO) {
        return;
    }

    let top = discard_top
        .map(|card| card.to_string())
        .unwrap_or_else(|| "-".to_string());

    event!(
        target: "rummy_bot::pick",
        Level::INFO,
        hand_size = hand.len(),
        wild_in_hand = count_wild(hand, ctx.jokers),
        discard_top = %top,
        action = decision.action.as_str(),
        reason = decision.reason.as_str(),
    );
}

fn log_discard_decision(ctx: &BotContext<'_>, hand: &[Card], choice: DiscardChoice) {
    if !tracing::enabled!(target: "rummy_bot::discard", Level::INFO) {
        return;
    }

    let hand_preview = hand
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "rummy_bot::discard",
        Level::INFO,
        hand_size = hand.len(),
        wild_in_hand = count_wild(hand, ctx.jokers),
        hand = %hand_preview,
        chosen = %choice.card,
        score = card_score(choice.card, hand, ctx),
        reason = choice.reason.as_str(),
    );
}
