pub mod bot;

pub use bot::{
    BotContext, BotParams, DiscardChoice, DiscardMemory, DiscardPlanner, DiscardReason,
    PartialMelds, PickAction, PickDecision, PickPlanner, PickReason, RummyBot, TurnPlan,
};
