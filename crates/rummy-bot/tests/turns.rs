use rummy_bot::{BotParams, PickAction, RummyBot};
use rummy_core::model::card::{Card, Face};
use rummy_core::model::joker::JokerConfig;
use rummy_core::model::rank::Rank;
use rummy_core::model::suit::Suit;
use rummy_core::win::is_winning_hand;

fn cards(notation: &str) -> Vec<Card> {
    cards_from(notation, 0)
}

fn cards_from(notation: &str, first_id: u16) -> Vec<Card> {
    notation
        .split_whitespace()
        .enumerate()
        .map(|(i, token)| Card::parse_with_id(token, first_id + i as u16).expect("card"))
        .collect()
}

#[test]
fn winning_fourteen_discards_to_a_declarable_hand() {
    // Wild: 8♠, 8♣, 9♥.
    let cfg = JokerConfig::from_wildcard(Face::new(Rank::Eight, Suit::Hearts));
    let mut bot = RummyBot::new(Some(cfg), BotParams::default());
    let hand = cards("A♠ 2♠ 3♠ 4♥ 5♥ 8♠ 7♦ 7♣ 8♣ 9♦ 10♦ J♦ Q♦ K♥");

    assert!(bot.can_declare(&hand));
    let discard = bot.discard_card(&hand).expect("discard");
    let rest: Vec<Card> = hand.iter().copied().filter(|c| c.id != discard.id).collect();
    assert!(is_winning_hand(&rest, Some(&cfg)));
    assert_eq!(discard.face(), Face::new(Rank::King, Suit::Hearts));
}

#[test]
fn wild_discard_is_always_taken() {
    let cfg = JokerConfig::from_wildcard(Face::new(Rank::Eight, Suit::Hearts));
    let mut bot = RummyBot::new(Some(cfg), BotParams::default());
    let hand = cards("A♠ 3♥ 5♦ 7♣ 9♠ J♥ K♦ 2♣ 4♠ 6♥ 8♦ 10♣ Q♠");
    let joker = Card::new(90, Rank::Nine, Suit::Hearts);

    let plan = bot.take_turn(&hand, Some(joker), || None);
    assert_eq!(plan.action, PickAction::TakeDiscard);
    let discard = plan.discard.expect("discard");
    assert_ne!(discard.id, joker.id);
}

#[test]
fn bot_keeps_cycling_without_losing_cards() {
    let mut bot = RummyBot::new(None, BotParams::default());
    let mut hand = cards("A♠ 3♥ 5♦ 7♣ 9♠ J♥ K♦ 2♣ 4♠ 6♥ 8♦ 10♣ Q♠");
    let mut stock = cards_from("2♥ 3♦ 4♣ 5♠ 6♦ 7♥ 8♣ 9♦ 10♥ J♣", 200);
    let mut pile: Option<Card> = None;

    for _ in 0..10 {
        let plan = bot.take_turn(&hand, pile, || stock.pop());
        if plan.action == PickAction::TakeDiscard {
            assert_eq!(plan.acquired, pile);
        }
        hand.extend(plan.acquired);
        let discard = plan.discard.expect("discard");
        hand.retain(|card| card.id != discard.id);
        assert_eq!(hand.len(), 13);
        pile = Some(discard);
    }
}
