use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rummy_core::meld::{is_pure_sequence, is_sequence_with_jokers, is_set};
use rummy_core::model::card::{Card, CardId, Face};
use rummy_core::model::joker::{JokerConfig, is_wild};
use rummy_core::model::rank::Rank;
use rummy_core::model::suit::Suit;
use rummy_core::win::{find_best_discard_for_win, find_winning_partition, is_winning_hand};
use std::collections::HashSet;

const SEED: u64 = 20251019;

fn random_face(rng: &mut StdRng) -> Face {
    let rank = Rank::ORDERED[rng.gen_range(0..13)];
    let suit = Suit::ALL[rng.gen_range(0..4)];
    Face::new(rank, suit)
}

fn shoe(decks: u16) -> Vec<Card> {
    let mut cards = Vec::new();
    let mut id = 0u16;
    for _ in 0..decks {
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                cards.push(Card::new(id, rank, suit));
                id += 1;
            }
        }
    }
    cards
}

/// A four-card pure run plus three sets of three, shuffled.
fn constructed_winner(rng: &mut StdRng, next_id: &mut u16) -> Vec<Card> {
    let mut push = |cards: &mut Vec<Card>, rank: Rank, suit: Suit| {
        cards.push(Card::new(*next_id, rank, suit));
        *next_id += 1;
    };
    let mut cards = Vec::with_capacity(13);
    let suit = Suit::ALL[rng.gen_range(0..4)];
    let start = rng.gen_range(0..=9u8);
    for ordinal in start..start + 4 {
        let rank = Rank::from_ordinal(ordinal).expect("ordinal in range");
        push(&mut cards, rank, suit);
    }
    for _ in 0..3 {
        let rank = Rank::ORDERED[rng.gen_range(0..13)];
        for _ in 0..3 {
            push(&mut cards, rank, Suit::ALL[rng.gen_range(0..4)]);
        }
    }
    cards.shuffle(rng);
    cards
}

#[test]
fn wildcard_is_never_wild() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..200 {
        let face = random_face(&mut rng);
        let cfg = JokerConfig::from_wildcard(face);
        let card = Card::new(rng.r#gen(), face.rank, face.suit);
        assert!(!is_wild(card, Some(&cfg)));
        assert!(is_wild(
            Card::printed_joker(card.id.0, face.rank, face.suit),
            Some(&cfg)
        ));
    }
}

#[test]
fn wild_classification_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let cards = shoe(2);
    for _ in 0..20 {
        let cfg = JokerConfig::from_wildcard(random_face(&mut rng));
        let first: Vec<bool> = cards.iter().map(|c| is_wild(*c, Some(&cfg))).collect();
        let second: Vec<bool> = cards
            .iter()
            .rev()
            .map(|c| is_wild(*c, Some(&cfg)))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        assert_eq!(first, second);
        // Two decks hold two copies of each of the three joker faces.
        assert_eq!(first.iter().filter(|wild| **wild).count(), 6);
    }
}

#[test]
fn winning_partitions_cover_every_card_once() {
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    let mut next_id = 0u16;
    for _ in 0..30 {
        let cards = constructed_winner(&mut rng, &mut next_id);
        assert!(is_winning_hand(&cards, None));
        let melds = find_winning_partition(&cards, None).expect("partition");

        let mut seen: HashSet<CardId> = HashSet::new();
        for meld in &melds {
            assert!((3..=5).contains(&meld.cards.len()));
            for card in &meld.cards {
                assert!(seen.insert(card.id), "card {card} used twice");
            }
        }
        let expected: HashSet<CardId> = cards.iter().map(|c| c.id).collect();
        assert_eq!(seen, expected);
    }
}

#[test]
fn best_discard_leaves_a_winning_hand() {
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    let mut next_id = 0u16;
    for _ in 0..20 {
        let mut cards = constructed_winner(&mut rng, &mut next_id);
        let extra = random_face(&mut rng);
        cards.push(Card::new(next_id, extra.rank, extra.suit));
        next_id += 1;
        cards.shuffle(&mut rng);

        let discard = find_best_discard_for_win(&cards, None).expect("some discard wins");
        let rest: Vec<Card> = cards.iter().copied().filter(|c| c.id != discard.id).collect();
        assert!(is_winning_hand(&rest, None));
    }
}

#[test]
fn best_discard_is_sound_on_dealt_hands() {
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    let mut deck = shoe(2);
    for _ in 0..25 {
        deck.shuffle(&mut rng);
        let cfg = JokerConfig::from_wildcard(random_face(&mut rng));
        let hand = &deck[..14];
        if let Some(discard) = find_best_discard_for_win(hand, Some(&cfg)) {
            let rest: Vec<Card> = hand.iter().copied().filter(|c| c.id != discard.id).collect();
            assert!(is_winning_hand(&rest, Some(&cfg)));
        }
    }
}

#[test]
fn validators_ignore_card_order() {
    let mut rng = StdRng::seed_from_u64(SEED + 5);
    let deck = shoe(1);
    for _ in 0..300 {
        let cfg = JokerConfig::from_wildcard(random_face(&mut rng));
        let size = rng.gen_range(3..=5);
        let mut group: Vec<Card> = deck.choose_multiple(&mut rng, size).copied().collect();
        let verdicts = (
            is_pure_sequence(&group, Some(&cfg)),
            is_sequence_with_jokers(&group, Some(&cfg)),
            is_set(&group, Some(&cfg)),
        );
        group.shuffle(&mut rng);
        assert_eq!(
            verdicts,
            (
                is_pure_sequence(&group, Some(&cfg)),
                is_sequence_with_jokers(&group, Some(&cfg)),
                is_set(&group, Some(&cfg)),
            )
        );
    }
}
