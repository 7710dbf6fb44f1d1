use crate::meld::{Candidate, HandMask, Meld, MeldKind, candidate_melds};
use crate::model::card::{Card, CardId};
use crate::model::joker::JokerConfig;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// A declared hand always holds exactly this many cards.
pub const WINNING_HAND_SIZE: usize = 13;

/// How often (in search nodes) the wall-clock budget is polled. The first
/// node always polls, so an already spent budget stops the search at once.
const BUDGET_POLL_INTERVAL: u32 = 256;

/// Result of a winning-hand search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The hand splits into these melds.
    Winning(Vec<Meld>),
    /// Every arrangement was explored and none satisfies the win conditions.
    NotWinning,
    /// The budget ran out before the search could finish.
    BudgetExceeded,
}

impl SearchOutcome {
    pub fn is_winning(&self) -> bool {
        matches!(self, SearchOutcome::Winning(_))
    }
}

/// Backtracking search for a partition of 13 cards into 3..=5 card melds.
///
/// A partition wins once every card is used, at least one meld is a pure
/// sequence and at least one meld is a sequence. A pure sequence satisfies
/// both requirements on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinningSearch<'a> {
    jokers: Option<&'a JokerConfig>,
    budget: Option<Duration>,
}

impl<'a> WinningSearch<'a> {
    pub fn new(jokers: Option<&'a JokerConfig>) -> Self {
        Self {
            jokers,
            budget: None,
        }
    }

    /// Caps wall-clock time; an expired search reports
    /// [`SearchOutcome::BudgetExceeded`] rather than a verdict.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn run(&self, cards: &[Card]) -> SearchOutcome {
        if cards.len() != WINNING_HAND_SIZE || !distinct_ids(cards) {
            return SearchOutcome::NotWinning;
        }

        let candidates = candidate_melds(cards, self.jokers);
        let mut by_lowest: Vec<Vec<Candidate>> = vec![Vec::new(); cards.len()];
        for candidate in candidates {
            by_lowest[candidate.mask.trailing_zeros() as usize].push(candidate);
        }

        let mut state = SearchState {
            by_lowest,
            full: ((1u32 << cards.len()) - 1) as HandMask,
            dead_ends: HashSet::new(),
            chosen: Vec::new(),
            deadline: self.budget.map(|budget| Instant::now() + budget),
            nodes: 0,
            expired: false,
        };

        if state.extend(0, false, false) {
            let melds = state
                .chosen
                .iter()
                .map(|candidate| candidate.to_meld(cards))
                .collect();
            SearchOutcome::Winning(melds)
        } else if state.expired {
            SearchOutcome::BudgetExceeded
        } else {
            SearchOutcome::NotWinning
        }
    }
}

struct SearchState {
    /// Candidates grouped by their lowest card position.
    by_lowest: Vec<Vec<Candidate>>,
    full: HandMask,
    /// `(used, has_pure, has_sequence)` states already shown to fail.
    dead_ends: HashSet<(HandMask, bool, bool)>,
    chosen: Vec<Candidate>,
    deadline: Option<Instant>,
    nodes: u32,
    expired: bool,
}

impl SearchState {
    fn extend(&mut self, used: HandMask, has_pure: bool, has_sequence: bool) -> bool {
        if used == self.full {
            return has_pure && has_sequence;
        }
        if self.out_of_time() || self.dead_ends.contains(&(used, has_pure, has_sequence)) {
            return false;
        }

        // Some meld must cover the lowest free card, and every card below it
        // is taken, so only melds starting there can be placed.
        let pivot = (!used & self.full).trailing_zeros() as usize;
        for index in 0..self.by_lowest[pivot].len() {
            let candidate = self.by_lowest[pivot][index];
            if candidate.mask & used != 0 {
                continue;
            }
            self.chosen.push(candidate);
            if self.extend(
                used | candidate.mask,
                has_pure || candidate.kind == MeldKind::PureSequence,
                has_sequence || candidate.kind.is_sequence(),
            ) {
                return true;
            }
            self.chosen.pop();
            if self.expired {
                return false;
            }
        }

        self.dead_ends.insert((used, has_pure, has_sequence));
        false
    }

    fn out_of_time(&mut self) -> bool {
        if self.expired {
            return true;
        }
        let Some(deadline) = self.deadline else {
            return false;
        };
        self.nodes = self.nodes.wrapping_add(1);
        let poll = self.nodes == 1 || self.nodes % BUDGET_POLL_INTERVAL == 0;
        if poll && Instant::now() >= deadline {
            self.expired = true;
        }
        self.expired
    }
}

fn distinct_ids(cards: &[Card]) -> bool {
    let mut seen: HashSet<CardId> = HashSet::with_capacity(cards.len());
    cards.iter().all(|card| seen.insert(card.id))
}

/// Whether exactly 13 cards form a declarable hand.
pub fn is_winning_hand(cards: &[Card], jokers: Option<&JokerConfig>) -> bool {
    WinningSearch::new(jokers).run(cards).is_winning()
}

/// The melds the verifier used to accept `cards`, if it accepts them.
pub fn find_winning_partition(cards: &[Card], jokers: Option<&JokerConfig>) -> Option<Vec<Meld>> {
    match WinningSearch::new(jokers).run(cards) {
        SearchOutcome::Winning(melds) => Some(melds),
        SearchOutcome::NotWinning | SearchOutcome::BudgetExceeded => None,
    }
}
