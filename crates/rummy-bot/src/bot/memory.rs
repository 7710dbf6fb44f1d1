use rummy_core::model::card::CardId;
use std::collections::VecDeque;

/// The bot's most recent discards, oldest first.
///
/// Remembering a card already present keeps its original position.
#[derive(Debug, Clone)]
pub struct DiscardMemory {
    recent: VecDeque<CardId>,
    capacity: usize,
}

impl DiscardMemory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn remember(&mut self, id: CardId) {
        if self.contains(id) {
            return;
        }
        self.recent.push_back(id);
        while self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.recent.contains(&id)
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.recent.iter().copied()
    }
}
