/// Tunable weights for card scoring and the pick/discard thresholds.
///
/// Scores are additive: higher means the bot wants to keep the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotParams {
    // === Card scoring ===
    /// Flat score for any wild card (default: 1000)
    pub wild_card: i32,

    /// Member of a natural same-suit run of three or more (default: 800)
    pub pure_run_member: i32,

    /// Member of a run that the hand's wild cards can complete (default: 400)
    pub joker_sequence_member: i32,

    /// Extending a natural run to three cards (default: 150)
    pub extends_to_three: i32,

    /// Extending a natural run to four cards (default: 300)
    pub extends_to_four: i32,

    /// Extending a natural run to five or more cards (default: 500)
    pub extends_to_five: i32,

    /// Filling a one-rank gap between two natural cards (default: 200)
    pub gap_fill: i32,

    /// Three or more cards of the rank in hand (default: 200)
    pub same_rank_three: i32,

    /// Exactly two cards of the rank in hand (default: 100)
    pub same_rank_pair: i32,

    /// Only card of its rank (default: 5)
    pub same_rank_single: i32,

    /// Gaps around the card can be bridged by wild cards (default: 75)
    pub joker_sequence_potential: i32,

    /// No realistic partner card (default: -300)
    pub isolated_penalty: i32,

    /// Extra penalty for an isolated Ace or King (default: -50)
    pub isolated_edge_penalty: i32,

    /// No run, set, or wild-card potential at all (default: -250)
    pub no_potential_penalty: i32,

    /// Ranks 3 through J that still have partners (default: 15)
    pub middle_rank_bonus: i32,

    // === Hand evaluation ===
    /// Per potential meld when valuing a whole hand (default: 100)
    pub meld_bonus: i32,

    /// Per natural run of three or more (default: 200)
    pub pure_sequence_bonus: i32,

    // === Decisions ===
    /// Hand value gain needed to take a discard on its merits (default: 50)
    pub take_threshold: i32,

    /// How many of its own discards the bot refuses to take back (default: 3)
    pub memory_capacity: usize,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            wild_card: 1000,
            pure_run_member: 800,
            joker_sequence_member: 400,
            extends_to_three: 150,
            extends_to_four: 300,
            extends_to_five: 500,
            gap_fill: 200,
            same_rank_three: 200,
            same_rank_pair: 100,
            same_rank_single: 5,
            joker_sequence_potential: 75,
            isolated_penalty: -300,
            isolated_edge_penalty: -50,
            no_potential_penalty: -250,
            middle_rank_bonus: 15,
            meld_bonus: 100,
            pure_sequence_bonus: 200,
            take_threshold: 50,
            memory_capacity: 3,
        }
    }
}

impl BotParams {
    /// Defaults with `RUMMY_BOT_TAKE_THRESHOLD` and `RUMMY_BOT_MEMORY`
    /// applied. Unparseable or out-of-range values are ignored.
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let take_threshold = read("RUMMY_BOT_TAKE_THRESHOLD")
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .unwrap_or(defaults.take_threshold);

        let memory_capacity = read("RUMMY_BOT_MEMORY")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| (1..=16).contains(value))
            .unwrap_or(defaults.memory_capacity);

        Self {
            take_threshold,
            memory_capacity,
            ..defaults
        }
    }

    /// Run-extension score for a natural run that reaches `length` cards.
    pub(crate) fn extension_value(&self, length: usize) -> i32 {
        match length {
            0..=2 => 0,
            3 => self.extends_to_three,
            4 => self.extends_to_four,
            _ => self.extends_to_five,
        }
    }
}
