mod arrange;
mod discard;
mod verifier;

pub use arrange::{ArrangedGroup, GroupKind, arrange_winning_hand};
pub use discard::{PRE_DISCARD_HAND_SIZE, find_best_discard_for_win};
pub use verifier::{
    SearchOutcome, WINNING_HAND_SIZE, WinningSearch, find_winning_partition, is_winning_hand,
};
