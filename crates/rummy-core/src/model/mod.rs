pub mod card;
pub mod joker;
pub mod rank;
pub mod suit;
