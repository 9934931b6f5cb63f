//! Game constants.

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Cards dealt to each player at the start of a round.
pub const HAND_SIZE: usize = 5;

/// When the deck drops below this many cards, the discard pile is
/// reshuffled back into it before the next draw.
pub const DECK_REFILL_THRESHOLD: usize = 5;

/// Minimum number of players sharing the device.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players sharing the device.
pub const MAX_PLAYERS: usize = 8;

pub const DEFAULT_PLAYERS: usize = 2;
pub const DEFAULT_ROUNDS: u32 = 5;

/// Points awarded for emptying a hand.
pub const EMPTY_HAND_SCORE: i32 = 4;

/// Points awarded for a successful call.
pub const CALL_SUCCESS_SCORE: i32 = 3;

/// Points deducted from the caller when a call fails.
pub const CALL_PENALTY: i32 = 2;

/// Points awarded to each non-caller tied at the minimum sum when a
/// call fails.
pub const CONTENDER_SCORE: i32 = 1;

/// Key under which the serialized game state is stored.
pub const SAVED_STATE_KEY: &str = "faduGameState";
