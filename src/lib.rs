//! # Fadu
//!
//! A pass-and-play card game implemented as a type-safe finite state
//! machine (FSM).
//!
//! Two to eight players share one device, draw from and discard to
//! shared piles, and accumulate scores across a fixed number of rounds.
//! A round ends when a player empties their hand (worth points) or
//! calls the lowest hand sum (worth points if right, a penalty if
//! wrong); the winner of a round opens the next one.
//!
//! ## Architecture
//!
//! The game lifecycle has four phases, each a distinct state:
//!
//! - **Setup**: configuring players and rounds
//! - **PlayerTurn**: the acting player selects, draws, plays, or calls
//! - **RoundEnd**: a finished round awaits acknowledgement
//! - **GameEnd**: final standings; only reset leaves this state
//!
//! Every action is validated against the turn rules before any state is
//! touched; rejections carry a reason code and leave the game exactly as
//! it was. The host platform plugs in through two collaborator traits:
//! a key-value [`Storage`](persistence::Storage) for resumable games and
//! a [`FeedbackSink`](feedback::FeedbackSink) for haptic-style cues.
//!
//! ## Core Modules
//!
//! - [`game`]: entities, rule validation, and the turn state machine
//! - [`session`]: a running game bound to its host collaborators
//! - [`persistence`]: the storage collaborator and state codec
//! - [`feedback`]: the feedback collaborator
//!
//! ## Example
//!
//! ```
//! use fadu::{FaduState, GameSettings, StateManagement};
//!
//! let mut game = FaduState::new(GameSettings::with_player_count(3, 5));
//! game.start_game().unwrap();
//! let card = game.draw().unwrap();
//! println!("drew {card}, table shows {:?}", game.snapshot().table_card);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    ActionError, ActionResult, CallOutcome, FaduState, GameEvent, GameSettings, PlayOutcome,
    SelectionOutcome, StateManagement,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
    entities::{self, Card, GameSnapshot, Phase, PlayerId, Rank, Suit},
    functional, rules,
};

/// Session orchestration for presentation layers.
pub mod session;
pub use session::GameSession;

/// Persistence collaborator interface and state codec.
pub mod persistence;
pub use persistence::{MemoryStorage, Storage};

/// Feedback collaborator interface.
pub mod feedback;
pub use feedback::{FeedbackIntent, FeedbackSink, NullFeedback};
