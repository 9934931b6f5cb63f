//! Game state definitions for the turn state machine.
//!
//! Each state represents a phase of the game lifecycle; phase-specific
//! context lives in the state struct, so illegal flag combinations
//! (e.g. "drawn" surviving into the next player's turn) are
//! unrepresentable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::game::entities::PlayerId;

/// Pre-start configuration: players and round count can still change.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Setup {}

/// A player holds the device and is taking their turn.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerTurn {
    /// Whether the acting player has drawn this turn.
    pub has_drawn: bool,
    /// Whether the acting player opened the round. Only the opener is
    /// forced to draw before any other action.
    pub first_of_round: bool,
    /// Hand indices staged for the next play. Cleared structurally on
    /// every turn change.
    pub selected: BTreeSet<usize>,
}

impl PlayerTurn {
    /// Turn context for the player opening a round.
    #[must_use]
    pub fn opening() -> Self {
        Self {
            has_drawn: false,
            first_of_round: true,
            selected: BTreeSet::new(),
        }
    }

    /// Turn context after a turn advance within a round.
    #[must_use]
    pub fn following() -> Self {
        Self {
            has_drawn: false,
            first_of_round: false,
            selected: BTreeSet::new(),
        }
    }
}

/// A round has ended and awaits acknowledgement before the next round
/// (or the final results) are shown.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundEnd {
    /// The player who ended the round: emptied their hand or called.
    pub winner: PlayerId,
    /// Whether this was the last configured round. Recorded here because
    /// the round counter has already advanced for non-final rounds.
    pub final_round: bool,
}

/// Terminal state: all rounds played, winners computed. Only reset
/// leaves this state.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameEnd {
    /// Every player tied at the maximum score.
    pub winners: Vec<PlayerId>,
}
