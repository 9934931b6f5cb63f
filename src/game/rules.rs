//! Turn rule validation.
//!
//! Pure functions over borrowed state: the acting player's hand, the
//! table card, and the turn context. The controller consults these
//! before every mutation; a rejection leaves all game state unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::entities::Card;
use super::functional::has_rank_match;

/// Reasons an action can be rejected. Every rejection is recoverable;
/// the message is the user-facing explanation.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ActionError {
    #[error("you've already drawn a card this turn")]
    AlreadyDrawn,
    #[error("you can only call at the start of your turn, before drawing")]
    CallAfterDrawForbidden,
    #[error("the deck is empty; you must play a card or call")]
    DeckExhausted,
    #[error("no cards selected")]
    EmptySelection,
    #[error("game already in progress")]
    GameAlreadyStarted,
    #[error("card {0} is not in your hand")]
    InvalidCardIndex(usize),
    #[error("you can only select multiple cards with the same value")]
    MixedValues,
    #[error("when playing multiple cards, they must match the value of the table card")]
    MultiMustMatchTable,
    #[error("you must draw a card first")]
    MustDrawFirst,
    #[error("you have cards matching the table card; play one of those or draw first")]
    MustPlayMatchingOrDraw,
    #[error("need 2+ players")]
    NotEnoughPlayers,
    #[error("need 1+ rounds")]
    NotEnoughRounds,
    #[error("no turn in progress")]
    NoTurnInProgress,
    #[error("the round is still in progress")]
    RoundNotEnded,
    #[error("at most 8 players")]
    TooManyPlayers,
}

/// Result type for validated game actions.
pub type ActionResult<T> = Result<T, ActionError>;

/// What a legal selection request does to the selection set.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SelectionOutcome {
    Selected,
    Deselected,
}

/// Decide whether toggling `candidate` into the selection is legal.
///
/// Toggling an already-selected card off is always legal. Selecting the
/// first card applies the draw gate: the round's first player must draw
/// before anything else, and a player who has not drawn may only start a
/// selection with a card matching the table card, and only if they hold
/// one. Additional cards must share the first selected card's value and,
/// when a table card exists, match it.
pub fn validate_selection(
    selection: &BTreeSet<usize>,
    candidate: usize,
    hand: &[Card],
    table_card: Option<Card>,
    has_drawn: bool,
    first_of_round: bool,
) -> ActionResult<SelectionOutcome> {
    if selection.contains(&candidate) {
        return Ok(SelectionOutcome::Deselected);
    }

    let candidate_card = *hand
        .get(candidate)
        .ok_or(ActionError::InvalidCardIndex(candidate))?;

    match first_selected(selection, hand)? {
        None => {
            check_draw_gate(candidate_card, hand, table_card, has_drawn, first_of_round)?;
        }
        Some(first_card) => {
            if candidate_card.value() != first_card.value() {
                return Err(ActionError::MixedValues);
            }
            if let Some(table) = table_card {
                if first_card.value() != table.value() {
                    return Err(ActionError::MultiMustMatchTable);
                }
            }
        }
    }

    Ok(SelectionOutcome::Selected)
}

/// Decide whether playing the current selection is legal.
///
/// Re-applies the draw gate and the multi-card checks at play time, with
/// the lowest-index selected card as representative. Selection state can
/// go stale relative to hand mutations, so validation at selection time
/// is not trusted here.
pub fn validate_play(
    selection: &BTreeSet<usize>,
    hand: &[Card],
    table_card: Option<Card>,
    has_drawn: bool,
    first_of_round: bool,
) -> ActionResult<()> {
    let Some(first_card) = first_selected(selection, hand)? else {
        return Err(ActionError::EmptySelection);
    };

    check_draw_gate(first_card, hand, table_card, has_drawn, first_of_round)?;

    for &index in selection {
        let card = *hand
            .get(index)
            .ok_or(ActionError::InvalidCardIndex(index))?;
        if card.value() != first_card.value() {
            return Err(ActionError::MixedValues);
        }
    }

    if selection.len() > 1 {
        if let Some(table) = table_card {
            if first_card.value() != table.value() {
                return Err(ActionError::MultiMustMatchTable);
            }
        }
    }

    Ok(())
}

/// Calling is only legal before drawing, and never for the round's
/// first player until they have drawn; drawing then forecloses the
/// call, so the opener can never call.
pub fn validate_call(has_drawn: bool, first_of_round: bool) -> ActionResult<()> {
    if first_of_round && !has_drawn {
        return Err(ActionError::MustDrawFirst);
    }
    if has_drawn {
        return Err(ActionError::CallAfterDrawForbidden);
    }
    Ok(())
}

/// The lowest-index selected card, or `None` for an empty selection.
fn first_selected(selection: &BTreeSet<usize>, hand: &[Card]) -> ActionResult<Option<Card>> {
    match selection.first() {
        Some(&index) => {
            let card = *hand
                .get(index)
                .ok_or(ActionError::InvalidCardIndex(index))?;
            Ok(Some(card))
        }
        None => Ok(None),
    }
}

/// The draw gate shared by first-card selection and play: first player
/// of the round draws before anything else; before drawing, a player
/// holding a match for the table card may only act on a matching card,
/// and a player holding none must draw.
fn check_draw_gate(
    acted_card: Card,
    hand: &[Card],
    table_card: Option<Card>,
    has_drawn: bool,
    first_of_round: bool,
) -> ActionResult<()> {
    if has_drawn {
        return Ok(());
    }
    if first_of_round {
        return Err(ActionError::MustDrawFirst);
    }
    if has_rank_match(hand, table_card) {
        // table_card is Some whenever has_rank_match holds.
        if table_card.is_some_and(|table| acted_card.value() != table.value()) {
            return Err(ActionError::MustPlayMatchingOrDraw);
        }
        Ok(())
    } else {
        Err(ActionError::MustDrawFirst)
    }
}
