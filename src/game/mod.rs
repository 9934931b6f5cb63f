//! Core game logic: entities, rule validation, and the turn state
//! machine.

pub mod constants;
pub mod entities;
pub mod functional;
pub mod rules;
pub mod state_machine;
pub mod states;

pub use rules::{ActionError, ActionResult, SelectionOutcome};
pub use state_machine::{
    CallOutcome, FaduState, Game, GameData, GameEvent, GameSettings, PlayOutcome,
    StateManagement,
};
