//! Session orchestration: the presentation layer's entry point.
//!
//! A [`GameSession`] owns the state machine and the two host
//! collaborators. Every verb runs the core transition first; feedback
//! and persistence are side effects of an already-committed result and
//! can never roll it back.

use log::{info, warn};
use std::collections::VecDeque;

use crate::feedback::{FeedbackIntent, FeedbackSink};
use crate::game::{
    ActionResult, CallOutcome, FaduState, GameEvent, GameSettings, PlayOutcome,
    SelectionOutcome, StateManagement, constants::SAVED_STATE_KEY,
    entities::{Card, GameSnapshot, Phase},
};
use crate::persistence::{Storage, decode_state, encode_state};

/// A running pass-and-play game bound to its host collaborators.
pub struct GameSession<S, F> {
    state: FaduState,
    storage: S,
    feedback: F,
    restored: bool,
    last_save_error: Option<String>,
}

impl<S: Storage, F: FeedbackSink> GameSession<S, F> {
    /// Build a session, resuming a saved game if the store holds one.
    /// A corrupt or unreadable save is logged and ignored.
    pub fn new(storage: S, feedback: F) -> Self {
        let mut restored = false;
        let state = match storage.get(SAVED_STATE_KEY) {
            Ok(Some(bytes)) => match decode_state(&bytes) {
                Ok(state) => {
                    info!("resumed saved game in phase: {}", state.phase());
                    restored = true;
                    state
                }
                Err(err) => {
                    warn!("ignoring unreadable saved game: {err:#}");
                    FaduState::default()
                }
            },
            Ok(None) => FaduState::default(),
            Err(err) => {
                warn!("saved game lookup failed: {err:#}");
                FaduState::default()
            }
        };
        Self {
            state,
            storage,
            feedback,
            restored,
            last_save_error: None,
        }
    }

    /// Whether this session picked up a previously saved game. The host
    /// should offer "resume or start new" when this is set.
    #[must_use]
    pub fn was_restored(&self) -> bool {
        self.restored
    }

    /// Decline the restored game: clear the save and return to setup.
    pub fn discard_saved_game(&mut self) {
        self.restored = false;
        self.state.reset();
        self.clear_saved();
        self.feedback.signal(FeedbackIntent::Medium);
    }

    #[must_use]
    pub fn state(&self) -> &FaduState {
        &self.state
    }

    /// Direct access to the state machine, for hosts that need to drive
    /// it beyond the session verbs. Changes are not auto-persisted.
    pub fn state_mut(&mut self) -> &mut FaduState {
        &mut self.state
    }

    /// The storage collaborator this session saves through.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        self.state.drain_events()
    }

    /// The most recent save failure, if the last save did not commit.
    /// The in-memory game stays authoritative regardless.
    #[must_use]
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Replace the pending settings while still in setup.
    pub fn configure(&mut self, settings: GameSettings) -> ActionResult<()> {
        self.state.configure(settings)
    }

    /// Start the configured game and persist the opening deal.
    pub fn start_game(&mut self) -> ActionResult<()> {
        let result = self.state.start_game();
        match &result {
            Ok(()) => {
                self.restored = false;
                self.feedback.signal(FeedbackIntent::Medium);
                self.persist();
            }
            Err(_) => self.feedback.signal(FeedbackIntent::Warning),
        }
        result
    }

    /// Toggle a hand card in or out of the selection. Selection is not
    /// a save point.
    pub fn select_card(&mut self, index: usize) -> ActionResult<SelectionOutcome> {
        let result = self.state.select_card(index);
        let intent = match &result {
            Ok(SelectionOutcome::Selected) => FeedbackIntent::Medium,
            Ok(SelectionOutcome::Deselected) => FeedbackIntent::Light,
            Err(_) => FeedbackIntent::Warning,
        };
        self.feedback.signal(intent);
        result
    }

    pub fn draw(&mut self) -> ActionResult<Card> {
        let result = self.state.draw();
        match &result {
            Ok(_) => {
                self.feedback.signal(FeedbackIntent::Medium);
                self.persist();
            }
            Err(_) => self.feedback.signal(FeedbackIntent::Warning),
        }
        result
    }

    pub fn play(&mut self) -> ActionResult<PlayOutcome> {
        let result = self.state.play();
        match &result {
            Ok(_) => {
                self.feedback.signal(FeedbackIntent::Success);
                self.persist();
            }
            Err(_) => self.feedback.signal(FeedbackIntent::Warning),
        }
        result
    }

    pub fn call(&mut self) -> ActionResult<CallOutcome> {
        let result = self.state.call();
        match &result {
            Ok(outcome) => {
                let intent = if outcome.successful {
                    FeedbackIntent::Success
                } else {
                    FeedbackIntent::Error
                };
                self.feedback.signal(intent);
                self.persist();
            }
            Err(_) => self.feedback.signal(FeedbackIntent::Warning),
        }
        result
    }

    /// Acknowledge a round end. A finished game clears its save; a new
    /// round persists its opening deal.
    pub fn advance_round(&mut self) -> ActionResult<()> {
        let result = self.state.advance_round();
        match &result {
            Ok(()) => {
                self.feedback.signal(FeedbackIntent::Medium);
                if self.state.phase() == Phase::GameEnd {
                    self.clear_saved();
                } else {
                    self.persist();
                }
            }
            Err(_) => self.feedback.signal(FeedbackIntent::Warning),
        }
        result
    }

    /// Abandon the game and return to setup, clearing the save.
    pub fn reset(&mut self) {
        self.state.reset();
        self.clear_saved();
    }

    /// Persist the current state on demand, propagating the failure for
    /// hosts that want to surface it.
    pub fn save_now(&mut self) -> anyhow::Result<()> {
        let bytes = encode_state(&self.state)?;
        self.storage.set(SAVED_STATE_KEY, &bytes)
    }

    fn persist(&mut self) {
        match self.save_now() {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                warn!("saving game state failed: {err:#}");
                self.last_save_error = Some(format!("{err:#}"));
            }
        }
    }

    fn clear_saved(&mut self) {
        if let Err(err) = self.storage.remove(SAVED_STATE_KEY) {
            warn!("clearing saved game state failed: {err:#}");
        }
    }
}
