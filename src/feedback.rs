//! Feedback collaborator interface.
//!
//! The core signals one intent per outcome; delivery (haptics, sounds,
//! flashes) is entirely the collaborator's concern and must never gate
//! a committed transition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of feedback intents a host can render.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackIntent {
    Light,
    Medium,
    Heavy,
    Success,
    Warning,
    Error,
}

impl fmt::Display for FeedbackIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{repr}")
    }
}

/// Receives feedback intents. Fire-and-forget: failures are the
/// collaborator's problem, never the game's.
pub trait FeedbackSink {
    fn signal(&mut self, intent: FeedbackIntent);
}

/// Sink that drops every signal, for headless hosts and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn signal(&mut self, _intent: FeedbackIntent) {}
}

impl<F: FnMut(FeedbackIntent)> FeedbackSink for F {
    fn signal(&mut self, intent: FeedbackIntent) {
        self(intent);
    }
}
