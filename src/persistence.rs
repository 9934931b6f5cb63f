//! Persistence collaborator interface.
//!
//! The host platform supplies a key-value store; the game hands it an
//! opaque serialized state and can rebuild an equivalent game from it,
//! including mid-turn context. Store failures are reported upward and
//! never affect the in-memory game.

use anyhow::Context;
use std::collections::HashMap;

use crate::game::FaduState;

/// Key-value store supplied by the host platform.
pub trait Storage {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, value: &[u8]) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Serialize the full game state to bytes for a [`Storage`] value.
pub fn encode_state(state: &FaduState) -> anyhow::Result<Vec<u8>> {
    bincode::serde::encode_to_vec(state, bincode::config::standard())
        .context("failed to serialize game state")
}

/// Rebuild a game from bytes previously produced by [`encode_state`].
pub fn decode_state(bytes: &[u8]) -> anyhow::Result<FaduState> {
    let (state, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .context("failed to deserialize game state")?;
    Ok(state)
}

/// In-memory store for tests and hosts without a platform store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
