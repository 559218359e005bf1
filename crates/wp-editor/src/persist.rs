//! Mirrors the live element collection into a [`KeyValueStore`].
//!
//! The stored design is a convenience cache, not a system of record: a record
//! that is missing or unreadable restores as an empty scene, and failed
//! writes are logged and dropped. Only elements are saved; background and
//! history are session-only.

use crate::store::{KeyValueStore, StoreError};
use wp_core::codec::{self, DecodeError};
use wp_core::model::Snapshot;

/// Key the web visualizer keeps its design under.
pub const DEFAULT_KEY: &str = "savedDesign";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode scene: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Clone)]
pub struct Persistence {
    key: String,
}

impl Persistence {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Read the stored record. `Ok(None)` when nothing was saved yet.
    pub fn try_load<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<Option<Snapshot>, PersistError> {
        let Some(text) = store.get(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(codec::decode(&text)?))
    }

    /// Read the stored record, falling back to an empty scene.
    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S) -> Snapshot {
        match self.try_load(store) {
            Ok(Some(snapshot)) => {
                log::debug!(
                    "restored {} element(s) from `{}`",
                    snapshot.len(),
                    self.key
                );
                snapshot
            }
            Ok(None) => {
                log::debug!("no saved design under `{}`, starting empty", self.key);
                Snapshot::new()
            }
            Err(e) => {
                log::warn!("ignoring saved design under `{}`: {e}", self.key);
                Snapshot::new()
            }
        }
    }

    pub fn try_save<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        snapshot: &Snapshot,
    ) -> Result<(), PersistError> {
        let text = codec::encode(snapshot)?;
        store.set(&self.key, &text)?;
        Ok(())
    }

    /// Write the record; failures are logged, never returned.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S, snapshot: &Snapshot) {
        match self.try_save(store, snapshot) {
            Ok(()) => log::trace!("saved {} element(s) to `{}`", snapshot.len(), self.key),
            Err(e) => log::warn!("could not save design to `{}`: {e}", self.key),
        }
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::new(DEFAULT_KEY)
    }
}
