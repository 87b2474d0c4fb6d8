//! Note list ownership and blob persistence.
//!
//! # Responsibility
//! - Own the canonical in-memory note list.
//! - Round-trip the whole list through one key of a key-value backend.
//!
//! # Invariants
//! - Ids in the list are unique.
//! - `load` never fails: absent or corrupt payloads yield an empty list.
//! - After `load` the list is sorted by `updated_at DESC`.
//! - `persist` writes the full list in one `set` call.

use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::repo::kv::{KeyValueStore, KvError};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used by default for the notes blob.
pub const DEFAULT_STORAGE_KEY: &str = "notePadPro_notes";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure for the notes blob.
#[derive(Debug)]
pub enum StoreError {
    /// The note list could not be encoded.
    Serialize(serde_json::Error),
    /// The backend refused or failed the write.
    Backend(KvError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to encode notes: {err}"),
            Self::Backend(err) => write!(f, "failed to write notes: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Backend(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Owner of the note list and its serialized form.
pub struct NoteStore<K: KeyValueStore> {
    backend: K,
    key: String,
    notes: Vec<Note>,
}

impl<K: KeyValueStore> NoteStore<K> {
    /// Creates an empty store writing under [`DEFAULT_STORAGE_KEY`].
    pub fn new(backend: K) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: K, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            notes: Vec::new(),
        }
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// Missing keys, backend read errors and malformed JSON all leave the
    /// list empty.
    pub fn load(&mut self) -> &[Note] {
        self.notes = match self.read_persisted() {
            Ok(notes) => notes,
            Err(reason) => {
                warn!(
                    "event=notes_load module=repo status=error key={} reason={}",
                    self.key, reason
                );
                Vec::new()
            }
        };
        info!(
            "event=notes_load module=repo status=ok key={} count={}",
            self.key,
            self.notes.len()
        );
        &self.notes
    }

    /// Serializes the full list and writes it under the store key.
    ///
    /// # Errors
    /// - `Serialize` when encoding fails.
    /// - `Backend` when the backend rejects the write (e.g. quota).
    pub fn persist(&mut self) -> StoreResult<()> {
        let result = serde_json::to_string(&self.notes)
            .map_err(StoreError::from)
            .and_then(|payload| {
                self.backend
                    .set(&self.key, &payload)
                    .map(|()| payload.len())
                    .map_err(StoreError::from)
            });

        match result {
            Ok(bytes) => {
                info!(
                    "event=notes_persist module=repo status=ok key={} count={} bytes={}",
                    self.key,
                    self.notes.len(),
                    bytes
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=notes_persist module=repo status=error key={} count={} error={}",
                    self.key,
                    self.notes.len(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Replaces the note with the same id, or appends it.
    pub fn upsert(&mut self, note: Note) {
        match self.position(&note.id) {
            Some(index) => self.notes[index] = note,
            None => self.notes.push(note),
        }
    }

    /// Places a note at the head of the list, replacing any note with its id.
    pub fn insert_front(&mut self, note: Note) {
        if let Some(index) = self.position(&note.id) {
            self.notes.remove(index);
        }
        self.notes.insert(0, note);
    }

    /// Removes and returns the note with `id`.
    pub fn remove(&mut self, id: &NoteId) -> Option<Note> {
        self.position(id).map(|index| self.notes.remove(index))
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn get_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| &note.id == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.position(id).is_some()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn first(&self) -> Option<&Note> {
        self.notes.first()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| &note.id == id)
    }

    fn read_persisted(&self) -> Result<Vec<Note>, String> {
        let Some(payload) = self.backend.get(&self.key).map_err(|err| err.to_string())? else {
            return Ok(Vec::new());
        };
        let decoded: Vec<Note> =
            serde_json::from_str(&payload).map_err(|err| format!("malformed payload: {err}"))?;
        Ok(normalize_loaded(decoded))
    }
}

/// Drops blank/duplicate ids, repairs timestamps and sorts newest first.
fn normalize_loaded(decoded: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    let mut notes = Vec::with_capacity(decoded.len());
    for mut note in decoded {
        match note.validate() {
            Ok(()) => {}
            Err(NoteValidationError::BlankId) => {
                warn!("event=notes_load module=repo status=skipped reason=blank_id");
                continue;
            }
            Err(NoteValidationError::UpdatedBeforeCreated { created_at, .. }) => {
                note.updated_at = created_at;
            }
        }
        if !seen.insert(note.id.clone()) {
            warn!(
                "event=notes_load module=repo status=skipped reason=duplicate_id id={}",
                note.id
            );
            continue;
        }
        notes.push(note);
    }
    notes.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
    notes
}
