//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record stored in the key-value blob.
//! - Provide lifecycle helpers for creation and save stamping.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `updated_at` is never earlier than `created_at`.
//! - Stamping never moves `updated_at` backwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Title assigned to freshly created notes.
pub const NEW_NOTE_TITLE: &str = "New Note";

const GENERATED_ID_PREFIX: &str = "note_";

/// Opaque note identifier.
///
/// Generated ids look like `note_<uuid>`, but any non-blank string read from
/// storage is accepted so older payloads keep their identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(format!("{GENERATED_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validation errors for note invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    BlankId,
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "note id must not be blank"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({}) must be >= createdAt ({})",
                updated_at.to_rfc3339(),
                created_at.to_rfc3339()
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// The only persisted entity.
///
/// Serialized with camelCase keys so the stored blob reads
/// `{"id", "title", "content", "drawingData", "createdAt", "updatedAt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    /// Formatted body with inline `<b>`/`<i>`/`<u>` markup.
    #[serde(default)]
    pub content: String,
    /// PNG data URL of the drawing layer, `None` when nothing was captured.
    #[serde(default)]
    pub drawing_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates an empty note with a generated id and both timestamps at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_id(NoteId::generate(), now)
    }

    /// Creates an empty note with a caller-provided id.
    pub fn with_id(id: NoteId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: NEW_NOTE_TITLE.to_string(),
            content: String::new(),
            drawing_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes `updated_at` for a save at `now`.
    ///
    /// A clock that stepped backwards keeps the previous stamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_blank() {
            return Err(NoteValidationError::BlankId);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    pub fn has_drawing(&self) -> bool {
        self.drawing_data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteId, NoteValidationError, NEW_NOTE_TITLE};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let first = NoteId::generate();
        let second = NoteId::generate();
        assert!(first.as_str().starts_with("note_"));
        assert_ne!(first, second);
    }

    #[test]
    fn new_note_uses_placeholder_and_equal_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let note = Note::new(now);
        assert_eq!(note.title, NEW_NOTE_TITLE);
        assert!(note.content.is_empty());
        assert!(!note.has_drawing());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn touch_never_moves_backwards() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut note = Note::new(now);
        note.touch(now + Duration::seconds(10));
        let stamped = note.updated_at;

        note.touch(now - Duration::seconds(60));
        assert_eq!(note.updated_at, stamped);
    }

    #[test]
    fn validate_rejects_blank_id_and_reversed_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let blank = Note::with_id(NoteId::from("  "), now);
        assert_eq!(blank.validate(), Err(NoteValidationError::BlankId));

        let mut reversed = Note::new(now);
        reversed.updated_at = now - Duration::seconds(1);
        assert!(matches!(
            reversed.validate(),
            Err(NoteValidationError::UpdatedBeforeCreated { .. })
        ));
    }
}
