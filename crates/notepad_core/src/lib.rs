//! Core state for a note-taking widget with rich text and freehand drawing.
//! The crate owns note persistence, current-note synchronization, drawing
//! capture and the searchable notes list; hosts supply the surfaces.

pub mod config;
pub mod db;
pub mod drawing;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, NotepadConfig, SessionSettings};
pub use drawing::canvas::PixelCanvas;
pub use drawing::capture::{DecodeRequest, DrawingCapture};
pub use drawing::surface::{Color, CompositeMode, DrawingError, DrawingSurface, Pen, Point};
pub use editor::text::{InlineFormat, TextBuffer, TextSurface};
pub use editor::EditorMode;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use repo::kv::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use repo::note_store::{NoteStore, StoreError, StoreResult, DEFAULT_STORAGE_KEY};
pub use search::projection::{filter, render, search, ListView, NoteListItem};
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use service::command::Command;
pub use service::session::NoteSession;
pub use service::status::{format_last_saved, StatusLine};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
