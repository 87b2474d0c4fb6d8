//! Current-note controller.
//!
//! # Responsibility
//! - Track which note is checked out into the editing surfaces.
//! - Flush surface edits into the store before any context change.
//! - Map user commands onto store, surface and status updates.
//!
//! # Invariants
//! - At most one note is current, and it always exists in the store.
//! - `flush` runs at the start of create, switch and delete.
//! - Persist failures become an error status; they never abort an operation.
//! - Switching to the already-current note never touches the surfaces.

use crate::config::SessionSettings;
use crate::drawing::capture::{DecodeRequest, DrawingCapture};
use crate::drawing::surface::DrawingSurface;
use crate::editor::text::TextSurface;
use crate::editor::EditorMode;
use crate::model::note::{Note, NoteId};
use crate::repo::kv::KeyValueStore;
use crate::repo::note_store::NoteStore;
use crate::search::projection::{display_title, filter, render, ListView};
use crate::service::autosave::Autosave;
use crate::service::clock::{Clock, SystemClock};
use crate::service::command::Command;
use crate::service::status::StatusLine;
use log::{debug, info};

pub const SAVE_FAILED_STATUS: &str = "Failed to save notes";

/// Editing context: store, surfaces, current note and UI state.
pub struct NoteSession<K, T, S, C = SystemClock>
where
    K: KeyValueStore,
    T: TextSurface,
    S: DrawingSurface,
    C: Clock,
{
    store: NoteStore<K>,
    current: Option<NoteId>,
    text: T,
    drawing: DrawingCapture<S>,
    mode: EditorMode,
    clock: C,
    status: StatusLine,
    autosave: Autosave,
    query: String,
    preview_chars: usize,
}

impl<K, T, S, C> NoteSession<K, T, S, C>
where
    K: KeyValueStore,
    T: TextSurface,
    S: DrawingSurface,
    C: Clock,
{
    /// Loads the store and checks out the newest note, creating one when
    /// the store is empty.
    pub fn open(
        store: NoteStore<K>,
        text: T,
        surface: S,
        clock: C,
        settings: &SessionSettings,
    ) -> Self {
        let mut session = Self {
            store,
            current: None,
            text,
            drawing: DrawingCapture::new(surface),
            mode: EditorMode::default(),
            clock,
            status: StatusLine::new(settings.status_duration),
            autosave: Autosave::new(settings.autosave_interval),
            query: String::new(),
            preview_chars: settings.preview_chars,
        };

        session.store.load();
        match session.store.first().map(|note| note.id.clone()) {
            Some(first) => session.switch_to(&first),
            None => session.create_new(),
        }
        let now = session.clock.now();
        session.autosave.arm(now);
        info!(
            "event=session_open module=service status=ok notes={}",
            session.store.len()
        );
        session
    }

    /// Saves the current note, if any.
    pub fn flush(&mut self) {
        if self.current.is_some() {
            self.save();
        }
    }

    /// Flushes, then checks out a fresh note at the head of the list.
    pub fn create_new(&mut self) {
        self.flush();
        self.insert_new_note();
    }

    /// Checks out note `id`. Unknown ids and the current id are no-ops.
    pub fn switch_to(&mut self, id: &NoteId) {
        if self.current.as_ref() == Some(id) {
            return;
        }
        if !self.store.contains(id) {
            debug!("event=note_switch module=service status=skipped id={}", id);
            return;
        }

        self.flush();
        self.current = Some(id.clone());
        self.load_surfaces();
        info!("event=note_switch module=service status=ok id={}", id);

        let title = self
            .current_note()
            .map(|note| display_title(&note.title).to_string())
            .unwrap_or_default();
        let now = self.clock.now();
        self.status.info(format!("Note \"{title}\" opened"), now);
    }

    /// Commits surface edits and the drawing into the current note and
    /// persists the list. No-op without a current note.
    pub fn save(&mut self) {
        let Some(id) = self.current.clone() else {
            return;
        };
        let now = self.clock.now();
        let title = self.text.title();
        let content = self.text.content();

        let Some(note) = self.store.get_mut(&id) else {
            self.current = None;
            return;
        };
        note.drawing_data = self.drawing.capture(note.drawing_data.as_deref());
        note.title = title;
        note.content = content;
        note.touch(now);
        let label = display_title(&note.title).to_string();
        debug!("event=note_save module=service status=start id={}", id);

        if self.persist_with_status(&format!("Note \"{label}\" saved")) {
            self.status.record_saved(now);
        }
    }

    /// Removes the current note, then opens the first remaining note or a
    /// new one. No-op without a current note.
    pub fn delete(&mut self) {
        let Some(id) = self.current.clone() else {
            return;
        };
        self.flush();

        self.store.remove(&id);
        self.current = None;
        info!("event=note_delete module=service status=ok id={}", id);
        let removed = self.persist_with_status("Note deleted");

        // The replacement note is written separately; either write failing
        // leaves storage behind memory.
        let replaced = match self.store.first().map(|note| note.id.clone()) {
            Some(first) => {
                self.switch_to(&first);
                true
            }
            None => self.insert_new_note(),
        };
        let persisted = removed && replaced;

        let now = self.clock.now();
        if persisted {
            self.status.info("Note deleted", now);
        } else {
            self.status.error(SAVE_FAILED_STATUS, now);
        }
    }

    /// Saves when the autosave interval elapsed. Returns whether it fired.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        if !self.autosave.poll(now) || self.current.is_none() {
            return false;
        }
        debug!("event=autosave module=service status=fire");
        self.save();
        true
    }

    /// Applies one user action.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::NewNote => self.create_new(),
            Command::OpenNote(id) => self.switch_to(&id),
            Command::Save => self.save(),
            Command::Delete => self.delete(),
            Command::Tick => {
                self.tick();
            }
            Command::SetTitle(title) => self.text.set_title(&title),
            Command::SetContent(content) => self.text.set_content(&content),
            Command::ToggleFormat(format) => self.text.toggle_format(format),
            Command::SetMode(mode) => self.set_mode(mode),
            Command::SetPenColor(color) => self.drawing.set_color(color),
            Command::SetPenWidth(width) => self.drawing.set_width(width),
            Command::PointerDown(point) => {
                self.drawing.begin_stroke(point, self.mode.composite());
            }
            Command::PointerMove(point) => self.drawing.extend_stroke(point),
            Command::PointerUp => {
                if self.drawing.end_stroke() {
                    self.capture_drawing();
                }
            }
            Command::ClearDrawing => {
                self.drawing.clear();
                self.capture_drawing();
                let now = self.clock.now();
                self.status.info("Drawing cleared", now);
            }
            Command::Resize { width, height } => {
                let stored = self.current_drawing();
                self.drawing.resize(width, height, stored.as_deref());
            }
            Command::DrawingDecoded { generation, result } => {
                self.drawing.finish_decode(generation, result);
            }
            Command::Search(query) => self.query = query,
        }
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        let now = self.clock.now();
        self.status.info(format!("{} mode on", mode.label()), now);
    }

    /// Rendered notes list for the active search query.
    pub fn list_view(&self) -> ListView {
        render(
            filter(self.store.notes(), &self.query),
            self.current.as_ref(),
            self.preview_chars,
        )
    }

    /// Hands pending drawing decodes to the host.
    pub fn take_decode_requests(&mut self) -> Vec<DecodeRequest> {
        self.drawing.take_decode_requests()
    }

    /// Decodes pending drawings on the calling thread.
    pub fn restore_drawings_now(&mut self) -> usize {
        self.drawing.restore_now()
    }

    pub fn current_id(&self) -> Option<&NoteId> {
        self.current.as_ref()
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.current.as_ref().and_then(|id| self.store.get(id))
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn store(&self) -> &NoteStore<K> {
        &self.store
    }

    pub fn text(&self) -> &T {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut T {
        &mut self.text
    }

    pub fn drawing(&self) -> &DrawingCapture<S> {
        &self.drawing
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Status text visible right now.
    pub fn status_text(&self) -> &str {
        self.status.text(self.clock.now())
    }

    /// Whether the visible status is an error.
    pub fn status_is_error(&self) -> bool {
        self.status
            .current(self.clock.now())
            .is_some_and(|message| message.is_error)
    }

    /// Inserts a fresh note at the head, checks it out and persists.
    /// Returns whether the write succeeded.
    fn insert_new_note(&mut self) -> bool {
        let now = self.clock.now();
        let note = Note::new(now);
        let id = note.id.clone();
        self.store.insert_front(note);
        self.current = Some(id.clone());
        self.load_surfaces();
        info!("event=note_create module=service status=ok id={}", id);

        self.persist_with_status("New note created")
    }

    fn load_surfaces(&mut self) {
        let Some(note) = self.current.as_ref().and_then(|id| self.store.get(id)) else {
            return;
        };
        self.text.set_title(&note.title);
        self.text.set_content(&note.content);
        self.drawing.load(note.drawing_data.as_deref());
    }

    fn capture_drawing(&mut self) {
        let Some(note) = self.current.as_ref().and_then(|id| self.store.get_mut(id)) else {
            return;
        };
        note.drawing_data = self.drawing.capture(note.drawing_data.as_deref());
    }

    fn current_drawing(&self) -> Option<String> {
        self.current_note()
            .and_then(|note| note.drawing_data.clone())
    }

    fn persist_with_status(&mut self, success: &str) -> bool {
        let now = self.clock.now();
        match self.store.persist() {
            Ok(()) => {
                self.status.info(success, now);
                true
            }
            Err(_) => {
                self.status.error(SAVE_FAILED_STATUS, now);
                false
            }
        }
    }
}
