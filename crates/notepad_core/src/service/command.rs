//! User actions as data.
//!
//! Each UI event maps to exactly one variant; hosts feed them to
//! [`crate::service::session::NoteSession::dispatch`].

use crate::drawing::surface::{Color, DrawingError, Point, RgbaImage};
use crate::editor::text::InlineFormat;
use crate::editor::EditorMode;
use crate::model::note::NoteId;

#[derive(Debug)]
pub enum Command {
    NewNote,
    OpenNote(NoteId),
    Save,
    Delete,
    /// Timer tick; saves only when the autosave interval elapsed.
    Tick,
    SetTitle(String),
    SetContent(String),
    ToggleFormat(InlineFormat),
    SetMode(EditorMode),
    SetPenColor(Color),
    SetPenWidth(u32),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    ClearDrawing,
    Resize {
        width: u32,
        height: u32,
    },
    /// Result of decoding a [`crate::drawing::capture::DecodeRequest`].
    DrawingDecoded {
        generation: u64,
        result: Result<RgbaImage, DrawingError>,
    },
    Search(String),
}
