//! List/search projection over the note list.
//!
//! # Responsibility
//! - Filter notes by a case-insensitive query over title and plain text.
//! - Shape list rows: display title, truncated preview, active flag.
//!
//! # Invariants
//! - Filtering preserves the input order.
//! - Matching never sees markup; content is stripped to plain text first.
//! - Previews are at most `limit` characters plus an ellipsis.

use crate::model::note::{Note, NoteId};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Default number of plain-text characters shown in a preview.
pub const PREVIEW_CHARS: usize = 60;
/// Suffix appended to truncated previews.
pub const ELLIPSIS: &str = "...";
/// Title shown for notes with an empty title.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled";
/// Preview shown for notes without content.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "Empty note";
/// Message shown when no note matches.
pub const EMPTY_LIST_MESSAGE: &str = "No notes found";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#(\d{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));").expect("valid entity regex")
});

/// One rendered row of the notes list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: NoteId,
    pub title: String,
    pub preview: String,
    /// Whether this row is the note open in the editor.
    pub active: bool,
}

/// Rendered notes list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Items(Vec<NoteListItem>),
    /// Nothing to show; carries the message displayed instead.
    Empty(&'static str),
}

impl ListView {
    pub fn items(&self) -> &[NoteListItem] {
        match self {
            Self::Items(items) => items,
            Self::Empty(_) => &[],
        }
    }
}

/// Returns notes whose title or plain-text content contains `query`.
///
/// An empty query returns every note.
pub fn filter<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    if query.is_empty() {
        return notes.iter().collect();
    }
    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| {
            note.title.to_lowercase().contains(&needle)
                || plain_text(&note.content).to_lowercase().contains(&needle)
        })
        .collect()
}

/// Renders list rows for `notes`, flagging the one matching `active`.
pub fn render<'a>(
    notes: impl IntoIterator<Item = &'a Note>,
    active: Option<&NoteId>,
    preview_chars: usize,
) -> ListView {
    let items = notes
        .into_iter()
        .map(|note| NoteListItem {
            id: note.id.clone(),
            title: display_title(&note.title).to_string(),
            preview: preview(&note.content, preview_chars),
            active: active == Some(&note.id),
        })
        .collect::<Vec<_>>();

    if items.is_empty() {
        ListView::Empty(EMPTY_LIST_MESSAGE)
    } else {
        ListView::Items(items)
    }
}

/// Filters and renders in one pass with the default preview length.
pub fn search(notes: &[Note], query: &str, active: Option<&NoteId>) -> ListView {
    render(filter(notes, query), active, PREVIEW_CHARS)
}

pub fn display_title(title: &str) -> &str {
    if title.is_empty() {
        UNTITLED_PLACEHOLDER
    } else {
        title
    }
}

/// Builds the list preview for formatted `content`.
pub fn preview(content: &str, limit: usize) -> String {
    if content.is_empty() {
        return EMPTY_CONTENT_PLACEHOLDER.to_string();
    }
    let text = plain_text(content);
    let mut chars = text.chars();
    let mut shown = chars.by_ref().take(limit).collect::<String>();
    if chars.next().is_some() {
        shown.push_str(ELLIPSIS);
    }
    shown
}

/// Strips markup from formatted content and decodes character references.
pub fn plain_text(content: &str) -> String {
    let without_tags = TAG_RE.replace_all(content, "");
    ENTITY_RE
        .replace_all(&without_tags, |caps: &Captures<'_>| decode_entity(caps))
        .into_owned()
}

fn decode_entity(caps: &Captures<'_>) -> String {
    let whole = caps.get(0).map_or("", |m| m.as_str());
    let decoded = if let Some(decimal) = caps.get(1) {
        decimal.as_str().parse::<u32>().ok().and_then(char::from_u32)
    } else if let Some(hex) = caps.get(2) {
        u32::from_str_radix(hex.as_str(), 16)
            .ok()
            .and_then(char::from_u32)
    } else {
        caps.get(3).and_then(|name| match name.as_str() {
            "nbsp" => Some('\u{a0}'),
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => None,
        })
    };
    decoded.map_or_else(|| whole.to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::{plain_text, preview, EMPTY_CONTENT_PLACEHOLDER};

    #[test]
    fn plain_text_strips_tags_and_decodes_entities() {
        let text = plain_text("<b>Fish</b> &amp; <i>chips</i>&nbsp;&#33;&#x3F;&copy;");
        assert_eq!(text, "Fish & chips\u{a0}!?&copy;");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let content = "é".repeat(61);
        let shown = preview(&content, 60);
        assert_eq!(shown.chars().count(), 63);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn preview_of_markup_only_content_is_blank_not_placeholder() {
        assert_eq!(preview("<br>", 60), "");
        assert_eq!(preview("", 60), EMPTY_CONTENT_PLACEHOLDER);
    }
}
