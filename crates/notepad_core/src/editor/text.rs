//! Text surface contract and in-memory buffer.
//!
//! # Invariants
//! - Selection offsets count characters of the formatted content.
//! - Toggling a format twice over the same selection restores the content.

use crate::search::projection::plain_text;
use std::ops::Range;

/// Inline formats supported by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
}

impl InlineFormat {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
        }
    }

    fn open(self) -> String {
        format!("<{}>", self.tag())
    }

    fn close(self) -> String {
        format!("</{}>", self.tag())
    }
}

/// Editing surface holding the title field and the formatted body.
pub trait TextSurface {
    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);
    /// Formatted body including inline markup.
    fn content(&self) -> String;
    fn set_content(&mut self, content: &str);
    /// Body with markup stripped.
    fn plain_text(&self) -> String {
        plain_text(&self.content())
    }
    /// Applies or removes `format` on the current selection.
    fn toggle_format(&mut self, format: InlineFormat);
}

/// In-memory [`TextSurface`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    title: String,
    content: String,
    selection: Option<Range<usize>>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects characters `range` of the formatted content.
    ///
    /// Out-of-range ends are clamped to the content length.
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.content.chars().count();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        self.selection = Some(start..end);
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}

impl TextSurface for TextBuffer {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn content(&self) -> String {
        self.content.clone()
    }

    fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.selection = None;
    }

    fn toggle_format(&mut self, format: InlineFormat) {
        let Some(range) = self.selection.clone().filter(|range| !range.is_empty()) else {
            return;
        };
        let open = format.open();
        let close = format.close();
        let open_chars = open.chars().count();
        let close_chars = close.chars().count();

        let start = byte_offset(&self.content, range.start);
        let end = byte_offset(&self.content, range.end);
        let (before, rest) = self.content.split_at(start);
        let (selected, after) = rest.split_at(end - start);

        let (updated, selection) = if before.ends_with(&open) && after.starts_with(&close) {
            let updated = format!(
                "{}{}{}",
                &before[..before.len() - open.len()],
                selected,
                &after[close.len()..]
            );
            (
                updated,
                range.start - open_chars..range.end - open_chars,
            )
        } else if selected.len() >= open.len() + close.len()
            && selected.starts_with(&open)
            && selected.ends_with(&close)
        {
            let inner = &selected[open.len()..selected.len() - close.len()];
            (
                format!("{before}{inner}{after}"),
                range.start..range.end - open_chars - close_chars,
            )
        } else {
            (
                format!("{before}{open}{selected}{close}{after}"),
                range.start + open_chars..range.end + open_chars,
            )
        };

        self.content = updated;
        self.selection = Some(selection);
    }
}

fn byte_offset(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map_or(value.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::{InlineFormat, TextBuffer, TextSurface};

    #[test]
    fn toggle_wraps_then_unwraps_selection() {
        let mut buffer = TextBuffer::new();
        buffer.set_content("make this bold");
        buffer.select(5..9);

        buffer.toggle_format(InlineFormat::Bold);
        assert_eq!(buffer.content(), "make <b>this</b> bold");
        assert_eq!(buffer.selection(), Some(8..12));

        buffer.toggle_format(InlineFormat::Bold);
        assert_eq!(buffer.content(), "make this bold");
        assert_eq!(buffer.selection(), Some(5..9));
    }

    #[test]
    fn toggle_unwraps_selection_that_includes_tags() {
        let mut buffer = TextBuffer::new();
        buffer.set_content("a <u>line</u>");
        buffer.select(2..13);

        buffer.toggle_format(InlineFormat::Underline);
        assert_eq!(buffer.content(), "a line");
        assert_eq!(buffer.plain_text(), "a line");
    }

    #[test]
    fn toggle_without_selection_is_noop() {
        let mut buffer = TextBuffer::new();
        buffer.set_content("unchanged");
        buffer.toggle_format(InlineFormat::Italic);
        buffer.select(3..3);
        buffer.toggle_format(InlineFormat::Italic);
        assert_eq!(buffer.content(), "unchanged");
    }

    #[test]
    fn selection_is_clamped_and_multibyte_safe() {
        let mut buffer = TextBuffer::new();
        buffer.set_content("ação");
        buffer.select(1..40);
        buffer.toggle_format(InlineFormat::Italic);
        assert_eq!(buffer.content(), "a<i>ção</i>");
    }
}
