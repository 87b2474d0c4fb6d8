//! Formatted text editing surface.
//!
//! # Responsibility
//! - Define the contract the session uses to read and restore title/body.
//! - Provide an in-memory buffer for headless hosts and tests.

pub mod text;

use crate::drawing::surface::CompositeMode;

/// Which surface receives pointer input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorMode {
    /// Typing into the text surface; pointer input is ignored.
    #[default]
    Text,
    Draw,
    Erase,
}

impl EditorMode {
    /// Compositing used for strokes, or `None` when strokes are disabled.
    pub fn composite(self) -> Option<CompositeMode> {
        match self {
            Self::Text => None,
            Self::Draw => Some(CompositeMode::SourceOver),
            Self::Erase => Some(CompositeMode::DestinationOut),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Draw => "Draw",
            Self::Erase => "Eraser",
        }
    }
}
