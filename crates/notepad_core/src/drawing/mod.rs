//! Freehand drawing layer.
//!
//! # Responsibility
//! - Define the raster surface contract strokes are rendered on.
//! - Encode surfaces to PNG data URLs and restore them asynchronously.
//! - Provide a headless RGBA canvas for hosts without a native surface.

pub mod canvas;
pub mod capture;
pub mod codec;
pub mod surface;
