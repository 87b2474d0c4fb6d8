//! Bridge between the drawing surface and a note's `drawing_data`.
//!
//! # Responsibility
//! - Turn pointer input into stroke segments with the active pen.
//! - Export the surface after strokes and on save.
//! - Restore stored drawings through generation-tagged decode requests.
//!
//! # Invariants
//! - Only the decode for the latest generation is ever painted.
//! - While a decode is outstanding, captures keep the stored drawing rather
//!   than exporting the still-blank surface.
//! - Decode failures leave the surface blank and are never surfaced to users.

use super::codec::decode_data_url;
use super::surface::{Color, CompositeMode, DrawingError, DrawingSurface, Pen, Point, RgbaImage};
use log::{debug, warn};
use std::collections::VecDeque;

pub const DEFAULT_PEN_WIDTH: u32 = 2;
pub const MIN_PEN_WIDTH: u32 = 1;
pub const MAX_PEN_WIDTH: u32 = 50;

/// Pending request to decode stored drawing data for painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub generation: u64,
    pub data: String,
}

impl DecodeRequest {
    /// Runs the decode synchronously.
    pub fn decode(&self) -> Result<RgbaImage, DrawingError> {
        decode_data_url(&self.data)
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    last: Point,
    composite: CompositeMode,
}

/// Stroke state, pen settings and restore bookkeeping around a surface.
pub struct DrawingCapture<S: DrawingSurface> {
    surface: S,
    color: Color,
    width: u32,
    stroke: Option<ActiveStroke>,
    generation: u64,
    awaiting: Option<u64>,
    outbox: VecDeque<DecodeRequest>,
}

impl<S: DrawingSurface> DrawingCapture<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            color: Color::BLACK,
            width: DEFAULT_PEN_WIDTH,
            stroke: None,
            generation: 0,
            awaiting: None,
            outbox: VecDeque::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Sets the pen width, clamped to `MIN_PEN_WIDTH..=MAX_PEN_WIDTH`.
    pub fn set_width(&mut self, width: u32) {
        self.width = width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH);
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Whether a restore for the current drawing has not been painted yet.
    pub fn is_restoring(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Clears the surface and schedules a restore of `drawing`, if any.
    pub fn load(&mut self, drawing: Option<&str>) {
        self.stroke = None;
        self.surface.clear();
        self.schedule_restore(drawing);
    }

    /// Resizes the surface, then schedules a repaint of `drawing`.
    ///
    /// A rejected size leaves the surface, stroke and restore state as they
    /// were. Returns whether the resize happened.
    pub fn resize(&mut self, width: u32, height: u32, drawing: Option<&str>) -> bool {
        if let Err(err) = self.surface.resize(width, height) {
            warn!(
                "event=drawing_resize module=drawing status=error error={}",
                err
            );
            return false;
        }
        self.stroke = None;
        self.schedule_restore(drawing);
        true
    }

    /// Clears the surface and cancels any outstanding restore.
    pub fn clear(&mut self) {
        self.stroke = None;
        self.surface.clear();
        self.generation += 1;
        self.awaiting = None;
        self.outbox.clear();
    }

    /// Starts a stroke at `point`. Returns `false` when strokes are disabled.
    pub fn begin_stroke(&mut self, point: Point, composite: Option<CompositeMode>) -> bool {
        let Some(composite) = composite else {
            return false;
        };
        self.stroke = Some(ActiveStroke {
            last: point,
            composite,
        });
        true
    }

    /// Draws a segment from the previous pointer position to `point`.
    pub fn extend_stroke(&mut self, point: Point) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        let pen = Pen {
            width: self.width,
            color: self.color,
            composite: stroke.composite,
        };
        self.surface.draw_segment(stroke.last, point, &pen);
        stroke.last = point;
    }

    /// Ends the active stroke. Returns whether a stroke was in progress.
    pub fn end_stroke(&mut self) -> bool {
        self.stroke.take().is_some()
    }

    /// Produces the value to store in `drawing_data`.
    ///
    /// Falls back to `stored` while a restore is outstanding or when the
    /// surface cannot be exported.
    pub fn capture(&self, stored: Option<&str>) -> Option<String> {
        if self.awaiting.is_some() {
            return stored.map(str::to_string);
        }
        match self.surface.export_image() {
            Ok(encoded) => Some(encoded),
            Err(err) => {
                warn!(
                    "event=drawing_capture module=drawing status=error error={}",
                    err
                );
                stored.map(str::to_string)
            }
        }
    }

    /// Hands queued decode requests to the host.
    pub fn take_decode_requests(&mut self) -> Vec<DecodeRequest> {
        self.outbox.drain(..).collect()
    }

    /// Applies a finished decode. Returns whether pixels were painted.
    pub fn finish_decode(
        &mut self,
        generation: u64,
        result: Result<RgbaImage, DrawingError>,
    ) -> bool {
        if self.awaiting != Some(generation) {
            debug!(
                "event=drawing_restore module=drawing status=stale generation={} current={}",
                generation, self.generation
            );
            return false;
        }
        self.awaiting = None;
        match result {
            Ok(image) => {
                self.surface.paint_image(&image);
                debug!(
                    "event=drawing_restore module=drawing status=ok generation={} width={} height={}",
                    generation,
                    image.width(),
                    image.height()
                );
                true
            }
            Err(err) => {
                debug!(
                    "event=drawing_restore module=drawing status=error generation={} error={}",
                    generation, err
                );
                false
            }
        }
    }

    /// Decodes and applies every queued request on the calling thread.
    pub fn restore_now(&mut self) -> usize {
        self.take_decode_requests()
            .into_iter()
            .filter(|request| {
                let decoded = request.decode();
                self.finish_decode(request.generation, decoded)
            })
            .count()
    }

    fn schedule_restore(&mut self, drawing: Option<&str>) {
        self.generation += 1;
        self.outbox.clear();
        self.awaiting = None;
        if let Some(data) = drawing {
            self.outbox.push_back(DecodeRequest {
                generation: self.generation,
                data: data.to_string(),
            });
            self.awaiting = Some(self.generation);
        }
    }
}
