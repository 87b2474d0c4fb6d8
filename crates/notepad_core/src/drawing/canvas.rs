//! Headless RGBA drawing surface.
//!
//! # Invariants
//! - New and resized canvases are fully transparent.
//! - Segments use round caps: a pixel is covered when its center lies within
//!   `width / 2` of the segment.

use super::codec::encode_data_url;
use super::surface::{
    check_surface_size, CompositeMode, DrawingError, DrawingSurface, Pen, Point, RgbaImage,
};
use image::Rgba;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// In-memory [`DrawingSurface`] backed by an RGBA buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    pixels: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|pixel| pixel.0[3] == 0)
    }
}

impl DrawingSurface for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), DrawingError> {
        check_surface_size(width, height)?;
        self.pixels = RgbaImage::new(width, height);
        Ok(())
    }

    fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn draw_segment(&mut self, from: Point, to: Point, pen: &Pen) {
        let (width, height) = self.pixels.dimensions();
        if width == 0 || height == 0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let radius = (pen.width.max(1) as f32) / 2.0;
        let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
        let max_x = (from.x.max(to.x) + radius).ceil().min(width as f32 - 1.0);
        let max_y = (from.y.max(to.y) + radius).ceil().min(height as f32 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let (max_x, max_y) = (max_x as u32, max_y as u32);

        let source = Rgba([pen.color.r, pen.color.g, pen.color.b, pen.color.a]);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, from, to) > radius {
                    continue;
                }
                let target = self.pixels.get_pixel_mut(x, y);
                *target = match pen.composite {
                    CompositeMode::SourceOver => source_over(source, *target),
                    CompositeMode::DestinationOut => destination_out(source, *target),
                };
            }
        }
    }

    fn export_image(&self) -> Result<String, DrawingError> {
        encode_data_url(&self.pixels)
    }

    fn paint_image(&mut self, image: &RgbaImage) {
        let width = image.width().min(self.pixels.width());
        let height = image.height().min(self.pixels.height());
        for y in 0..height {
            for x in 0..width {
                let target = self.pixels.get_pixel_mut(x, y);
                *target = source_over(*image.get_pixel(x, y), *target);
            }
        }
    }
}

fn distance_to_segment(point: Point, from: Point, to: Point) -> f32 {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((point.x - from.x) * dx + (point.y - from.y) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (nearest_x, nearest_y) = (from.x + t * dx, from.y + t * dy);
    ((point.x - nearest_x).powi(2) + (point.y - nearest_y).powi(2)).sqrt()
}

fn source_over(source: Rgba<u8>, target: Rgba<u8>) -> Rgba<u8> {
    let source_alpha = f32::from(source.0[3]) / 255.0;
    let target_alpha = f32::from(target.0[3]) / 255.0;
    let out_alpha = source_alpha + target_alpha * (1.0 - source_alpha);
    if out_alpha <= 0.0 {
        return TRANSPARENT;
    }
    let blend = |channel: usize| {
        let value = (f32::from(source.0[channel]) * source_alpha
            + f32::from(target.0[channel]) * target_alpha * (1.0 - source_alpha))
            / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        blend(0),
        blend(1),
        blend(2),
        (out_alpha * 255.0).round() as u8,
    ])
}

fn destination_out(source: Rgba<u8>, target: Rgba<u8>) -> Rgba<u8> {
    let keep = 1.0 - f32::from(source.0[3]) / 255.0;
    let alpha = (f32::from(target.0[3]) * keep).round() as u8;
    if alpha == 0 {
        TRANSPARENT
    } else {
        Rgba([target.0[0], target.0[1], target.0[2], alpha])
    }
}

#[cfg(test)]
mod tests {
    use super::PixelCanvas;
    use crate::drawing::surface::{Color, CompositeMode, DrawingError, DrawingSurface, Pen, Point};

    fn pen(composite: CompositeMode) -> Pen {
        Pen {
            width: 2,
            color: Color::rgb(255, 0, 0),
            composite,
        }
    }

    #[test]
    fn segment_paints_pixels_along_the_line_only() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.draw_segment(
            Point::new(0.0, 5.0),
            Point::new(9.0, 5.0),
            &pen(CompositeMode::SourceOver),
        );

        assert_eq!(canvas.pixel(4, 5), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(4, 9), Some([0, 0, 0, 0]));
    }

    #[test]
    fn erase_removes_pixels_with_same_geometry() {
        let mut canvas = PixelCanvas::new(10, 10);
        let (from, to) = (Point::new(1.0, 5.0), Point::new(8.0, 5.0));
        canvas.draw_segment(from, to, &pen(CompositeMode::SourceOver));
        canvas.draw_segment(from, to, &pen(CompositeMode::DestinationOut));
        assert!(canvas.is_blank());
    }

    #[test]
    fn resize_discards_pixels() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.draw_segment(
            Point::new(2.0, 2.0),
            Point::new(2.0, 2.0),
            &pen(CompositeMode::SourceOver),
        );
        assert!(!canvas.is_blank());

        canvas.resize(6, 3).unwrap();
        assert_eq!(canvas.size(), (6, 3));
        assert!(canvas.is_blank());
    }

    #[test]
    fn oversized_resize_is_rejected_and_keeps_pixels() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.draw_segment(
            Point::new(2.0, 2.0),
            Point::new(2.0, 2.0),
            &pen(CompositeMode::SourceOver),
        );

        assert!(matches!(
            canvas.resize(u32::MAX, u32::MAX),
            Err(DrawingError::SurfaceTooLarge { .. })
        ));
        assert!(canvas.resize(100_000, 100_000).is_err());
        assert_eq!(canvas.size(), (4, 4));
        assert!(!canvas.is_blank());
    }

    #[test]
    fn non_finite_points_paint_nothing() {
        let mut canvas = PixelCanvas::new(8, 8);
        let pen = pen(CompositeMode::SourceOver);
        canvas.draw_segment(Point::new(f32::NEG_INFINITY, 0.0), Point::new(5.0, 5.0), &pen);
        canvas.draw_segment(Point::new(1.0, 1.0), Point::new(f32::NAN, 5.0), &pen);
        canvas.draw_segment(Point::new(1.0, f32::INFINITY), Point::new(2.0, 2.0), &pen);
        assert!(canvas.is_blank());
    }

    #[test]
    fn segments_outside_the_surface_are_clipped() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.draw_segment(
            Point::new(-20.0, -20.0),
            Point::new(-10.0, -10.0),
            &pen(CompositeMode::SourceOver),
        );
        canvas.draw_segment(
            Point::new(40.0, 40.0),
            Point::new(50.0, 50.0),
            &pen(CompositeMode::SourceOver),
        );
        assert!(canvas.is_blank());
    }
}
