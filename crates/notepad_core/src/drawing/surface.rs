//! Drawing surface contract and pen primitives.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use image::RgbaImage;

/// Pointer position in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// How stroke pixels combine with the existing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint the pen color over existing pixels.
    SourceOver,
    /// Remove existing pixels under the stroke.
    DestinationOut,
}

/// Straight RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: u8::MAX }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = DrawingError;

    /// Parses `#rrggbb`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DrawingError::InvalidColor(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Settings applied to one stroke segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub width: u32,
    pub color: Color,
    pub composite: CompositeMode,
}

/// Failures while parsing pen input or encoding/decoding drawings.
#[derive(Debug)]
pub enum DrawingError {
    InvalidColor(String),
    /// Input is not a base64 image data URL.
    MalformedDataUrl,
    Base64(String),
    Image(image::ImageError),
    /// A surface with zero width or height cannot be exported.
    EmptySurface,
    /// Requested dimensions exceed [`MAX_SURFACE_SIDE`] or [`MAX_SURFACE_PIXELS`].
    SurfaceTooLarge { width: u32, height: u32 },
}

impl Display for DrawingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColor(value) => write!(f, "invalid color `{value}`; expected #rrggbb"),
            Self::MalformedDataUrl => write!(f, "drawing data is not a base64 image data URL"),
            Self::Base64(message) => write!(f, "invalid base64 drawing data: {message}"),
            Self::Image(err) => write!(f, "image codec failure: {err}"),
            Self::EmptySurface => write!(f, "surface has no pixels to export"),
            Self::SurfaceTooLarge { width, height } => {
                write!(f, "surface size {width}x{height} exceeds the supported maximum")
            }
        }
    }
}

impl Error for DrawingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for DrawingError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

pub const MAX_SURFACE_SIDE: u32 = 16_384;
pub const MAX_SURFACE_PIXELS: u64 = 64 * 1024 * 1024;

/// Checks requested dimensions against the surface limits.
pub fn check_surface_size(width: u32, height: u32) -> Result<(), DrawingError> {
    let pixels = u64::from(width) * u64::from(height);
    if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE || pixels > MAX_SURFACE_PIXELS {
        return Err(DrawingError::SurfaceTooLarge { width, height });
    }
    Ok(())
}

/// Raster surface receiving freehand strokes.
pub trait DrawingSurface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);
    /// Resizes to the container dimensions. Existing pixels are discarded.
    ///
    /// Oversized requests fail and leave the surface untouched.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DrawingError>;
    fn clear(&mut self);
    fn draw_segment(&mut self, from: Point, to: Point, pen: &Pen);
    /// Encodes the current pixels as an image data URL.
    fn export_image(&self) -> Result<String, DrawingError>;
    /// Paints a decoded image at the origin over the current pixels.
    fn paint_image(&mut self, image: &RgbaImage);
}

#[cfg(test)]
mod tests {
    use super::{check_surface_size, Color, DrawingError, MAX_SURFACE_SIDE};

    #[test]
    fn color_parses_hex_and_round_trips() {
        let color: Color = "#1A2b3C".parse().unwrap();
        assert_eq!(color, Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_hex(), "#1a2b3c");
    }

    #[test]
    fn surface_size_limits_reject_overflowing_dimensions() {
        assert!(check_surface_size(800, 600).is_ok());
        assert!(check_surface_size(0, 0).is_ok());
        assert!(check_surface_size(MAX_SURFACE_SIDE, 1).is_ok());
        assert!(matches!(
            check_surface_size(MAX_SURFACE_SIDE + 1, 1),
            Err(DrawingError::SurfaceTooLarge { .. })
        ));
        assert!(check_surface_size(MAX_SURFACE_SIDE, MAX_SURFACE_SIDE).is_err());
        assert!(check_surface_size(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn color_rejects_short_or_unprefixed_values() {
        for value in ["#fff", "000000", "#gg0000", "#ééé"] {
            assert!(matches!(
                value.parse::<Color>(),
                Err(DrawingError::InvalidColor(_))
            ));
        }
    }
}
