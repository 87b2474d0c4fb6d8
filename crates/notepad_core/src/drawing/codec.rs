//! PNG data URL encoding for drawing layers.
//!
//! # Invariants
//! - Identical pixels always encode to the identical string.
//! - Decoding is pure, so hosts may run it off the event loop.

use super::surface::{DrawingError, RgbaImage};
use base64ct::{Base64, Encoding};
use image::ImageFormat;
use std::io::Cursor;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encodes pixels as `data:image/png;base64,...`.
pub fn encode_data_url(image: &RgbaImage) -> Result<String, DrawingError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DrawingError::EmptySurface);
    }
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(format!(
        "{PNG_DATA_URL_PREFIX}{}",
        Base64::encode_string(bytes.get_ref())
    ))
}

/// Decodes an image data URL back into RGBA pixels.
///
/// Any `data:image/<kind>;base64,` header is accepted; the payload format is
/// sniffed from its bytes.
pub fn decode_data_url(data: &str) -> Result<RgbaImage, DrawingError> {
    let payload = data
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload.trim())
        .ok_or(DrawingError::MalformedDataUrl)?;
    let bytes = Base64::decode_vec(payload).map_err(|err| DrawingError::Base64(err.to_string()))?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::{decode_data_url, encode_data_url, PNG_DATA_URL_PREFIX};
    use crate::drawing::surface::{DrawingError, RgbaImage};
    use image::Rgba;

    #[test]
    fn encode_then_decode_preserves_pixels() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(1, 1, Rgba([200, 10, 20, 255]));

        let encoded = encode_data_url(&image).unwrap();
        assert!(encoded.starts_with(PNG_DATA_URL_PREFIX));
        assert_eq!(decode_data_url(&encoded).unwrap(), image);
    }

    #[test]
    fn decode_rejects_non_image_urls_and_bad_payloads() {
        assert!(matches!(
            decode_data_url("hello"),
            Err(DrawingError::MalformedDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@@"),
            Err(DrawingError::Base64(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,aGVsbG8="),
            Err(DrawingError::Image(_))
        ));
    }

    #[test]
    fn zero_sized_surface_is_not_exported() {
        assert!(matches!(
            encode_data_url(&RgbaImage::new(0, 4)),
            Err(DrawingError::EmptySurface)
        ));
    }
}
