//! Image bytes to PDF XObject data.
//!
//! JPEG input passes straight through as a `DCTDecode` stream; anything
//! else the `image` crate can decode is flattened to RGB and re-encoded as
//! JPEG. Undecodable data is reported to the caller, which skips the
//! element instead of failing the page.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ExtendedColorType, GenericImageView, ImageFormat};

const REENCODE_QUALITY: u8 = 85;

pub(crate) struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    pub data: Vec<u8>,
}

pub(crate) fn prepare(data: &[u8]) -> Result<PreparedImage, String> {
    let format = image::guess_format(data).map_err(|e| e.to_string())?;
    let decoded = image::load_from_memory(data).map_err(|e| e.to_string())?;
    let (width, height) = decoded.dimensions();

    if format == ImageFormat::Jpeg {
        let color_space = match decoded.color() {
            ColorType::L8 | ColorType::La8 => "DeviceGray",
            _ => "DeviceRGB",
        };
        return Ok(PreparedImage {
            width,
            height,
            color_space,
            data: data.to_vec(),
        });
    }

    let rgb = decoded.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, REENCODE_QUALITY)
        .encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| e.to_string())?;

    Ok(PreparedImage {
        width,
        height,
        color_space: "DeviceRGB",
        data: encoded,
    })
}
