//! JPEG encoding of rendered canvases.

use image::ImageEncoder;

use crate::foundation::error::{AvatyrError, AvatyrResult};

/// Mime type reported for every encoded avatar.
pub const MIME_JPEG: &str = "image/jpeg";

/// Fixed encode quality used by the render pipeline.
pub const JPEG_QUALITY: u8 = 80;

/// Encode a premultiplied-RGBA8 canvas as baseline JPEG.
///
/// JPEG carries no alpha. The canvas is flattened over black, which for
/// premultiplied pixels is exactly the stored RGB channels, so no per-pixel
/// blend is needed.
pub fn encode_jpeg_premul(canvas: &vello_cpu::Pixmap, quality: u8) -> AvatyrResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(AvatyrError::validation(format!(
            "jpeg quality {quality} out of range [1, 100]"
        )));
    }
    let (w, h) = (u32::from(canvas.width()), u32::from(canvas.height()));
    if w == 0 || h == 0 {
        return Err(AvatyrError::validation("cannot encode an empty canvas"));
    }

    let premul = canvas.data_as_u8_slice();
    let mut rgb = Vec::with_capacity((w as usize) * (h as usize) * 3);
    for px in premul.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }

    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|e| AvatyrError::encoding(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}
