use crate::foundation::error::{AvatyrError, AvatyrResult};

// Avoid pathological allocations from hostile or broken SVG sizes.
const MAX_RASTER_DIM: u32 = 16_384;

/// Rasterize an SVG tree stretched to exactly `width x height` pixels.
///
/// Returns row-major premultiplied RGBA8 bytes. Aspect ratio is not
/// preserved; avatar glyphs are drawn into square regions by contract.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> AvatyrResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(AvatyrError::validation("svg raster size must be non-zero"));
    }
    if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        return Err(AvatyrError::validation(format!(
            "svg raster size too large: {width}x{height} (max {MAX_RASTER_DIM}x{MAX_RASTER_DIM})"
        )));
    }

    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(AvatyrError::validation("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| AvatyrError::encoding("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}
