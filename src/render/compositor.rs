use std::sync::Arc;

use crate::assets::catalog::GlyphCatalog;
use crate::assets::color::Rgba8;
use crate::assets::font::FontSource;
use crate::assets::raster::rasterize_svg_to_premul_rgba8;
use crate::foundation::error::{AvatyrError, AvatyrResult};
use crate::foundation::math::mul_div255_u8;
use crate::model::{AvatarDescription, ColorPair};
use crate::text::badge::{BadgeShape, TextBadge, TextBadgeOpts};

/// Fraction of the canvas dimension left as background on each side of an
/// icon glyph. The glyph itself occupies the central 60% square.
const ICON_INSET_RATIO: f64 = 0.2;

/// Draws one avatar description onto a square canvas.
///
/// Holds borrowed collaborators only; the pipeline builds one per render task.
/// Photo descriptions are rejected here, their bytes never touch a canvas.
pub(crate) struct Compositor<'a> {
    icons: &'a dyn GlyphCatalog,
    glyphs: &'a dyn GlyphCatalog,
    font: Option<&'a FontSource>,
}

impl<'a> Compositor<'a> {
    pub(crate) fn new(
        icons: &'a dyn GlyphCatalog,
        glyphs: &'a dyn GlyphCatalog,
        font: Option<&'a FontSource>,
    ) -> Self {
        Self {
            icons,
            glyphs,
            font,
        }
    }

    /// Composite `desc` onto `dst`, overwriting its contents.
    pub(crate) fn composite(
        &self,
        desc: &AvatarDescription,
        dst: &mut vello_cpu::Pixmap,
    ) -> AvatyrResult<()> {
        let dim = canvas_dimension(dst)?;
        match desc {
            AvatarDescription::Icon { resource, color } => {
                self.composite_icon(resource, *color, dim, dst)
            }
            AvatarDescription::Vector { key, color } => {
                self.composite_vector(key, *color, dim, dst)
            }
            AvatarDescription::Text { text, color } => {
                self.composite_text(text, *color, dim, dst)
            }
            AvatarDescription::Photo { source, .. } => Err(AvatyrError::validation(format!(
                "photo avatar '{source}' bypasses canvas compositing"
            ))),
        }
    }

    fn composite_icon(
        &self,
        resource: &str,
        color: ColorPair,
        dim: u32,
        dst: &mut vello_cpu::Pixmap,
    ) -> AvatyrResult<()> {
        let tree = self
            .icons
            .lookup(resource)
            .ok_or_else(|| AvatyrError::lookup(format!("no icon resource for '{resource}'")))?;

        let pad = (f64::from(dim) * ICON_INSET_RATIO).round() as u32;
        let inner = dim.saturating_sub(pad * 2).max(1);
        let mut glyph = rasterize_svg_to_premul_rgba8(&tree, inner, inner)?;
        tint_premul_rgba8_in_place(&mut glyph, color.foreground);
        let img = rgba_premul_to_image(&glyph, inner, inner)?;

        let mut ctx = vello_cpu::RenderContext::new(dst.width(), dst.height());
        fill_background(&mut ctx, dim, color.background);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(inner),
            f64::from(inner),
        ));
        ctx.flush();
        ctx.render_to_pixmap(dst);
        Ok(())
    }

    fn composite_vector(
        &self,
        key: &str,
        color: ColorPair,
        dim: u32,
        dst: &mut vello_cpu::Pixmap,
    ) -> AvatyrResult<()> {
        let tree = self
            .glyphs
            .lookup(key)
            .ok_or_else(|| AvatyrError::lookup(format!("no vector glyph for key '{key}'")))?;

        // Glyphs carry their own colors; only the background comes from the pair.
        let bytes = rasterize_svg_to_premul_rgba8(&tree, dim, dim)?;
        let img = rgba_premul_to_image(&bytes, dim, dim)?;

        let mut ctx = vello_cpu::RenderContext::new(dst.width(), dst.height());
        fill_background(&mut ctx, dim, color.background);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(img);
        let s = f64::from(dim);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, s, s));
        ctx.flush();
        ctx.render_to_pixmap(dst);
        Ok(())
    }

    fn composite_text(
        &self,
        text: &str,
        color: ColorPair,
        dim: u32,
        dst: &mut vello_cpu::Pixmap,
    ) -> AvatyrResult<()> {
        let font = self.font.ok_or_else(|| {
            AvatyrError::validation("text avatars require a font; none was configured")
        })?;
        let badge = TextBadge::build(
            text,
            color,
            font,
            TextBadgeOpts {
                inverted: false,
                size: dim,
                shape: BadgeShape::Rect,
            },
        )?;
        dst.data_as_u8_slice_mut()
            .copy_from_slice(badge.rgba8_premul());
        Ok(())
    }
}

fn canvas_dimension(dst: &vello_cpu::Pixmap) -> AvatyrResult<u32> {
    if dst.width() == 0 || dst.width() != dst.height() {
        return Err(AvatyrError::validation(format!(
            "canvas must be a non-empty square, got {}x{}",
            dst.width(),
            dst.height()
        )));
    }
    Ok(u32::from(dst.width()))
}

fn fill_background(ctx: &mut vello_cpu::RenderContext, dim: u32, bg: Rgba8) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    let s = f64::from(dim);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, s, s));
}

/// Recolor a premultiplied glyph: its alpha becomes a mask for `tint`.
fn tint_premul_rgba8_in_place(pixels: &mut [u8], tint: Rgba8) {
    for px in pixels.chunks_exact_mut(4) {
        let a = mul_div255_u8(u16::from(px[3]), u16::from(tint.a));
        px[0] = mul_div255_u8(u16::from(tint.r), u16::from(a));
        px[1] = mul_div255_u8(u16::from(tint.g), u16::from(a));
        px[2] = mul_div255_u8(u16::from(tint.b), u16::from(a));
        px[3] = a;
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> AvatyrResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| AvatyrError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| AvatyrError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(AvatyrError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; the bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> AvatyrResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
