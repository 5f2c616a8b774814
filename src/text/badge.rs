use crate::assets::font::{FontSource, TextBrushRgba8, TextShaper};
use crate::foundation::core::{AVATAR_DIM, Circle, Rgba8Premul, validate_dimension};
use crate::foundation::error::{AvatyrError, AvatyrResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::model::ColorPair;
use crate::text::fit::fit_font_size;

/// Outline of the badge background fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BadgeShape {
    /// Fill the full square.
    #[default]
    Rect,
    /// Fill an inscribed circle; the corners stay transparent.
    Circle,
}

/// Options for [`TextBadge::build`].
#[derive(Clone, Copy, Debug)]
pub struct TextBadgeOpts {
    /// Swap foreground and background colors.
    pub inverted: bool,
    /// Square badge dimension in pixels.
    pub size: u32,
    /// Background outline.
    pub shape: BadgeShape,
}

impl Default for TextBadgeOpts {
    fn default() -> Self {
        Self {
            inverted: false,
            size: AVATAR_DIM,
            shape: BadgeShape::Rect,
        }
    }
}

/// A rendered text badge: short text centered over a filled square or circle.
///
/// Badges are self-contained drawables. Building one performs the font-size
/// fit and rasterization but no encoding and no persistence, so it is usable
/// far from the render pipeline (list thumbnails, previews, tests).
#[derive(Clone, Debug)]
pub struct TextBadge {
    size: u32,
    font_px: u32,
    shape: BadgeShape,
    rgba8_premul: Vec<u8>,
}

impl TextBadge {
    /// Fit, lay out and rasterize `text` with the given colors.
    pub fn build(
        text: &str,
        color: ColorPair,
        font: &FontSource,
        opts: TextBadgeOpts,
    ) -> AvatyrResult<Self> {
        if text.trim().is_empty() {
            return Err(AvatyrError::validation("badge text must be non-empty"));
        }
        if text.contains(['\n', '\r']) {
            return Err(AvatyrError::validation("badge text must be a single line"));
        }
        validate_dimension(opts.size)?;
        let side = u16::try_from(opts.size)
            .map_err(|_| AvatyrError::validation("badge size exceeds u16"))?;

        let pair = if opts.inverted {
            color.inverted()
        } else {
            color
        };

        let mut shaper = TextShaper::new(font)?;
        let font_px = fit_font_size(|px| shaper.measure_width(text, px as f32), opts.size)?;
        let layout = shaper.layout(text, font_px as f32, TextBrushRgba8::from(pair.foreground))?;

        let mut ctx = vello_cpu::RenderContext::new(side, side);

        let bg = pair.background;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        match opts.shape {
            BadgeShape::Rect => {
                let s = f64::from(opts.size);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, s, s));
            }
            BadgeShape::Circle => {
                let half = f64::from(opts.size) * 0.5;
                let circle = Circle::new((half, half), half);
                ctx.fill_path(&circle_to_cpu_path(&circle));
            }
        }

        let tx = (opts.size as f32 - layout.width()) * 0.5;
        let ty = (opts.size as f32 - layout.height()) * 0.5;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(tx),
            f64::from(ty),
        )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(shaper.font_data())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(side, side);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(Self {
            size: opts.size,
            font_px,
            shape: opts.shape,
            rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    /// Square badge dimension in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Fitted integer font size in pixels.
    pub fn font_px(&self) -> u32 {
        self.font_px
    }

    /// Background outline this badge was built with.
    pub fn shape(&self) -> BadgeShape {
        self.shape
    }

    /// Row-major premultiplied RGBA8 pixels, `size * size * 4` bytes.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Pixel value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the badge.
    pub fn pixel_at(&self, x: u32, y: u32) -> Rgba8Premul {
        assert!(x < self.size && y < self.size, "pixel out of badge bounds");
        let i = ((y * self.size + x) * 4) as usize;
        let px = &self.rgba8_premul[i..i + 4];
        Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }

    /// Copy of the pixels converted to straight (non-premultiplied) alpha.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

// The badge's own geometry lives in `kurbo`; vello_cpu re-exports its own
// kurbo version, so path elements are converted one at a time.
fn circle_to_cpu_path(circle: &Circle) -> vello_cpu::kurbo::BezPath {
    use kurbo::{PathEl, Shape};

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in circle.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/badge.rs"]
mod tests;
