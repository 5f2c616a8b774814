use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{AvatyrError, AvatyrResult};

/// Process-wide font bytes for text avatars and badges.
///
/// Load once and clone freely; the underlying bytes are shared. There is no
/// hidden global: callers decide where the single load happens.
#[derive(Clone)]
pub struct FontSource {
    bytes: Arc<Vec<u8>>,
}

impl FontSource {
    /// Read a font file (TTF/OTF) from disk.
    pub fn from_path(path: impl AsRef<Path>) -> AvatyrResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            AvatyrError::validation(format!("read font file '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    /// Wrap already-loaded font bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> AvatyrResult<Self> {
        if bytes.is_empty() {
            return Err(AvatyrError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSource")
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

impl From<crate::assets::color::Rgba8> for TextBrushRgba8 {
    fn from(c: crate::assets::color::Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Stateful helper for shaping single-line text with one fixed font.
///
/// The font is registered into the Parley collection once at construction;
/// repeated layout calls (the fit search measures many candidate sizes)
/// reuse the resolved family.
pub(crate) struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextShaper")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl TextShaper {
    /// Register `source` into fresh Parley contexts.
    pub(crate) fn new(source: &FontSource) -> AvatyrResult<Self> {
        let mut font_ctx = parley::FontContext::default();

        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(source.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            AvatyrError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AvatyrError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(source.bytes().to_vec()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Shape and lay out one line of text at `size_px`.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> AvatyrResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AvatyrError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Measured advance width of `text` laid out on a single line at `size_px`.
    pub(crate) fn measure_width(&mut self, text: &str, size_px: f32) -> AvatyrResult<f32> {
        Ok(self.layout(text, size_px, TextBrushRgba8::default())?.width())
    }

    /// Font data handle for glyph drawing.
    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
