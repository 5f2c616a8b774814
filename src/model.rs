//! Avatar description model: the variant-tagged input consumed by the
//! renderer, plus the media record produced on success.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::color::Rgba8;
use crate::foundation::error::{AvatyrError, AvatyrResult};
use crate::store::blob::BlobHandle;

/// Foreground/background color pair supplied by the palette catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    /// Color used for tinted icons and text glyphs.
    pub foreground: Rgba8,
    /// Color filling the canvas behind the subject.
    pub background: Rgba8,
}

impl ColorPair {
    /// Construct a pair from foreground and background colors.
    pub fn new(foreground: Rgba8, background: Rgba8) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// The same pair with foreground and background swapped.
    pub fn inverted(self) -> Self {
        Self {
            foreground: self.background,
            background: self.foreground,
        }
    }
}

/// What to render: one immutable variant per avatar kind.
///
/// A description is consumed by a single render call; it carries no state
/// beyond its fields and no lifecycle of its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarDescription {
    /// Built-in icon resource tinted with `color.foreground` over a
    /// `color.background` fill, inset from the canvas edges.
    Icon {
        /// Icon resource key resolved through the icon catalog.
        resource: String,
        /// Tint and fill colors.
        color: ColorPair,
    },
    /// Built-in vector glyph stretched across the full canvas. The glyph
    /// carries its own colors; only the background fill comes from `color`.
    Vector {
        /// Glyph key resolved through the vector catalog.
        key: String,
        /// Fill colors (foreground unused by this variant).
        color: ColorPair,
    },
    /// Previously-imported photo bytes, streamed to storage untouched.
    Photo {
        /// Source name resolved through the photo store.
        source: String,
        /// Known size of the raw bytes.
        byte_size: u64,
    },
    /// Short user text (initials) drawn centered over a background fill.
    Text {
        /// Single line of text to draw.
        text: String,
        /// Glyph and fill colors.
        color: ColorPair,
    },
}

impl AvatarDescription {
    /// Parse a description from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> AvatyrResult<Self> {
        let desc: Self = serde_json::from_reader(r)
            .map_err(|e| AvatyrError::validation(format!("parse avatar description JSON: {e}")))?;
        Ok(desc)
    }

    /// Parse a description from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AvatyrResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AvatyrError::validation(format!(
                "open avatar description JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the structural invariants shared by all render paths.
    pub fn validate(&self) -> AvatyrResult<()> {
        match self {
            Self::Icon { resource, .. } => {
                if resource.is_empty() {
                    return Err(AvatyrError::validation("icon resource must be non-empty"));
                }
            }
            Self::Vector { key, .. } => {
                if key.is_empty() {
                    return Err(AvatyrError::validation("vector key must be non-empty"));
                }
            }
            Self::Photo { source, byte_size } => {
                if source.is_empty() {
                    return Err(AvatyrError::validation("photo source must be non-empty"));
                }
                if *byte_size == 0 {
                    return Err(AvatyrError::validation("photo byte_size must be > 0"));
                }
            }
            Self::Text { text, .. } => {
                if text.trim().is_empty() {
                    return Err(AvatyrError::validation("text must be non-empty"));
                }
                if text.contains(['\n', '\r']) {
                    return Err(AvatyrError::validation("text must be a single line"));
                }
            }
        }
        Ok(())
    }

    /// Variant tag, matching the serialized form.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Icon { .. } => "icon",
            Self::Vector { .. } => "vector",
            Self::Photo { .. } => "photo",
            Self::Text { .. } => "text",
        }
    }
}

/// Descriptor of a finished render: the persisted bytes plus metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Handle to the persisted encoded bytes.
    pub handle: BlobHandle,
    /// MIME type of the encoded bytes.
    pub mime_type: String,
    /// Wall-clock completion time in milliseconds since the Unix epoch.
    pub timestamp_millis: u64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Length of the stored byte sequence.
    pub byte_size: u64,
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
