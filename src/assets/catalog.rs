use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::AvatyrResult;

/// Lookup interface for built-in icon and vector-glyph catalogs.
///
/// Both icon resources and vector glyphs resolve through the same shape:
/// a string key to a parsed SVG tree, or `None` when the key is unknown.
/// Missing keys are reported by the caller, never substituted.
pub trait GlyphCatalog: Send + Sync {
    /// Resolve `key` to a parsed glyph, or `None` if the catalog has no entry.
    fn lookup(&self, key: &str) -> Option<Arc<usvg::Tree>>;
}

/// In-memory [`GlyphCatalog`] over SVG sources parsed once at insert time.
#[derive(Default)]
pub struct SvgCatalog {
    by_key: HashMap<String, Arc<usvg::Tree>>,
}

impl SvgCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `svg` and register it under `key`, replacing any previous entry.
    pub fn insert_svg(&mut self, key: impl Into<String>, svg: &[u8]) -> AvatyrResult<()> {
        let key = key.into();
        let tree = usvg::Tree::from_data(svg, &usvg::Options::default())
            .with_context(|| format!("parse svg for key '{key}'"))?;
        self.by_key.insert(key, Arc::new(tree));
        Ok(())
    }

    /// Number of registered glyphs.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl GlyphCatalog for SvgCatalog {
    fn lookup(&self, key: &str) -> Option<Arc<usvg::Tree>> {
        self.by_key.get(key).cloned()
    }
}
