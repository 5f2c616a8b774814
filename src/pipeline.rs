use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::assets::catalog::GlyphCatalog;
use crate::assets::font::FontSource;
use crate::encode::{JPEG_QUALITY, MIME_JPEG, encode_jpeg_premul};
use crate::foundation::core::{AVATAR_DIM, validate_dimension};
use crate::foundation::error::{AvatyrError, AvatyrResult};
use crate::model::{AvatarDescription, Media};
use crate::render::canvas::{CanvasPool, CanvasPoolOpts, CanvasPoolStats};
use crate::render::compositor::Compositor;
use crate::store::blob::BlobStore;
use crate::store::photo::PhotoStore;

/// Renderer configuration.
#[derive(Clone, Copy, Debug)]
pub struct RendererOpts {
    /// Square output dimension in pixels for canvas variants.
    pub dimension: u32,
    /// JPEG encode quality, 1..=100.
    pub jpeg_quality: u8,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            dimension: AVATAR_DIM,
            jpeg_quality: JPEG_QUALITY,
            threads: None,
        }
    }
}

impl RendererOpts {
    /// Check option ranges without building a renderer.
    pub fn validate(&self) -> AvatyrResult<()> {
        validate_dimension(self.dimension)?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(AvatyrError::validation(format!(
                "jpeg quality {} out of range [1, 100]",
                self.jpeg_quality
            )));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(AvatyrError::validation("'threads' must be >= 1 when set"));
        }
        Ok(())
    }
}

/// Aggregated renderer counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Render requests accepted for execution.
    pub submitted: u64,
    /// Requests that delivered a [`Media`] to the success continuation.
    pub completed: u64,
    /// Requests that delivered an error to the failure continuation.
    pub failed: u64,
}

/// External collaborators a renderer draws from.
#[derive(Clone)]
pub struct RendererStores {
    /// Catalog resolving icon resource names.
    pub icons: Arc<dyn GlyphCatalog>,
    /// Catalog resolving vector glyph keys.
    pub glyphs: Arc<dyn GlyphCatalog>,
    /// Persistence sink for encoded avatar bytes.
    pub blobs: Arc<dyn BlobStore>,
    /// Source of previously imported photo bytes.
    pub photos: Arc<dyn PhotoStore>,
    /// Font used by text avatars. `None` makes text renders fail.
    pub font: Option<FontSource>,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

struct RendererShared {
    opts: RendererOpts,
    stores: RendererStores,
    canvases: CanvasPool,
    counters: Counters,
}

impl RendererShared {
    #[tracing::instrument(skip(self))]
    fn render_one(&self, desc: &AvatarDescription) -> AvatyrResult<Media> {
        desc.validate()?;
        match desc {
            AvatarDescription::Photo { source, byte_size } => {
                self.store_photo(source, *byte_size)
            }
            _ => self.render_canvas(desc),
        }
    }

    /// Canvas path: composite, encode, persist. A compositor or encode
    /// failure returns immediately; the lease guard hands the canvas back on
    /// every exit.
    fn render_canvas(&self, desc: &AvatarDescription) -> AvatyrResult<Media> {
        let mut lease = self.canvases.lease();
        let compositor = Compositor::new(
            self.stores.icons.as_ref(),
            self.stores.glyphs.as_ref(),
            self.stores.font.as_ref(),
        );
        compositor.composite(desc, lease.canvas_mut())?;
        let encoded = encode_jpeg_premul(lease.canvas_mut(), self.opts.jpeg_quality)?;
        // Persistence does file I/O; return the canvas first.
        drop(lease);

        let byte_len = encoded.len() as u64;
        let handle = self.stores.blobs.store(&mut encoded.as_slice(), byte_len)?;
        Ok(Media {
            handle,
            mime_type: MIME_JPEG.to_string(),
            timestamp_millis: now_millis(),
            width: self.opts.dimension,
            height: self.opts.dimension,
            byte_size: byte_len,
        })
    }

    /// Photo path: stream stored bytes straight into blob persistence. No
    /// canvas, no decode, no recompress.
    fn store_photo(&self, source: &str, byte_size: u64) -> AvatyrResult<Media> {
        let mut reader = self.stores.photos.open(source)?;
        let handle = self.stores.blobs.store(reader.as_mut(), byte_size)?;
        let byte_len = handle.byte_len;
        Ok(Media {
            handle,
            mime_type: MIME_JPEG.to_string(),
            timestamp_millis: now_millis(),
            width: self.opts.dimension,
            height: self.opts.dimension,
            byte_size: byte_len,
        })
    }
}

/// Renders avatar descriptions on a bounded worker pool.
///
/// Each request is an independent task: it owns one canvas lease, runs the
/// variant compositor, encodes to JPEG and persists the bytes, then invokes
/// exactly one of the two continuations from the pool thread. Submission
/// never blocks the caller and no ordering is guaranteed between requests.
pub struct AvatarRenderer {
    shared: Arc<RendererShared>,
    pool: rayon::ThreadPool,
}

impl AvatarRenderer {
    /// Build a renderer over the given collaborators.
    pub fn new(stores: RendererStores, opts: RendererOpts) -> AvatyrResult<Self> {
        opts.validate()?;
        let pool = build_thread_pool(opts.threads)?;
        let canvases = CanvasPool::new(opts.dimension, CanvasPoolOpts::default())?;
        Ok(Self {
            shared: Arc::new(RendererShared {
                opts,
                stores,
                canvases,
                counters: Counters::default(),
            }),
            pool,
        })
    }

    /// Submit one render. Exactly one of `on_success` / `on_failure` runs,
    /// on a pool thread, once the task finishes.
    pub fn render<S, F>(&self, desc: AvatarDescription, on_success: S, on_failure: F)
    where
        S: FnOnce(Media) + Send + 'static,
        F: FnOnce(AvatyrError) + Send + 'static,
    {
        self.shared
            .counters
            .submitted
            .fetch_add(1, Ordering::Relaxed);
        let shared = Arc::clone(&self.shared);
        self.pool.spawn(move || match shared.render_one(&desc) {
            Ok(media) => {
                shared.counters.completed.fetch_add(1, Ordering::Relaxed);
                on_success(media);
            }
            Err(err) => {
                shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                on_failure(err);
            }
        });
    }

    /// Submit one render and wait for its result. Convenience for CLIs and
    /// tests; the continuation API stays the primary surface.
    pub fn render_blocking(&self, desc: AvatarDescription) -> AvatyrResult<Media> {
        let (tx, rx) = std::sync::mpsc::channel();
        let tx_err = tx.clone();
        self.render(
            desc,
            move |media| {
                let _ = tx.send(Ok(media));
            },
            move |err| {
                let _ = tx_err.send(Err(err));
            },
        );
        rx.recv().map_err(|_| {
            AvatyrError::Other(anyhow::anyhow!(
                "render task dropped before delivering a result"
            ))
        })?
    }

    /// Snapshot of the submission counters.
    pub fn stats(&self) -> RendererStats {
        RendererStats {
            submitted: self.shared.counters.submitted.load(Ordering::Relaxed),
            completed: self.shared.counters.completed.load(Ordering::Relaxed),
            failed: self.shared.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Snapshot of the canvas pool counters.
    pub fn canvas_stats(&self) -> CanvasPoolStats {
        self.shared.canvases.stats()
    }

    /// Square output dimension this renderer produces.
    pub fn dimension(&self) -> u32 {
        self.shared.opts.dimension
    }
}

fn build_thread_pool(threads: Option<usize>) -> AvatyrResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(AvatyrError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    Ok(builder.build().context("failed to build rayon thread pool")?)
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
