use std::sync::{Mutex, PoisonError};

use crate::foundation::core::validate_dimension;
use crate::foundation::error::AvatyrResult;

/// Pool configuration for cached canvases.
#[derive(Debug, Clone, Copy)]
pub struct CanvasPoolOpts {
    /// Maximum bytes retained in the free list.
    pub max_pool_bytes: usize,
    /// Maximum number of retained canvases.
    pub max_canvases: usize,
}

impl Default for CanvasPoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 64 * 1024 * 1024,
            max_canvases: 4,
        }
    }
}

/// Counters observed over the life of a [`CanvasPool`].
#[derive(Debug, Default, Clone)]
pub struct CanvasPoolStats {
    /// Canvases currently sitting in the free list.
    pub retained_canvases: usize,
    /// Bytes currently sitting in the free list.
    pub retained_bytes: usize,
    /// Fresh canvas allocations (leases not served from the free list).
    pub alloc_canvases: u64,
    /// Bytes of fresh canvas allocations.
    pub alloc_bytes: u64,
    /// Canvases dropped at release because a cap was hit.
    pub dropped_on_release: u64,
}

struct PoolInner {
    free: Vec<vello_cpu::Pixmap>,
    stats: CanvasPoolStats,
}

/// Bounded pooled allocator for the square RGBA8 canvases renders draw into.
///
/// All canvases in one pool share a single dimension, so the free list needs
/// no bucketing. Borrow/release happens at render granularity through
/// [`CanvasLease`] guards; the pool itself is shared behind `&self` so
/// concurrent render tasks can lease from it.
pub struct CanvasPool {
    dim_px: u16,
    opts: CanvasPoolOpts,
    inner: Mutex<PoolInner>,
}

impl CanvasPool {
    /// Create a pool whose canvases are `dimension` by `dimension` pixels.
    pub fn new(dimension: u32, opts: CanvasPoolOpts) -> AvatyrResult<Self> {
        validate_dimension(dimension)?;
        Ok(Self {
            dim_px: dimension as u16,
            opts,
            inner: Mutex::new(PoolInner {
                free: Vec::new(),
                stats: CanvasPoolStats::default(),
            }),
        })
    }

    /// Side length of every canvas in this pool, in pixels.
    pub fn dimension(&self) -> u32 {
        u32::from(self.dim_px)
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> CanvasPoolStats {
        self.lock().stats.clone()
    }

    /// Borrow a canvas, reusing a retained one when available.
    pub fn lease(&self) -> CanvasLease<'_> {
        let canvas = {
            let mut inner = self.lock();
            if let Some(mut p) = inner.free.pop() {
                inner.stats.retained_canvases = inner.stats.retained_canvases.saturating_sub(1);
                inner.stats.retained_bytes =
                    inner.stats.retained_bytes.saturating_sub(self.canvas_byte_len());
                // Stale pixels from the previous render must not show through
                // content that leaves transparency.
                p.data_as_u8_slice_mut().fill(0);
                Some(p)
            } else {
                inner.stats.alloc_canvases = inner.stats.alloc_canvases.saturating_add(1);
                inner.stats.alloc_bytes = inner
                    .stats
                    .alloc_bytes
                    .saturating_add(self.canvas_byte_len() as u64);
                None
            }
        };
        let canvas = canvas.unwrap_or_else(|| vello_cpu::Pixmap::new(self.dim_px, self.dim_px));
        CanvasLease { pool: self, canvas }
    }

    fn release(&self, pixmap: vello_cpu::Pixmap) {
        let bytes = self.canvas_byte_len();
        let mut inner = self.lock();
        if self.opts.max_pool_bytes == 0 || self.opts.max_canvases == 0 {
            inner.stats.dropped_on_release = inner.stats.dropped_on_release.saturating_add(1);
            return;
        }
        if inner.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
            || inner.free.len() >= self.opts.max_canvases
        {
            inner.stats.dropped_on_release = inner.stats.dropped_on_release.saturating_add(1);
            return;
        }
        inner.free.push(pixmap);
        inner.stats.retained_canvases = inner.stats.retained_canvases.saturating_add(1);
        inner.stats.retained_bytes = inner.stats.retained_bytes.saturating_add(bytes);
    }

    fn canvas_byte_len(&self) -> usize {
        usize::from(self.dim_px)
            .saturating_mul(usize::from(self.dim_px))
            .saturating_mul(4)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PoolInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII guard for a leased canvas. Dropping it returns the canvas to the pool.
pub struct CanvasLease<'a> {
    pool: &'a CanvasPool,
    canvas: vello_cpu::Pixmap,
}

impl CanvasLease<'_> {
    /// The leased canvas.
    pub fn canvas_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.canvas
    }
}

impl Drop for CanvasLease<'_> {
    fn drop(&mut self) {
        let canvas = std::mem::replace(&mut self.canvas, vello_cpu::Pixmap::new(0, 0));
        self.pool.release(canvas);
    }
}
