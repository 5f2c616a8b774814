//! Canvas allocation and per-variant compositing.

/// Bounded pool of reusable square canvases.
pub mod canvas;
/// Draws one avatar description onto a canvas.
pub(crate) mod compositor;
