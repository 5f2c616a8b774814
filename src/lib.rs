//! Avatyr renders avatar descriptions into encoded, persisted images.
//!
//! An avatar is described by one of four variants (tinted icon, vector
//! glyph, stored photo, initials text). The public API is renderer-oriented:
//!
//! - Describe the avatar with an [`AvatarDescription`]
//! - Build an [`AvatarRenderer`] over catalog and storage collaborators
//! - Submit renders with success/failure continuations, or wait with
//!   [`AvatarRenderer::render_blocking`]
//! - Build a standalone [`TextBadge`] when no pipeline is needed
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// JPEG encoding of rendered canvases.
pub mod encode;
/// Avatar descriptions, color pairs and media records.
pub mod model;
/// Background render pipeline.
pub mod pipeline;
/// Canvas allocation and per-variant compositing.
pub mod render;
/// Persistence collaborators for the render pipeline.
pub mod store;
/// Text badges and font-size fitting.
pub mod text;

pub use crate::assets::catalog::{GlyphCatalog, SvgCatalog};
pub use crate::assets::color::Rgba8;
pub use crate::assets::font::FontSource;
pub use crate::foundation::core::{AVATAR_DIM, Rgba8Premul};
pub use crate::foundation::error::{AvatyrError, AvatyrResult};

pub use crate::encode::{JPEG_QUALITY, MIME_JPEG};
pub use crate::model::{AvatarDescription, ColorPair, Media};
pub use crate::pipeline::{AvatarRenderer, RendererOpts, RendererStats, RendererStores};
pub use crate::render::canvas::{CanvasPool, CanvasPoolOpts, CanvasPoolStats};
pub use crate::store::blob::{BlobHandle, BlobId, BlobStore, SessionBlobStore};
pub use crate::store::photo::{DirPhotoStore, PhotoStore};
pub use crate::text::badge::{BadgeShape, TextBadge, TextBadgeOpts};
