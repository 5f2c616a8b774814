//! Persistence collaborators for the render pipeline.

/// Content-hashed persistence of encoded avatar bytes.
pub mod blob;
/// Read access to previously imported photo bytes.
pub mod photo;
