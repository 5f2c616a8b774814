//! External-asset plumbing: colors, SVG catalogs and rasterization, font sources.

pub mod catalog;
pub mod color;
pub mod font;
pub(crate) mod raster;
