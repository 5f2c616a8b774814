//! Shared foundation: error taxonomy, pixel-format types, and small pixel math.

pub mod core;
pub mod error;
pub(crate) mod math;
