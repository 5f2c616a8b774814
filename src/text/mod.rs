//! Text sizing and standalone text badges.
//!
//! The fit search and badge builder are usable on their own; the render
//! pipeline's text compositor is a thin wrapper over them.

/// Standalone text-badge drawable builder.
pub mod badge;
pub(crate) mod fit;
