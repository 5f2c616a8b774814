pub use kurbo::Circle;

/// Square pixel dimension shared by all canvas-rendered avatar variants.
pub const AVATAR_DIM: u32 = 1024;

/// Smallest canvas or badge dimension accepted by the renderer.
///
/// Below this the font-size search space collapses and the output is
/// unreadable anyway.
pub const MIN_DIM: u32 = 16;

/// Largest canvas or badge dimension accepted by the renderer.
///
/// Pixmaps index rows and columns with `u16`.
pub const MAX_DIM: u32 = u16::MAX as u32;

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = u16::from(a);
        let premul = |c: u8| crate::foundation::math::mul_div255_u8(u16::from(c), a16);

        Self {
            r: premul(r),
            g: premul(g),
            b: premul(b),
            a,
        }
    }
}

/// Validate a square canvas/badge dimension against the supported range.
pub(crate) fn validate_dimension(dim: u32) -> crate::foundation::error::AvatyrResult<()> {
    if dim < MIN_DIM || dim > MAX_DIM {
        return Err(crate::foundation::error::AvatyrError::validation(format!(
            "dimension {dim} out of range [{MIN_DIM}, {MAX_DIM}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
