/// Convenience result type used across Avatyr.
pub type AvatyrResult<T> = Result<T, AvatyrError>;

/// Top-level error taxonomy used by renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum AvatyrError {
    /// Invalid caller-provided description or option data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A catalog lookup failed; the message names the offending key.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Raster-to-bytes compression failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Blob persistence failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Pass-through I/O error from the raw-photo read path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatyrError {
    /// Build an [`AvatyrError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AvatyrError::Lookup`] value.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Build an [`AvatyrError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build an [`AvatyrError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
