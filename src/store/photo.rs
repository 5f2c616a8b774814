use std::io::Read;
use std::path::{Path, PathBuf};

use crate::foundation::error::{AvatyrError, AvatyrResult};

/// Source of previously imported raw photo bytes.
///
/// The render pipeline never decodes these bytes; it streams them straight
/// into blob persistence.
pub trait PhotoStore: Send + Sync {
    /// Open the raw bytes behind `source` for reading.
    fn open(&self, source: &str) -> AvatyrResult<Box<dyn Read + Send>>;
}

/// Photo store backed by a directory of imported files.
///
/// Sources are relative paths resolved inside `root`; escapes via absolute
/// paths or `..` are rejected before touching the filesystem.
pub struct DirPhotoStore {
    root: PathBuf,
}

impl DirPhotoStore {
    /// Create a store resolving sources inside `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the sources resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PhotoStore for DirPhotoStore {
    fn open(&self, source: &str) -> AvatyrResult<Box<dyn Read + Send>> {
        let rel = normalize_source_path(source)?;
        // Missing or unreadable files pass through as the underlying I/O error.
        let file = std::fs::File::open(self.root.join(rel))?;
        Ok(Box::new(file))
    }
}

pub(crate) fn normalize_source_path(source: &str) -> AvatyrResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(AvatyrError::validation("photo sources must be relative"));
    }
    if s.is_empty() {
        return Err(AvatyrError::validation("photo source must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(AvatyrError::validation(
                "photo sources must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(AvatyrError::validation(
            "photo source must contain a file name",
        ));
    }

    Ok(out.join("/"))
}
