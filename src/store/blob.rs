use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::{AvatyrError, AvatyrResult};

const XXH3_SEED: u64 = 0x7c4e19d2b8f0a635;

const COPY_BUF_LEN: usize = 64 * 1024;

/// Content hash of a stored blob. Identical bytes get identical ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobId(pub u64);

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Reference to persisted bytes: id, on-disk location and exact length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHandle {
    /// Content hash of the stored bytes.
    pub id: BlobId,
    /// Where the bytes live for the duration of the session.
    pub path: PathBuf,
    /// Stored length in bytes.
    pub byte_len: u64,
}

/// Sink for encoded avatar bytes.
///
/// Implementations must be safe for concurrent use; render tasks store from
/// pool threads.
pub trait BlobStore: Send + Sync {
    /// Persist everything `reader` yields. `byte_len` is the expected total;
    /// a mismatch is a storage error.
    fn store(&self, reader: &mut dyn Read, byte_len: u64) -> AvatyrResult<BlobHandle>;
}

/// Session-scoped on-disk blob store.
///
/// Bytes are streamed to a `.part` file while hashing, then renamed to their
/// content-hash name. Storing the same content twice converges on one file.
/// A store created with [`SessionBlobStore::new`] owns its directory and
/// removes it on drop; [`SessionBlobStore::at_root`] leaves cleanup to the
/// caller.
pub struct SessionBlobStore {
    root: PathBuf,
    seq: AtomicU64,
    owns_root: bool,
}

impl SessionBlobStore {
    /// Create a store under a fresh process-unique temp directory.
    pub fn new() -> AvatyrResult<Self> {
        let root = std::env::temp_dir().join(format!(
            "avatyr_blobs_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        std::fs::create_dir_all(&root)
            .map_err(|e| AvatyrError::storage(format!("create blob root '{}': {e}", root.display())))?;
        Ok(Self {
            root,
            seq: AtomicU64::new(0),
            owns_root: true,
        })
    }

    /// Create a store under an existing caller-owned directory.
    pub fn at_root(root: impl Into<PathBuf>) -> AvatyrResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| AvatyrError::storage(format!("create blob root '{}': {e}", root.display())))?;
        Ok(Self {
            root,
            seq: AtomicU64::new(0),
            owns_root: false,
        })
    }

    /// Directory holding the stored blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for SessionBlobStore {
    fn store(&self, reader: &mut dyn Read, byte_len: u64) -> AvatyrResult<BlobHandle> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let part_path = self.root.join(format!("{seq}.part"));
        let mut part_guard = TempFileGuard(Some(part_path.clone()));

        let mut file = std::fs::File::create(&part_path).map_err(|e| {
            AvatyrError::storage(format!("create blob file '{}': {e}", part_path.display()))
        })?;

        let mut hasher = Xxh3::with_seed(XXH3_SEED);
        let mut written = 0u64;
        let mut buf = [0u8; COPY_BUF_LEN];
        loop {
            // Read failures surface as the reader's own I/O error.
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            file.write_all(&buf[..n])
                .map_err(|e| AvatyrError::storage(format!("write blob bytes: {e}")))?;
            written += n as u64;
        }
        drop(file);

        if written != byte_len {
            return Err(AvatyrError::storage(format!(
                "blob length mismatch: expected {byte_len} bytes, wrote {written}"
            )));
        }

        let id = BlobId(hasher.digest());
        let final_path = self.root.join(format!("{id}.blob"));
        std::fs::rename(&part_path, &final_path).map_err(|e| {
            AvatyrError::storage(format!("commit blob '{}': {e}", final_path.display()))
        })?;
        part_guard.0 = None;

        Ok(BlobHandle {
            id,
            path: final_path,
            byte_len: written,
        })
    }
}

impl Drop for SessionBlobStore {
    fn drop(&mut self) {
        if self.owns_root {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/blob.rs"]
mod tests;
