use super::*;

use std::io;
use std::path::PathBuf;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "avatyr_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn blob_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn store_persists_bytes_under_their_hash() {
    let store = SessionBlobStore::new().unwrap();
    let bytes = b"encoded avatar bytes";

    let handle = store.store(&mut &bytes[..], bytes.len() as u64).unwrap();

    assert_eq!(handle.byte_len, bytes.len() as u64);
    assert_eq!(std::fs::read(&handle.path).unwrap(), bytes);
    let name = handle.path.file_name().unwrap().to_str().unwrap();
    assert_eq!(name, format!("{}.blob", handle.id));
    assert_eq!(handle.id.to_string().len(), 16);
}

#[test]
fn identical_content_converges_on_one_file() {
    let store = SessionBlobStore::new().unwrap();
    let bytes = b"same bytes twice";

    let first = store.store(&mut &bytes[..], bytes.len() as u64).unwrap();
    let second = store.store(&mut &bytes[..], bytes.len() as u64).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.path, second.path);
    assert_eq!(blob_files(store.root()).len(), 1);
}

#[test]
fn distinct_content_gets_distinct_ids() {
    let store = SessionBlobStore::new().unwrap();
    let a = store.store(&mut &b"aaaa"[..], 4).unwrap();
    let b = store.store(&mut &b"bbbb"[..], 4).unwrap();
    assert_ne!(a.id, b.id);
    assert_ne!(a.path, b.path);
}

#[test]
fn length_mismatch_is_a_storage_error_and_leaves_no_partial() {
    let store = SessionBlobStore::new().unwrap();
    let bytes = b"short";

    let err = store
        .store(&mut &bytes[..], bytes.len() as u64 + 1)
        .unwrap_err();

    assert!(matches!(err, AvatyrError::Storage(_)));
    assert!(err.to_string().contains("length mismatch"), "{err}");
    assert!(blob_files(store.root()).is_empty());
}

#[test]
fn reader_failures_pass_through_and_leave_no_partial() {
    struct BrokenReader;
    impl io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe burst"))
        }
    }

    let store = SessionBlobStore::new().unwrap();
    let err = store.store(&mut BrokenReader, 4).unwrap_err();

    match err {
        AvatyrError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected io error, got {other:?}"),
    }
    assert!(blob_files(store.root()).is_empty());
}

#[test]
fn owned_root_is_removed_on_drop() {
    let store = SessionBlobStore::new().unwrap();
    let root = store.root().to_path_buf();
    store.store(&mut &b"ephemeral"[..], 9).unwrap();
    assert!(root.exists());

    drop(store);
    assert!(!root.exists());
}

#[test]
fn caller_root_survives_drop() {
    let dir = temp_dir("blob_caller_root");
    let store = SessionBlobStore::at_root(&dir).unwrap();
    let handle = store.store(&mut &b"kept"[..], 4).unwrap();

    drop(store);
    assert!(dir.exists());
    assert_eq!(std::fs::read(handle.path).unwrap(), b"kept");

    let _ = std::fs::remove_dir_all(dir);
}
