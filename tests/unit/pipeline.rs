use super::*;

use std::collections::HashMap;
use std::io::Read;
use std::sync::Mutex;
use std::sync::mpsc;

use crate::assets::catalog::SvgCatalog;
use crate::assets::color::Rgba8;
use crate::model::ColorPair;
use crate::store::blob::{BlobHandle, BlobId};

const RED_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4" viewBox="0 0 4 4"><rect width="4" height="4" fill="#ff0000"/></svg>"##;

/// Blob store capturing stored bytes in memory.
#[derive(Default)]
struct MemBlobStore {
    stored: Mutex<Vec<Vec<u8>>>,
    seq: AtomicU64,
}

impl MemBlobStore {
    fn stored(&self) -> Vec<Vec<u8>> {
        self.stored.lock().unwrap().clone()
    }
}

impl BlobStore for MemBlobStore {
    fn store(&self, reader: &mut dyn Read, byte_len: u64) -> AvatyrResult<BlobHandle> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.len() as u64 != byte_len {
            return Err(AvatyrError::storage(format!(
                "expected {byte_len} bytes, got {}",
                bytes.len()
            )));
        }
        let id = BlobId(self.seq.fetch_add(1, Ordering::Relaxed));
        let len = bytes.len() as u64;
        self.stored.lock().unwrap().push(bytes);
        Ok(BlobHandle {
            id,
            path: std::path::PathBuf::from(format!("{id}.blob")),
            byte_len: len,
        })
    }
}

struct MemPhotoStore {
    files: HashMap<String, Vec<u8>>,
}

impl PhotoStore for MemPhotoStore {
    fn open(&self, source: &str) -> AvatyrResult<Box<dyn Read + Send>> {
        let bytes = self
            .files
            .get(source)
            .cloned()
            .ok_or_else(|| AvatyrError::lookup(format!("no photo '{source}'")))?;
        Ok(Box::new(std::io::Cursor::new(bytes)))
    }
}

fn stub_stores(photos: HashMap<String, Vec<u8>>) -> (RendererStores, Arc<MemBlobStore>) {
    let mut catalog = SvgCatalog::new();
    catalog.insert_svg("square", RED_SVG.as_bytes()).unwrap();
    let catalog = Arc::new(catalog);
    let blobs = Arc::new(MemBlobStore::default());

    let stores = RendererStores {
        icons: catalog.clone(),
        glyphs: catalog,
        blobs: blobs.clone(),
        photos: Arc::new(MemPhotoStore { files: photos }),
        font: None,
    };
    (stores, blobs)
}

fn stub_renderer(photos: HashMap<String, Vec<u8>>) -> (AvatarRenderer, Arc<MemBlobStore>) {
    let (stores, blobs) = stub_stores(photos);
    let opts = RendererOpts {
        dimension: 32,
        threads: Some(2),
        ..Default::default()
    };
    (AvatarRenderer::new(stores, opts).unwrap(), blobs)
}

fn vector_desc(key: &str) -> AvatarDescription {
    AvatarDescription::Vector {
        key: key.to_string(),
        color: ColorPair::new(Rgba8::BLACK, Rgba8::WHITE),
    }
}

#[test]
fn default_opts_validate() {
    assert!(RendererOpts::default().validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_opts() {
    let bad_dim = RendererOpts {
        dimension: 0,
        ..Default::default()
    };
    assert!(bad_dim.validate().is_err());

    for q in [0u8, 101] {
        let bad_quality = RendererOpts {
            jpeg_quality: q,
            ..Default::default()
        };
        assert!(bad_quality.validate().is_err(), "quality {q}");
    }

    let bad_threads = RendererOpts {
        threads: Some(0),
        ..Default::default()
    };
    assert!(bad_threads.validate().is_err());
    let (stores, _) = stub_stores(HashMap::new());
    assert!(AvatarRenderer::new(stores, bad_threads).is_err());
}

#[test]
fn stats_start_at_zero() {
    let (renderer, _) = stub_renderer(HashMap::new());
    assert_eq!(renderer.stats(), RendererStats::default());
    assert_eq!(renderer.canvas_stats().alloc_canvases, 0);
}

#[test]
fn invalid_descriptions_fail_before_compositing() {
    let (renderer, blobs) = stub_renderer(HashMap::new());
    let desc = AvatarDescription::Photo {
        source: String::new(),
        byte_size: 1,
    };

    let err = renderer.render_blocking(desc).unwrap_err();
    assert!(matches!(err, AvatyrError::Validation(_)));

    let stats = renderer.stats();
    assert_eq!((stats.submitted, stats.completed, stats.failed), (1, 0, 1));
    assert_eq!(renderer.canvas_stats().alloc_canvases, 0);
    assert!(blobs.stored().is_empty());
}

#[test]
fn unknown_vector_key_fails_the_task() {
    let (renderer, blobs) = stub_renderer(HashMap::new());

    let err = renderer.render_blocking(vector_desc("nope")).unwrap_err();
    assert!(matches!(err, AvatyrError::Lookup(_)));
    assert!(err.to_string().contains("nope"), "{err}");

    assert_eq!(renderer.stats().failed, 1);
    // The task leased a canvas and the guard returned it on the error path.
    let canvases = renderer.canvas_stats();
    assert_eq!(canvases.alloc_canvases, 1);
    assert_eq!(canvases.retained_canvases, 1);
    assert!(blobs.stored().is_empty());
}

#[test]
fn vector_render_persists_jpeg_bytes() {
    let (renderer, blobs) = stub_renderer(HashMap::new());

    let media = renderer.render_blocking(vector_desc("square")).unwrap();
    assert_eq!(media.mime_type, MIME_JPEG);
    assert_eq!((media.width, media.height), (32, 32));
    assert!(media.byte_size > 0);
    assert_eq!(media.handle.byte_len, media.byte_size);

    let stored = blobs.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(&stored[0][..2], &[0xFF, 0xD8]);
    assert_eq!(stored[0].len() as u64, media.byte_size);
    assert_eq!(renderer.stats().completed, 1);
}

#[test]
fn photos_stream_through_without_a_canvas() {
    let raw = b"raw photo bytes".to_vec();
    let mut files = HashMap::new();
    files.insert("pic.jpg".to_string(), raw.clone());
    let (renderer, blobs) = stub_renderer(files);

    let desc = AvatarDescription::Photo {
        source: "pic.jpg".to_string(),
        byte_size: raw.len() as u64,
    };
    let media = renderer.render_blocking(desc).unwrap();

    assert_eq!(media.byte_size, raw.len() as u64);
    assert_eq!(blobs.stored(), vec![raw]);
    assert_eq!(renderer.canvas_stats().alloc_canvases, 0);
}

#[test]
fn each_render_runs_exactly_one_continuation() {
    let (renderer, _) = stub_renderer(HashMap::new());
    let (tx, rx) = mpsc::channel();

    let descs = [
        vector_desc("square"),
        vector_desc("missing"),
        vector_desc("square"),
    ];
    for desc in descs {
        let tx_ok = tx.clone();
        let tx_err = tx.clone();
        renderer.render(
            desc,
            move |media| {
                let _ = tx_ok.send(Ok(media));
            },
            move |err| {
                let _ = tx_err.send(Err(err));
            },
        );
    }
    drop(tx);

    let results: Vec<AvatyrResult<Media>> = rx.iter().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);

    let stats = renderer.stats();
    assert_eq!((stats.submitted, stats.completed, stats.failed), (3, 2, 1));
}
