use std::sync::Arc;

use avatyr::{
    AvatarDescription, AvatarRenderer, ColorPair, DirPhotoStore, RendererOpts, RendererStores,
    Rgba8, SessionBlobStore, SvgCatalog,
};

const PERSON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><circle cx="12" cy="8" r="4" fill="#000000"/><path d="M4,20 C4,14 20,14 20,20 Z" fill="#000000"/></svg>"##;
const ROCKET_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M12,2 C16,6 16,14 12,22 C8,14 8,6 12,2 Z" fill="#d64545"/><circle cx="12" cy="9" r="2" fill="#ffffff"/></svg>"##;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut catalog = SvgCatalog::new();
    catalog.insert_svg("person", PERSON_SVG.as_bytes())?;
    catalog.insert_svg("rocket", ROCKET_SVG.as_bytes())?;
    let catalog = Arc::new(catalog);

    let stores = RendererStores {
        icons: catalog.clone(),
        glyphs: catalog,
        blobs: Arc::new(SessionBlobStore::new()?),
        photos: Arc::new(DirPhotoStore::new(".")),
        font: None,
    };
    let opts = RendererOpts {
        dimension: 256,
        ..Default::default()
    };
    let renderer = AvatarRenderer::new(stores, opts)?;

    let samples = [
        (
            "avatar_icon.jpg",
            AvatarDescription::Icon {
                resource: "person".to_string(),
                color: ColorPair::new(Rgba8::WHITE, Rgba8::rgb(0x33, 0x66, 0x99)),
            },
        ),
        (
            "avatar_vector.jpg",
            AvatarDescription::Vector {
                key: "rocket".to_string(),
                color: ColorPair::new(Rgba8::BLACK, Rgba8::rgb(0xf2, 0xe8, 0xd5)),
            },
        ),
    ];

    for (name, desc) in samples {
        let media = renderer.render_blocking(desc)?;
        let out_path = std::path::Path::new("target").join(name);
        std::fs::copy(&media.handle.path, &out_path)?;
        eprintln!("wrote {} ({} bytes)", out_path.display(), media.byte_size);
    }

    Ok(())
}
