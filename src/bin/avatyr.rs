use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "avatyr", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an avatar description JSON to an encoded JPEG.
    Render(RenderArgs),
    /// Rasterize a standalone text badge as a PNG.
    Badge(BadgeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input avatar description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file used by text avatars.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Directory of `.svg` files served as both catalogs (file stem = key).
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// Directory photo sources resolve against (defaults to the input's dir).
    #[arg(long)]
    photo_dir: Option<PathBuf>,

    /// Square output dimension in pixels.
    #[arg(long)]
    dimension: Option<u32>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct BadgeArgs {
    /// Badge text (initials).
    #[arg(long)]
    text: String,

    /// Foreground color, e.g. '#1f2a44' or '#1f2a44ff'.
    #[arg(long, default_value = "#ffffff")]
    fg: avatyr::Rgba8,

    /// Background color.
    #[arg(long, default_value = "#336699")]
    bg: avatyr::Rgba8,

    /// Font file.
    #[arg(long)]
    font: PathBuf,

    /// Badge size in pixels.
    #[arg(long, default_value_t = avatyr::AVATAR_DIM)]
    size: u32,

    /// Render a circular badge instead of a rectangular one.
    #[arg(long, default_value_t = false)]
    circle: bool,

    /// Swap foreground and background.
    #[arg(long, default_value_t = false)]
    inverted: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Badge(args) => cmd_badge(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let desc = avatyr::AvatarDescription::from_path(&args.in_path)?;

    let mut catalog = avatyr::SvgCatalog::new();
    if let Some(dir) = &args.svg_dir {
        load_svg_dir(&mut catalog, dir)?;
    }
    let catalog = Arc::new(catalog);

    let photo_root = args.photo_dir.clone().unwrap_or_else(|| {
        args.in_path
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .to_path_buf()
    });
    let font = match &args.font {
        Some(path) => Some(avatyr::FontSource::from_path(path)?),
        None => None,
    };

    let stores = avatyr::RendererStores {
        icons: catalog.clone(),
        glyphs: catalog,
        blobs: Arc::new(avatyr::SessionBlobStore::new()?),
        photos: Arc::new(avatyr::DirPhotoStore::new(photo_root)),
        font,
    };
    let opts = avatyr::RendererOpts {
        dimension: args.dimension.unwrap_or(avatyr::AVATAR_DIM),
        threads: args.threads,
        ..Default::default()
    };
    let renderer = avatyr::AvatarRenderer::new(stores, opts)?;

    let media = renderer.render_blocking(desc)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::copy(&media.handle.path, &args.out)
        .with_context(|| format!("copy encoded avatar to '{}'", args.out.display()))?;

    println!("{}", serde_json::to_string_pretty(&media)?);
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_badge(args: BadgeArgs) -> anyhow::Result<()> {
    let font = avatyr::FontSource::from_path(&args.font)?;
    let shape = if args.circle {
        avatyr::BadgeShape::Circle
    } else {
        avatyr::BadgeShape::Rect
    };
    let badge = avatyr::TextBadge::build(
        &args.text,
        avatyr::ColorPair::new(args.fg, args.bg),
        &font,
        avatyr::TextBadgeOpts {
            inverted: args.inverted,
            size: args.size,
            shape,
        },
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &badge.to_rgba8_straight(),
        badge.size(),
        badge.size(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {} ({}px text)", args.out.display(), badge.font_px());
    Ok(())
}

fn load_svg_dir(catalog: &mut avatyr::SvgCatalog, dir: &std::path::Path) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read svg dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("svg") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let bytes =
            std::fs::read(&path).with_context(|| format!("read svg '{}'", path.display()))?;
        catalog.insert_svg(stem, &bytes)?;
    }
    Ok(())
}
