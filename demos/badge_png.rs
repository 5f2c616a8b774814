use avatyr::{BadgeShape, ColorPair, FontSource, Rgba8, TextBadge, TextBadgeOpts};

const FONT_CANDIDATES: &[&str] = &[
    "assets/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

fn load_font() -> anyhow::Result<FontSource> {
    for path in FONT_CANDIDATES {
        if std::path::Path::new(path).exists() {
            return Ok(FontSource::from_path(path)?);
        }
    }
    anyhow::bail!("no font found; tried {FONT_CANDIDATES:?}")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let font = load_font()?;
    let opts = TextBadgeOpts {
        size: 256,
        shape: BadgeShape::Circle,
        ..Default::default()
    };
    let color = ColorPair::new(Rgba8::WHITE, Rgba8::rgb(0x7a, 0x3b, 0x96));
    let badge = TextBadge::build("AB", color, &font, opts)?;

    let out_path = std::path::Path::new("target").join("badge.png");
    image::save_buffer_with_format(
        &out_path,
        &badge.to_rgba8_straight(),
        badge.size(),
        badge.size(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;

    eprintln!("wrote {} ({}px text)", out_path.display(), badge.font_px());
    Ok(())
}
