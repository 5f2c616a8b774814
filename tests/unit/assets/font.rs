use super::*;

fn load_test_font_bytes() -> Option<Vec<u8>> {
    const CANDIDATES: &[&str] = &[
        "assets/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ];
    CANDIDATES.iter().find_map(|p| std::fs::read(p).ok())
}

#[test]
fn from_bytes_rejects_empty_fonts() {
    assert!(FontSource::from_bytes(Vec::new()).is_err());
}

#[test]
fn from_path_names_the_missing_file() {
    let err = FontSource::from_path("/definitely/not/here.ttf").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("here.ttf"), "message was: {msg}");
}

#[test]
fn garbage_bytes_register_no_family() {
    let source = FontSource::from_bytes(vec![1, 2, 3, 4]).unwrap();
    let err = TextShaper::new(&source).unwrap_err();
    assert!(err.to_string().contains("no font families"), "{err}");
}

#[test]
fn shapes_and_measures_with_local_font_if_present() {
    let Some(bytes) = load_test_font_bytes() else {
        return;
    };
    let source = FontSource::from_bytes(bytes).unwrap();
    let mut shaper = TextShaper::new(&source).unwrap();

    let layout = shaper.layout("AB", 48.0, TextBrushRgba8::default()).unwrap();
    assert!(layout.lines().next().is_some());
    assert!(layout.width() > 0.0);

    let w_small = shaper.measure_width("AB", 24.0).unwrap();
    let w_large = shaper.measure_width("AB", 48.0).unwrap();
    assert!(w_large > w_small, "{w_large} <= {w_small}");
}

#[test]
fn rejects_non_positive_sizes_with_local_font_if_present() {
    let Some(bytes) = load_test_font_bytes() else {
        return;
    };
    let source = FontSource::from_bytes(bytes).unwrap();
    let mut shaper = TextShaper::new(&source).unwrap();

    assert!(shaper.measure_width("A", 0.0).is_err());
    assert!(shaper.measure_width("A", f32::NAN).is_err());
    assert!(shaper.measure_width("A", -4.0).is_err());
}
