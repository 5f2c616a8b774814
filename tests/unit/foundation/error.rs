use super::*;

#[test]
fn constructor_helpers_pick_the_right_variant() {
    assert!(matches!(
        AvatyrError::validation("bad input"),
        AvatyrError::Validation(_)
    ));
    assert!(matches!(
        AvatyrError::lookup("missing key"),
        AvatyrError::Lookup(_)
    ));
    assert!(matches!(
        AvatyrError::encoding("jpeg"),
        AvatyrError::Encoding(_)
    ));
    assert!(matches!(
        AvatyrError::storage("disk"),
        AvatyrError::Storage(_)
    ));
}

#[test]
fn display_prefixes_name_the_category() {
    assert_eq!(
        AvatyrError::validation("x").to_string(),
        "validation error: x"
    );
    assert_eq!(AvatyrError::lookup("k").to_string(), "lookup error: k");
    assert_eq!(AvatyrError::encoding("e").to_string(), "encoding error: e");
    assert_eq!(AvatyrError::storage("s").to_string(), "storage error: s");
}

#[test]
fn io_errors_pass_through_transparently() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: AvatyrError = io.into();
    let AvatyrError::Io(inner) = &err else {
        panic!("expected io variant");
    };
    assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
    assert_eq!(err.to_string(), "gone");
}

#[test]
fn anyhow_errors_keep_their_message() {
    let err: AvatyrError = anyhow::anyhow!("tool broke").into();
    assert!(matches!(err, AvatyrError::Other(_)));
    assert_eq!(err.to_string(), "tool broke");
}
