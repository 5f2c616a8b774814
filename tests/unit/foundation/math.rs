use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u16(255, 128), 128);
    // 100 * 128 / 255 = 50.19..., rounds down.
    assert_eq!(mul_div255_u16(100, 128), 50);
    // 1 * 128 / 255 = 0.50..., rounds up.
    assert_eq!(mul_div255_u16(1, 128), 1);
}

#[test]
fn unpremultiply_inverts_premultiply_for_half_alpha() {
    let mut px = [100, 50, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px[3], 128);
    // Round-trip error stays within one step per channel.
    assert!(px[0].abs_diff(200) <= 1, "r = {}", px[0]);
    assert!(px[1].abs_diff(100) <= 1, "g = {}", px[1]);
    assert_eq!(px[2], 0);
}

#[test]
fn unpremultiply_leaves_opaque_and_transparent_untouched() {
    let mut px = [10, 20, 30, 255, 0, 0, 0, 0];
    let before = px;
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, before);
}
