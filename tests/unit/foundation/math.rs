use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn scale_endpoints() {
    let mut px = vec![200u8, 100, 50, 255];
    scale_premul_rgba8_in_place(&mut px, 1.0);
    assert_eq!(px, vec![200, 100, 50, 255]);

    scale_premul_rgba8_in_place(&mut px, 0.0);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn over_respects_source_alpha() {
    let mut dst = vec![0u8, 0, 255, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, vec![0, 0, 255, 255]);

    premul_over_in_place(&mut dst, &[255, 0, 0, 255]);
    assert_eq!(dst, vec![255, 0, 0, 255]);

    let mut dst = vec![0u8, 0, 255, 255];
    premul_over_in_place(&mut dst, &[128, 0, 0, 128]);
    assert_eq!(dst[0], 128);
    assert_eq!(dst[2], 127);
    assert_eq!(dst[3], 255);
}
