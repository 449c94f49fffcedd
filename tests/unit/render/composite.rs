use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_blends_towards_src() {
    let dst = [255, 255, 255, 255];
    let src = [0, 0, 0, 128];
    let out = over(dst, src);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 127);
}

#[test]
fn over_in_place_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(over_in_place(&mut dst, &[1u8, 2, 3, 255, 0, 0, 0, 0]).is_ok());
    assert_eq!(dst, vec![1, 2, 3, 255, 0, 0, 0, 0]);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128, 9, 9, 9, 0, 1, 2, 3, 255];
    premultiply_in_place(&mut px);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);
    unpremultiply_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([200u8, 100, 50]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
    }
}
