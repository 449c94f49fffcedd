use super::*;
use crate::assets::decode::parse_svg;

#[test]
fn rasterizes_filled_rect_to_requested_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect x="0" y="0" width="10" height="10" fill="#ff0000"/></svg>"##;
    let tree = parse_svg(svg).unwrap();
    let img = rasterize_svg(&tree, 30, 20).unwrap();
    assert_eq!((img.width, img.height), (30, 20));
    assert_eq!(img.pixel(15, 10), Some([255, 0, 0, 255]));
}

#[test]
fn rejects_zero_and_oversized_targets() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"></svg>"#;
    let tree = parse_svg(svg).unwrap();
    assert!(rasterize_svg(&tree, 0, 4).is_err());
    assert!(rasterize_svg(&tree, 4, MAX_DIM + 1).is_err());
}
