use super::*;
use crate::assets::store::AssetStore;
use crate::card::scene::ImageSource;
use crate::foundation::core::{Rgba8, SurfaceSize};
use crate::render::resources::SceneResources;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RasterImage {
    RasterImage::from_premul(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn scene_with_photo() -> CardScene {
    CardScene {
        size: SurfaceSize::new(20, 10),
        elements: vec![
            SceneElement::Fill {
                rect: Rect::new(0.0, 0.0, 20.0, 10.0),
                color: Rgba8::WHITE,
            },
            SceneElement::Image {
                source: ImageSource::Photo,
                rect: Rect::new(5.0, 2.0, 15.0, 8.0),
                clip: true,
            },
            SceneElement::Text(TextRun {
                text: "HELLO".to_owned(),
                x: 1.0,
                baseline: 9.0,
                size_px: 8.0,
                weight: FontWeight::Bold,
                align: TextAlign::Left,
                color: Rgba8::INK,
            }),
        ],
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn renders_fills_and_stretched_images_at_scale() {
    let assets = AssetStore::bundled();
    let photo = solid(4, 4, [255, 0, 0, 255]);
    let scene = scene_with_photo();
    let join = ResourceJoin::gather(
        &scene,
        SceneResources {
            photo: Some(&photo),
            signature: None,
            assets: &assets,
        },
        2,
    );
    let mut renderer = CpuRenderer::default();
    let frame = renderer.render(&scene, &join, 2).unwrap();

    assert_eq!((frame.width, frame.height), (40, 20));
    assert!(frame.premultiplied);
    assert!(close(frame.pixel(20, 10).unwrap(), [255, 0, 0, 255]));
    assert!(close(frame.pixel(2, 2).unwrap(), [255, 255, 255, 255]));
    assert!(close(frame.pixel(35, 18).unwrap(), [255, 255, 255, 255]));
}

#[test]
fn missing_image_is_skipped_and_text_needs_a_font() {
    let assets = AssetStore::bundled();
    let scene = scene_with_photo();
    let join = ResourceJoin::gather(
        &scene,
        SceneResources {
            photo: None,
            signature: None,
            assets: &assets,
        },
        1,
    );
    assert_eq!(join.len(), 1);
    assert_eq!(join.failed(), 1);

    let mut renderer = CpuRenderer::new(None);
    assert!(!renderer.has_text());
    let frame = renderer.render(&scene, &join, 1).unwrap();
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| close([px[0], px[1], px[2], px[3]], [255, 255, 255, 255]))
    );
}

#[test]
fn rejects_out_of_range_scale() {
    let assets = AssetStore::bundled();
    let scene = scene_with_photo();
    let join = ResourceJoin::gather(
        &scene,
        SceneResources {
            photo: None,
            signature: None,
            assets: &assets,
        },
        1,
    );
    let mut renderer = CpuRenderer::default();
    assert!(renderer.render(&scene, &join, 0).is_err());
    assert!(renderer.render(&scene, &join, MAX_SCALE + 1).is_err());
}

#[test]
fn frame_converts_to_raster() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 255, 0, 0, 0, 0],
        premultiplied: true,
    };
    assert_eq!(frame.pixel(0, 0), Some([1, 2, 3, 255]));
    assert_eq!(frame.pixel(2, 0), None);
    let img = frame.into_raster().unwrap();
    assert_eq!(img.pixel(1, 0), Some([0, 0, 0, 0]));
}

fn text_scene(runs: Vec<TextRun>) -> CardScene {
    let mut elements = vec![SceneElement::Fill {
        rect: Rect::new(0.0, 0.0, 200.0, 60.0),
        color: Rgba8::WHITE,
    }];
    elements.extend(runs.into_iter().map(SceneElement::Text));
    CardScene {
        size: SurfaceSize::new(200, 60),
        elements,
    }
}

fn run(text: &str, x: f64, align: TextAlign, weight: FontWeight) -> TextRun {
    TextRun {
        text: text.to_owned(),
        x,
        baseline: 40.0,
        size_px: 24.0,
        weight,
        align,
        color: Rgba8::INK,
    }
}

fn render_text(scene: &CardScene) -> FrameRGBA {
    let assets = AssetStore::bundled();
    let join = ResourceJoin::gather(
        scene,
        SceneResources {
            photo: None,
            signature: None,
            assets: &assets,
        },
        1,
    );
    let mut renderer = CpuRenderer::with_bundled_font().unwrap();
    assert!(renderer.has_text());
    renderer.render(scene, &join, 1).unwrap()
}

fn ink(frame: &FrameRGBA, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
    ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y).is_some_and(|px| px[..3].iter().any(|&c| c < 200)))
        .count()
}

#[test]
fn left_aligned_caps_sit_on_the_baseline() {
    let scene = text_scene(vec![run("HELLO", 20.0, TextAlign::Left, FontWeight::Bold)]);
    let frame = render_text(&scene);

    assert!(ink(&frame, 20..120, 16..41) > 100);
    assert_eq!(ink(&frame, 0..18, 0..60), 0, "ink left of the anchor");
    assert_eq!(ink(&frame, 0..200, 42..60), 0, "ink below the baseline");
    assert_eq!(ink(&frame, 0..200, 0..10), 0, "ink above the cap height");
}

#[test]
fn right_aligned_run_ends_at_its_anchor() {
    let scene = text_scene(vec![run("12345678", 180.0, TextAlign::Right, FontWeight::Regular)]);
    let frame = render_text(&scene);

    assert!(ink(&frame, 150..181, 16..41) > 30);
    assert_eq!(ink(&frame, 182..200, 0..60), 0, "ink right of the anchor");
}

#[test]
fn bold_and_regular_runs_use_different_faces() {
    let word = |weight| text_scene(vec![run("IDENTITY", 10.0, TextAlign::Left, weight)]);
    let bold = render_text(&word(FontWeight::Bold));
    let regular = render_text(&word(FontWeight::Regular));
    assert!(ink(&bold, 0..200, 0..60) > ink(&regular, 0..200, 0..60));
}
