use super::*;
use crate::foundation::error::Rejection;
use crate::signature::PointerSample;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn form() -> FormInput {
    FormInput {
        full_name: "Amina Hassan".to_owned(),
        dob: "1995-04-12".to_owned(),
        sex: "Female".to_owned(),
        district: "Mombasa".to_owned(),
        place: "Mombasa".to_owned(),
    }
}

fn photo_png() -> Vec<u8> {
    RasterImage::from_premul(64, 64, [90, 140, 60, 255].repeat(64 * 64))
        .unwrap()
        .encode_png()
        .unwrap()
}

fn session(seed: u64) -> CardSession {
    CardSession::new(StudioConfig::default())
        .unwrap()
        .with_rng(DigitRng::new(seed))
}

fn mouse(x: f64, y: f64) -> PointerSample {
    PointerSample::Mouse {
        offset: Point::new(x, y),
    }
}

fn sign(s: &mut CardSession) {
    s.signature_event(InputEvent::Down(mouse(20.0, 50.0))).unwrap();
    s.signature_event(InputEvent::Move(mouse(120.0, 60.0))).unwrap();
    s.signature_event(InputEvent::Move(mouse(200.0, 40.0))).unwrap();
    s.signature_event(InputEvent::Up { touch: false }).unwrap();
}

fn crop_and_accept(s: &mut CardSession) {
    s.upload_photo(&photo_png()).unwrap();
    s.crop_start(Point::new(10.0, 10.0));
    s.crop_move(Point::new(60.0, 60.0)).unwrap();
    s.crop_release(Point::new(60.0, 60.0)).unwrap();
    s.accept_crop().unwrap();
}

fn rejection<T: std::fmt::Debug>(r: CardResult<T>) -> Rejection {
    r.unwrap_err().rejection().unwrap()
}

#[test]
fn full_flow_composes_previews_and_downloads() {
    let mut s = session(11);
    crop_and_accept(&mut s);
    assert_eq!(s.photo().map(|p| (p.width, p.height)), Some((50, 50)));
    assert!(!s.crop().interface_visible());
    sign(&mut s);

    let card = s.submit(&form(), today()).unwrap();
    assert_eq!(card.record.full_name, "Amina Hassan");
    assert_eq!(card.scene.text_at(40.0, 230.0).unwrap().text, "AMINA HASSAN");

    let frame = s.preview().unwrap();
    assert_eq!((frame.width, frame.height), (800, 520));

    let exported = s.download().unwrap();
    assert_eq!(exported.filename, "kenya_id_card.png");
    assert_eq!((exported.width, exported.height), (1600, 1040));
    assert_eq!(&exported.png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn pending_crop_is_not_a_photo_until_accepted() {
    let mut s = session(1);
    sign(&mut s);
    s.upload_photo(&photo_png()).unwrap();
    s.crop_start(Point::new(0.0, 0.0));
    s.crop_move(Point::new(30.0, 30.0)).unwrap();
    assert!(s.crop_release(Point::new(30.0, 30.0)).unwrap().is_some());

    assert_eq!(rejection(s.submit(&form(), today())), Rejection::MissingPhoto);
    s.accept_crop().unwrap();
    assert!(s.submit(&form(), today()).is_ok());
}

#[test]
fn accepting_without_a_crop_is_rejected() {
    let mut s = session(1);
    assert_eq!(rejection(s.accept_crop()), Rejection::CropNotSelected);
    assert!(s.photo().is_none());
}

#[test]
fn new_upload_drops_the_accepted_photo() {
    let mut s = session(1);
    crop_and_accept(&mut s);
    assert!(s.photo().is_some());
    s.upload_photo(&photo_png()).unwrap();
    assert!(s.photo().is_none());
    assert!(s.crop().interface_visible());
}

#[test]
fn rejection_leaves_session_untouched() {
    let mut s = session(5);
    crop_and_accept(&mut s);
    assert_eq!(rejection(s.submit(&form(), today())), Rejection::BlankSignature);
    assert!(s.card().is_none());
    assert!(matches!(s.preview(), Err(CardError::Validation(_))));
    assert!(s.download().is_err());

    sign(&mut s);
    let first = s.submit(&form(), today()).unwrap().record.id_number.clone();

    let mut fresh = session(5);
    crop_and_accept(&mut fresh);
    sign(&mut fresh);
    let expected = fresh.submit(&form(), today()).unwrap().record.id_number.clone();
    assert_eq!(first, expected);

    let mut young = form();
    young.dob = "2010-01-01".to_owned();
    assert_eq!(rejection(s.submit(&young, today())), Rejection::Underage);
    assert_eq!(s.card().unwrap().record.id_number, first);
}

#[test]
fn clearing_the_signature_blocks_submission() {
    let mut s = session(2);
    crop_and_accept(&mut s);
    sign(&mut s);
    s.clear_signature();
    assert!(s.signature().is_blank());
    assert_eq!(rejection(s.submit(&form(), today())), Rejection::BlankSignature);
}

#[test]
fn invalid_config_is_refused() {
    let mut cfg = StudioConfig::default();
    cfg.export_scale = 0;
    assert!(CardSession::new(cfg).is_err());

    let mut cfg = StudioConfig::default();
    cfg.font = Some(PathBuf::from("/nonexistent/cardsmith-font.ttf"));
    assert!(CardSession::new(cfg).is_err());
}

#[test]
fn replays_a_script_from_disk() {
    let dir = std::env::temp_dir().join(format!("cardsmith-replay-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("face.png"), photo_png()).unwrap();
    let script = r#"{
        "form": {
            "full_name": "Amina Hassan",
            "dob": "1995-04-12",
            "sex": "Female",
            "district": "Mombasa",
            "place": "Mombasa"
        },
        "photo": "face.png",
        "crop": { "from": { "x": 5, "y": 5 }, "through": [{ "x": 20, "y": 20 }], "to": { "x": 45, "y": 55 } },
        "signature": [
            { "down": { "mouse": { "offset": { "x": 10, "y": 10 } } } },
            { "move": { "touch": { "client": { "x": 90, "y": 60 }, "surface_origin": { "x": 0, "y": 0 } } } },
            { "up": { "touch": true } },
            "leave"
        ]
    }"#;
    let path = dir.join("session.json");
    std::fs::write(&path, script).unwrap();

    let script = SessionScript::from_path(&path).unwrap();
    let mut s = session(3);
    s.replay(&script, &dir).unwrap();
    assert_eq!(s.photo().map(|p| (p.width, p.height)), Some((40, 50)));
    assert!(!s.signature().is_blank());
    assert!(s.submit(&script.form, today()).is_ok());

    std::fs::remove_dir_all(&dir).ok();
}

fn ink(frame: &FrameRGBA, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
    ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y).is_some_and(|px| px[..3].iter().any(|&c| c < 200)))
        .count()
}

#[test]
fn default_session_draws_card_text_with_bundled_font() {
    let mut s = session(3);
    crop_and_accept(&mut s);
    sign(&mut s);
    s.submit(&form(), today()).unwrap();

    let frame = s.preview().unwrap();
    assert!(ink(&frame, 40..330, 30..62) > 200, "left title");
    assert!(ink(&frame, 40..300, 208..234) > 100, "name");
    assert!(ink(&frame, 520..760, 225..250) > 50, "first detail value");
}
