use super::*;
use crate::foundation::core::{Point, SurfaceSize};
use crate::foundation::error::CardError;
use crate::signature::StrokeRecorder;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn form() -> FormInput {
    FormInput {
        full_name: "  Jane Wanjiru Doe ".to_owned(),
        dob: "2000-01-05".to_owned(),
        sex: "Female".to_owned(),
        district: " Nakuru".to_owned(),
        place: "Nairobi ".to_owned(),
    }
}

fn photo() -> RasterImage {
    RasterImage::from_premul(2, 2, vec![200; 16]).unwrap()
}

fn signed() -> StrokeRecorder {
    let mut r = StrokeRecorder::new(SurfaceSize::new(40, 20)).unwrap();
    r.begin(Point::new(5.0, 5.0));
    r.extend(Point::new(30.0, 12.0)).unwrap();
    r.end();
    r
}

fn blank() -> StrokeRecorder {
    StrokeRecorder::new(SurfaceSize::new(40, 20)).unwrap()
}

fn rejection(result: CardResult<CardRecord>) -> Rejection {
    match result {
        Err(e) => e
            .rejection()
            .unwrap_or_else(|| panic!("expected a rejection, got {e}")),
        Ok(_) => panic!("expected a rejection, got a record"),
    }
}

fn submit(f: &FormInput, photo: Option<&RasterImage>, sig: &StrokeRecorder, today: NaiveDate) -> CardResult<CardRecord> {
    validate_submission(f, photo, sig.surface(), today, &mut DigitRng::new(7))
}

#[test]
fn accepts_a_complete_submission_and_trims_fields() {
    let p = photo();
    let sig = signed();
    let record = submit(&form(), Some(&p), &sig, ymd(2026, 10, 19)).unwrap();
    assert_eq!(record.full_name, "Jane Wanjiru Doe");
    assert_eq!(record.district, "Nakuru");
    assert_eq!(record.place_of_issue, "Nairobi");
    assert_eq!(record.sex, "Female");
    assert_eq!(record.date_of_birth, ymd(2000, 1, 5));
    assert_eq!(record.date_of_issue, ymd(2026, 10, 19));
    assert_eq!(record.id_number.len(), ID_NUMBER_DIGITS);
    assert_eq!(record.serial_number.len(), SERIAL_NUMBER_DIGITS);
    assert!(record.id_number.chars().all(|c| c.is_ascii_digit()));
    assert!(record.serial_number.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(record.photo, p);
    assert_eq!(record.signature, sig.snapshot());
}

#[test]
fn presence_is_checked_first() {
    let mut f = form();
    f.full_name = "   ".to_owned();
    f.place = "x".repeat(40);
    assert_eq!(
        rejection(submit(&f, None, &blank(), ymd(2026, 1, 1))),
        Rejection::MissingField
    );

    let mut f = form();
    f.sex.clear();
    assert_eq!(
        rejection(submit(&f, Some(&photo()), &signed(), ymd(2026, 1, 1))),
        Rejection::MissingField
    );
}

#[test]
fn photo_is_checked_before_lengths() {
    let mut f = form();
    f.full_name = "x".repeat(31);
    assert_eq!(
        rejection(submit(&f, None, &signed(), ymd(2026, 1, 1))),
        Rejection::MissingPhoto
    );
}

#[test]
fn length_limits_count_characters_after_trimming() {
    let p = photo();
    let sig = signed();
    let today = ymd(2026, 1, 1);

    let mut f = form();
    f.full_name = format!(" {} ", "é".repeat(MAX_NAME_CHARS));
    assert!(submit(&f, Some(&p), &sig, today).is_ok());
    f.full_name = "a".repeat(MAX_NAME_CHARS + 1);
    assert_eq!(rejection(submit(&f, Some(&p), &sig, today)), Rejection::NameTooLong);

    let mut f = form();
    f.district = "d".repeat(MAX_DISTRICT_CHARS + 1);
    f.place = "p".repeat(MAX_PLACE_CHARS + 1);
    assert_eq!(
        rejection(submit(&f, Some(&p), &sig, today)),
        Rejection::DistrictTooLong
    );

    let mut f = form();
    f.place = "p".repeat(MAX_PLACE_CHARS + 1);
    assert_eq!(rejection(submit(&f, Some(&p), &sig, today)), Rejection::PlaceTooLong);
}

#[test]
fn exactly_eighteen_is_accepted_one_day_short_is_rejected() {
    let p = photo();
    let sig = signed();
    let today = ymd(2026, 10, 19);

    let mut f = form();
    f.dob = "2008-10-19".to_owned();
    assert!(submit(&f, Some(&p), &sig, today).is_ok());

    f.dob = "2008-10-20".to_owned();
    assert_eq!(rejection(submit(&f, Some(&p), &sig, today)), Rejection::Underage);
}

#[test]
fn age_counts_leap_day_birthdays_from_march_first() {
    let dob = ymd(2008, 2, 29);
    assert_eq!(age_on(dob, ymd(2026, 2, 28)), 17);
    assert_eq!(age_on(dob, ymd(2026, 3, 1)), 18);
    assert_eq!(age_on(dob, ymd(2028, 2, 29)), 20);
    assert_eq!(age_on(ymd(2030, 1, 1), ymd(2026, 1, 1)), -4);
}

#[test]
fn blank_signature_is_checked_last() {
    let mut f = form();
    f.dob = "2020-01-01".to_owned();
    assert_eq!(
        rejection(submit(&f, Some(&photo()), &blank(), ymd(2026, 1, 1))),
        Rejection::Underage
    );
    assert_eq!(
        rejection(submit(&form(), Some(&photo()), &blank(), ymd(2026, 1, 1))),
        Rejection::BlankSignature
    );
}

#[test]
fn malformed_birth_date_is_a_validation_error() {
    let mut f = form();
    f.dob = "not-a-date".to_owned();
    let err = submit(&f, Some(&photo()), &signed(), ymd(2026, 1, 1)).unwrap_err();
    assert!(matches!(err, CardError::Validation(_)));
}

#[test]
fn digits_are_reproducible_per_seed() {
    let a = random_digits(9, &mut DigitRng::new(42));
    let b = random_digits(9, &mut DigitRng::new(42));
    let c = random_digits(9, &mut DigitRng::new(43));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(random_digits(0, &mut DigitRng::new(1)), "");

    let mut rng = DigitRng::new(0);
    let mut seen = [false; 10];
    for _ in 0..1000 {
        let d = rng.next_digit();
        assert!(d < 10);
        seen[d as usize] = true;
    }
    assert!(seen.iter().all(|s| *s));
}
