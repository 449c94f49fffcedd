//! Submission gate between the raw form and the compositor.
//!
//! [`validate_submission`] checks fields in a fixed order and returns the first failure as a
//! [`Rejection`]. Nothing is mutated on failure; the caller only sees a fresh [`CardRecord`] when
//! every check passed.

use chrono::{Datelike as _, NaiveDate};

use crate::card::format::parse_iso_date;
use crate::card::record::CardRecord;
use crate::foundation::error::{CardResult, Rejection};
use crate::render::surface::{RasterImage, Surface};

/// Longest accepted full name, in characters.
pub const MAX_NAME_CHARS: usize = 30;
/// Longest accepted district of birth, in characters.
pub const MAX_DISTRICT_CHARS: usize = 15;
/// Longest accepted place of issue, in characters.
pub const MAX_PLACE_CHARS: usize = 15;
/// Minimum holder age in full years.
pub const MIN_AGE_YEARS: i32 = 18;
/// Digits in a generated ID number.
pub const ID_NUMBER_DIGITS: usize = 8;
/// Digits in a generated serial number.
pub const SERIAL_NUMBER_DIGITS: usize = 9;

/// Raw form fields as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FormInput {
    /// Full name.
    pub full_name: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub dob: String,
    /// Sex as selected.
    pub sex: String,
    /// District of birth.
    pub district: String,
    /// Place of issue.
    pub place: String,
}

/// Seedable digit source for ID and serial numbers (SplitMix64).
#[derive(Clone, Copy, Debug)]
pub struct DigitRng {
    state: u64,
}

impl DigitRng {
    /// Generator with a fixed seed; equal seeds give equal numbers.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator seeded from the wall clock.
    pub fn from_clock() -> Self {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::new(nanos as u64)
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform decimal digit.
    pub fn next_digit(&mut self) -> u8 {
        // 53 bits of precision.
        let unit = ((self.next_u64() >> 11) as f64) * (1.0 / ((1u64 << 53) as f64));
        (unit * 10.0) as u8
    }
}

/// `n` random decimal digits. Leading zeros are kept.
pub fn random_digits(n: usize, rng: &mut DigitRng) -> String {
    (0..n)
        .map(|_| char::from(b'0' + rng.next_digit()))
        .collect()
}

/// Full years from `dob` to `today`.
///
/// A Feb 29 birthday counts as Mar 1 in non-leap years.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let birthday = NaiveDate::from_ymd_opt(today.year(), dob.month(), dob.day())
        .or_else(|| NaiveDate::from_ymd_opt(today.year(), 3, 1))
        .unwrap_or(today);
    let years = today.year() - dob.year();
    if today < birthday { years - 1 } else { years }
}

/// Validate `form` and assemble the card record.
///
/// Checks run in order: presence, accepted photo, name length, district length, place length,
/// age, signature. `photo` is the accepted crop, not a pending one.
pub fn validate_submission(
    form: &FormInput,
    photo: Option<&RasterImage>,
    signature: &Surface,
    today: NaiveDate,
    rng: &mut DigitRng,
) -> CardResult<CardRecord> {
    let name = form.full_name.trim();
    let district = form.district.trim();
    let place = form.place.trim();
    if name.is_empty()
        || form.dob.is_empty()
        || form.sex.is_empty()
        || district.is_empty()
        || place.is_empty()
    {
        return Err(Rejection::MissingField.into());
    }
    let Some(photo) = photo else {
        return Err(Rejection::MissingPhoto.into());
    };
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(Rejection::NameTooLong.into());
    }
    if district.chars().count() > MAX_DISTRICT_CHARS {
        return Err(Rejection::DistrictTooLong.into());
    }
    if place.chars().count() > MAX_PLACE_CHARS {
        return Err(Rejection::PlaceTooLong.into());
    }
    let date_of_birth = parse_iso_date(&form.dob)?;
    if age_on(date_of_birth, today) < MIN_AGE_YEARS {
        return Err(Rejection::Underage.into());
    }
    if signature.is_blank() {
        return Err(Rejection::BlankSignature.into());
    }

    let id_number = random_digits(ID_NUMBER_DIGITS, rng);
    let serial_number = random_digits(SERIAL_NUMBER_DIGITS, rng);
    tracing::debug!(%id_number, %serial_number, "submission accepted");
    Ok(CardRecord {
        full_name: name.to_owned(),
        date_of_birth,
        sex: form.sex.clone(),
        district: district.to_owned(),
        place_of_issue: place.to_owned(),
        date_of_issue: today,
        id_number,
        serial_number,
        photo: photo.clone(),
        signature: signature.snapshot(),
    })
}

#[cfg(test)]
#[path = "../tests/unit/form/validate.rs"]
mod tests;
