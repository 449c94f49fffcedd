use chrono::NaiveDate;

use crate::render::surface::RasterImage;

/// Everything the compositor needs, already validated.
///
/// Built fresh on every submission and never partially updated. Images are shared, read-only
/// references to the artifacts produced by the crop and signature steps.
#[derive(Clone, Debug, PartialEq)]
pub struct CardRecord {
    /// Holder's full name as typed (trimmed).
    pub full_name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Sex as selected.
    pub sex: String,
    /// District of birth (trimmed).
    pub district: String,
    /// Place of issue (trimmed).
    pub place_of_issue: String,
    /// Date the card was issued.
    pub date_of_issue: NaiveDate,
    /// 8-digit ID number.
    pub id_number: String,
    /// 9-digit serial number.
    pub serial_number: String,
    /// Accepted cropped photo.
    pub photo: RasterImage,
    /// Snapshot of the signature surface.
    pub signature: RasterImage,
}
