use chrono::{Datelike as _, NaiveDate};

use crate::foundation::error::{CardError, CardResult};

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(s: &str) -> CardResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| CardError::validation(format!("invalid date '{s}': {e}")))
}

/// `DD. MM. YYYY`, zero-padded, locale independent.
pub fn format_card_date(date: NaiveDate) -> String {
    format!("{:02}. {:02}. {:04}", date.day(), date.month(), date.year())
}

/// Parse `YYYY-MM-DD` and format it for the card.
pub fn format_date(iso: &str) -> CardResult<String> {
    Ok(format_card_date(parse_iso_date(iso)?))
}

/// Upper-case a field for rendering.
pub fn card_upper(s: &str) -> String {
    s.to_uppercase()
}

#[cfg(test)]
#[path = "../../tests/unit/card/format.rs"]
mod tests;
