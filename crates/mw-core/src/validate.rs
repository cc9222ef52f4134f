//! Boundary validation for caller-supplied values.
//!
//! Everything that reaches the store or the prediction engine passes through
//! here first. Failures are [`Error::Validation`] with a message fit for
//! showing to staff; nothing is mutated on failure.

use chrono::NaiveDate;
use mw_common::{Error, Observation, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw, unchecked observation fields as typed by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationInput {
    pub date: String,
    pub attendee_count: i64,
    pub quantity_cooked: f64,
    pub quantity_leftover: f64,
}

impl ObservationInput {
    pub fn new(
        date: impl Into<String>,
        attendee_count: i64,
        quantity_cooked: f64,
        quantity_leftover: f64,
    ) -> Self {
        Self {
            date: date.into(),
            attendee_count,
            quantity_cooked,
            quantity_leftover,
        }
    }

    /// Parse the four form fields. Only checks that each is a number; the
    /// business rules run in [`ObservationInput::validate`].
    pub fn from_fields(date: &str, attendees: &str, cooked: &str, leftover: &str) -> Result<Self> {
        Ok(Self {
            date: date.trim().to_string(),
            attendee_count: parse_integer("Number of attendees", attendees)?,
            quantity_cooked: parse_number("Cooked quantity", cooked)?,
            quantity_leftover: parse_number("Leftover quantity", leftover)?,
        })
    }

    /// Check every rule and build the observation.
    pub fn validate(&self) -> Result<Observation> {
        let date = parse_date(&self.date)?;
        let attendee_count = validate_attendee_count(self.attendee_count)?;

        if !self.quantity_cooked.is_finite() || self.quantity_cooked <= 0.0 {
            return Err(invalid("Cooked quantity must be positive"));
        }
        if !self.quantity_leftover.is_finite() || self.quantity_leftover < 0.0 {
            return Err(invalid("Leftover quantity must be non-negative"));
        }
        if self.quantity_leftover > self.quantity_cooked {
            return Err(invalid("Leftover cannot be greater than cooked quantity"));
        }

        Ok(Observation::new(
            date,
            attendee_count,
            self.quantity_cooked,
            self.quantity_leftover,
        ))
    }
}

/// `YYYY-MM-DD`, surrounding whitespace ignored.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid("Date is required"));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| invalid(format!("Date must be in YYYY-MM-DD format, got {text:?}")))
}

pub fn validate_attendee_count(count: i64) -> Result<u32> {
    if count <= 0 {
        return Err(invalid("Number of attendees must be positive"));
    }
    u32::try_from(count).map_err(|_| invalid("Number of attendees is too large"))
}

pub fn validate_weekday(index: i64) -> Result<u8> {
    if !(0..=6).contains(&index) {
        return Err(invalid(format!(
            "Weekday must be between 0 (Monday) and 6 (Sunday), got {index}"
        )));
    }
    Ok(index as u8)
}

/// Parse an optional weekday field; blank means "not supplied".
pub fn parse_optional_weekday(text: Option<&str>) -> Result<Option<i64>> {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(None),
        Some(t) => parse_integer("Weekday", t).map(Some),
    }
}

pub(crate) fn parse_integer(field: &str, text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| invalid(format!("{field} must be a whole number")))
}

fn parse_number(field: &str, text: &str) -> Result<f64> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid(format!("{field} must be a number")))?;
    if !value.is_finite() {
        return Err(invalid(format!("{field} must be a finite number")));
    }
    Ok(value)
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Validation(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: Error) -> String {
        match err {
            Error::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        let obs = ObservationInput::new("2025-06-01", 500, 100.0, 10.0)
            .validate()
            .unwrap();
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(obs.attendee_count, 500);
    }

    #[test]
    fn leftover_equal_to_cooked_is_allowed() {
        assert!(ObservationInput::new("2025-06-01", 1, 5.0, 5.0)
            .validate()
            .is_ok());
        assert!(ObservationInput::new("2025-06-01", 1, 5.0, 0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn leftover_above_cooked_is_rejected() {
        let err = ObservationInput::new("2025-06-01", 500, 100.0, 120.0)
            .validate()
            .unwrap_err();
        assert_eq!(message(err), "Leftover cannot be greater than cooked quantity");
    }

    #[test]
    fn each_rule_has_its_message() {
        let cases = [
            (ObservationInput::new("2025-06-01", 0, 1.0, 0.0), "attendees must be positive"),
            (ObservationInput::new("2025-06-01", -3, 1.0, 0.0), "attendees must be positive"),
            (ObservationInput::new("2025-06-01", 5, 0.0, 0.0), "Cooked quantity must be positive"),
            (ObservationInput::new("2025-06-01", 5, 1.0, -0.1), "non-negative"),
            (ObservationInput::new("2025-06-01", 5, f64::NAN, 0.0), "Cooked quantity"),
            (ObservationInput::new("01/06/2025", 5, 1.0, 0.0), "YYYY-MM-DD"),
            (ObservationInput::new("  ", 5, 1.0, 0.0), "Date is required"),
            (ObservationInput::new("2025-02-30", 5, 1.0, 0.0), "YYYY-MM-DD"),
        ];
        for (input, needle) in cases {
            let msg = message(input.validate().unwrap_err());
            assert!(msg.contains(needle), "{msg:?} should mention {needle:?}");
        }
    }

    #[test]
    fn attendee_count_overflow_is_rejected() {
        let err = validate_attendee_count(i64::from(u32::MAX) + 1).unwrap_err();
        assert!(message(err).contains("too large"));
    }

    #[test]
    fn parses_form_fields() {
        let input = ObservationInput::from_fields(" 2025-06-01 ", "500", " 100.5", "9").unwrap();
        assert_eq!(input, ObservationInput::new("2025-06-01", 500, 100.5, 9.0));

        let err = ObservationInput::from_fields("2025-06-01", "lots", "1", "0").unwrap_err();
        assert!(message(err).contains("whole number"));
        let err = ObservationInput::from_fields("2025-06-01", "5", "inf", "0").unwrap_err();
        assert!(message(err).contains("finite"));
        let err = ObservationInput::from_fields("2025-06-01", "5", "", "0").unwrap_err();
        assert!(message(err).contains("Cooked quantity must be a number"));
    }

    #[test]
    fn weekday_bounds() {
        assert_eq!(validate_weekday(0).unwrap(), 0);
        assert_eq!(validate_weekday(6).unwrap(), 6);
        assert!(validate_weekday(7).is_err());
        assert!(validate_weekday(-1).is_err());
    }

    #[test]
    fn optional_weekday_blank_is_none() {
        assert_eq!(parse_optional_weekday(None).unwrap(), None);
        assert_eq!(parse_optional_weekday(Some("")).unwrap(), None);
        assert_eq!(parse_optional_weekday(Some(" 3 ")).unwrap(), Some(3));
        assert!(parse_optional_weekday(Some("Tuesday")).is_err());
    }
}
