//! Canonical string forms for typed field values.
//!
//! Hashing and encryption must observe byte-identical input for the same
//! logical value, today and after any number of process restarts. This
//! module is the single source of truth for that representation: every
//! supported type has exactly one canonical string form, used by both the
//! encrypt path and the hash path.

use crate::error::Error;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Date canonical form: ISO-8601 calendar date.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The supported domain types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text
    Text,
    /// Email address, structurally validated
    Email,
    /// 64-bit signed integer
    Integer,
    /// Calendar date
    Date,
    /// Point in time, canonicalized to UTC
    DateTime,
}

/// A typed field value with a single canonical string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free-form text
    Text(String),
    /// Validated email address
    Email(String),
    /// 64-bit signed integer
    Integer(i64),
    /// Calendar date
    Date(NaiveDate),
    /// Point in time in UTC
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Email(_) => FieldKind::Email,
            Self::Integer(_) => FieldKind::Integer,
            Self::Date(_) => FieldKind::Date,
            Self::DateTime(_) => FieldKind::DateTime,
        }
    }

    /// Renders the canonical string form.
    ///
    /// Dates use ISO-8601 (`YYYY-MM-DD`); datetimes use RFC 3339 in UTC with
    /// fixed microsecond precision, so the rendering never depends on the
    /// value's sub-second resolution.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Text(s) | Self::Email(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
            Self::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    /// Parses and validates a string into a typed value of `kind`.
    ///
    /// This is the validation gate for the write path: it is applied to the
    /// plaintext, never to a hash.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` when the string is not a valid rendering
    /// of the kind.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<Self, Error> {
        match kind {
            FieldKind::Text => Ok(Self::Text(raw.to_owned())),
            FieldKind::Email => {
                if is_valid_email(raw) {
                    Ok(Self::Email(raw.to_owned()))
                } else {
                    Err(Error::Validation(format!("'{raw}' is not a valid email address")))
                }
            }
            FieldKind::Integer => raw
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| Error::Validation(format!("'{raw}' is not a valid integer"))),
            FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(Self::Date)
                .map_err(|_| {
                    Error::Validation(format!("'{raw}' is not a valid date (expected YYYY-MM-DD)"))
                }),
            FieldKind::DateTime => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Self::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| {
                    Error::Validation(format!("'{raw}' is not a valid RFC 3339 datetime"))
                }),
        }
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
fn is_valid_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if candidate.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_text_canonical_is_identity() {
        let value = FieldValue::parse(FieldKind::Text, "Hello, World").unwrap();
        assert_eq!(value.canonical(), "Hello, World");
        assert_eq!(value.kind(), FieldKind::Text);
    }

    #[test]
    fn test_email_round_trip() {
        let value = FieldValue::parse(FieldKind::Email, "alice@example.com").unwrap();
        assert_eq!(value, FieldValue::Email("alice@example.com".to_string()));
        assert_eq!(value.canonical(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_malformed() {
        for bad in ["", "plain", "@example.com", "a@", "a@nodot", "a b@example.com", "a@.com"] {
            let result = FieldValue::parse(FieldKind::Email, bad);
            assert!(matches!(result, Err(Error::Validation(_))), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_integer_canonical() {
        let value = FieldValue::parse(FieldKind::Integer, "-42").unwrap();
        assert_eq!(value, FieldValue::Integer(-42));
        assert_eq!(value.canonical(), "-42");
    }

    #[test]
    fn test_integer_rejects_garbage() {
        assert!(matches!(
            FieldValue::parse(FieldKind::Integer, "12.5"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            FieldValue::parse(FieldKind::Integer, "twelve"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_date_canonical() {
        let value = FieldValue::parse(FieldKind::Date, "2020-09-10").unwrap();
        assert_eq!(value.canonical(), "2020-09-10");
    }

    #[test]
    fn test_date_rejects_malformed() {
        assert!(matches!(
            FieldValue::parse(FieldKind::Date, "10/09/2020"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            FieldValue::parse(FieldKind::Date, "2020-13-01"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_datetime_canonical_is_stable() {
        let value = FieldValue::parse(FieldKind::DateTime, "2020-09-10T12:30:00Z").unwrap();
        let canonical = value.canonical();
        assert_eq!(canonical, "2020-09-10T12:30:00.000000Z");

        // Re-parsing the canonical form yields the same canonical form.
        let reparsed = FieldValue::parse(FieldKind::DateTime, &canonical).unwrap();
        assert_eq!(reparsed.canonical(), canonical);
    }

    #[test]
    fn test_datetime_normalizes_offset_to_utc() {
        let value = FieldValue::parse(FieldKind::DateTime, "2020-09-10T14:30:00+02:00").unwrap();
        assert_eq!(value.canonical(), "2020-09-10T12:30:00.000000Z");
    }

    #[test]
    fn test_datetime_from_typed_value() {
        let dt = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap();
        let value = FieldValue::DateTime(dt);
        assert_eq!(value.canonical(), "2021-01-02T03:04:05.000000Z");
    }
}
