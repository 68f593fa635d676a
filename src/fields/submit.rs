//! Conversion of edited candidate values into the backend's wire form.

use chrono::{Local, TimeZone};

use crate::fields::model::{Field, FieldType};
use crate::timeutil;

/// Convert a candidate value into the form the backend stores.
///
/// Temporal candidates arrive as viewer-local wall-clock strings and leave
/// as the naive UTC strings the backend expects; date-only values carry no
/// zone and are normalized to `YYYY-MM-DD`. Unconvertible candidates pass
/// through unchanged, the same fallback policy as display.
pub fn parse_for_submit(field: &Field, candidate: &str) -> String {
    parse_for_submit_in(field, candidate, &Local)
}

/// Zone-explicit variant of [`parse_for_submit`].
pub fn parse_for_submit_in<Tz: TimeZone>(field: &Field, candidate: &str, tz: &Tz) -> String {
    match field.field_type {
        FieldType::Datetime => {
            timeutil::datetime_to_utc_in(candidate, tz).unwrap_or_else(|| candidate.to_string())
        }
        FieldType::Time => {
            timeutil::time_to_utc_in(candidate, tz).unwrap_or_else(|| candidate.to_string())
        }
        FieldType::Date => timeutil::date_only(candidate).unwrap_or_else(|| candidate.to_string()),
        _ => candidate.to_string(),
    }
}
