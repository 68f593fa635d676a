//! Display formatting for fields: raw backend values to human-readable text.

use chrono::{Local, TimeZone};
use std::fmt;

use crate::fields::model::{Field, FieldType};
use crate::timeutil;

/// Placeholder shown for empty values of any type.
pub const EMPTY_PLACEHOLDER: &str = "Not set";

/// Format a field's raw value for display in the viewer's local zone.
///
/// Empty values render as [`EMPTY_PLACEHOLDER`] before any type-specific
/// handling, so a blank owner field never leaks a raw id. Temporal values
/// that fail to parse fall back to the raw string.
pub fn display_value(field: &Field) -> String {
    display_value_in(field, &Local)
}

/// Zone-explicit variant of [`display_value`].
pub fn display_value_in<Tz: TimeZone>(field: &Field, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    if field.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    match &field.field_type {
        FieldType::Owner | FieldType::Reference => field
            .user_map
            .as_ref()
            .and_then(|map| map.get(&field.value))
            .cloned()
            .unwrap_or_else(|| field.value.clone()),
        FieldType::Boolean => {
            if field.value == "1" {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        FieldType::Date => {
            timeutil::date_only(&field.value).unwrap_or_else(|| field.value.clone())
        }
        FieldType::Datetime => {
            timeutil::display_datetime_in(&field.value, tz).unwrap_or_else(|| field.value.clone())
        }
        FieldType::Time => {
            timeutil::time_from_utc_in(&field.value, tz).unwrap_or_else(|| field.value.clone())
        }
        _ => field.value.clone(),
    }
}

/// Icon key for a field type, matching the detail screen's material set.
pub fn icon_for(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Email => "email",
        FieldType::Phone => "phone",
        FieldType::Date => "event",
        FieldType::Datetime => "schedule",
        FieldType::Time => "access-time",
        FieldType::Boolean => "check-circle",
        FieldType::Reference => "link",
        FieldType::Owner => "person",
        FieldType::Text => "description",
        FieldType::String => "text-fields",
        FieldType::Picklist => "list",
        FieldType::Image => "image",
        _ => "info",
    }
}
