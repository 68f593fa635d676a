//! Shape normalization for related-record payloads.
//!
//! The backend is inconsistent here: a single related record sometimes
//! arrives as a flat array of field objects, sometimes wrapped as an array
//! of record arrays, and a per-module permission failure arrives as an
//! `{"error": ...}` object in place of the records. Everything downstream
//! wants exactly one shape: an array of records, each an array of fields.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::fields::Record;

/// A related-records payload after shape normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RelatedPayload {
    Records(Vec<Record>),
    /// Backend-signaled access failure, message verbatim.
    Denied(String),
}

impl RelatedPayload {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Records(records) if records.is_empty())
    }
}

/// Normalize a raw related-records value into [`RelatedPayload`].
///
/// Idempotent: an already-normalized array of record arrays passes through
/// unchanged, so applying this both in the client and at the navigator is
/// safe. Structurally malformed payloads are an error.
pub fn normalize_related(value: Value) -> Result<RelatedPayload> {
    match value {
        Value::Null => Ok(RelatedPayload::Records(Vec::new())),
        Value::Object(map) => {
            if let Some(error) = map.get("error") {
                Ok(RelatedPayload::Denied(error_message(error)))
            } else {
                // A bare object carries no records.
                Ok(RelatedPayload::Records(Vec::new()))
            }
        }
        Value::Array(items) => {
            if items.is_empty() {
                return Ok(RelatedPayload::Records(Vec::new()));
            }
            let records = if items[0].is_array() {
                serde_json::from_value::<Vec<Record>>(Value::Array(items))
                    .context("Malformed related records payload")?
            } else {
                // Flat field array: one record, wrap it.
                let record: Record = serde_json::from_value(Value::Array(items))
                    .context("Malformed related record payload")?;
                vec![record]
            };
            Ok(RelatedPayload::Records(records))
        }
        other => anyhow::bail!("Unexpected related records payload: {other}"),
    }
}

/// Error payloads come as a bare string or as `{"message": "..."}`.
pub(crate) fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => error.to_string(),
        },
        other => other.to_string(),
    }
}
