//! Status-field detection and semantic color buckets.

use crate::fields::{Field, Record};

/// Loose convention: any fieldname containing `status`, case-insensitive.
///
/// This is a heuristic, not a schema contract. It false-positives on names
/// like `statusreportcode`; that is a known limitation kept for
/// compatibility, not something to silently fix.
pub fn is_likely_status_field(fieldname: &str) -> bool {
    fieldname.to_lowercase().contains("status")
}

/// First status-like field of a record, if any.
pub fn status_field(record: &Record) -> Option<&Field> {
    record
        .fields
        .iter()
        .find(|f| is_likely_status_field(&f.fieldname))
}

/// Semantic bucket for a status value, driving badge colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Success,
    Warning,
    Error,
    Info,
    Neutral,
}

/// Case-insensitive substring classification; first matching bucket wins,
/// in the order listed here.
pub fn classify_status(value: &str) -> StatusBucket {
    let lower = value.to_lowercase();
    let matches_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if matches_any(&["completed", "closed", "won"]) {
        StatusBucket::Success
    } else if matches_any(&["pending", "open", "in progress"]) {
        StatusBucket::Warning
    } else if matches_any(&["cancelled", "failed", "lost"]) {
        StatusBucket::Error
    } else if matches_any(&["new", "draft"]) {
        StatusBucket::Info
    } else {
        StatusBucket::Neutral
    }
}
