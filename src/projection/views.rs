//! Per-record presentation builders for the card, table, and timeline views.
//!
//! Builders produce plain display strings; terminal styling happens in the
//! CLI layer. All field values pass through the normalizer's display
//! formatting.

use crate::fields::{display_value, Field, Record};
use crate::projection::status::{classify_status, status_field, StatusBucket};

/// Collapsed cards show at most this many fields.
const CARD_FIELD_LIMIT: usize = 6;
/// Timeline entries show at most this many summary lines.
const TIMELINE_SUMMARY_LIMIT: usize = 3;

fn date_field(record: &Record) -> Option<&Field> {
    record.fields.iter().find(|f| f.field_type.is_date_like())
}

fn resolve_assigned(field: &Field) -> String {
    let resolved = field
        .user_map
        .as_ref()
        .and_then(|map| map.get(&field.value))
        .cloned()
        .unwrap_or_else(|| field.value.clone());
    if resolved.trim().is_empty() {
        "Unassigned".to_string()
    } else {
        resolved
    }
}

/// One record rendered as a card.
#[derive(Debug, Clone)]
pub struct CardProjection {
    pub title: String,
    /// First date-like field's display value, or `Record N` by projected
    /// position.
    pub subtitle: String,
    /// `(label, display value)` pairs; the `id` field never appears.
    pub fields: Vec<(String, String)>,
    /// Fields hidden behind the expand toggle when collapsed.
    pub hidden_count: usize,
    /// Raw status value plus its color bucket.
    pub status: Option<(String, StatusBucket)>,
    pub assigned: Option<String>,
}

impl CardProjection {
    pub fn build(record: &Record, position: usize, expanded: bool) -> Self {
        let subtitle = date_field(record)
            .map(display_value)
            .unwrap_or_else(|| format!("Record {}", position + 1));

        let visible: Vec<&Field> = record
            .fields
            .iter()
            .filter(|f| f.fieldname != "id")
            .collect();
        let hidden_count = if expanded {
            0
        } else {
            visible.len().saturating_sub(CARD_FIELD_LIMIT)
        };
        let shown = if expanded {
            visible.as_slice()
        } else {
            &visible[..visible.len().min(CARD_FIELD_LIMIT)]
        };

        Self {
            title: record.primary_label(),
            subtitle,
            fields: shown
                .iter()
                .map(|f| (f.label.clone(), display_value(f)))
                .collect(),
            hidden_count,
            status: status_field(record).map(|f| (f.value.clone(), classify_status(&f.value))),
            assigned: record.field("assigned_user_id").map(resolve_assigned),
        }
    }
}

/// One record rendered as a table row with the fixed Name / Status / Date /
/// Assigned columns. A missing column field renders as `-`.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub name: String,
    /// Display text plus color bucket; bucket classification always runs on
    /// the raw value.
    pub status: Option<(String, StatusBucket)>,
    pub date: String,
    pub assigned: String,
}

impl TableRow {
    pub fn build(record: &Record) -> Self {
        Self {
            name: record.primary_label(),
            status: status_field(record).map(|f| (display_value(f), classify_status(&f.value))),
            date: date_field(record)
                .map(display_value)
                .unwrap_or_else(|| "-".to_string()),
            assigned: record
                .field("assigned_user_id")
                .map(display_value)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// One record rendered as a timeline entry. The timeline keeps the projected
/// order; it does not re-sort by date.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub title: String,
    pub date_label: String,
    /// Up to three `(label, display value)` summary pairs, `id` skipped.
    pub summary: Vec<(String, String)>,
    pub status: Option<(String, StatusBucket)>,
}

impl TimelineEntry {
    pub fn build(record: &Record) -> Self {
        Self {
            title: record.primary_label(),
            date_label: date_field(record)
                .map(display_value)
                .unwrap_or_else(|| "No date".to_string()),
            summary: record
                .fields
                .iter()
                .filter(|f| f.fieldname != "id")
                .take(TIMELINE_SUMMARY_LIMIT)
                .map(|f| (f.label.clone(), display_value(f)))
                .collect(),
            status: status_field(record).map(|f| (f.value.clone(), classify_status(&f.value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldType;
    use std::collections::HashMap;

    fn wide_record() -> Record {
        let mut user_map = HashMap::new();
        user_map.insert("19x1".to_string(), "Alice Admin".to_string());
        Record::new(vec![
            Field::new("id", "Id", FieldType::String, "12x7"),
            Field::new("subject", "Subject", FieldType::String, "Quarterly review"),
            Field::new("taskstatus", "Status", FieldType::Picklist, "In Progress"),
            Field::new("duedate", "Due Date", FieldType::Date, "2024-03-15"),
            Field::new("assigned_user_id", "Assigned To", FieldType::Owner, "19x1")
                .with_user_map(user_map),
            Field::new("priority", "Priority", FieldType::Picklist, "High"),
            Field::new("location", "Location", FieldType::String, ""),
            Field::new("notes", "Notes", FieldType::Text, "bring slides"),
            Field::new("done", "Done", FieldType::Boolean, "0"),
        ])
    }

    #[test]
    fn test_card_collapsed_caps_fields_and_counts_hidden() {
        let record = wide_record();
        let card = CardProjection::build(&record, 0, false);
        assert_eq!(card.title, "12x7");
        assert_eq!(card.subtitle, "2024-03-15");
        // 8 non-id fields, 6 visible, 2 hidden.
        assert_eq!(card.fields.len(), 6);
        assert_eq!(card.hidden_count, 2);
        assert!(card.fields.iter().all(|(label, _)| label != "Id"));
        assert_eq!(
            card.status,
            Some(("In Progress".to_string(), StatusBucket::Warning))
        );
        assert_eq!(card.assigned.as_deref(), Some("Alice Admin"));
    }

    #[test]
    fn test_card_expanded_shows_all_and_formats_values() {
        let record = wide_record();
        let card = CardProjection::build(&record, 0, true);
        assert_eq!(card.fields.len(), 8);
        assert_eq!(card.hidden_count, 0);
        let by_label: HashMap<_, _> = card.fields.iter().cloned().collect();
        assert_eq!(by_label["Location"], "Not set");
        assert_eq!(by_label["Done"], "No");
        assert_eq!(by_label["Assigned To"], "Alice Admin");
    }

    #[test]
    fn test_card_subtitle_falls_back_to_position() {
        let record = Record::new(vec![Field::new("subject", "Subject", FieldType::String, "x")]);
        let card = CardProjection::build(&record, 4, false);
        assert_eq!(card.subtitle, "Record 5");
        assert!(card.status.is_none());
        assert!(card.assigned.is_none());
    }

    #[test]
    fn test_card_unassigned_placeholder() {
        let record = Record::new(vec![
            Field::new("subject", "Subject", FieldType::String, "x"),
            Field::new("assigned_user_id", "Assigned To", FieldType::Owner, ""),
        ]);
        let card = CardProjection::build(&record, 0, false);
        assert_eq!(card.assigned.as_deref(), Some("Unassigned"));
    }

    #[test]
    fn test_table_row_columns_and_fallbacks() {
        let row = TableRow::build(&wide_record());
        assert_eq!(row.name, "12x7");
        assert_eq!(
            row.status,
            Some(("In Progress".to_string(), StatusBucket::Warning))
        );
        assert_eq!(row.date, "2024-03-15");
        assert_eq!(row.assigned, "Alice Admin");

        let sparse = Record::new(vec![Field::new("subject", "Subject", FieldType::String, "x")]);
        let row = TableRow::build(&sparse);
        assert!(row.status.is_none());
        assert_eq!(row.date, "-");
        assert_eq!(row.assigned, "-");
    }

    #[test]
    fn test_timeline_entry_summary_and_date_fallback() {
        let entry = TimelineEntry::build(&wide_record());
        assert_eq!(entry.date_label, "2024-03-15");
        assert_eq!(entry.summary.len(), 3);
        assert_eq!(entry.summary[0].0, "Subject");

        let sparse = Record::new(vec![Field::new("subject", "Subject", FieldType::String, "x")]);
        let entry = TimelineEntry::build(&sparse);
        assert_eq!(entry.date_label, "No date");
        assert_eq!(entry.summary.len(), 1);
    }
}
