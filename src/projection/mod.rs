//! View projection: search, sort, and per-view presentation over record
//! listings. Projections never mutate the underlying records.

pub mod status;
pub mod views;

pub use status::{classify_status, is_likely_status_field, status_field, StatusBucket};
pub use views::{CardProjection, TableRow, TimelineEntry};

use clap::ValueEnum;
use std::collections::HashSet;

use crate::fields::{Field, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    Cards,
    Table,
    Timeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Derived-state knobs for one listing.
#[derive(Debug, Clone)]
pub struct ProjectionOptions {
    pub search_text: String,
    pub sort_key: String,
    pub sort_order: SortOrder,
    pub view_mode: ViewMode,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_key: "id".to_string(),
            sort_order: SortOrder::Desc,
            view_mode: ViewMode::Cards,
        }
    }
}

/// Search predicate shared by record search and in-record field search:
/// case-insensitive containment over label, fieldname, and value.
fn field_matches(field: &Field, query_lower: &str) -> bool {
    field.label.to_lowercase().contains(query_lower)
        || field.fieldname.to_lowercase().contains(query_lower)
        || field.value.to_lowercase().contains(query_lower)
}

/// Filter and sort a record listing for rendering.
///
/// A record matches the search when any of its fields matches; non-matching
/// records are excluded from the projection, never from the source. Sorting
/// is a stable case-insensitive comparison of the `sort_key` field's value,
/// with a missing field treated as the empty string (so it sorts first
/// ascending).
pub fn project<'a>(records: &'a [Record], options: &ProjectionOptions) -> Vec<&'a Record> {
    let query = options.search_text.trim().to_lowercase();
    let mut projected: Vec<&Record> = records
        .iter()
        .filter(|record| {
            query.is_empty() || record.fields.iter().any(|f| field_matches(f, &query))
        })
        .collect();

    let sort_value = |record: &Record| -> String {
        record
            .field(&options.sort_key)
            .map(|f| f.value.to_lowercase())
            .unwrap_or_default()
    };
    projected.sort_by(|a, b| {
        let (ka, kb) = (sort_value(a), sort_value(b));
        match options.sort_order {
            SortOrder::Asc => ka.cmp(&kb),
            SortOrder::Desc => kb.cmp(&ka),
        }
    });

    projected
}

/// The same search predicate applied within one record, for the detail
/// screen's field filter.
pub fn filter_fields<'a>(record: &'a Record, query: &str) -> Vec<&'a Field> {
    let query = query.trim().to_lowercase();
    record
        .fields
        .iter()
        .filter(|f| query.is_empty() || field_matches(f, &query))
        .collect()
}

/// One module's listing plus its derived view state.
///
/// Expansion indices refer to positions in the projected sequence, so they
/// shift when the search changes; that matches how the card grid keys its
/// expand toggles.
#[derive(Debug, Clone, Default)]
pub struct ModuleDataset {
    records: Vec<Record>,
    pub options: ProjectionOptions,
    expanded: HashSet<usize>,
}

impl ModuleDataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            options: ProjectionOptions::default(),
            expanded: HashSet::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn projected(&self) -> Vec<&Record> {
        project(&self.records, &self.options)
    }

    pub fn toggle_expanded(&mut self, index: usize) {
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }
}
