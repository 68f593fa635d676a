//! Draft records: staged edits, per-field validation state, and submission
//! assembly for the update and create flows.

use anyhow::{bail, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::collections::HashMap;

use crate::fields::{self, is_read_only, Field, Record};
use crate::timeutil;

/// Staged edits for one record.
///
/// The draft owns a copy of the record's field schema and tracks one
/// candidate value per fieldname. Candidates are stored submit-ready:
/// temporal edits are converted to the backend's naive-UTC form when set, so
/// an untouched candidate always compares equal to its original raw value
/// and backend-managed timestamps are never run through zone conversion
/// twice.
#[derive(Debug, Clone)]
pub struct DraftRecord {
    fields: Vec<Field>,
    candidates: HashMap<String, String>,
    errors: HashMap<String, Vec<String>>,
}

impl DraftRecord {
    /// Draft for editing an existing record; candidates seed from current
    /// values.
    pub fn new(record: &Record) -> Self {
        let candidates = record
            .fields
            .iter()
            .map(|f| (f.fieldname.clone(), f.value.clone()))
            .collect();
        Self {
            fields: record.fields.clone(),
            candidates,
            errors: HashMap::new(),
        }
    }

    /// Draft for creating a record from a module field schema; all
    /// candidates start blank.
    pub fn for_new(schema: &[Field]) -> Self {
        let candidates = schema
            .iter()
            .map(|f| (f.fieldname.clone(), String::new()))
            .collect();
        Self {
            fields: schema.to_vec(),
            candidates,
            errors: HashMap::new(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn candidate(&self, fieldname: &str) -> Option<&str> {
        self.candidates.get(fieldname).map(String::as_str)
    }

    pub fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    /// Overwrite one candidate, converting via the viewer's local zone.
    pub fn set_field(&mut self, fieldname: &str, value: &str) -> Result<()> {
        self.set_field_in(fieldname, value, &Local)
    }

    /// Zone-explicit variant of [`DraftRecord::set_field`].
    ///
    /// Rejects unknown and backend-managed fieldnames; a successful set
    /// clears any recorded validation errors for the field (they are
    /// recomputed fresh on the next [`DraftRecord::validate_all`] pass).
    pub fn set_field_in<Tz: TimeZone>(&mut self, fieldname: &str, value: &str, tz: &Tz) -> Result<()> {
        if is_read_only(fieldname) {
            bail!("Field '{}' is read-only", fieldname);
        }
        let Some(field) = self.fields.iter().find(|f| f.fieldname == fieldname) else {
            bail!("Unknown field '{}'", fieldname);
        };
        let converted = fields::parse_for_submit_in(field, value, tz);
        self.candidates.insert(fieldname.to_string(), converted);
        self.errors.remove(fieldname);
        Ok(())
    }

    /// Run validation over every field's candidate, recording errors per
    /// fieldname. Returns true when the draft is clean.
    pub fn validate_all(&mut self) -> bool {
        self.errors.clear();
        for field in &self.fields {
            let candidate = self
                .candidates
                .get(&field.fieldname)
                .map(String::as_str)
                .unwrap_or("");
            let field_errors = fields::validate(field, candidate);
            if !field_errors.is_empty() {
                self.errors.insert(field.fieldname.clone(), field_errors);
            }
        }
        self.errors.is_empty()
    }

    /// Whether any candidate differs from its original raw value.
    ///
    /// An unchanged draft must short-circuit the save flow before any
    /// network call.
    pub fn has_changes(&self) -> bool {
        self.fields.iter().any(|f| {
            self.candidates
                .get(&f.fieldname)
                .map(String::as_str)
                .unwrap_or("")
                != f.value
        })
    }

    /// Full fieldname to value map for submission, stamped with the acting
    /// user and the current time.
    pub fn build_submission(&self, user_id: &str) -> HashMap<String, String> {
        self.build_submission_at(user_id, Utc::now())
    }

    /// The backend expects every field, not a sparse patch. Candidates are
    /// emitted as stored; `modifiedby` and `modifiedtime` are then stamped,
    /// each only when that field exists in the schema.
    pub fn build_submission_at(&self, user_id: &str, now: DateTime<Utc>) -> HashMap<String, String> {
        let mut submission: HashMap<String, String> = self
            .fields
            .iter()
            .map(|f| {
                let candidate = self
                    .candidates
                    .get(&f.fieldname)
                    .cloned()
                    .unwrap_or_default();
                (f.fieldname.clone(), candidate)
            })
            .collect();

        if !user_id.is_empty() && submission.contains_key("modifiedby") {
            submission.insert("modifiedby".to_string(), user_id.to_string());
        }
        if submission.contains_key("modifiedtime") {
            submission.insert("modifiedtime".to_string(), timeutil::format_naive_utc(now));
        }

        submission
    }
}
