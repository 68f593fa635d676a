//! Candidate-value validation for the edit flow.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::model::{Field, FieldType};

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-+()]+$").unwrap());

/// Validate a candidate value against a field's rules.
///
/// Errors accumulate in order; an empty vec means the candidate is
/// acceptable. Shape checks only run on non-empty candidates, so optional
/// email and phone fields may stay blank.
pub fn validate(field: &Field, candidate: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if field.mandatory && candidate.trim().is_empty() {
        errors.push(format!("{} is required", field.label));
    }

    if !candidate.is_empty() {
        match field.field_type {
            FieldType::Email if !EMAIL_SHAPE.is_match(candidate) => {
                errors.push("Please enter a valid email address".to_string());
            }
            FieldType::Phone if !PHONE_SHAPE.is_match(candidate) => {
                errors.push("Please enter a valid phone number".to_string());
            }
            _ => {}
        }
    }

    errors
}
