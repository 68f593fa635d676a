//! Field and record data model for the vtiger REST bridge.
//!
//! The backend delivers every record as a flat array of loosely-typed field
//! objects: a type tag, a scalar value serialized however PHP felt like it,
//! and optional lookup metadata. This module gives that shape a typed home;
//! all interpretation of the values happens in the sibling normalizer
//! modules.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Backend-managed fields: preserved in submissions, never user-editable.
pub const READ_ONLY_FIELDS: [&str; 4] = ["id", "createdtime", "modifiedtime", "modifiedby"];

/// Whether a fieldname is backend-managed.
pub fn is_read_only(fieldname: &str) -> bool {
    READ_ONLY_FIELDS.contains(&fieldname)
}

/// Field type tags used by the bridge.
///
/// The set is closed on the backend side, but unknown tags are carried
/// through as [`FieldType::Other`] so a new backend type degrades to plain
/// string handling instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Text,
    Email,
    Phone,
    Boolean,
    Date,
    Datetime,
    Time,
    Picklist,
    Owner,
    Reference,
    Integer,
    Currency,
    Number,
    Url,
    Image,
    Other(String),
}

impl FieldType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "text" => Self::Text,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::Datetime,
            "time" => Self::Time,
            "picklist" => Self::Picklist,
            "owner" => Self::Owner,
            "reference" => Self::Reference,
            "integer" => Self::Integer,
            "currency" => Self::Currency,
            "number" => Self::Number,
            "url" => Self::Url,
            "image" => Self::Image,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Time => "time",
            Self::Picklist => "picklist",
            Self::Owner => "owner",
            Self::Reference => "reference",
            Self::Integer => "integer",
            Self::Currency => "currency",
            Self::Number => "number",
            Self::Url => "url",
            Self::Image => "image",
            Self::Other(tag) => tag,
        }
    }

    /// Date or datetime; the projections pick their date column with this.
    pub fn is_date_like(&self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::String
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// One named, typed value within a CRM record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Stable machine key, unique within a record.
    pub fieldname: String,
    /// Human-readable display name.
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Raw scalar value as delivered; semantics depend on `field_type`.
    #[serde(default, deserialize_with = "scalar_string")]
    pub value: String,
    /// Whether an empty value fails validation.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub mandatory: bool,
    /// Allowed raw values for picklist/owner fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Raw value to display label, for owner/reference resolution.
    #[serde(rename = "userMap", default, skip_serializing_if = "Option::is_none")]
    pub user_map: Option<HashMap<String, String>>,
}

impl Field {
    pub fn new(
        fieldname: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            fieldname: fieldname.into(),
            label: label.into(),
            field_type,
            value: value.into(),
            mandatory: false,
            options: None,
            user_map: None,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_user_map(mut self, user_map: HashMap<String, String>) -> Self {
        self.user_map = Some(user_map);
        self
    }

    /// Empty or whitespace-only raw value.
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// An ordered set of fields representing one entity instance.
///
/// `fieldname` uniqueness within the sequence is a backend invariant; lookups
/// here take the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, fieldname: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.fieldname == fieldname)
    }

    /// The distinguished `id` field's value, when present.
    pub fn id(&self) -> Option<&str> {
        self.field("id").map(|f| f.value.as_str())
    }

    /// First field carrying a non-empty value; the record's headline in every
    /// view. Falls back to `"?"` for a fully blank record.
    pub fn primary_label(&self) -> String {
        self.fields
            .iter()
            .find(|f| !f.is_empty())
            .map(|f| f.value.clone())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Fields a user may edit: everything except the backend-managed set.
    pub fn editable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !is_read_only(&f.fieldname))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// PHP serializes scalars inconsistently; accept any JSON scalar and coerce
/// to the string form the rest of the crate works with. Nested structure in a
/// field value violates the data model and is rejected.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Bool(b) => Ok(if b { "1" } else { "0" }.to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "field value must be a scalar, got {other}"
        ))),
    }
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => matches!(s.as_str(), "1" | "true" | "yes"),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}
