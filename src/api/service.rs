//! The record service contract: everything the views need from the backend.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use crate::api::models::{ModuleDescriptor, RecordDetail};
use crate::fields::{Field, Record};
use crate::related::RelatedPayload;

/// Async facade over the CRM bridge. [`crate::api::VtigerClient`] is the
/// HTTP implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Module descriptors for everything the backend exposes.
    async fn list_modules(&self) -> Result<Vec<ModuleDescriptor>>;

    /// All records of one module, shape-unwrapped into flat field arrays.
    async fn list_records(&self, module: &str) -> Result<Vec<Record>>;

    /// One record plus its related-module map.
    async fn get_record(&self, module: &str, id: &str) -> Result<RecordDetail>;

    /// Related records for one parent, shape-normalized; backend-signaled
    /// access failures surface as [`RelatedPayload::Denied`], not as `Err`.
    async fn get_related_records(
        &self,
        module: &str,
        id: &str,
        related_module: &str,
    ) -> Result<RelatedPayload>;

    /// Submit a full field map for an existing record.
    async fn update_record(
        &self,
        module: &str,
        id: &str,
        fields: &HashMap<String, String>,
    ) -> Result<()>;

    /// Create a record from a full field map; returns the new record id.
    async fn create_record(&self, module: &str, fields: &HashMap<String, String>)
        -> Result<String>;

    /// Blank field schema for a module, for the create flow.
    async fn get_module_fields(&self, module: &str) -> Result<Vec<Field>>;
}
