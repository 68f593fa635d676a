//! HTTP client for the vtiger REST bridge.
//!
//! The bridge is a set of flat PHP endpoints: the session token rides in the
//! query string for GETs and in the JSON body for writes, and responses come
//! in a loose `{success, data|error}` envelope that some endpoints skip
//! entirely. The parsing helpers here flatten those inconsistencies before
//! anything typed sees the data.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::api::constants::{self, endpoints};
use crate::api::models::{LoginResponse, LoginSession, ModuleDescriptor, RecordDetail};
use crate::api::service::RecordService;
use crate::fields::{Field, Record};
use crate::related::shape::error_message;
use crate::related::{normalize_related, RelatedPayload};

/// vtiger REST bridge client with connection pooling.
pub struct VtigerClient {
    host: String,
    http_client: reqwest::Client,
    session_name: Option<String>,
}

impl VtigerClient {
    pub fn new(host: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vtiger-cli/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            host: host.into(),
            http_client,
            session_name: None,
        }
    }

    /// Client from `VTIGER_HOST`, loading `.env` first. Used by live tests
    /// and scripting.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let host = std::env::var("VTIGER_HOST").context("VTIGER_HOST is not set")?;
        Ok(Self::new(host))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_session(&mut self, session_name: impl Into<String>) {
        self.session_name = Some(session_name.into());
    }

    pub fn clear_session(&mut self) {
        self.session_name = None;
    }

    pub fn session(&self) -> Option<&str> {
        self.session_name.as_deref()
    }

    /// Authenticate against the bridge and adopt the returned session.
    pub async fn login(&mut self, username: &str, access_key: &str) -> Result<LoginSession> {
        let url = constants::endpoint_url(&self.host, endpoints::LOGIN);
        log::info!("Logging in to {} as {}", self.host, username);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({"username": username, "accessKey": access_key}))
            .send()
            .await
            .context("Login request failed")?;

        let status = response.status();
        log::debug!("Login response status: {status}");
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                bail!("Invalid credentials");
            }
            let body = response.text().await.unwrap_or_default();
            bail!("Login failed with status {status}: {body}");
        }

        let parsed: LoginResponse = response
            .json()
            .await
            .context("Login response was not valid JSON")?;
        let session = parsed.into_session()?;
        self.session_name = Some(session.session_name.clone());
        log::info!("Login succeeded");
        Ok(session)
    }

    fn session_name(&self) -> Result<&str> {
        self.session_name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Session not found. Please login again."))
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = constants::endpoint_url(&self.host, endpoint);
        let session_name = self.session_name()?;
        let mut query: Vec<(&str, &str)> = vec![("sessionName", session_name)];
        query.extend_from_slice(params);

        log::debug!("GET {url}");
        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("Request to {endpoint} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{endpoint} returned status {status}: {body}");
        }
        response
            .json()
            .await
            .with_context(|| format!("{endpoint} returned invalid JSON"))
    }

    async fn send_json(&self, method: reqwest::Method, endpoint: &str, body: Value) -> Result<Value> {
        let url = constants::endpoint_url(&self.host, endpoint);
        log::debug!("{method} {url}");
        let response = self
            .http_client
            .request(method, &url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Request to {endpoint} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{endpoint} returned status {status}: {body}");
        }
        response
            .json()
            .await
            .with_context(|| format!("{endpoint} returned invalid JSON"))
    }
}

/// Strip the `{success, data|error}` envelope. `success: false` is an
/// error; a `data` key is unwrapped; envelope-less responses pass through.
fn unwrap_envelope(value: Value) -> Result<Value> {
    let Value::Object(mut map) = value else {
        return Ok(value);
    };
    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("error")
            .map(error_message)
            .unwrap_or_else(|| "Backend signaled failure".to_string());
        bail!("{message}");
    }
    if let Some(data) = map.remove("data") {
        return Ok(data);
    }
    Ok(Value::Object(map))
}

/// First element of a one-element outer array, or an empty array. The
/// detail endpoint wraps both its `fields` and `related` sections this way.
fn unwrap_outer(value: Value) -> Value {
    match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        _ => Value::Array(Vec::new()),
    }
}

/// Listing records arrive either as `{"fields": [...]}` wrappers or as bare
/// field arrays.
fn parse_listing(value: Value) -> Result<Vec<Record>> {
    let value = unwrap_envelope(value)?;
    let Value::Array(items) = value else {
        bail!("Record listing was not an array");
    };
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let fields_value = match item {
            Value::Object(mut map) => map.remove("fields").unwrap_or(Value::Array(Vec::new())),
            other => other,
        };
        let record: Record =
            serde_json::from_value(fields_value).context("Record in listing was malformed")?;
        records.push(record);
    }
    Ok(records)
}

fn parse_record_detail(value: Value) -> Result<RecordDetail> {
    let value = unwrap_envelope(value)?;
    let Value::Object(mut map) = value else {
        bail!("Record detail was not an object");
    };

    let record: Record =
        serde_json::from_value(unwrap_outer(map.remove("fields").unwrap_or(Value::Null)))
            .context("Record detail fields were malformed")?;

    let mut related = BTreeMap::new();
    if let Value::Object(entries) = unwrap_outer(map.remove("related").unwrap_or(Value::Null)) {
        for (module_name, related_value) in entries {
            let payload = normalize_related(related_value)
                .with_context(|| format!("Related records for {module_name} were malformed"))?;
            related.insert(module_name, payload);
        }
    }

    Ok(RecordDetail { record, related })
}

fn parse_created_id(value: Value) -> Result<String> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("error")
            .map(error_message)
            .unwrap_or_else(|| "Failed to create record".to_string());
        bail!("{message}");
    }
    match value.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => bail!("Create response carried no record id"),
    }
}

#[async_trait]
impl RecordService for VtigerClient {
    async fn list_modules(&self) -> Result<Vec<ModuleDescriptor>> {
        let value = self.get_json(endpoints::GET_MODULES, &[]).await?;
        let names: Vec<String> = serde_json::from_value(unwrap_envelope(value)?)
            .context("Module list was malformed")?;
        log::debug!("Backend exposes {} modules", names.len());
        Ok(names.into_iter().map(ModuleDescriptor::for_name).collect())
    }

    async fn list_records(&self, module: &str) -> Result<Vec<Record>> {
        let value = self
            .get_json(endpoints::MODULE_INDEX, &[("moduleName", module)])
            .await?;
        let records = parse_listing(value)?;
        log::debug!("Fetched {} {module} records", records.len());
        Ok(records)
    }

    async fn get_record(&self, module: &str, id: &str) -> Result<RecordDetail> {
        let value = self
            .get_json(endpoints::MODULE_SHOW, &[("moduleName", module), ("id", id)])
            .await?;
        parse_record_detail(value)
    }

    async fn get_related_records(
        &self,
        module: &str,
        id: &str,
        related_module: &str,
    ) -> Result<RelatedPayload> {
        let value = self
            .get_json(
                endpoints::MODULE_RELATED,
                &[
                    ("moduleName", module),
                    ("id", id),
                    ("relatedModule", related_module),
                ],
            )
            .await?;
        // Access failures ride the envelope here; normalization turns the
        // error object into Denied rather than a hard failure.
        let data = match value {
            Value::Object(mut map) if map.contains_key("data") && !map.contains_key("error") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        normalize_related(data)
    }

    async fn update_record(
        &self,
        module: &str,
        id: &str,
        fields: &HashMap<String, String>,
    ) -> Result<()> {
        let body = json!({
            "sessionName": self.session_name()?,
            "moduleName": module,
            "recordId": id,
            "fields": fields,
        });
        log::info!("Updating {module} record {id}");
        let value = self
            .send_json(reqwest::Method::PUT, endpoints::MODULE_UPDATE, body)
            .await?;
        unwrap_envelope(value)?;
        Ok(())
    }

    async fn create_record(
        &self,
        module: &str,
        fields: &HashMap<String, String>,
    ) -> Result<String> {
        let body = json!({
            "sessionName": self.session_name()?,
            "moduleName": module,
            "fields": fields,
        });
        log::info!("Creating {module} record");
        let value = self
            .send_json(reqwest::Method::POST, endpoints::MODULE_STORE, body)
            .await?;
        parse_created_id(value)
    }

    async fn get_module_fields(&self, module: &str) -> Result<Vec<Field>> {
        let value = self
            .get_json(endpoints::MODULE_FIELDS, &[("moduleName", module)])
            .await?;
        let value = unwrap_envelope(value)?;
        let Some(fields_value) = value.get("fields").cloned() else {
            bail!("Module fields response carried no fields array");
        };
        serde_json::from_value(fields_value).context("Module fields payload was malformed")
    }
}
