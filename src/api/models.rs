//! Data shapes exchanged with the vtiger REST bridge.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::fields::Record;
use crate::related::RelatedPayload;

/// Presentation metadata for the modules the app knows about. The backend
/// only supplies module names; icons and hex colors come from this registry,
/// with a folder/gray fallback for anything unknown.
const KNOWN_MODULES: &[(&str, &str, &str)] = &[
    ("Accounts", "business", "#6366F1"),
    ("Assets", "business-center", "#8B5CF6"),
    ("Calendar", "event", "#3B82F6"),
    ("Campaigns", "campaign", "#EC4899"),
    ("Contacts", "person", "#10B981"),
    ("Documents", "folder", "#F59E0B"),
    ("Emails", "email", "#6366F1"),
    ("Events", "event-note", "#8B5CF6"),
    ("HelpDesk", "support", "#EF4444"),
    ("Invoice", "receipt", "#059669"),
    ("Leads", "person-add", "#10B981"),
    ("ModComments", "folder", "#6B7280"),
    ("PBXManager", "folder", "#8B5CF6"),
    ("Potentials", "trending-up", "#F97316"),
    ("Products", "inventory", "#0EA5E9"),
    ("Project", "work", "#7C3AED"),
    ("Quotes", "description", "#84CC16"),
    ("SalesOrder", "shopping-cart", "#06B6D4"),
    ("ServiceContracts", "folder", "#EC4899"),
    ("Services", "build", "#F59E0B"),
    ("Tasks", "assignment", "#3B82F6"),
];

pub const DEFAULT_MODULE_ICON: &str = "folder";
pub const DEFAULT_MODULE_COLOR: &str = "#6B7280";

pub fn module_icon(name: &str) -> &'static str {
    KNOWN_MODULES
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, icon, _)| *icon)
        .unwrap_or(DEFAULT_MODULE_ICON)
}

pub fn module_color(name: &str) -> &'static str {
    KNOWN_MODULES
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, _, color)| *color)
        .unwrap_or(DEFAULT_MODULE_COLOR)
}

/// One CRM module as listed by the backend, enriched with presentation
/// metadata from the known-modules registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl ModuleDescriptor {
    pub fn for_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.to_lowercase(),
            icon: module_icon(&name).to_string(),
            color: module_color(&name).to_string(),
            name,
        }
    }
}

/// One record plus its related-module map, as served by the detail endpoint.
/// The wire wraps both `fields` and `related` in one-element outer arrays;
/// the client unwraps them before building this.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetail {
    pub record: Record,
    pub related: BTreeMap<String, RelatedPayload>,
}

/// Acting user, persisted in the session store as `userData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Successful login: the session token plus whatever the bridge tells us
/// about the acting user.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub session_name: String,
    pub user: Option<UserProfile>,
}

/// Raw login response. Success is signaled by the presence of
/// `Auth User.sessionName`, not by an envelope flag.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Auth User", default)]
    pub auth_user: Option<AuthUser>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "sessionName")]
    pub session_name: String,
    #[serde(rename = "userId", default, deserialize_with = "opt_scalar_string")]
    pub user_id: Option<String>,
    #[serde(rename = "userName", default, deserialize_with = "opt_scalar_string")]
    pub user_name: Option<String>,
}

impl LoginResponse {
    pub fn into_session(self) -> anyhow::Result<LoginSession> {
        match self.auth_user {
            Some(auth_user) => Ok(LoginSession {
                session_name: auth_user.session_name,
                user: auth_user.user_id.map(|user_id| UserProfile {
                    user_id,
                    user_name: auth_user.user_name,
                }),
            }),
            None => {
                let message = self
                    .error
                    .as_ref()
                    .and_then(Value::as_str)
                    .unwrap_or("Invalid credentials");
                anyhow::bail!("{message}")
            }
        }
    }
}

/// PHP serializes ids as strings or numbers depending on the code path.
fn opt_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
