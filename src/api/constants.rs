//! Endpoint constants and URL builders for the vtiger REST bridge.

/// Path prefix the PHP bridge lives under on the CRM host.
pub const API_BASE_PATH: &str = "/vtigercrm/api";

/// Bridge endpoints, relative to [`API_BASE_PATH`].
pub mod endpoints {
    pub const LOGIN: &str = "auth/login.php";
    pub const GET_MODULES: &str = "modules/get_modules.php";
    pub const MODULE_INDEX: &str = "modules/index.php";
    pub const MODULE_SHOW: &str = "modules/show.php";
    pub const MODULE_UPDATE: &str = "modules/update.php";
    pub const MODULE_STORE: &str = "modules/store.php";
    pub const MODULE_FIELDS: &str = "modules/getFields.php";
    pub const MODULE_RELATED: &str = "modules/getRelated.php";
}

/// Build a full endpoint URL from a host like `http://crm.example.com:8080`.
pub fn endpoint_url(host: &str, endpoint: &str) -> String {
    format!("{}{}/{}", host.trim_end_matches('/'), API_BASE_PATH, endpoint)
}
