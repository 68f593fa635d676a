use anyhow::{anyhow, Result};

use crate::api::{UserProfile, VtigerClient};
use crate::auth::{FileSessionStore, Session};

pub mod auth;
pub mod modules;
pub mod records;

pub use auth::{auth_command, AuthCommands};
pub use modules::modules_command;
pub use records::{records_command, RecordCommands};

/// Client wired with the stored host and session token, plus the cached
/// profile for submission stamping.
pub(crate) fn connect() -> Result<(VtigerClient, Option<UserProfile>)> {
    dotenvy::dotenv().ok();
    let session = Session::new(FileSessionStore::open()?);

    let host = session
        .host()
        .or_else(|| std::env::var("VTIGER_HOST").ok())
        .ok_or_else(|| anyhow!("No host configured. Run 'vtiger-cli auth login' first."))?;
    let login = session
        .load()
        .ok_or_else(|| anyhow!("Not logged in. Run 'vtiger-cli auth login' first."))?;

    let mut client = VtigerClient::new(host);
    client.set_session(login.session_name);
    Ok((client, login.user))
}
