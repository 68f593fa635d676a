//! Module directory listing.

use anyhow::Result;
use log::info;

use crate::api::RecordService;
use crate::cli::render;

pub async fn modules_command() -> Result<()> {
    info!("Executing modules command");

    let (client, _) = super::connect()?;
    let modules = client.list_modules().await?;
    render::render_modules(&modules);
    Ok(())
}
