use super::commands::AuthCommands;
use super::commands::RecordCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vtiger-cli")]
#[command(about = "A CLI tool for browsing and editing vtiger CRM records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication management
    Auth(AuthCommands),
    /// List the available CRM modules
    Modules,
    /// Browse and edit module records
    Records(RecordCommands),
}
