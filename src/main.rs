use anyhow::Result;
use clap::Parser;
use log::info;

use vtiger_cli::cli::commands::{auth_command, modules_command, records_command};
use vtiger_cli::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file so stdout stays clean for the rendered views
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("vtiger-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let args = Cli::parse();
    info!("Starting vtiger-cli");

    match args.command {
        Commands::Auth(auth_args) => auth_command(auth_args).await,
        Commands::Modules => modules_command().await,
        Commands::Records(record_args) => records_command(record_args).await,
    }
}
