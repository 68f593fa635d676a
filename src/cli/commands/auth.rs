//! Login, session status, and logout commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::*;
use dialoguer::Input;
use is_terminal::IsTerminal;
use log::{error, info};

use crate::api::{RecordService, VtigerClient};
use crate::auth::{FileSessionStore, Session};

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Log in and store the session for later commands
    Login {
        /// Backend host URL (e.g. https://crm.example.com)
        #[arg(long)]
        host: Option<String>,
        /// vtiger username
        #[arg(long)]
        username: Option<String>,
        /// REST access key (prompted for when omitted)
        #[arg(long)]
        access_key: Option<String>,
    },
    /// Show the stored session and test it against the backend
    Status,
    /// Drop the stored session
    Logout,
}

pub async fn auth_command(args: AuthCommands) -> Result<()> {
    match args.command {
        AuthSubcommands::Login {
            host,
            username,
            access_key,
        } => login_command(host, username, access_key).await,
        AuthSubcommands::Status => status_command().await,
        AuthSubcommands::Logout => logout_command(),
    }
}

/// Flag value, then environment variable, then interactive prompt.
fn resolve_input(value: Option<String>, env_key: &str, prompt: &str) -> Result<String> {
    if let Some(value) = value.or_else(|| std::env::var(env_key).ok()) {
        return Ok(value);
    }
    if std::io::stdin().is_terminal() {
        Ok(Input::<String>::new().with_prompt(prompt).interact()?)
    } else {
        bail!("{} not provided and {} is not set", prompt, env_key)
    }
}

async fn login_command(
    host: Option<String>,
    username: Option<String>,
    access_key: Option<String>,
) -> Result<()> {
    info!("Executing auth login command");
    dotenvy::dotenv().ok();

    let mut session = Session::new(FileSessionStore::open()?);

    let host = resolve_input(host.or_else(|| session.host()), "VTIGER_HOST", "Host URL")?;
    let username = resolve_input(username, "VTIGER_USERNAME", "Username")?;
    let access_key = match access_key.or_else(|| std::env::var("VTIGER_ACCESS_KEY").ok()) {
        Some(key) => key,
        None if std::io::stdin().is_terminal() => rpassword::prompt_password("Access key: ")?,
        None => bail!("Access key not provided and VTIGER_ACCESS_KEY is not set"),
    };

    let mut client = VtigerClient::new(&host);
    let login = client.login(&username, &access_key).await?;

    session.set_host(&host)?;
    session.persist(&login)?;

    match &login.user {
        Some(user) => {
            let display = user.user_name.as_deref().unwrap_or(&user.user_id);
            println!("✓ Logged in as {}", display.bright_green());
        }
        None => println!("✓ Logged in"),
    }
    Ok(())
}

async fn status_command() -> Result<()> {
    info!("Executing auth status command");

    let session = Session::new(FileSessionStore::open()?);

    println!("{}", "vtiger CLI session status".bright_white().bold());
    let Some(login) = session.load() else {
        println!("Not logged in.");
        println!("Run 'vtiger-cli auth login' to start a session.");
        return Ok(());
    };

    if let Some(host) = session.host() {
        println!("  Host: {}", host.cyan());
    }
    if let Some(user) = &login.user {
        match &user.user_name {
            Some(name) => println!("  User: {} ({})", name, user.user_id.dimmed()),
            None => println!("  User id: {}", user.user_id),
        }
    }

    println!();
    println!("Testing session...");
    let (client, _) = super::connect()?;
    match client.list_modules().await {
        Ok(modules) => {
            info!("Session test successful");
            println!("✓ Session is valid ({} modules visible)", modules.len());
        }
        Err(e) => {
            error!("Session test failed: {}", e);
            println!("✗ Session test failed: {}", e);
            println!("Run 'vtiger-cli auth login' to start a new session.");
        }
    }
    Ok(())
}

fn logout_command() -> Result<()> {
    info!("Executing auth logout command");

    let mut session = Session::new(FileSessionStore::open()?);
    if session.session_name().is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    session.clear()?;
    println!("✓ Logged out");
    Ok(())
}
