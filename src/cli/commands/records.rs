//! Record commands: list, show, related, edit, create.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use log::info;

use crate::api::RecordService;
use crate::cli::render;
use crate::draft::DraftRecord;
use crate::fields::display_value;
use crate::projection::{ModuleDataset, SortOrder, ViewMode};
use crate::related::RelatedNavigator;

#[derive(Args)]
pub struct RecordCommands {
    #[command(subcommand)]
    pub command: RecordSubcommands,
}

#[derive(Subcommand)]
pub enum RecordSubcommands {
    /// List a module's records
    List {
        /// Module name (e.g. Contacts, HelpDesk)
        module: String,
        /// Keep only records where any field matches
        #[arg(long)]
        search: Option<String>,
        /// Field to sort by
        #[arg(long, default_value = "id")]
        sort_by: String,
        /// Sort direction
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,
        /// How to render the records
        #[arg(long, value_enum, default_value_t = ViewMode::Cards)]
        view: ViewMode,
        /// Show every field on every card
        #[arg(long)]
        expand_all: bool,
    },
    /// Show one record in full, with its related-module summary
    Show {
        /// Module name
        module: String,
        /// Record id (e.g. 12x42)
        id: String,
        /// Keep only fields where the label, name, or value matches
        #[arg(long)]
        search: Option<String>,
    },
    /// List records related to one record
    Related {
        /// Parent module name
        module: String,
        /// Parent record id
        id: String,
        /// Related module to load
        related_module: String,
        /// Keep only related records where any field matches
        #[arg(long)]
        search: Option<String>,
    },
    /// Edit a record's fields
    Edit {
        /// Module name
        module: String,
        /// Record id
        id: String,
        /// Field assignment, repeatable (e.g. --set lastname=Doe)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Create a record from the module's field schema
    Create {
        /// Module name
        module: String,
        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
}

pub async fn records_command(args: RecordCommands) -> Result<()> {
    match args.command {
        RecordSubcommands::List {
            module,
            search,
            sort_by,
            order,
            view,
            expand_all,
        } => list_command(&module, search, sort_by, order, view, expand_all).await,
        RecordSubcommands::Show { module, id, search } => {
            show_command(&module, &id, search.as_deref()).await
        }
        RecordSubcommands::Related {
            module,
            id,
            related_module,
            search,
        } => related_command(&module, &id, &related_module, search).await,
        RecordSubcommands::Edit { module, id, set } => edit_command(&module, &id, &set).await,
        RecordSubcommands::Create { module, set } => create_command(&module, &set).await,
    }
}

fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => bail!("Invalid --set '{}': expected FIELD=VALUE", raw),
    }
}

fn apply_assignments(draft: &mut DraftRecord, assignments: &[String]) -> Result<()> {
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        draft.set_field(field, value)?;
    }
    Ok(())
}

fn print_validation_errors(draft: &DraftRecord) {
    println!("{}", "Validation failed:".red().bold());
    let mut fieldnames: Vec<&String> = draft.errors().keys().collect();
    fieldnames.sort();
    for fieldname in fieldnames {
        for message in &draft.errors()[fieldname] {
            println!("  ✗ {}", message.red());
        }
    }
}

async fn list_command(
    module: &str,
    search: Option<String>,
    sort_by: String,
    order: SortOrder,
    view: ViewMode,
    expand_all: bool,
) -> Result<()> {
    info!("Executing records list command for {}", module);

    let (client, _) = super::connect()?;
    let records = client.list_records(module).await?;

    let mut dataset = ModuleDataset::new(records);
    dataset.options.search_text = search.unwrap_or_default();
    dataset.options.sort_key = sort_by;
    dataset.options.sort_order = order;
    dataset.options.view_mode = view;

    render::render_records(module, &dataset, expand_all);
    Ok(())
}

async fn show_command(module: &str, id: &str, field_search: Option<&str>) -> Result<()> {
    info!("Executing records show command for {} {}", module, id);

    let (client, _) = super::connect()?;
    let detail = client.get_record(module, id).await?;
    render::render_record_detail(module, &detail, field_search);
    Ok(())
}

async fn related_command(
    module: &str,
    id: &str,
    related_module: &str,
    search: Option<String>,
) -> Result<()> {
    info!(
        "Executing records related command for {} {} -> {}",
        module, id, related_module
    );

    let (client, _) = super::connect()?;
    let mut navigator = RelatedNavigator::new();
    navigator.open(&client, module, id, related_module).await;
    if let Some(query) = search {
        if let Some(dataset) = navigator.dataset_mut(id, related_module) {
            dataset.options.search_text = query;
        }
    }
    render::render_related_state(related_module, navigator.state(id, related_module));
    Ok(())
}

async fn edit_command(module: &str, id: &str, assignments: &[String]) -> Result<()> {
    info!("Executing records edit command for {} {}", module, id);

    let (client, user) = super::connect()?;
    let detail = client.get_record(module, id).await?;

    if assignments.is_empty() {
        println!("{}", "Editable fields:".bright_white().bold());
        for field in detail.record.editable_fields() {
            let marker = if field.mandatory { "*" } else { " " };
            println!("  {}{} {}", field.fieldname, marker, display_value(field).dimmed());
        }
        println!();
        println!("Pass --set FIELD=VALUE to change one.");
        return Ok(());
    }

    let mut draft = DraftRecord::new(&detail.record);
    apply_assignments(&mut draft, assignments)?;

    if !draft.has_changes() {
        println!("No changes to save.");
        return Ok(());
    }
    if !draft.validate_all() {
        print_validation_errors(&draft);
        bail!("Validation failed");
    }

    let user_id = user.map(|u| u.user_id).unwrap_or_default();
    let submission = draft.build_submission(&user_id);
    client
        .update_record(module, id, &submission)
        .await
        .context("Nothing was saved; fix the problem and run the same command again")?;

    println!("✓ Saved {} {}", module, id.bright_green());
    Ok(())
}

async fn create_command(module: &str, assignments: &[String]) -> Result<()> {
    info!("Executing records create command for {}", module);

    let (client, user) = super::connect()?;
    let schema = client.get_module_fields(module).await?;
    if schema.is_empty() {
        bail!("Module {} has no field schema", module);
    }

    let mut draft = DraftRecord::for_new(&schema);
    apply_assignments(&mut draft, assignments)?;

    if !draft.validate_all() {
        print_validation_errors(&draft);
        bail!("Validation failed");
    }

    let user_id = user.map(|u| u.user_id).unwrap_or_default();
    let submission = draft.build_submission(&user_id);
    let id = client.create_record(module, &submission).await?;

    println!("✓ Created {} {}", module, id.bright_green());
    Ok(())
}
