//! Terminal rendering for module listings, record views, and related panels.
//!
//! View builders hand over plain strings; everything color lives here.

use colored::*;

use crate::api::{ModuleDescriptor, RecordDetail};
use crate::fields::{display_value, icon_for, Field, Record};
use crate::projection::{
    filter_fields, CardProjection, ModuleDataset, StatusBucket, TableRow, TimelineEntry, ViewMode,
};
use crate::related::{RelatedPayload, RelatedState};

pub fn paint_status(text: &str, bucket: StatusBucket) -> ColoredString {
    match bucket {
        StatusBucket::Success => text.green(),
        StatusBucket::Warning => text.yellow(),
        StatusBucket::Error => text.red(),
        StatusBucket::Info => text.blue(),
        StatusBucket::Neutral => text.normal(),
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn module_marker(module: &ModuleDescriptor) -> ColoredString {
    match hex_rgb(&module.color) {
        Some((r, g, b)) => "●".truecolor(r, g, b),
        None => "●".normal(),
    }
}

pub fn render_modules(modules: &[ModuleDescriptor]) {
    if modules.is_empty() {
        println!("No modules available.");
        return;
    }
    println!("{}", "Available modules:".bright_white().bold());
    for module in modules {
        println!(
            "  {} {} {}",
            module_marker(module),
            module.name,
            format!("[{}]", module.icon).dimmed()
        );
    }
    println!();
    println!("Total modules: {}", modules.len());
}

pub fn render_records(module: &str, dataset: &ModuleDataset, expand_all: bool) {
    let projected = dataset.projected();
    if projected.is_empty() {
        if dataset.is_empty() {
            println!("No {} records found.", module);
        } else {
            println!(
                "No {} records match '{}'.",
                module,
                dataset.options.search_text
            );
        }
        return;
    }

    println!(
        "{} {}",
        module.bright_white().bold(),
        format!("({} of {})", projected.len(), dataset.len()).dimmed()
    );
    println!();

    match dataset.options.view_mode {
        ViewMode::Cards => render_cards(&projected, expand_all),
        ViewMode::Table => render_table(&projected),
        ViewMode::Timeline => render_timeline(&projected),
    }
}

fn render_cards(records: &[&Record], expand_all: bool) {
    for (position, record) in records.iter().enumerate() {
        let card = CardProjection::build(record, position, expand_all);

        println!("  {}", card.title.bold());
        println!("  {}", card.subtitle.dimmed());
        if let Some((status, bucket)) = &card.status {
            println!("  {}", paint_status(status, *bucket));
        }
        for (label, value) in &card.fields {
            println!("    {} {}", format!("{}:", label).dimmed(), value);
        }
        if card.hidden_count > 0 {
            println!(
                "    {}",
                format!("+{} more fields", card.hidden_count).dimmed()
            );
        }
        if let Some(assigned) = &card.assigned {
            println!("    {} {}", "Assigned:".dimmed(), assigned);
        }
        println!();
    }
}

fn render_table(records: &[&Record]) {
    let rows: Vec<TableRow> = records.iter().map(|r| TableRow::build(r)).collect();

    let name_width = rows
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(4);
    let status_width = rows
        .iter()
        .map(|r| r.status.as_ref().map(|(text, _)| text.len()).unwrap_or(1))
        .chain(std::iter::once("Status".len()))
        .max()
        .unwrap_or(6);
    let date_width = rows
        .iter()
        .map(|r| r.date.len())
        .chain(std::iter::once("Date".len()))
        .max()
        .unwrap_or(4);

    // Pad before painting, otherwise the escape codes count toward the width.
    println!(
        "  {}  {}  {}  {}",
        format!("{:<name_width$}", "Name").bold(),
        format!("{:<status_width$}", "Status").bold(),
        format!("{:<date_width$}", "Date").bold(),
        "Assigned".bold()
    );
    println!(
        "  {}",
        "-".repeat(name_width + status_width + date_width + "Assigned".len() + 6)
    );
    for row in rows {
        let status_cell = match &row.status {
            Some((text, bucket)) => {
                paint_status(&format!("{:<status_width$}", text), *bucket).to_string()
            }
            None => format!("{:<status_width$}", "-"),
        };
        println!(
            "  {:<name_width$}  {}  {:<date_width$}  {}",
            row.name, status_cell, row.date, row.assigned
        );
    }
}

fn render_timeline(records: &[&Record]) {
    for record in records {
        let entry = TimelineEntry::build(record);

        print!("  {} {}", "●".cyan(), entry.date_label.dimmed());
        if let Some((status, bucket)) = &entry.status {
            print!("  {}", paint_status(status, *bucket));
        }
        println!();
        println!("  {} {}", "│".dimmed(), entry.title.bold());
        for (label, value) in &entry.summary {
            println!("  {} {} {}", "│".dimmed(), format!("{}:", label).dimmed(), value);
        }
        println!();
    }
}

/// Detail view: every field (optionally filtered), then a summary line per
/// related module.
pub fn render_record_detail(module: &str, detail: &RecordDetail, field_search: Option<&str>) {
    println!(
        "{} {}",
        module.bright_white().bold(),
        detail.record.primary_label().bold()
    );
    println!();

    let shown: Vec<&Field> = match field_search {
        Some(query) => filter_fields(&detail.record, query),
        None => detail.record.fields.iter().collect(),
    };
    if shown.is_empty() {
        println!("  No fields match.");
    }
    for field in shown {
        let marker = if field.mandatory { "*" } else { " " };
        println!(
            "  {} {}{} {}",
            format!("[{}]", icon_for(&field.field_type)).dimmed(),
            field.label,
            marker,
            display_value(field)
        );
    }

    if detail.related.is_empty() {
        return;
    }
    println!();
    println!("{}", "Related modules:".bright_white().bold());
    for (related_module, payload) in &detail.related {
        match payload {
            RelatedPayload::Records(records) if records.is_empty() => {
                println!("  {} {}", related_module, "none".dimmed());
            }
            RelatedPayload::Records(records) => {
                println!(
                    "  {} {}",
                    related_module,
                    format!("{} records", records.len()).cyan()
                );
            }
            RelatedPayload::Denied(message) => {
                println!("  {} {}", related_module, format!("✗ {}", message).red());
            }
        }
    }
}

pub fn render_related_state(related_module: &str, state: &RelatedState) {
    match state {
        RelatedState::NotAsked | RelatedState::Loading => {
            // One-shot commands always drive the fetch to completion first.
            println!("{} has not been loaded yet.", related_module);
        }
        RelatedState::Empty => {
            println!("No related records found.");
        }
        RelatedState::Failed(message) => {
            println!("{}", format!("✗ {}", message).red());
            println!("{}", "Run the command again to retry.".dimmed());
        }
        RelatedState::Ready(dataset) => {
            render_records(related_module, dataset, false);
        }
    }
}
