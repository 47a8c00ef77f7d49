//! Command handlers for CLI subcommands.

use std::fmt::Write as _;

use chrono::{Local, NaiveDate};
use fieldops_lifecycle::{BucketCounts, Counts, Field, StatusCatalog};
use fieldops_models::{ItemType, StatusDefinition, WorkItem};
use fieldops_tracker::{DataSource, Tracker, TrackingCalendar};

use crate::cli::{Commands, FilterArgs, OutputFormat};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command against `tracker`.
pub async fn execute<D: DataSource>(command: Commands, tracker: &Tracker<D>) -> Result<()> {
    let output = match command {
        Commands::Statuses { item_type, format } => cmd_statuses(tracker.catalog(), item_type, format)?,
        Commands::LegacyKey { item_type, key } => {
            let code = tracker.catalog().code_from_legacy_key(item_type, key)?;
            format!("{}\n", code)
        }
        Commands::List {
            item_type,
            filter,
            format,
        } => cmd_list(tracker, item_type, &filter, format).await?,
        Commands::Counts {
            item_type,
            by,
            filter,
            format,
        } => cmd_counts(tracker, item_type, by, &filter, format).await?,
        Commands::Distinct {
            item_type,
            field,
            filter,
        } => {
            let values = tracker.distinct(item_type, &filter.to_criteria(), field).await?;
            values.iter().fold(String::new(), |mut out, v| {
                let _ = writeln!(out, "{}", v);
                out
            })
        }
        Commands::Dashboard {
            item_type,
            date,
            tracking,
            filter,
            format,
        } => {
            let reference = date.unwrap_or_else(|| Local::now().date_naive());
            cmd_dashboard(tracker, item_type, reference, tracking, &filter, format).await?
        }
        Commands::Transition {
            item_type,
            id,
            status,
            actor,
        } => {
            let item = tracker.update_status(item_type, &id, &status, &actor).await?;
            format!("{} {} is now {}\n", item.item_type, item.id, item.status_code)
        }
        Commands::Intake {
            item_type,
            status,
            id,
            assignee,
            make,
            model,
            description,
            due,
        } => {
            let mut item = WorkItem::new(item_type, status);
            if let Some(id) = id {
                item = item.with_id(id);
            }
            item.assignee = assignee;
            item.make = make;
            item.model = model;
            item.description = description;
            item.due_date = due;

            let item = tracker.intake(item).await?;
            format!("Created {} {} ({})\n", item.item_type, item.id, item.status_code)
        }
    };

    print!("{}", output);
    Ok(())
}

fn cmd_statuses(catalog: &StatusCatalog, item_type: ItemType, format: OutputFormat) -> Result<String> {
    let statuses = catalog.lookup(item_type)?;
    let keys = catalog.legacy_keys(item_type)?;

    Ok(match format {
        OutputFormat::Table => {
            let mut out = String::new();
            writeln!(out, "{:<26}  {:<26}  {:<4}  {:<8}  NEXT", "CODE", "LABEL", "KEY", "TERMINAL")?;
            writeln!(out, "{}", "-".repeat(90))?;
            for status in statuses {
                let key = keys
                    .iter()
                    .find(|(_, code)| status.is(code))
                    .map(|(k, _)| k.to_string())
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{:<26}  {:<26}  {:<4}  {:<8}  {}",
                    status.code,
                    truncate(&status.label, 26),
                    key,
                    if status.terminal { "yes" } else { "" },
                    next_codes(status)
                )?;
            }
            out
        }
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(statuses)?),
        OutputFormat::Brief => statuses.iter().fold(String::new(), |mut out, s| {
            let _ = writeln!(out, "{}\t{}", s.code, s.label);
            out
        }),
    })
}

fn next_codes(status: &StatusDefinition) -> String {
    status
        .allowed_next
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

async fn cmd_list<D: DataSource>(
    tracker: &Tracker<D>,
    item_type: ItemType,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<String> {
    let items = tracker.list(item_type, &filter.to_criteria()).await?;
    render_items(&items, format)
}

async fn cmd_counts<D: DataSource>(
    tracker: &Tracker<D>,
    item_type: ItemType,
    by: Field,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<String> {
    let counts = tracker.counts_by(item_type, &filter.to_criteria(), by).await?;
    render_counts(by, &counts, format)
}

async fn cmd_dashboard<D: DataSource>(
    tracker: &Tracker<D>,
    item_type: ItemType,
    reference: NaiveDate,
    tracking: bool,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<String> {
    let raw = filter.to_criteria();
    if tracking {
        let calendar = tracker.tracking_calendar(item_type, &raw, reference).await?;
        render_calendar(&calendar, format)
    } else {
        let counts = tracker.due_dashboard(item_type, &raw, reference).await?;
        render_buckets(&counts, format)
    }
}

/// Renders work items in the requested format.
pub fn render_items(items: &[WorkItem], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                return Ok("No work items found.\n".to_string());
            }

            writeln!(
                out,
                "{:<40}  {:<24}  {:<16}  {:<16}  {:<10}  DUE",
                "ID", "STATUS", "ASSIGNEE", "MAKE", "MODEL"
            )?;
            writeln!(out, "{}", "-".repeat(120))?;
            for item in items {
                writeln!(
                    out,
                    "{:<40}  {:<24}  {:<16}  {:<16}  {:<10}  {}",
                    truncate(item.id.as_str(), 40),
                    truncate(&item.status_code, 24),
                    truncate(item.assignee.as_deref().unwrap_or("-"), 16),
                    truncate(item.make.as_deref().unwrap_or("-"), 16),
                    truncate(item.model.as_deref().unwrap_or("-"), 10),
                    item.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
                )?;
            }
            writeln!(out, "\n{} item(s)", items.len())?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
        }
        OutputFormat::Brief => {
            for item in items {
                writeln!(out, "{}\t{}", item.id, item.status_code)?;
            }
        }
    }
    Ok(out)
}

/// Renders grouped counts in the requested format.
pub fn render_counts(by: Field, counts: &Counts<String>, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Table => {
            writeln!(out, "{:<30}  COUNT", by.to_string().to_uppercase())?;
            writeln!(out, "{}", "-".repeat(40))?;
            for entry in counts.entries() {
                writeln!(out, "{:<30}  {}", truncate(&entry.value, 30), entry.count)?;
            }
            writeln!(out, "{:<30}  {}", "TOTAL", counts.total())?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(counts)?)?;
        }
        OutputFormat::Brief => {
            for entry in counts.entries() {
                writeln!(out, "{}\t{}", entry.value, entry.count)?;
            }
        }
    }
    Ok(out)
}

/// Renders dashboard bucket counts in the requested format.
pub fn render_buckets(counts: &BucketCounts, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Table => {
            for (bucket, count) in counts.iter() {
                writeln!(out, "{:<10}  {}", bucket.to_string(), count)?;
            }
            writeln!(out, "{:<10}  {}", "Total", counts.total())?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(counts)?)?;
        }
        OutputFormat::Brief => {
            let line: Vec<String> = counts.iter().map(|(b, c)| format!("{}={}", b, c)).collect();
            writeln!(out, "{}", line.join(" "))?;
        }
    }
    Ok(out)
}

/// Renders the tracking calendar in the requested format.
pub fn render_calendar(calendar: &TrackingCalendar, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(calendar)?));
    }

    let mut out = String::new();
    writeln!(out, "Window: {} to {}", calendar.window.start, calendar.window.end)?;
    if format == OutputFormat::Table {
        for entry in &calendar.entries {
            writeln!(
                out,
                "  {:<10}  {:<8}  {:<24}  {}",
                entry.item.due_date.map(|d| d.to_string()).unwrap_or_default(),
                entry.bucket.to_string(),
                truncate(&entry.item.status_code, 24),
                entry.item.id
            )?;
        }
        writeln!(out)?;
    }
    out.push_str(&render_buckets(&calendar.counts, format)?);
    Ok(out)
}

/// Truncates a string to the given length, adding "..." if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
