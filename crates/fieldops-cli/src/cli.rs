//! Command-line interface definition using clap.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fieldops_lifecycle::{Field, RawCriteria};
use fieldops_models::{ItemType, WorkItemId};

/// Field-ops tracker - parts, orders, unit tests and stripped units
#[derive(Parser, Debug)]
#[command(name = "fieldops")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "FIELDOPS_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Path to a status catalog JSON file
    #[arg(long, env = "FIELDOPS_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the status catalog for an item type
    Statuses {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Translate a legacy numeric status key
    LegacyKey {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        /// Legacy key
        #[arg(allow_negative_numbers = true)]
        key: i64,
    },

    /// List work items
    List {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Count work items by status or another field
    Counts {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        /// Field to group by (status, assignee, make, model)
        #[arg(short, long, default_value = "status")]
        by: Field,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the distinct values of a field
    Distinct {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        /// Field to list (status, assignee, make, model)
        field: Field,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show due-date bucket counts
    Dashboard {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        /// Reference date (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Restrict to the tools-tracking calendar window
        #[arg(short, long)]
        tracking: bool,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Move a work item to a new status
    Transition {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        /// Work item id
        id: WorkItemId,

        /// Requested status
        status: String,

        /// Who is making the change
        #[arg(short, long, env = "FIELDOPS_ACTOR")]
        actor: String,
    },

    /// Record a new work item
    Intake {
        /// Item type (parts, order, test, stripped)
        item_type: ItemType,

        /// Initial status
        #[arg(long)]
        status: String,

        /// Work item id (default: generated)
        #[arg(long)]
        id: Option<WorkItemId>,

        #[arg(long)]
        assignee: Option<String>,

        #[arg(long)]
        make: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
}

/// Filter options shared by the read commands.
///
/// "All" or "%" leaves a dimension unconstrained.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Status code
    #[arg(long)]
    pub status: Option<String>,

    /// Legacy numeric status key (takes precedence over --status)
    #[arg(long)]
    pub key: Option<String>,

    #[arg(long)]
    pub assignee: Option<String>,

    #[arg(long)]
    pub make: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Include archived items
    #[arg(long)]
    pub archived: bool,
}

impl FilterArgs {
    /// Converts the options into raw filter criteria.
    pub fn to_criteria(&self) -> RawCriteria {
        let raw = RawCriteria::new()
            .with_optional("status", self.status.clone())
            .with_optional("key", self.key.clone())
            .with_optional("assignee", self.assignee.clone())
            .with_optional("make", self.make.clone())
            .with_optional("model", self.model.clone());

        if self.archived {
            raw.include_archived()
        } else {
            raw
        }
    }
}

/// Output format for read commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Brief,
}

impl Cli {
    /// Returns the directory holding the work item store.
    pub fn data_dir(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => dir.join("data"),
            None => fieldops_core::data_dir(),
        }
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
