//! Clap derive structures for the `apotheca` CLI.
//!
//! Defines the complete command tree, global flags, and shared value enums.
//! Also compiled by `build.rs` for man pages, so it must only depend on
//! clap, clap_complete and chrono.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// apotheca -- medicine inventory and disease registry
#[derive(Debug, Parser)]
#[command(
    name = "apotheca",
    version,
    about = "Track a practice's medicine stock and disease reference from the command line",
    long_about = "Keeps a medicine inventory in sync with a remote medicine service.\n\n\
        When the service is unreachable, reads and writes fall back to a local\n\
        mirror so the inventory stays usable offline. The disease registry is\n\
        always kept locally.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "APOTHECA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Medicine service URL (overrides profile)
    #[arg(long, short = 'u', env = "APOTHECA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory for the local mirror (overrides profile)
    #[arg(long, env = "APOTHECA_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "APOTHECA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "APOTHECA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Ayurvedic,
    Allopathic,
    Homeopathic,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Mild,
    Medium,
    Chronic,
}

/// Optional medicine fields that `update --clear` can blank out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearableField {
    Brand,
    ManufactureDate,
    Description,
    Dosage,
    Ingredients,
    SideEffects,
    Benefits,
    Location,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the medicine inventory
    #[command(alias = "med", alias = "m")]
    Medicines(MedicinesArgs),

    /// Manage the disease registry
    #[command(alias = "dis", alias = "d")]
    Diseases(DiseasesArgs),

    /// Inventory overview: expiry buckets, low stock, categories
    Stats,

    /// Inspect or clear the local mirror
    Mirror(MirrorArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MEDICINES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MedicinesArgs {
    #[command(subcommand)]
    pub command: MedicinesCommand,
}

#[derive(Debug, Subcommand)]
pub enum MedicinesCommand {
    /// List medicines, soonest expiry first
    #[command(alias = "ls")]
    List {
        /// Match against name or brand (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Only show one category
        #[arg(long, short = 'c')]
        category: Option<CategoryArg>,
    },

    /// Show one medicine
    Get {
        /// Medicine id
        id: String,

        /// Read straight from the medicine service instead of the inventory
        #[arg(long)]
        remote: bool,
    },

    /// Add a medicine
    #[command(alias = "new")]
    Add(MedicineAddArgs),

    /// Update a medicine's fields
    #[command(alias = "edit")]
    Update(MedicineUpdateArgs),

    /// Delete a medicine
    #[command(alias = "rm")]
    Delete {
        /// Medicine id
        id: String,
    },

    /// Run a filtered query against the medicine service (no fallback)
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct MedicineAddArgs {
    /// Medicine name
    pub name: String,

    /// Units in stock
    #[arg(long, short = 'n')]
    pub quantity: u32,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long, short = 'e')]
    pub expiry: NaiveDate,

    /// Manufacturer or brand
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    /// Therapeutic category (default: ayurvedic)
    #[arg(long, short = 'c')]
    pub category: Option<CategoryArg>,

    /// Stock unit, e.g. "Strips (10 tabs)"
    #[arg(long)]
    pub unit: Option<String>,

    /// Manufacture date (YYYY-MM-DD)
    #[arg(long)]
    pub manufactured: Option<NaiveDate>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub dosage: Option<String>,

    /// Comma-separated ingredients
    #[arg(long)]
    pub ingredients: Option<String>,

    /// Comma-separated side effects
    #[arg(long)]
    pub side_effects: Option<String>,

    /// Comma-separated benefits
    #[arg(long)]
    pub benefits: Option<String>,

    /// Shelf or cabinet
    #[arg(long)]
    pub location: Option<String>,

    /// Ask the suggestion provider to fill in empty fields
    #[arg(long)]
    pub assist: bool,
}

#[derive(Debug, Args)]
pub struct MedicineUpdateArgs {
    /// Medicine id
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short = 'n')]
    pub quantity: Option<u32>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long, short = 'e')]
    pub expiry: Option<NaiveDate>,

    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    #[arg(long, short = 'c')]
    pub category: Option<CategoryArg>,

    #[arg(long)]
    pub unit: Option<String>,

    /// Manufacture date (YYYY-MM-DD)
    #[arg(long)]
    pub manufactured: Option<NaiveDate>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub dosage: Option<String>,

    /// Comma-separated ingredients (replaces the list)
    #[arg(long)]
    pub ingredients: Option<String>,

    /// Comma-separated side effects (replaces the list)
    #[arg(long)]
    pub side_effects: Option<String>,

    /// Comma-separated benefits (replaces the list)
    #[arg(long)]
    pub benefits: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Clear an optional field (repeatable)
    #[arg(long, value_name = "FIELD")]
    pub clear: Vec<ClearableField>,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub command: QueryCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Every medicine the service holds
    All,

    /// Medicines in one category
    Category {
        category: CategoryArg,
    },

    /// Medicines whose name matches
    Search {
        name: String,
    },

    /// Medicines expiring within a window
    ExpiringSoon {
        /// Window in days (service default: 30)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Medicines already past expiry
    Expired,

    /// Medicines at or below a stock threshold
    LowStock {
        /// Threshold (service default: 10)
        #[arg(long)]
        threshold: Option<u32>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DISEASES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DiseasesArgs {
    #[command(subcommand)]
    pub command: DiseasesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DiseasesCommand {
    /// List diseases
    #[command(alias = "ls")]
    List {
        /// Match against the name (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one disease
    Get {
        /// Disease id
        id: String,
    },

    /// Add a disease
    #[command(alias = "new")]
    Add(DiseaseAddArgs),

    /// Update a disease's fields
    #[command(alias = "edit")]
    Update(DiseaseUpdateArgs),

    /// Delete a disease
    #[command(alias = "rm")]
    Delete {
        /// Disease id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct DiseaseAddArgs {
    /// Disease name
    pub name: String,

    /// Severity (default: mild)
    #[arg(long)]
    pub severity: Option<SeverityArg>,

    /// Comma-separated symptoms
    #[arg(long)]
    pub symptoms: Option<String>,

    /// Comma-separated diagnosing methods
    #[arg(long)]
    pub diagnosis: Option<String>,

    /// Comma-separated root causes
    #[arg(long)]
    pub causes: Option<String>,

    /// Comma-separated solutions
    #[arg(long)]
    pub solutions: Option<String>,

    /// Specialist to consult
    #[arg(long)]
    pub specialist: Option<String>,

    /// Ask the suggestion provider to fill in empty fields
    #[arg(long)]
    pub assist: bool,
}

#[derive(Debug, Args)]
pub struct DiseaseUpdateArgs {
    /// Disease id
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub severity: Option<SeverityArg>,

    #[arg(long)]
    pub symptoms: Option<String>,

    #[arg(long)]
    pub diagnosis: Option<String>,

    #[arg(long)]
    pub causes: Option<String>,

    #[arg(long)]
    pub solutions: Option<String>,

    #[arg(long)]
    pub specialist: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MIRROR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MirrorArgs {
    #[command(subcommand)]
    pub command: MirrorCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MirrorCollection {
    Medicines,
    Diseases,
}

#[derive(Debug, Subcommand)]
pub enum MirrorCommand {
    /// Show where snapshots live and what they hold
    Show,

    /// Delete snapshots (both collections unless one is named)
    Clear {
        collection: Option<MirrorCollection>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file location
    Path,

    /// Set the default profile
    SetDefault {
        /// Profile name to use by default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
