//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, entity::EntityCommands,
};
use crate::entities::{
    BudgetCategoryDraft, EmployeeDraft, GradeDraft, JourneyDraft, RoleDraft, TechnologyDraft,
};

#[derive(Parser)]
#[command(name = "portal")]
#[command(author, version, about = "Master Portal - staff reference data console")]
#[command(long_about = "List, search, create, edit and delete the portal's reference data \
(employees, budget categories, journeys, grades, roles and technologies) over its REST API.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Backend API root (overrides config and PORTAL_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Employee management (paged listing)
    #[command(subcommand)]
    Employee(EntityCommands<EmployeeDraft>),

    /// Budget category management
    #[command(subcommand)]
    Budget(EntityCommands<BudgetCategoryDraft>),

    /// Journey management
    #[command(subcommand)]
    Journey(EntityCommands<JourneyDraft>),

    /// Grade management
    #[command(subcommand)]
    Grade(EntityCommands<GradeDraft>),

    /// Role management
    #[command(subcommand)]
    Role(EntityCommands<RoleDraft>),

    /// Technology stack management
    #[command(subcommand)]
    Tech(EntityCommands<TechnologyDraft>),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table on a terminal)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Resolve `auto` using the configured default, then TSV
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Tsv)
    }
}
