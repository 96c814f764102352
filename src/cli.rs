//! CLI mode implementation
//!
//! Provides command-line access to the catalog filter engine

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Catalog filters CLI
#[derive(Parser, Debug)]
#[command(name = "catalog-filters")]
#[command(about = "Filter and search a project catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Search configuration file (JSON)
    #[arg(short, long, global = true, env = "CATALOG_FILTERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the selectable values of every filter category
    Vocabulary(VocabularyArgs),
    /// Apply filters and a search pattern to the catalog
    Search(SearchArgs),
}

/// Vocabulary command arguments
#[derive(Args, Clone, Debug)]
pub struct VocabularyArgs {
    /// Project dataset (JSON array of projects)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Print JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}

/// Search command arguments
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Project dataset (JSON array of projects)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Free-text pattern matched against project names
    #[arg(short, long)]
    pub query: Option<String>,

    /// Select a theme (exclusive)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Toggle a keyword filter (repeatable)
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Toggle a built-with filter (repeatable)
    #[arg(short, long = "built-with")]
    pub built_with: Vec<String>,

    /// Restore filters from a URL query string (e.g. "themes=play%2Cbuild")
    #[arg(short, long)]
    pub filters: Option<String>,

    /// Print the resulting state as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}
