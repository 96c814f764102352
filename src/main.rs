//! catalog-filters CLI
//!
//! Loads a project catalog and drives the filter state controller from the
//! command line:
//! - `vocabulary` - list the selectable values of every filter category
//! - `search` - apply filters and a search pattern, print the resulting state

mod cli;

use anyhow::Result;
use catalog_filters::config::{load_config, SearchConfig};
use catalog_filters::error::AppError;
use catalog_filters::filters::{extract_vocabulary, FilterCategory};
use catalog_filters::project::ProjectStore;
use catalog_filters::report::{format_search_state, format_vocabulary};
use catalog_filters::state::FilterStateController;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::{info, warn};

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Vocabulary(args) => execute_vocabulary_cli(args),
        Commands::Search(args) => execute_search_cli(args, config),
    });

    // Handle result and exit with appropriate code
    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

/// Execute vocabulary command in CLI mode
fn execute_vocabulary_cli(args: cli::VocabularyArgs) -> Result<String> {
    let store = ProjectStore::load_json(&args.data)?;
    let vocabulary = extract_vocabulary(store.records());

    if args.json {
        Ok(serde_json::to_string_pretty(&vocabulary)?)
    } else {
        Ok(format_vocabulary(&vocabulary))
    }
}

/// Execute search command in CLI mode
///
/// Filters are applied in a fixed order: the URL query string first, then
/// the theme, keywords and built-with values, then the text pattern.
fn execute_search_cli(args: cli::SearchArgs, config: SearchConfig) -> Result<String> {
    let store = ProjectStore::load_json(&args.data)?;
    let mut controller = FilterStateController::new(store, config);

    if let Some(query_string) = &args.filters {
        controller.restore_from_url(query_string);
    }

    if let Some(theme) = &args.theme {
        require_value("--theme", theme)?;
        warn_if_unknown(&controller, FilterCategory::Themes, theme);
        controller.select_theme(theme, None);
    }

    let toggles = args
        .keywords
        .iter()
        .map(|value| (FilterCategory::Keywords, value))
        .chain(args.built_with.iter().map(|value| (FilterCategory::BuiltWith, value)));

    for (category, value) in toggles {
        require_value(category.key(), value)?;
        warn_if_unknown(&controller, category, value);
        controller.toggle_filter(category, value, None);
    }

    if let Some(pattern) = &args.query {
        controller.set_text_pattern(pattern);
    }

    let state = controller.snapshot();
    info!(
        "{} of {} projects match",
        state.results.len(),
        controller.records().len()
    );

    if args.json {
        Ok(serde_json::to_string_pretty(&*state)?)
    } else {
        Ok(format_search_state(&state))
    }
}

fn require_value(flag: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} requires a non-empty value", flag)));
    }
    Ok(())
}

fn warn_if_unknown(controller: &FilterStateController, category: FilterCategory, value: &str) {
    if !controller.vocabulary().contains(category, value) {
        warn!("{} value {:?} does not occur in the catalog", category.label(), value);
    }
}

/// Map errors to process exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::InvalidInput(_)) | Some(AppError::InvalidConfig(_)) => 1,
        Some(AppError::NotFound(_)) => 3,
        _ => 5,
    }
}
