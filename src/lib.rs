//! catalog-filters
//!
//! Filter and fuzzy-search state engine for browsing a catalog of projects.
//!
//! - [`filters`] - filter categories, active selections, vocabulary and URL encoding
//! - [`search`] - structured queries and the fuzzy match engine
//! - [`state`] - the filter state controller that ties them together
//!
//! ```no_run
//! use catalog_filters::{FilterCategory, FilterStateController, ProjectStore, SearchConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = ProjectStore::load_json("projects.json".as_ref())?;
//! let mut controller = FilterStateController::new(store, SearchConfig::default());
//!
//! controller.select_theme("build", None);
//! controller.toggle_filter(FilterCategory::Keywords, "zkp", Some("semaphore"));
//!
//! let state = controller.snapshot();
//! println!("?{} -> {} projects", state.query_string, state.results.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod project;
pub mod report;
pub mod search;
pub mod state;

#[cfg(test)]
mod test_fixtures;

pub use config::SearchConfig;
pub use error::AppError;
pub use filters::{ActiveFilters, FilterCategory, FilterMode, FilterVocabulary};
pub use project::{ProjectRecord, ProjectStatus, ProjectStore, ProjectTags};
pub use search::{build_query, SearchEngine, SearchField, StructuredQuery};
pub use state::{FilterStateController, SearchState};
