//! Filter state controller
//!
//! Owns the catalog's filter/search state: the active filters, their URL
//! query-string encoding, the free-text pattern and the matching records.
//! Every operation derives the next state from the current snapshot and
//! publishes it whole, so observers never see a half-applied transition.

use crate::config::SearchConfig;
use crate::filters::{
    decode_query_string, encode_query_string, extract_vocabulary, ActiveFilters, FilterCategory,
    FilterVocabulary,
};
use crate::project::{ProjectRecord, ProjectStore};
use crate::search::{build_query, SearchEngine, SearchIndex};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Immutable snapshot of the filter state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub active_filters: ActiveFilters,
    /// Canonical encoding of `active_filters`, without a leading `?`
    pub query_string: String,
    /// Free-text pattern matched against project names
    pub text_pattern: String,
    /// Records matching the filters and pattern, best match first
    pub results: Vec<ProjectRecord>,
}

/// Single owner of the filter state
pub struct FilterStateController {
    index: SearchIndex<ProjectRecord>,
    engine: SearchEngine,
    vocabulary: FilterVocabulary,
    state: watch::Sender<Arc<SearchState>>,
}

impl FilterStateController {
    /// Build a controller over a project store
    ///
    /// Starts with no filters and no pattern, so every record is a result.
    pub fn new(store: ProjectStore, config: SearchConfig) -> Self {
        let vocabulary = extract_vocabulary(store.records());
        let initial = SearchState {
            active_filters: ActiveFilters::new(),
            query_string: String::new(),
            text_pattern: String::new(),
            results: store.records().to_vec(),
        };
        let (state, _) = watch::channel(Arc::new(initial));

        info!(
            "Filter state ready: {} projects, {} keywords, {} built-with values, {} themes",
            store.len(),
            vocabulary.keywords.len(),
            vocabulary.built_with.len(),
            vocabulary.themes.len()
        );

        Self {
            index: SearchIndex::new(store.shared()),
            engine: SearchEngine::new(config),
            vocabulary,
            state,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> Arc<SearchState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver that observes every published state
    pub fn subscribe(&self) -> watch::Receiver<Arc<SearchState>> {
        self.state.subscribe()
    }

    pub fn vocabulary(&self) -> &FilterVocabulary {
        &self.vocabulary
    }

    pub fn records(&self) -> &[ProjectRecord] {
        self.index.items()
    }

    /// Add `value` to `category`, or remove it when already selected
    ///
    /// `text_pattern` replaces the stored pattern when given. An empty value
    /// leaves the state untouched.
    pub fn toggle_filter(
        &mut self,
        category: FilterCategory,
        value: &str,
        text_pattern: Option<&str>,
    ) {
        if value.is_empty() {
            debug!("Ignoring toggle of empty {} value", category);
            return;
        }

        let current = self.snapshot();
        let active_filters = current.active_filters.toggled(category, value);
        debug!(
            "Toggled {}={} ({})",
            category,
            value,
            if active_filters.contains(category, value) { "on" } else { "off" }
        );

        let text_pattern = resolve_pattern(&current, text_pattern);
        self.apply(active_filters, text_pattern);
    }

    /// Same as [`toggle_filter`](Self::toggle_filter), with the category given
    /// by its key; unknown keys are ignored
    pub fn toggle_filter_by_key(&mut self, key: &str, value: &str, text_pattern: Option<&str>) {
        match FilterCategory::from_key(key) {
            Some(category) => self.toggle_filter(category, value, text_pattern),
            None => debug!("Ignoring toggle for unknown filter category: {}", key),
        }
    }

    /// Make `theme` the only selected theme
    ///
    /// Themes are exclusive, so selecting a theme replaces any previous one,
    /// including itself. An empty theme leaves the state untouched.
    pub fn select_theme(&mut self, theme: &str, text_pattern: Option<&str>) {
        if theme.is_empty() {
            debug!("Ignoring selection of empty theme");
            return;
        }

        let current = self.snapshot();
        let active_filters = current
            .active_filters
            .with_selection(FilterCategory::Themes, [theme]);
        debug!("Selected theme {}", theme);

        let text_pattern = resolve_pattern(&current, text_pattern);
        self.apply(active_filters, text_pattern);
    }

    /// Replace the free-text pattern and refresh the results
    ///
    /// The active filters and the query string are kept. The pattern is
    /// stored as given, but a whitespace-only pattern places no constraint on
    /// the results.
    pub fn set_text_pattern(&mut self, pattern: &str) {
        let current = self.snapshot();
        debug!("Text pattern set to {:?}", pattern);
        self.apply(current.active_filters.clone(), pattern.to_string());
    }

    /// Replace the active filters wholesale, typically from a decoded URL
    ///
    /// The stored text pattern is kept and the results are refreshed against it.
    pub fn restore_from_query_string(&mut self, filters: ActiveFilters) {
        let current = self.snapshot();
        info!("Restoring {} filter value(s)", filters.value_count());
        self.apply(filters, current.text_pattern.clone());
    }

    /// Decode a URL query string and restore the filters it describes
    pub fn restore_from_url(&mut self, query: &str) {
        self.restore_from_query_string(decode_query_string(query));
    }

    /// Drop every active filter, keeping the text pattern
    pub fn clear_filters(&mut self) {
        self.restore_from_query_string(ActiveFilters::new());
    }

    /// Recompute the derived fields and publish the new state
    fn apply(&mut self, active_filters: ActiveFilters, text_pattern: String) {
        let query = build_query(&text_pattern, &active_filters);
        let results: Vec<ProjectRecord> = self
            .engine
            .search(&self.index, &query)
            .into_iter()
            .map(|result| result.item)
            .collect();

        let next = SearchState {
            query_string: encode_query_string(&active_filters),
            active_filters,
            text_pattern,
            results,
        };

        debug!(
            "State updated: query string {:?}, {} result(s)",
            next.query_string,
            next.results.len()
        );

        self.state.send_replace(Arc::new(next));
    }
}

fn resolve_pattern(current: &SearchState, text_pattern: Option<&str>) -> String {
    text_pattern
        .map(str::to_string)
        .unwrap_or_else(|| current.text_pattern.clone())
}
