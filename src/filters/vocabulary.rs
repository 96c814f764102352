//! Filter vocabulary extraction
//!
//! Scans the project dataset once and collects every selectable value per
//! category, in first-occurrence order.

use super::FilterCategory;
use crate::project::ProjectRecord;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Themes that are always offered, whether or not the dataset uses them
pub const BASELINE_THEMES: [&str; 3] = ["play", "build", "research"];

/// All selectable values per filter category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterVocabulary {
    pub keywords: Vec<String>,
    pub built_with: Vec<String>,
    pub themes: Vec<String>,
}

impl FilterVocabulary {
    pub fn values(&self, category: FilterCategory) -> &[String] {
        match category {
            FilterCategory::Keywords => &self.keywords,
            FilterCategory::BuiltWith => &self.built_with,
            FilterCategory::Themes => &self.themes,
        }
    }

    pub fn contains(&self, category: FilterCategory, value: &str) -> bool {
        self.values(category).iter().any(|v| v == value)
    }
}

/// Build the vocabulary for a dataset
pub fn extract_vocabulary(records: &[ProjectRecord]) -> FilterVocabulary {
    let mut themes: Vec<String> = BASELINE_THEMES.iter().map(|t| t.to_string()).collect();
    let mut keywords = Vec::new();
    let mut built_with = Vec::new();

    for record in records {
        themes.extend(record.tags.themes.iter().cloned());
        keywords.extend(record.tags.keywords.iter().cloned());
        built_with.extend(record.tags.built_with.iter().cloned());
    }

    let vocabulary = FilterVocabulary {
        keywords: uniq(keywords),
        built_with: uniq(built_with),
        themes: uniq(themes),
    };

    debug!(
        "Extracted vocabulary from {} records: {} themes, {} keywords, {} builtWith",
        records.len(),
        vocabulary.themes.len(),
        vocabulary.keywords.len(),
        vocabulary.built_with.len()
    );

    vocabulary
}

/// Remove duplicates, keeping the first occurrence of each value
fn uniq(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
