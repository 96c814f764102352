//! Filter categories, active selections and their URL encoding
//!
//! A filter is a (category, value) pair. The set of categories is closed:
//! `keywords` and `builtWith` are multi-select checkboxes, `themes` is an
//! exclusive button group.

pub mod query_string;
pub mod vocabulary;

pub use query_string::{decode_query_string, encode_query_string};
pub use vocabulary::{extract_vocabulary, FilterVocabulary, BASELINE_THEMES};

use crate::error::AppError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Tag category a filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCategory {
    Keywords,
    BuiltWith,
    Themes,
}

/// UI affordance used to render a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Multi-select, additive toggling
    Checkbox,
    /// Exclusive selection
    Button,
}

/// Human-readable label per category
pub const FILTER_LABELS: [(FilterCategory, &str); 3] = [
    (FilterCategory::Keywords, "Keywords"),
    (FilterCategory::BuiltWith, "Built with"),
    (FilterCategory::Themes, "Themes selected"),
];

/// Interaction mode per category
pub const FILTER_MODES: [(FilterCategory, FilterMode); 3] = [
    (FilterCategory::Keywords, FilterMode::Checkbox),
    (FilterCategory::BuiltWith, FilterMode::Checkbox),
    (FilterCategory::Themes, FilterMode::Button),
];

impl FilterCategory {
    pub const ALL: [FilterCategory; 3] = [
        FilterCategory::Keywords,
        FilterCategory::BuiltWith,
        FilterCategory::Themes,
    ];

    /// Key used in datasets and URL query strings
    pub fn key(self) -> &'static str {
        match self {
            FilterCategory::Keywords => "keywords",
            FilterCategory::BuiltWith => "builtWith",
            FilterCategory::Themes => "themes",
        }
    }

    pub fn label(self) -> &'static str {
        FILTER_LABELS
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, label)| *label)
            .unwrap_or_default()
    }

    pub fn mode(self) -> FilterMode {
        FILTER_MODES
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, mode)| *mode)
            .unwrap_or(FilterMode::Checkbox)
    }

    /// Parse a category key, returning None for unknown names
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown filter category: {}", s)))
    }
}

/// Active filter selection
///
/// Categories keep first-insertion order. A category emptied by a toggle keeps
/// its slot, so selecting a value in it again restores the previous order;
/// empty categories are otherwise invisible (iteration, encoding, equality).
/// Values are unique within a category.
#[derive(Debug, Clone, Default)]
pub struct ActiveFilters {
    entries: Vec<(FilterCategory, Vec<String>)>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no category constrains the result set
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, values)| values.is_empty())
    }

    /// Total number of selected values across categories
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    /// Selected values for a category (empty when absent)
    pub fn get(&self, category: FilterCategory) -> &[String] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: FilterCategory, value: &str) -> bool {
        self.get(category).iter().any(|v| v == value)
    }

    /// Non-empty categories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (FilterCategory, &[String])> {
        self.entries
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(category, values)| (*category, values.as_slice()))
    }

    /// Copy of this selection with `value` added to or removed from `category`
    ///
    /// An empty value leaves the selection unchanged.
    pub fn toggled(&self, category: FilterCategory, value: &str) -> Self {
        if value.is_empty() {
            return self.clone();
        }

        let mut values = self.get(category).to_vec();
        match values.iter().position(|v| v == value) {
            Some(index) => {
                values.remove(index);
            }
            None => values.push(value.to_string()),
        }

        self.with_selection(category, values)
    }

    /// Copy of this selection with `category` replaced by `values`
    ///
    /// Empty strings and duplicates are dropped. An empty result clears the
    /// category but keeps its position.
    pub fn with_selection<I, S>(&self, category: FilterCategory, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !value.is_empty() && !normalized.contains(&value) {
                normalized.push(value);
            }
        }

        let mut entries = self.entries.clone();
        let existing = entries.iter().position(|(c, _)| *c == category);

        match existing {
            Some(index) => entries[index].1 = normalized,
            None if normalized.is_empty() => {}
            None => entries.push((category, normalized)),
        }

        Self { entries }
    }
}

impl<S: Into<String>> FromIterator<(FilterCategory, Vec<S>)> for ActiveFilters {
    fn from_iter<T: IntoIterator<Item = (FilterCategory, Vec<S>)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ActiveFilters::new(), |filters, (category, values)| {
                let mut merged = filters.get(category).to_vec();
                merged.extend(values.into_iter().map(Into::into));
                filters.with_selection(category, merged)
            })
    }
}

impl PartialEq for ActiveFilters {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for ActiveFilters {}

impl Serialize for ActiveFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (category, values) in self.iter() {
            map.serialize_entry(category.key(), values)?;
        }
        map.end()
    }
}
