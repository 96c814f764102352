//! Structured Queries
//!
//! Turns the controller's (free-text pattern, active filters) pair into a
//! single query tree for the match engine.

use crate::filters::{ActiveFilters, FilterCategory};
use std::fmt;
use tracing::debug;

/// Fields the match engine can search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Name,
    Tldr,
    Themes,
    Keywords,
    BuiltWith,
    ProjectStatus,
}

impl SearchField {
    pub const ALL: [SearchField; 6] = [
        SearchField::Name,
        SearchField::Tldr,
        SearchField::Themes,
        SearchField::Keywords,
        SearchField::BuiltWith,
        SearchField::ProjectStatus,
    ];

    /// Dotted key path of the field in a project record
    pub fn key(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Tldr => "tldr",
            SearchField::Themes => "tags.themes",
            SearchField::Keywords => "tags.keywords",
            SearchField::BuiltWith => "tags.builtWith",
            SearchField::ProjectStatus => "projectStatus",
        }
    }

    /// Position in `ALL`
    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<FilterCategory> for SearchField {
    fn from(category: FilterCategory) -> Self {
        match category {
            FilterCategory::Keywords => SearchField::Keywords,
            FilterCategory::BuiltWith => SearchField::BuiltWith,
            FilterCategory::Themes => SearchField::Themes,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Anything the engine can index: exposes its values for each field
pub trait Searchable {
    fn field_values(&self, field: SearchField) -> Vec<&str>;
}

/// Query tree consumed by the match engine
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredQuery {
    /// No constraint: return every record unchanged, skipping the engine
    PassThrough,
    /// Match `pattern` against the values of `field`
    Clause { field: SearchField, pattern: String },
    /// Every child must match
    And(Vec<StructuredQuery>),
    /// At least one child must match
    Or(Vec<StructuredQuery>),
}

impl StructuredQuery {
    pub fn clause(field: SearchField, pattern: impl Into<String>) -> Self {
        StructuredQuery::Clause {
            field,
            pattern: pattern.into(),
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, StructuredQuery::PassThrough)
    }
}

impl fmt::Display for StructuredQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuredQuery::PassThrough => f.write_str("*"),
            StructuredQuery::Clause { field, pattern } => write!(f, "{}:{:?}", field, pattern),
            StructuredQuery::And(children) | StructuredQuery::Or(children) => {
                let op = if matches!(self, StructuredQuery::And(_)) {
                    "$and"
                } else {
                    "$or"
                };
                write!(f, "{}(", op)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Combine a free-text pattern and active filters into one query
///
/// Every selected value becomes its own clause and all of them are AND-ed,
/// so two values from the same category narrow the result set. The free
/// text only ever searches `name`. A whitespace-only pattern counts as empty.
pub fn build_query(text_pattern: &str, filters: &ActiveFilters) -> StructuredQuery {
    let filter_clauses: Vec<StructuredQuery> = filters
        .iter()
        .flat_map(|(category, values)| {
            values
                .iter()
                .filter(|value| !value.is_empty())
                .map(move |value| StructuredQuery::clause(category.into(), value.as_str()))
        })
        .collect();

    let has_pattern = !text_pattern.trim().is_empty();

    let query = match (filter_clauses.is_empty(), has_pattern) {
        (true, false) => StructuredQuery::PassThrough,
        (false, false) => StructuredQuery::And(filter_clauses),
        (true, true) => StructuredQuery::clause(SearchField::Name, text_pattern),
        (false, true) => StructuredQuery::And(vec![
            StructuredQuery::And(filter_clauses),
            StructuredQuery::clause(SearchField::Name, text_pattern),
        ]),
    };

    debug!("Built query {}", query);
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_pass_through() {
        assert_eq!(build_query("", &ActiveFilters::new()), StructuredQuery::PassThrough);
        assert!(build_query("   ", &ActiveFilters::new()).is_pass_through());
    }

    #[test]
    fn test_pattern_only_targets_name() {
        assert_eq!(
            build_query("semaphore", &ActiveFilters::new()),
            StructuredQuery::clause(SearchField::Name, "semaphore")
        );
    }

    #[test]
    fn test_filters_only_flatten_every_value() {
        let filters = ActiveFilters::new()
            .toggled(FilterCategory::Keywords, "zkp")
            .toggled(FilterCategory::Keywords, "mpc")
            .toggled(FilterCategory::Themes, "build");

        assert_eq!(
            build_query("", &filters),
            StructuredQuery::And(vec![
                StructuredQuery::clause(SearchField::Keywords, "zkp"),
                StructuredQuery::clause(SearchField::Keywords, "mpc"),
                StructuredQuery::clause(SearchField::Themes, "build"),
            ])
        );
    }

    #[test]
    fn test_filters_and_pattern_nest() {
        let filters = ActiveFilters::new().toggled(FilterCategory::BuiltWith, "circom");

        assert_eq!(
            build_query("anon", &filters),
            StructuredQuery::And(vec![
                StructuredQuery::And(vec![StructuredQuery::clause(
                    SearchField::BuiltWith,
                    "circom"
                )]),
                StructuredQuery::clause(SearchField::Name, "anon"),
            ])
        );
    }

    #[test]
    fn test_display() {
        let query = StructuredQuery::And(vec![
            StructuredQuery::clause(SearchField::Themes, "play"),
            StructuredQuery::Or(vec![
                StructuredQuery::clause(SearchField::Name, "a"),
                StructuredQuery::PassThrough,
            ]),
        ]);
        assert_eq!(
            query.to_string(),
            r#"$and(tags.themes:"play", $or(name:"a", *))"#
        );
    }

    #[test]
    fn test_field_keys_and_indices() {
        for (i, field) in SearchField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
        assert_eq!(SearchField::BuiltWith.key(), "tags.builtWith");
        assert_eq!(SearchField::from(FilterCategory::Themes), SearchField::Themes);
    }
}
