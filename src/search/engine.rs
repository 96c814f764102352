//! Search Engine Integration
//!
//! Ties together pattern parsing, fuzzy matching, and ranking to evaluate a
//! [`StructuredQuery`] against an indexed collection.

use super::fuzzy::FuzzyMatcher;
use super::parser::{ParsedPattern, PatternParser};
use super::query::{SearchField, Searchable, StructuredQuery};
use super::ranking::{compute_score, field_norm, ScoringWeights, ValueMatch};
use crate::config::SearchConfig;
use std::sync::Arc;
use tracing::debug;

/// Search result with content and score
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    /// The matched item
    pub item: T,
    /// Position of the item in the indexed collection
    pub ref_index: usize,
    /// Record score, 0 is a perfect match
    pub score: f64,
    /// Which values satisfied the query
    pub matches: Vec<ValueMatch>,
}

/// A field value prepared for matching
#[derive(Debug, Clone)]
struct IndexedValue {
    text: String,
    norm: f64,
}

/// Items plus their searchable values, computed once
pub struct SearchIndex<T> {
    items: Arc<[T]>,
    /// `fields[record][field.index()]` holds that field's values
    fields: Vec<Vec<Vec<IndexedValue>>>,
}

impl<T: Searchable> SearchIndex<T> {
    pub fn new(items: Arc<[T]>) -> Self {
        let fields = items
            .iter()
            .map(|item| {
                SearchField::ALL
                    .iter()
                    .map(|field| {
                        item.field_values(*field)
                            .into_iter()
                            .map(|value| IndexedValue {
                                text: value.to_string(),
                                norm: field_norm(value),
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Self { items, fields }
    }
}

impl<T> SearchIndex<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn values(&self, record: usize, field: SearchField) -> &[IndexedValue] {
        &self.fields[record][field.index()]
    }
}

/// Query tree with clause patterns parsed once per search
enum CompiledQuery {
    Clause {
        field: SearchField,
        pattern: ParsedPattern,
    },
    And(Vec<CompiledQuery>),
    Or(Vec<CompiledQuery>),
}

impl CompiledQuery {
    /// None when the query places no constraint on records
    ///
    /// Pass-through children are dropped from an `And`; any pass-through child
    /// makes an `Or` unconstrained.
    fn compile(query: &StructuredQuery) -> Option<Self> {
        match query {
            StructuredQuery::PassThrough => None,
            StructuredQuery::Clause { field, pattern } => Some(CompiledQuery::Clause {
                field: *field,
                pattern: PatternParser::parse(pattern),
            }),
            StructuredQuery::And(children) => {
                let compiled: Vec<_> = children.iter().filter_map(Self::compile).collect();
                if compiled.is_empty() && !children.is_empty() {
                    None
                } else {
                    Some(CompiledQuery::And(compiled))
                }
            }
            StructuredQuery::Or(children) => children
                .iter()
                .map(Self::compile)
                .collect::<Option<Vec<_>>>()
                .map(CompiledQuery::Or),
        }
    }
}

/// Search engine that combines parsing, matching, and ranking
pub struct SearchEngine {
    fuzzy_matcher: FuzzyMatcher,
    scoring_weights: ScoringWeights,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        let scoring_weights =
            ScoringWeights::uniform(SearchField::ALL.len(), config.ignore_field_norm);
        Self {
            fuzzy_matcher: FuzzyMatcher::new(config),
            scoring_weights,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        self.fuzzy_matcher.config()
    }

    /// Evaluate a query against the index
    ///
    /// Pass-through returns every item in index order with score 0. Otherwise
    /// returns matching items sorted by score (best first); equal scores keep
    /// index order.
    pub fn search<T: Clone>(
        &mut self,
        index: &SearchIndex<T>,
        query: &StructuredQuery,
    ) -> Vec<SearchResult<T>> {
        let Some(compiled) = CompiledQuery::compile(query) else {
            return index
                .items()
                .iter()
                .enumerate()
                .map(|(ref_index, item)| SearchResult {
                    item: item.clone(),
                    ref_index,
                    score: 0.0,
                    matches: Vec::new(),
                })
                .collect();
        };

        let mut results: Vec<SearchResult<T>> = Vec::new();

        for (ref_index, item) in index.items().iter().enumerate() {
            let matches = self.evaluate(&compiled, index, ref_index);
            if matches.is_empty() {
                continue;
            }

            results.push(SearchResult {
                item: item.clone(),
                ref_index,
                score: compute_score(&matches, &self.scoring_weights),
                matches,
            });
        }

        // Stable sort: ties stay in index order
        results.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            "Query {} matched {} of {} items",
            query,
            results.len(),
            index.len()
        );

        results
    }

    /// Matched values for one record; empty means the record does not match
    fn evaluate<T>(
        &mut self,
        node: &CompiledQuery,
        index: &SearchIndex<T>,
        record: usize,
    ) -> Vec<ValueMatch> {
        match node {
            CompiledQuery::Clause { field, pattern } => {
                self.match_clause(*field, pattern, index.values(record, *field))
            }
            CompiledQuery::And(children) => {
                let mut pooled = Vec::new();
                for child in children {
                    let matches = self.evaluate(child, index, record);
                    if matches.is_empty() {
                        return Vec::new();
                    }
                    pooled.extend(matches);
                }
                pooled
            }
            CompiledQuery::Or(children) => children
                .iter()
                .flat_map(|child| self.evaluate(child, index, record))
                .collect(),
        }
    }

    /// Match a parsed pattern against every value of a field
    fn match_clause(
        &mut self,
        field: SearchField,
        pattern: &ParsedPattern,
        values: &[IndexedValue],
    ) -> Vec<ValueMatch> {
        values
            .iter()
            .enumerate()
            .filter_map(|(value_index, value)| {
                self.match_value(pattern, &value.text)
                    .map(|score| ValueMatch {
                        field,
                        value_index,
                        score,
                        norm: value.norm,
                    })
            })
            .collect()
    }

    /// Score of the first group whose tokens all match `text`
    ///
    /// The group score is the mean of its token scores. A value equal to the
    /// whole pattern is a perfect match, wherever its words sit.
    fn match_value(&mut self, pattern: &ParsedPattern, text: &str) -> Option<f64> {
        if self.fuzzy_matcher.is_same_text(text, &pattern.original) {
            return Some(0.0);
        }

        'groups: for group in &pattern.groups {
            let mut total = 0.0;
            for token in group {
                match self.fuzzy_matcher.match_token(text, token) {
                    Some(score) => total += score,
                    None => continue 'groups,
                }
            }
            return Some(total / group.len() as f64);
        }
        None
    }
}
