//! Fuzzy search over project records
//!
//! A [`StructuredQuery`] built from the current filters and text pattern is
//! evaluated by the [`SearchEngine`] against a prebuilt [`SearchIndex`].

pub mod engine;
pub mod fuzzy;
pub mod parser;
pub mod query;
pub mod ranking;

pub use engine::{SearchEngine, SearchIndex, SearchResult};
pub use fuzzy::FuzzyMatcher;
pub use parser::{ParsedPattern, PatternParser, PatternToken, TokenKind};
pub use query::{build_query, SearchField, Searchable, StructuredQuery};
pub use ranking::{compute_score, field_norm, ScoringWeights, ValueMatch};
