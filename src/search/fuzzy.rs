//! Fuzzy Matching Engine
//!
//! Scores a single pattern token against a single value. Fuzzy tokens use a
//! bounded approximate-substring edit distance; the exact-family operators
//! (exact, contains, prefix, suffix and their inverses) are delegated to
//! nucleo-matcher atoms.
//!
//! Scores live in [0, 1]: 0 is a perfect match, and a token only matches when
//! its score does not exceed the configured threshold.

use super::parser::{PatternToken, TokenKind};
use crate::config::SearchConfig;
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fuzzy matcher with configuration
pub struct FuzzyMatcher {
    matcher: Matcher,
    buf: Vec<char>,
    config: SearchConfig,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl FuzzyMatcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::with_capacity(64),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Score a token against a value
    ///
    /// Returns Some(score) if the token matches, None otherwise.
    pub fn match_token(&mut self, haystack: &str, token: &PatternToken) -> Option<f64> {
        match token.kind {
            TokenKind::Fuzzy => self.fuzzy_score(haystack, &token.text),
            _ => self.atom_matches(haystack, token).then_some(0.0),
        }
    }

    /// True when `value` and `pattern` are the same text once trimmed,
    /// normalized and case-folded per the configuration
    pub fn is_same_text(&self, value: &str, pattern: &str) -> bool {
        let pattern = pattern.trim();
        !pattern.is_empty()
            && self.normalize_for_matching(value.trim()) == self.normalize_for_matching(pattern)
    }

    /// Approximate substring score of `needle` within `haystack`
    ///
    /// The best alignment minimises `errors / needle_len` plus the distance of
    /// its start from the expected location.
    pub fn fuzzy_score(&self, haystack: &str, needle: &str) -> Option<f64> {
        let text: Vec<char> = self.normalize_for_matching(haystack).chars().collect();
        let pattern: Vec<char> = self.normalize_for_matching(needle).chars().collect();

        if pattern.is_empty() {
            return None;
        }

        if text == pattern {
            return Some(0.0);
        }

        let m = pattern.len();

        // Column-wise edit distance where a match may start at any text
        // position. `cost[i]` is the cheapest alignment of pattern[..i] ending
        // at the current text position, `start[i]` where that alignment begins.
        let mut prev_cost: Vec<usize> = (0..=m).collect();
        let mut prev_start: Vec<usize> = vec![0; m + 1];
        let mut cost = vec![0usize; m + 1];
        let mut start = vec![0usize; m + 1];
        let mut best: Option<f64> = None;

        for (j, &tc) in text.iter().enumerate() {
            cost[0] = 0;
            start[0] = j + 1;

            for i in 1..=m {
                let substitute = prev_cost[i - 1] + usize::from(pattern[i - 1] != tc);
                let skip_pattern = cost[i - 1] + 1;
                let skip_text = prev_cost[i] + 1;

                if substitute <= skip_pattern && substitute <= skip_text {
                    cost[i] = substitute;
                    start[i] = prev_start[i - 1];
                } else if skip_pattern <= skip_text {
                    cost[i] = skip_pattern;
                    start[i] = start[i - 1];
                } else {
                    cost[i] = skip_text;
                    start[i] = prev_start[i];
                }
            }

            let score = self.compute_score(cost[m], m, start[m]);
            best = Some(best.map_or(score, |b: f64| b.min(score)));

            std::mem::swap(&mut prev_cost, &mut cost);
            std::mem::swap(&mut prev_start, &mut start);
        }

        best.filter(|score| *score <= self.config.threshold)
    }

    /// Score of an alignment with `errors` edits starting at `start`
    fn compute_score(&self, errors: usize, pattern_len: usize, start: usize) -> f64 {
        let accuracy = errors as f64 / pattern_len as f64;

        if self.config.ignore_location {
            return accuracy;
        }

        let proximity = start.abs_diff(self.config.location);

        if self.config.distance == 0 {
            return if proximity > 0 { 1.0 } else { accuracy };
        }

        accuracy + proximity as f64 / self.config.distance as f64
    }

    /// Evaluate an exact-family token through nucleo
    fn atom_matches(&mut self, haystack: &str, token: &PatternToken) -> bool {
        let kind = match token.kind {
            TokenKind::Exact => AtomKind::Exact,
            TokenKind::Include | TokenKind::InverseInclude => AtomKind::Substring,
            TokenKind::Prefix | TokenKind::InversePrefix => AtomKind::Prefix,
            TokenKind::Suffix | TokenKind::InverseSuffix => AtomKind::Postfix,
            TokenKind::Fuzzy => AtomKind::Fuzzy,
        };

        let needle = self.compose(&token.text);
        let mut atom = Atom::new(
            &needle,
            self.case_matching(),
            self.normalization(),
            kind,
            false,
        );
        atom.negative = token.kind.is_inverse();

        let haystack = self.compose(haystack);
        self.buf.clear();
        let haystack = Utf32Str::new(&haystack, &mut self.buf);

        atom.score(haystack, &mut self.matcher).is_some()
    }

    fn case_matching(&self) -> CaseMatching {
        if self.config.case_sensitive {
            CaseMatching::Respect
        } else {
            CaseMatching::Ignore
        }
    }

    fn normalization(&self) -> Normalization {
        if self.config.ignore_diacritics {
            Normalization::Smart
        } else {
            Normalization::Never
        }
    }

    /// Canonical composition, with diacritics removed when configured
    fn compose(&self, text: &str) -> String {
        if self.config.ignore_diacritics {
            text.nfd().filter(|c| !is_combining_mark(*c)).collect()
        } else {
            text.nfc().collect()
        }
    }

    /// Normalize text for edit-distance matching
    fn normalize_for_matching(&self, text: &str) -> String {
        let composed = self.compose(text);
        if self.config.case_sensitive {
            composed
        } else {
            composed.to_lowercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> PatternToken {
        PatternToken::new(kind, text)
    }

    #[test]
    fn test_identical_strings_score_zero() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.fuzzy_score("Bandada", "Bandada"), Some(0.0));
        assert_eq!(matcher.fuzzy_score("Bandada", "bandada"), Some(0.0));
    }

    #[test]
    fn test_substring_at_start_scores_zero() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.fuzzy_score("semaphore protocol", "sema"), Some(0.0));
    }

    #[test]
    fn test_single_typo_within_threshold() {
        let matcher = FuzzyMatcher::default();
        // one missing letter out of seven
        let score = matcher.fuzzy_score("research", "reserch").unwrap();
        assert!(score > 0.0 && score <= 0.2, "score was {score}");
    }

    #[test]
    fn test_too_many_errors_rejected() {
        let matcher = FuzzyMatcher::default();
        assert!(matcher.fuzzy_score("build", "bild").is_none());
        assert!(matcher.fuzzy_score("mpc", "zkp").is_none());
        assert!(matcher.fuzzy_score("play", "build").is_none());
    }

    #[test]
    fn test_empty_needle_or_haystack() {
        let matcher = FuzzyMatcher::default();
        assert!(matcher.fuzzy_score("hello", "").is_none());
        assert!(matcher.fuzzy_score("", "hello").is_none());
    }

    #[test]
    fn test_location_penalty() {
        let matcher = FuzzyMatcher::default();
        // exact hit 15 characters in: 0.15
        let score = matcher.fuzzy_score("zero knowledge proofs", "proofs").unwrap();
        assert!((score - 0.15).abs() < 1e-9);

        // exact hit 30 characters in exceeds the default threshold
        let far = "the thirty character prefix!! proofs";
        assert!(matcher.fuzzy_score(far, "proofs").is_none());

        let relaxed = FuzzyMatcher::new(SearchConfig {
            ignore_location: true,
            ..SearchConfig::default()
        });
        assert_eq!(relaxed.fuzzy_score(far, "proofs"), Some(0.0));
    }

    #[test]
    fn test_zero_distance_requires_expected_location() {
        let matcher = FuzzyMatcher::new(SearchConfig {
            distance: 0,
            threshold: 0.5,
            ..SearchConfig::default()
        });
        assert_eq!(matcher.fuzzy_score("rust tools", "rust"), Some(0.0));
        assert!(matcher.fuzzy_score("tools rust", "rust").is_none());
    }

    #[test]
    fn test_threshold_extremes() {
        let strict = FuzzyMatcher::new(SearchConfig::default().with_threshold(0.0));
        assert!(strict.fuzzy_score("research", "reserch").is_none());
        assert_eq!(strict.fuzzy_score("research", "research"), Some(0.0));

        let loose = FuzzyMatcher::new(SearchConfig::default().with_threshold(1.0));
        assert!(loose.fuzzy_score("build", "bild").is_some());
    }

    #[test]
    fn test_case_sensitivity() {
        let sensitive = FuzzyMatcher::new(SearchConfig {
            case_sensitive: true,
            ..SearchConfig::default()
        });
        assert!(sensitive.fuzzy_score("ZKP", "zkp").is_none());
        assert_eq!(FuzzyMatcher::default().fuzzy_score("ZKP", "zkp"), Some(0.0));
    }

    #[test]
    fn test_unicode_normalization() {
        let matcher = FuzzyMatcher::default();
        // precomposed é vs e + combining acute
        assert_eq!(matcher.fuzzy_score("caf\u{e9}", "cafe\u{301}"), Some(0.0));

        let plain = FuzzyMatcher::new(SearchConfig::default().with_threshold(0.0));
        assert!(plain.fuzzy_score("café", "cafe").is_none());

        let folding = FuzzyMatcher::new(SearchConfig {
            ignore_diacritics: true,
            threshold: 0.0,
            ..SearchConfig::default()
        });
        assert_eq!(folding.fuzzy_score("café", "cafe"), Some(0.0));
    }

    #[test]
    fn test_same_text() {
        let matcher = FuzzyMatcher::default();
        assert!(matcher.is_same_text("Garbled Circuit", " garbled circuit "));
        assert!(matcher.is_same_text("caf\u{e9}", "cafe\u{301}"));
        assert!(!matcher.is_same_text("garbled circuit", "garbled"));
        assert!(!matcher.is_same_text("", "  "));

        let sensitive = FuzzyMatcher::new(SearchConfig {
            case_sensitive: true,
            ..SearchConfig::default()
        });
        assert!(!sensitive.is_same_text("ZKP", "zkp"));
    }

    #[test]
    fn test_exact_token() {
        let mut matcher = FuzzyMatcher::default();
        assert_eq!(matcher.match_token("zkp", &token(TokenKind::Exact, "ZKP")), Some(0.0));
        assert!(matcher.match_token("zkps", &token(TokenKind::Exact, "zkp")).is_none());
    }

    #[test]
    fn test_include_prefix_suffix_tokens() {
        let mut matcher = FuzzyMatcher::default();
        let value = "garbled circuit";
        assert!(matcher.match_token(value, &token(TokenKind::Include, "bled")).is_some());
        assert!(matcher.match_token(value, &token(TokenKind::Prefix, "garb")).is_some());
        assert!(matcher.match_token(value, &token(TokenKind::Prefix, "circ")).is_none());
        assert!(matcher.match_token(value, &token(TokenKind::Suffix, "cuit")).is_some());
        assert!(matcher.match_token(value, &token(TokenKind::Suffix, "garb")).is_none());
    }

    #[test]
    fn test_inverse_tokens() {
        let mut matcher = FuzzyMatcher::default();
        let value = "garbled circuit";
        assert!(matcher.match_token(value, &token(TokenKind::InverseInclude, "zkp")).is_some());
        assert!(matcher.match_token(value, &token(TokenKind::InverseInclude, "bled")).is_none());
        assert!(matcher.match_token(value, &token(TokenKind::InversePrefix, "circ")).is_some());
        assert!(matcher.match_token(value, &token(TokenKind::InversePrefix, "garb")).is_none());
        assert!(matcher.match_token(value, &token(TokenKind::InverseSuffix, "garb")).is_some());
        assert!(matcher.match_token(value, &token(TokenKind::InverseSuffix, "cuit")).is_none());
    }

    #[test]
    fn test_fuzzy_token_uses_edit_distance() {
        let mut matcher = FuzzyMatcher::default();
        assert_eq!(matcher.match_token("build", &token(TokenKind::Fuzzy, "build")), Some(0.0));
        assert!(matcher.match_token("play", &token(TokenKind::Fuzzy, "build")).is_none());
    }
}
