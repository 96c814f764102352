//! Clause Pattern Parser
//!
//! Parses the pattern of a single query clause into OR-groups of AND-ed
//! tokens. Operators:
//!
//! | token    | meaning                      |
//! |----------|------------------------------|
//! | `word`   | fuzzy match                  |
//! | `=word`  | exact match of the value     |
//! | `'word`  | value contains `word`        |
//! | `^word`  | value starts with `word`     |
//! | `word$`  | value ends with `word`       |
//! | `!word`  | value does not contain `word`|
//! | `!^word` | value does not start with    |
//! | `!word$` | value does not end with      |
//!
//! Tokens are separated by spaces, groups by `|`. A double-quoted token may
//! contain spaces (`="garbled circuit"`).

/// Separator between alternative groups
const OR_SEPARATOR: char = '|';

/// How a token is compared against a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Fuzzy,
    Exact,
    Include,
    Prefix,
    Suffix,
    InverseInclude,
    InversePrefix,
    InverseSuffix,
}

impl TokenKind {
    /// Inverse tokens match when the value does *not* satisfy them
    pub fn is_inverse(self) -> bool {
        matches!(
            self,
            TokenKind::InverseInclude | TokenKind::InversePrefix | TokenKind::InverseSuffix
        )
    }
}

/// A single comparison within a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternToken {
    pub kind: TokenKind,
    pub text: String,
}

impl PatternToken {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Parsed clause pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPattern {
    /// Original unmodified pattern
    pub original: String,
    /// Alternatives; each is a list of tokens that must all match
    pub groups: Vec<Vec<PatternToken>>,
}

impl ParsedPattern {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Pattern parser
pub struct PatternParser;

impl PatternParser {
    /// Parse a clause pattern into token groups
    pub fn parse(pattern: &str) -> ParsedPattern {
        let groups = pattern
            .split(OR_SEPARATOR)
            .map(|group| {
                Self::split_tokens(group)
                    .iter()
                    .filter_map(|raw| Self::classify(raw))
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect();

        ParsedPattern {
            original: pattern.to_string(),
            groups,
        }
    }

    /// Split on whitespace, keeping double-quoted sections together
    ///
    /// Quotes are kept in the raw token; `classify` strips them after
    /// reading the operator.
    fn split_tokens(group: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = group.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '"' => {
                    in_quotes = !in_quotes;
                    current.push(ch);
                }
                '\\' if in_quotes => {
                    // Escaped character inside quotes is taken literally
                    if let Some(next_ch) = chars.next() {
                        current.push(next_ch);
                    }
                }
                c if c.is_whitespace() && !in_quotes => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            }
        }

        if !current.is_empty() {
            tokens.push(current);
        }

        tokens
    }

    /// Read the operator of a raw token
    fn classify(raw: &str) -> Option<PatternToken> {
        let (kind, body) = if let Some(rest) = raw.strip_prefix('=') {
            (TokenKind::Exact, rest)
        } else if let Some(rest) = raw.strip_prefix('\'') {
            (TokenKind::Include, rest)
        } else if let Some(rest) = raw.strip_prefix("!^") {
            (TokenKind::InversePrefix, rest)
        } else if let Some(rest) = raw.strip_prefix('^') {
            (TokenKind::Prefix, rest)
        } else if let Some(rest) = raw.strip_prefix('!') {
            match rest.strip_suffix('$') {
                Some(inner) => (TokenKind::InverseSuffix, inner),
                None => (TokenKind::InverseInclude, rest),
            }
        } else if let Some(rest) = raw.strip_suffix('$') {
            (TokenKind::Suffix, rest)
        } else {
            (TokenKind::Fuzzy, raw)
        };

        let text = Self::unquote(body);
        if text.is_empty() {
            return None;
        }

        Some(PatternToken::new(kind, text))
    }

    /// Strip one pair of surrounding double quotes
    fn unquote(body: &str) -> &str {
        body.strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_group(pattern: &str) -> Vec<PatternToken> {
        let parsed = PatternParser::parse(pattern);
        assert_eq!(parsed.groups.len(), 1, "expected one group for {pattern:?}");
        parsed.groups.into_iter().next().unwrap()
    }

    #[test]
    fn test_plain_word_is_fuzzy() {
        assert_eq!(
            single_group("zkp"),
            vec![PatternToken::new(TokenKind::Fuzzy, "zkp")]
        );
    }

    #[test]
    fn test_spaces_make_and_tokens() {
        assert_eq!(
            single_group("garbled circuit"),
            vec![
                PatternToken::new(TokenKind::Fuzzy, "garbled"),
                PatternToken::new(TokenKind::Fuzzy, "circuit"),
            ]
        );
    }

    #[test]
    fn test_operators() {
        let tokens = single_group("=exact 'incl ^pre suf$ !not !^npre !nsuf$");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Exact,
                TokenKind::Include,
                TokenKind::Prefix,
                TokenKind::Suffix,
                TokenKind::InverseInclude,
                TokenKind::InversePrefix,
                TokenKind::InverseSuffix,
            ]
        );
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["exact", "incl", "pre", "suf", "not", "npre", "nsuf"]
        );
        assert!(tokens[4].kind.is_inverse());
        assert!(!tokens[0].kind.is_inverse());
    }

    #[test]
    fn test_quoted_token_keeps_spaces() {
        assert_eq!(
            single_group(r#"="garbled circuit" mpc"#),
            vec![
                PatternToken::new(TokenKind::Exact, "garbled circuit"),
                PatternToken::new(TokenKind::Fuzzy, "mpc"),
            ]
        );
    }

    #[test]
    fn test_escaped_quote_inside_quotes() {
        assert_eq!(
            single_group(r#"'"say \"hi\"""#),
            vec![PatternToken::new(TokenKind::Include, r#"say "hi""#)]
        );
    }

    #[test]
    fn test_or_groups() {
        let parsed = PatternParser::parse("^rust | go$");
        assert_eq!(
            parsed.groups,
            vec![
                vec![PatternToken::new(TokenKind::Prefix, "rust")],
                vec![PatternToken::new(TokenKind::Suffix, "go")],
            ]
        );
    }

    #[test]
    fn test_empty_and_operator_only_tokens_are_dropped() {
        assert!(PatternParser::parse("").is_empty());
        assert!(PatternParser::parse("   ").is_empty());
        assert!(PatternParser::parse("! ^ $ = '").is_empty());
        assert_eq!(PatternParser::parse("a | | b").groups.len(), 2);
    }

    #[test]
    fn test_original_is_preserved() {
        let parsed = PatternParser::parse("  mixed  Case ");
        assert_eq!(parsed.original, "  mixed  Case ");
        assert_eq!(
            parsed.groups[0],
            vec![
                PatternToken::new(TokenKind::Fuzzy, "mixed"),
                PatternToken::new(TokenKind::Fuzzy, "Case"),
            ]
        );
    }
}
