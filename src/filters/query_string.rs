//! URL query string encoding of active filters
//!
//! Format: `key=value&key=value`, one pair per active category, where the
//! value is the percent-encoded, comma-joined list of selected values
//! (e.g. `themes=play%2Cbuild`). Free text is never part of the encoding.

use super::{ActiveFilters, FilterCategory};
use tracing::{debug, warn};

/// Separator between values of one category before percent-encoding
const VALUE_SEPARATOR: char = ',';

/// Encode active filters as a URL query string (without leading `?`)
pub fn encode_query_string(filters: &ActiveFilters) -> String {
    filters
        .iter()
        .map(|(category, values)| {
            let joined = values.join(&VALUE_SEPARATOR.to_string());
            format!("{}={}", category.key(), urlencoding::encode(&joined))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a URL query string into active filters
///
/// Unknown keys, pairs without `=`, empty values and undecodable values are
/// skipped. A leading `?` is accepted.
pub fn decode_query_string(query: &str) -> ActiveFilters {
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let Some((key, raw_value)) = pair.split_once('=') else {
                debug!("Skipping query pair without value: {}", pair);
                return None;
            };

            let Some(category) = FilterCategory::from_key(key) else {
                debug!("Ignoring unknown filter category in query string: {}", key);
                return None;
            };

            // Form encoding writes spaces as '+'; encodeURIComponent never emits a bare '+'
            let raw_value = raw_value.replace('+', " ");
            let value = match urlencoding::decode(&raw_value) {
                Ok(value) => value.into_owned(),
                Err(e) => {
                    warn!("Ignoring undecodable value for {}: {}", key, e);
                    return None;
                }
            };

            let values: Vec<String> = value
                .split(VALUE_SEPARATOR)
                .map(str::to_string)
                .collect();

            Some((category, values))
        })
        .collect()
}
