//! Markdown rendering of the vocabulary and of search states (used by the CLI)

use crate::filters::{FilterCategory, FilterVocabulary};
use crate::project::ProjectRecord;
use crate::state::SearchState;

/// Render the selectable values of every category
pub fn format_vocabulary(vocabulary: &FilterVocabulary) -> String {
    let mut markdown = String::from("# Filter vocabulary\n");

    for category in FilterCategory::ALL {
        let values = vocabulary.values(category);
        markdown.push_str(&format!(
            "\n## {} (`{}`, {:?})\n\n",
            category.label(),
            category.key(),
            category.mode()
        ));

        if values.is_empty() {
            markdown.push_str("_none_\n");
            continue;
        }

        for value in values {
            markdown.push_str(&format!("- {}\n", value));
        }
    }

    markdown
}

/// Render a search state: the active filters, the query string and the results
pub fn format_search_state(state: &SearchState) -> String {
    let mut markdown = format!("# Projects ({} found)\n\n", state.results.len());

    if state.active_filters.is_empty() {
        markdown.push_str("**Filters:** none\n");
    } else {
        for (category, values) in state.active_filters.iter() {
            markdown.push_str(&format!("**{}:** {}\n", category.label(), values.join(", ")));
        }
    }

    if !state.query_string.is_empty() {
        markdown.push_str(&format!("**Query string:** `?{}`\n", state.query_string));
    }

    if !state.text_pattern.trim().is_empty() {
        markdown.push_str(&format!("**Search:** {}\n", state.text_pattern));
    }

    if state.results.is_empty() {
        markdown.push_str("\nNo projects match.\n");
        return markdown;
    }

    for record in &state.results {
        markdown.push('\n');
        markdown.push_str(&format_project(record));
    }

    markdown
}

fn format_project(record: &ProjectRecord) -> String {
    let mut markdown = format!("## {} ({})\n", record.name, record.project_status.as_str());

    if let Some(tldr) = &record.tldr {
        markdown.push_str(&format!("{}\n", tldr));
    }

    for category in FilterCategory::ALL {
        let values = record.tags.values(category);
        if !values.is_empty() {
            markdown.push_str(&format!("- {}: {}\n", category.key(), values.join(", ")));
        }
    }

    markdown
}
