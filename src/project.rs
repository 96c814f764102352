//! Project records and the read-only project store
//!
//! Records are loaded once (typically from a JSON dataset) and never mutated.

use crate::error::AppError;
use crate::filters::FilterCategory;
use crate::search::{SearchField, Searchable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Inactive,
    Maintained,
    #[serde(other)]
    Unknown,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
            ProjectStatus::Maintained => "maintained",
            ProjectStatus::Unknown => "unknown",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ProjectStatus::Active)
    }
}

/// Tag categories attached to a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTags {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub built_with: Vec<String>,
}

impl ProjectTags {
    pub fn values(&self, category: FilterCategory) -> &[String] {
        match category {
            FilterCategory::Themes => &self.themes,
            FilterCategory::Keywords => &self.keywords,
            FilterCategory::BuiltWith => &self.built_with,
        }
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub project_status: ProjectStatus,
    /// One-line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tldr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Website name (github, website, twitter, ...) to URL
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: ProjectTags,
}

impl Searchable for ProjectRecord {
    fn field_values(&self, field: SearchField) -> Vec<&str> {
        match field {
            SearchField::Name => vec![self.name.as_str()],
            SearchField::Tldr => self.tldr.as_deref().into_iter().collect(),
            SearchField::Themes => self.tags.themes.iter().map(String::as_str).collect(),
            SearchField::Keywords => self.tags.keywords.iter().map(String::as_str).collect(),
            SearchField::BuiltWith => self.tags.built_with.iter().map(String::as_str).collect(),
            SearchField::ProjectStatus => vec![self.project_status.as_str()],
        }
    }
}

/// Immutable, ordered collection of project records
#[derive(Debug, Clone)]
pub struct ProjectStore {
    records: Arc<[ProjectRecord]>,
}

impl ProjectStore {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    /// Shared handle to the records
    pub fn shared(&self) -> Arc<[ProjectRecord]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Parse a JSON array of project records
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let records: Vec<ProjectRecord> = serde_json::from_str(json)?;

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                warn!("Duplicate project id in dataset: {}", record.id);
            }
        }

        Ok(Self::new(records))
    }

    /// Load a JSON dataset from disk
    pub fn load_json(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(AppError::from)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;

        let store = Self::from_json_str(&data)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

        info!("Loaded {} projects from {}", store.len(), path.display());
        Ok(store)
    }
}

impl From<Vec<ProjectRecord>> for ProjectStore {
    fn from(records: Vec<ProjectRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DATASET: &str = r#"[
        {
            "id": "publicly-verifiable-garbled-circuit",
            "name": "Publicly verifiable garbled circuit",
            "projectStatus": "active",
            "section": "pse",
            "category": "research",
            "tldr": "Publicly verifiable garbled circuit research",
            "links": { "website": "https://hackmd.io/@namncc/B1md-dp4ke" },
            "tags": {
                "keywords": ["mpc", "garbled circuit", "zkp"],
                "themes": ["research"]
            }
        },
        {
            "id": "legacy-tool",
            "name": "Legacy tool",
            "projectStatus": "archived"
        }
    ]"#;

    #[test]
    fn test_parse_dataset() {
        let store = ProjectStore::from_json_str(DATASET).unwrap();
        assert_eq!(store.len(), 2);

        let first = &store.records()[0];
        assert_eq!(first.project_status, ProjectStatus::Active);
        assert_eq!(first.tags.keywords, vec!["mpc", "garbled circuit", "zkp"]);
        assert!(first.tags.built_with.is_empty());
        assert_eq!(first.links.get("website").map(String::as_str), Some("https://hackmd.io/@namncc/B1md-dp4ke"));

        let second = store.get("legacy-tool").unwrap();
        assert_eq!(second.project_status, ProjectStatus::Unknown);
        assert!(!second.project_status.is_active());
        assert!(second.tldr.is_none());
        assert_eq!(second.tags, ProjectTags::default());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = ProjectStore::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "dataset_load_failed");
    }

    #[test]
    fn test_searchable_fields() {
        let store = ProjectStore::from_json_str(DATASET).unwrap();
        let record = &store.records()[0];

        assert_eq!(
            record.field_values(SearchField::Name),
            vec!["Publicly verifiable garbled circuit"]
        );
        assert_eq!(record.field_values(SearchField::Themes), vec!["research"]);
        assert_eq!(record.field_values(SearchField::ProjectStatus), vec!["active"]);
        assert!(record.field_values(SearchField::BuiltWith).is_empty());
        assert!(store.records()[1].field_values(SearchField::Tldr).is_empty());
    }

    #[test]
    fn test_load_json_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();

        let store = ProjectStore::load_json(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_json_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectStore::load_json(&dir.path().join("missing.json")).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "not_found");
    }

    #[test]
    fn test_tags_values_by_category() {
        let tags = ProjectTags {
            themes: vec!["play".to_string()],
            keywords: vec![],
            built_with: vec!["rust".to_string()],
        };
        assert_eq!(tags.values(FilterCategory::Themes), ["play"]);
        assert_eq!(tags.values(FilterCategory::BuiltWith), ["rust"]);
        assert!(tags.values(FilterCategory::Keywords).is_empty());
    }
}
