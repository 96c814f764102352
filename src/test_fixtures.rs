//! Shared test fixtures: a small builder for project records

use crate::project::{ProjectRecord, ProjectStatus, ProjectTags};
use std::collections::BTreeMap;

pub struct ProjectBuilder {
    record: ProjectRecord,
}

/// Start building an active project with the given id and name
pub fn project(id: &str, name: &str) -> ProjectBuilder {
    ProjectBuilder {
        record: ProjectRecord {
            id: id.to_string(),
            name: name.to_string(),
            project_status: ProjectStatus::Active,
            tldr: None,
            section: None,
            category: None,
            links: BTreeMap::new(),
            tags: ProjectTags::default(),
        },
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl ProjectBuilder {
    pub fn themes(mut self, values: &[&str]) -> Self {
        self.record.tags.themes = owned(values);
        self
    }

    pub fn keywords(mut self, values: &[&str]) -> Self {
        self.record.tags.keywords = owned(values);
        self
    }

    pub fn built_with(mut self, values: &[&str]) -> Self {
        self.record.tags.built_with = owned(values);
        self
    }

    pub fn tldr(mut self, tldr: &str) -> Self {
        self.record.tldr = Some(tldr.to_string());
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.record.project_status = status;
        self
    }

    pub fn build(self) -> ProjectRecord {
        self.record
    }
}

/// The three-record dataset used throughout the state tests
///
/// A: themes [build], B: themes [play], C: themes [build, research]
pub fn theme_dataset() -> Vec<ProjectRecord> {
    vec![
        project("a", "Anon Aadhaar").themes(&["build"]).build(),
        project("b", "Bandada").themes(&["play"]).build(),
        project("c", "Circom tooling")
            .themes(&["build", "research"])
            .build(),
    ]
}
