use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{date::format_date, error::CatalogError};

const BUILTIN_CATALOG: &str = include_str!("../data/projects.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub image: String,
    pub live_url: String,
    pub code_url: String,
    /// `YYYY-MM`; checked when the catalog is built.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl Project {
    /// Only an explicit `featured = true` counts.
    pub fn is_featured(&self) -> bool {
        self.featured == Some(true)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }

    pub fn details(&self) -> &[String] {
        self.details.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Debug, Clone)]
struct Entry {
    project: Project,
    display_date: String,
}

/// Immutable, validated list of projects in declaration order.
///
/// Titles are unique and every date formats cleanly; both are checked once
/// in [`Catalog::new`].
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn new(projects: Vec<Project>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(projects.len());
        for project in projects {
            if !seen.insert(project.title.clone()) {
                return Err(CatalogError::DuplicateTitle(project.title));
            }
            let display_date =
                format_date(&project.date).map_err(|source| CatalogError::MalformedDate {
                    title: project.title.clone(),
                    source,
                })?;
            entries.push(Entry {
                project,
                display_date,
            });
        }
        debug!(projects = entries.len(), "catalog loaded");
        Ok(Self { entries })
    }

    /// The projects shipped with the site.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.projects)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.entries.iter().map(|entry| &entry.project)
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.entries.get(index).map(|entry| &entry.project)
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.project.title == title)
    }

    pub fn find(&self, title: &str) -> Option<&Project> {
        self.position(title).and_then(|index| self.get(index))
    }

    /// `"Aug 2025"` style date of the project at `index`.
    pub fn display_date(&self, index: usize) -> Option<&str> {
        self.entries
            .get(index)
            .map(|entry| entry.display_date.as_str())
    }

    pub(crate) fn indexed(&self) -> impl Iterator<Item = (usize, &Project, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (index, &entry.project, entry.display_date.as_str()))
    }
}
