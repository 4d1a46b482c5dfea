//! View state over a [`Catalog`] and everything derived from it.

use std::collections::BTreeSet;

use serde::Serialize;
use shared::domain::{FilterType, ViewMode};
use tracing::debug;

use crate::{
    error::CatalogError,
    project::{Catalog, Project},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrangement {
    /// Row-major grid; cards in a row share a height.
    Grid,
    /// Column flow; cards keep their natural height.
    Columns,
}

/// Column counts at the small, medium and large breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoints {
    pub base: u8,
    pub md: u8,
    pub lg: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub arrangement: Arrangement,
    pub columns: Breakpoints,
    /// Spacing between cards in 0.25rem units.
    pub gap: u8,
    /// Card image height in pixels.
    pub card_image_height: u16,
}

pub fn layout_for(mode: ViewMode) -> Layout {
    match mode {
        ViewMode::Grid => Layout {
            arrangement: Arrangement::Grid,
            columns: Breakpoints { base: 1, md: 2, lg: 3 },
            gap: 6,
            card_image_height: 192,
        },
        ViewMode::Masonry => Layout {
            arrangement: Arrangement::Columns,
            columns: Breakpoints { base: 1, md: 2, lg: 3 },
            gap: 6,
            card_image_height: 192,
        },
        ViewMode::Featured => Layout {
            arrangement: Arrangement::Grid,
            columns: Breakpoints { base: 1, md: 1, lg: 2 },
            gap: 8,
            card_image_height: 224,
        },
    }
}

pub fn matches_filter(project: &Project, filter: FilterType) -> bool {
    match filter {
        FilterType::All => true,
        FilterType::Featured => project.is_featured(),
        FilterType::Web | FilterType::Mobile => filter
            .category()
            .is_some_and(|category| project.in_category(category)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub featured: usize,
    /// Distinct technology names across every project.
    pub technologies: usize,
}

/// A card in the project list.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectCard<'a> {
    pub project: &'a Project,
    pub display_date: &'a str,
}

/// Contents of the detail overlay for the selected project.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectDetail<'a> {
    pub project: &'a Project,
    pub display_date: &'a str,
    pub details: &'a [String],
}

#[derive(Debug, Clone)]
pub struct CatalogPresenter {
    catalog: Catalog,
    view_mode: ViewMode,
    filter: FilterType,
    selected: Option<usize>,
}

impl CatalogPresenter {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            view_mode: ViewMode::default(),
            filter: FilterType::default(),
            selected: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        debug!(%filter, "catalog filter changed");
        self.filter = filter;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        debug!(%mode, "catalog view mode changed");
        self.view_mode = mode;
    }

    pub fn layout(&self) -> Layout {
        layout_for(self.view_mode)
    }

    /// Projects passing the active filter, in catalog order. May be empty.
    pub fn visible_projects(&self) -> Vec<&Project> {
        self.catalog
            .projects()
            .filter(|project| matches_filter(project, self.filter))
            .collect()
    }

    pub fn visible_cards(&self) -> Vec<ProjectCard<'_>> {
        self.catalog
            .indexed()
            .filter(|(_, project, _)| matches_filter(project, self.filter))
            .map(|(_, project, display_date)| ProjectCard {
                project,
                display_date,
            })
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let technologies: BTreeSet<&str> = self
            .catalog
            .projects()
            .flat_map(|project| project.tech.iter().map(String::as_str))
            .collect();
        CatalogStats {
            total: self.catalog.len(),
            featured: self
                .catalog
                .projects()
                .filter(|project| project.is_featured())
                .count(),
            technologies: technologies.len(),
        }
    }

    /// Opens the detail overlay for the project titled `title`.
    pub fn select_project(&mut self, title: &str) -> Result<&Project, CatalogError> {
        let index = self
            .catalog
            .position(title)
            .ok_or_else(|| CatalogError::UnknownProject(title.to_string()))?;
        self.selected = Some(index);
        self.catalog
            .get(index)
            .ok_or_else(|| CatalogError::UnknownProject(title.to_string()))
    }

    pub fn selected(&self) -> Option<&Project> {
        self.selected.and_then(|index| self.catalog.get(index))
    }

    pub fn detail(&self) -> Option<ProjectDetail<'_>> {
        let index = self.selected?;
        let project = self.catalog.get(index)?;
        Some(ProjectDetail {
            project,
            display_date: self.catalog.display_date(index)?,
            details: project.details(),
        })
    }

    /// Close button on the overlay.
    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Click landing outside the overlay bounds.
    pub fn dismiss_outside(&mut self) {
        self.close_detail();
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
