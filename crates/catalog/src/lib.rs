//! Static project catalog and the view state the projects section renders from.

pub mod date;
pub mod error;
pub mod presenter;
pub mod project;

pub use date::{format_date, parse_year_month};
pub use error::{CatalogError, MalformedDateError};
pub use presenter::{
    layout_for, matches_filter, Arrangement, Breakpoints, CatalogPresenter, CatalogStats, Layout,
    ProjectCard, ProjectDetail,
};
pub use project::{Catalog, Project};
