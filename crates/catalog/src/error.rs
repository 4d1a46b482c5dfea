use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed project date '{value}': {reason}")]
pub struct MalformedDateError {
    pub value: String,
    pub reason: &'static str,
}

impl MalformedDateError {
    pub fn new(value: impl Into<String>, reason: &'static str) -> Self {
        Self {
            value: value.into(),
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate project title '{0}'")]
    DuplicateTitle(String),
    #[error("project '{title}' has an invalid date: {source}")]
    MalformedDate {
        title: String,
        #[source]
        source: MalformedDateError,
    },
    #[error("no project titled '{0}'")]
    UnknownProject(String),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read catalog '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
