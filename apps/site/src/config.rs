use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use contact_core::{relay::parse_endpoint, DEFAULT_RELAY_ENDPOINT};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub form_endpoint: String,
    pub diagnostics: bool,
    pub catalog_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            form_endpoint: DEFAULT_RELAY_ENDPOINT.into(),
            diagnostics: false,
            catalog_path: None,
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then the optional TOML file at `path`, then `APP__*` variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    let mut settings = apply_env_overrides(settings, |key| std::env::var(key).ok());
    settings.form_endpoint = prepare_form_endpoint(&settings.form_endpoint)?;
    Ok(settings)
}

pub fn apply_env_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    if let Some(v) = lookup("APP__FORM_ENDPOINT") {
        settings.form_endpoint = v;
    }
    if let Some(v) = lookup("APP__DIAGNOSTICS") {
        if let Some(parsed) = parse_flag(&v) {
            settings.diagnostics = parsed;
        }
    }
    if let Some(v) = lookup("APP__CATALOG_PATH") {
        settings.catalog_path = Some(PathBuf::from(v)).filter(|p| !p.as_os_str().is_empty());
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    settings
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn prepare_form_endpoint(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Settings::default().form_endpoint);
    }

    let endpoint = parse_endpoint(raw)?;
    Ok(endpoint.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
