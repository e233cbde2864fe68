use std::{
    path::{Path, PathBuf},
    process::Command,
    time::Duration,
};

use crate::error::{CorrectorError, Result};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama3.3";
pub const DEFAULT_CHAR_BUDGET: usize = 10_000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Folder names skipped by the collector unless the caller supplies its own set.
pub const DEFAULT_EXCLUDED_FOLDERS: &[&str] =
    &[".git", ".vs", ".idea", "bin", "obj", "node_modules", "target"];

#[derive(Debug, Clone)]
pub struct CorrectorConfig {
    pub endpoint: String,
    pub model: String,
    /// Maximum number of characters of each file forwarded to the model
    pub char_budget: usize,
    pub timeout: Duration,
    pub excluded_folders: Vec<String>,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            char_budget: DEFAULT_CHAR_BUDGET,
            timeout: DEFAULT_TIMEOUT,
            excluded_folders: DEFAULT_EXCLUDED_FOLDERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl CorrectorConfig {
    // from_env - defaults overlaid with any CORRECTOR_* variables that are set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("CORRECTOR_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(model) = lookup("CORRECTOR_MODEL") {
            config.model = model;
        }
        if let Some(budget) = lookup("CORRECTOR_CHAR_BUDGET") {
            config.char_budget = parse_number("CORRECTOR_CHAR_BUDGET", &budget)?;
        }
        if let Some(secs) = lookup("CORRECTOR_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("CORRECTOR_TIMEOUT_SECS", &secs)?);
        }
        if let Some(exclude) = lookup("CORRECTOR_EXCLUDE") {
            config.excluded_folders = exclude
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CorrectorError::InvalidArgument(format!("{key} is not a number: {value:?}")))
}

/// Where corrected copies land when the caller names no output directory.
pub fn default_output_dir() -> Result<PathBuf> {
    let path = dirs::data_dir()
        .ok_or_else(|| CorrectorError::InvalidArgument("could not resolve data dir".into()))?
        .join("source-corrector")
        .join(detect_project_slug())
        .join("corrections");
    tracing::debug!(path = %path.display(), "default output location");
    Ok(path)
}

// detect_project_slug - git top level name, then current dir name, then "default"
fn detect_project_slug() -> String {
    let git_slug = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .and_then(|s| {
            Path::new(s.trim())
                .file_name()
                .and_then(|n| n.to_str())
                .map(ToString::to_string)
        });

    git_slug
        .or_else(|| {
            std::env::current_dir()
                .ok()
                .and_then(|p| p.file_name()?.to_str().map(ToString::to_string))
        })
        .unwrap_or_else(|| "default".to_string())
}
