use crate::env_manager::{self, OUTPUT_DIR, REFERENCE_YEAR, WEBSITE_URL};
use crate::parser::TableLayout;
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub table: TableLayout,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub website_url: String,
    /// Year assumed for dates on the page; the current year when unset.
    pub reference_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from("output") }
    }
}

impl Config {
    /// Load from the platform config directory, creating it with defaults on
    /// first use, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let default_config = Config::default();
            default_config.save_to(&config_path)?;
            default_config
        };

        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Environment variables take precedence over the config file.
    pub fn apply_env(&mut self) {
        self.apply_env_with(env_manager::get_env_var);
    }

    /// Apply overrides from `lookup`, keyed by the environment variable names.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(WEBSITE_URL) {
            self.source.website_url = url;
        }
        if let Some(year) = lookup(REFERENCE_YEAR) {
            match year.parse() {
                Ok(year) => self.source.reference_year = Some(year),
                Err(_) => warn!("Ignoring invalid {}: {}", REFERENCE_YEAR, year),
            }
        }
        if let Some(dir) = lookup(OUTPUT_DIR) {
            self.output.directory = PathBuf::from(dir);
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.source.reference_year.unwrap_or_else(|| Local::now().year())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "calscrape", "calscrape")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DEFAULT_TABLE_SELECTOR;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.source.website_url, "");
        assert_eq!(config.table.selector, DEFAULT_TABLE_SELECTOR);
        assert_eq!(config.table.header_rows, 2);
        assert_eq!(config.output.directory, PathBuf::from("output"));
    }

    #[test]
    fn test_config_save_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.source.website_url = "https://example.com/calendar".to_string();
        config.source.reference_year = Some(2025);
        config.table.header_rows = 1;
        config.save_to(&config_path)?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.source.website_url, "https://example.com/calendar");
        assert_eq!(loaded.reference_year(), 2025);
        assert_eq!(loaded.table.header_rows, 1);
        assert_eq!(loaded.table.selector, DEFAULT_TABLE_SELECTOR);

        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let config: Config = toml::from_str("[table]\nselector = \"table#cal\"\n")?;
        assert_eq!(config.table.selector, "table#cal");
        assert_eq!(config.table.name_column, 1);
        assert_eq!(config.output.directory, PathBuf::from("output"));
        assert_eq!(config.source.reference_year, None);
        Ok(())
    }

    #[test]
    fn test_apply_env_overrides() {
        let vars = HashMap::from([
            (WEBSITE_URL, "https://example.org/events"),
            (OUTPUT_DIR, "exports"),
            (REFERENCE_YEAR, "2031"),
        ]);
        let lookup = |name: &str| vars.get(name).map(|value| value.to_string());

        let mut config = Config::default();
        config.apply_env_with(lookup);
        assert_eq!(config.source.website_url, "https://example.org/events");
        assert_eq!(config.output.directory, PathBuf::from("exports"));
        assert_eq!(config.reference_year(), 2031);
    }

    #[test]
    fn test_apply_env_ignores_invalid_year() {
        let mut config = Config::default();
        config.source.reference_year = Some(2024);
        config.apply_env_with(|name| (name == REFERENCE_YEAR).then(|| "next year".to_string()));
        assert_eq!(config.source.reference_year, Some(2024));
        assert_eq!(config.source.website_url, "");
        assert_eq!(config.output.directory, PathBuf::from("output"));
    }
}
