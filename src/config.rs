//! Configuration management
//!
//! Manages the suggestion service settings, the term calendar and where
//! schedule data is kept.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schedule suggestion service
    #[serde(default)]
    pub ai: AiConfig,
    /// Term calendar
    #[serde(default)]
    pub term: TermConfig,
    /// Local data location
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// OpenAI-compatible API root
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model asked for suggestions
    #[serde(default = "default_model")]
    pub model: String,
    /// How many courses to ask for
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
    /// Response token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-pro".to_string()
}

fn default_suggestion_count() -> usize {
    8
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            suggestion_count: default_suggestion_count(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    /// Monday of week 1
    #[serde(default = "default_term_start")]
    pub start_date: NaiveDate,
}

/// Monday, March 2nd, 2026
pub fn default_term_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            start_date: default_term_start(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Data directory, honouring the override
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => data_dir(),
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "course-flow", "course-flow")
        .context("Failed to get project directories")
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Configuration ({})", config_path()?.display());
    println!();
    println!("  AI suggestions");
    println!("    endpoint:     {}", config.ai.base_url);
    println!("    model:        {}", config.ai.model);
    println!("    courses:      {}", config.ai.suggestion_count);
    println!("    max tokens:   {}", config.ai.max_tokens);
    println!("    timeout:      {}s", config.ai.timeout_secs);
    println!("    API key:      {}", if crate::security::has_api_key() { "configured" } else { "not set" });
    println!();
    println!("  Term");
    println!("    starts:       {}", config.term.start_date.format("%A, %B %-d, %Y"));
    println!();
    println!("  Storage");
    println!("    data dir:     {}", config.resolved_data_dir()?.display());

    println!("\nUse 'course-flow config --set-model <model>' to change the suggestion model");

    Ok(())
}

/// Set the suggestion model
pub fn set_model(model: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.ai.model = model.to_string();
    config.save()?;
    println!("Suggestion model set to: {}", model);
    Ok(())
}

/// Reset configuration to defaults
pub fn reset_config() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults.");
    Ok(())
}

/// Get default configuration as TOML string
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| "# Default configuration\n".to_string())
}
