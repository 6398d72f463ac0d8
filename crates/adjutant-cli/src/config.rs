//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Language-model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Merge-store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Workspace sync settings; sync commands error without this section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceConfig>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Language-model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions API base
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_llm_key_env")]
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key_env: default_llm_key_env(),
        }
    }
}

/// Merge-store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database path; defaults to ~/.adjutant/adjutant.db
    #[serde(default)]
    pub path: Option<String>,
}

/// Workspace sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Target database id
    pub database_id: String,

    /// Environment variable holding the workspace API key
    #[serde(default = "default_workspace_key_env")]
    pub api_key_env: String,

    /// Owner-name to workspace-user-id mapping ("Name:id,Name2:id2")
    #[serde(default)]
    pub user_map: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl From<crate::cli::CliFormat> for OutputFormat {
    fn from(f: crate::cli::CliFormat) -> Self {
        match f {
            crate::cli::CliFormat::Table => OutputFormat::Table,
            crate::cli::CliFormat::Json => OutputFormat::Json,
            crate::cli::CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

fn default_api_base() -> String {
    adjutant_llm::openai::DEFAULT_API_BASE.to_string()
}

fn default_model() -> String {
    adjutant_llm::openai::DEFAULT_MODEL.to_string()
}

fn default_llm_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_workspace_key_env() -> String {
    "NOTION_API_KEY".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

impl Config {
    /// Get the configuration directory.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".adjutant"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// The merge-store database path, honoring a CLI override.
    pub fn store_path(&self, override_path: Option<&str>) -> Result<PathBuf> {
        if let Some(p) = override_path {
            return Ok(PathBuf::from(p));
        }
        if let Some(p) = &self.store.path {
            return Ok(PathBuf::from(p));
        }
        Ok(Self::dir()?.join("adjutant.db"))
    }

    /// Read the LLM API key from the configured environment variable.
    pub fn llm_api_key(&self) -> Result<String> {
        std::env::var(&self.llm.api_key_env)
            .map_err(|_| CliError::MissingEnv(self.llm.api_key_env.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.llm.api_base, config.llm.api_base);
        assert_eq!(parsed.llm.model, config.llm.model);
        assert!(parsed.workspace.is_none());
    }

    #[test]
    fn test_workspace_section_parses() {
        let config: Config = toml::from_str(
            r#"
            [workspace]
            database_id = "db-123"
            user_map = "Paola:uuid-1"
            "#,
        )
        .unwrap();

        let workspace = config.workspace.unwrap();
        assert_eq!(workspace.database_id, "db-123");
        assert_eq!(workspace.api_key_env, "NOTION_API_KEY");
    }

    #[test]
    fn test_store_path_override_wins() {
        let config = Config::default();
        let path = config.store_path(Some("/tmp/x.db")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/x.db"));
    }
}
