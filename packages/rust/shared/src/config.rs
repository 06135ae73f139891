//! Application configuration for PromptCraft.
//!
//! User config lives at `~/.promptcraft/promptcraft.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PromptCraftError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "promptcraft.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".promptcraft";

// ---------------------------------------------------------------------------
// Config structs (matching promptcraft.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// External evaluator settings.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Reasoning depth used when the context does not name one.
    #[serde(default = "default_reasoning_depth")]
    pub reasoning_depth: String,

    /// Tone used when no preference is given.
    #[serde(default = "default_tone")]
    pub tone: String,

    /// Whether `generate` runs the evaluator unless told otherwise.
    #[serde(default)]
    pub include_evaluation: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            reasoning_depth: default_reasoning_depth(),
            tone: default_tone(),
            include_evaluation: false,
        }
    }
}

fn default_reasoning_depth() -> String {
    "intermediate".into()
}
fn default_tone() -> String {
    "professional".into()
}

/// `[evaluator]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Command that runs the evaluator process. `None` disables evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Extra arguments passed to the command.
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the evaluator process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Maximum seconds to wait for one evaluation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            working_dir: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.promptcraft/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PromptCraftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.promptcraft/promptcraft.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PromptCraftError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PromptCraftError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PromptCraftError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PromptCraftError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PromptCraftError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject configs that would make every evaluation fail.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.evaluator.timeout_secs == 0 {
        return Err(PromptCraftError::config(
            "evaluator.timeout_secs must be greater than zero",
        ));
    }
    if let Some(cmd) = &config.evaluator.command {
        if cmd.trim().is_empty() {
            return Err(PromptCraftError::config(
                "evaluator.command is set but empty; remove it to disable evaluation",
            ));
        }
    }
    Ok(())
}
